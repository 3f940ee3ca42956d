//! The wires between the host and the panel.

use embedded_hal::{
  delay::DelayNs,
  digital::{self, InputPin, OutputPin},
  spi::{self, SpiDevice},
};

/// How long to wait for the BUSY line, and how often to look at it.
///
/// A refresh of this panel takes around 15 seconds, so the default allows
/// 20 before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusyPolicy {
  /// Delay between two reads of the BUSY line.
  pub poll_interval_ms: u32,
  /// Total wait after which [InterfaceError::BusyTimeout] is returned.
  pub timeout_ms: u32,
}
impl BusyPolicy {
  /// Polls every 10ms for up to 20s.
  pub const DEFAULT: Self = Self { poll_interval_ms: 10, timeout_ms: 20_000 };

  /// How many polls fit in the timeout, counting the first one.
  #[inline]
  #[must_use]
  pub const fn max_polls(self) -> u32 {
    let interval = if self.poll_interval_ms == 0 { 1 } else { self.poll_interval_ms };
    self.timeout_ms / interval + 1
  }
}
impl Default for BusyPolicy {
  #[inline]
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// The level of the BUSY line that means the panel has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusyLevel {
  /// Wait until the line reads high (used after power on and refresh).
  High,
  /// Wait until the line reads low (used after power off).
  Low,
}

/// An error from talking to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InterfaceError {
  /// The SPI bus reported an error.
  Spi(spi::ErrorKind),
  /// A GPIO pin reported an error.
  Pin(digital::ErrorKind),
  /// The BUSY line never reached the wanted level.
  ///
  /// The panel might still be working. Whether to wait again, reset, or give
  /// up is the caller's call.
  BusyTimeout {
    /// The level that was being waited for.
    level: BusyLevel,
    /// About how long was spent waiting.
    waited_ms: u32,
  },
}
impl core::fmt::Display for InterfaceError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Spi(kind) => write!(f, "spi error: {kind}"),
      Self::Pin(kind) => write!(f, "pin error: {kind}"),
      Self::BusyTimeout { level, waited_ms } => {
        write!(f, "busy line not {level:?} after {waited_ms}ms")
      }
    }
  }
}
#[cfg(feature = "std")]
impl std::error::Error for InterfaceError {}

#[inline]
fn pin_err<E: digital::Error>(e: E) -> InterfaceError {
  InterfaceError::Pin(e.kind())
}
#[inline]
fn spi_err<E: spi::Error>(e: E) -> InterfaceError {
  InterfaceError::Spi(e.kind())
}

/// What the panel driver needs from the hardware.
///
/// [SpiInterface] is the real one. Tests can record calls instead.
pub trait DisplayInterface {
  /// Error from the hardware.
  type Error;

  /// Sends one command byte (DC low).
  fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

  /// Sends parameter or frame bytes (DC high).
  fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

  /// Pulses the reset line low, then lets the controller come back up.
  fn reset(&mut self, low_ms: u32, settle_ms: u32) -> Result<(), Self::Error>;

  /// Drives the reset line low and leaves it there.
  fn hold_reset(&mut self) -> Result<(), Self::Error>;

  /// Blocks until BUSY reads `level`, or the busy policy runs out.
  fn wait_for_busy(&mut self, level: BusyLevel) -> Result<(), Self::Error>;

  /// Blocks for `ms` milliseconds.
  fn delay_ms(&mut self, ms: u32);
}

/// A panel wired to an SPI bus plus DC, RST, and BUSY lines.
///
/// Chip select belongs to the [SpiDevice]. Only the data-out line is needed,
/// the panel never talks back over SPI.
pub struct SpiInterface<SPI, DC, RST, BUSY, DELAY> {
  spi: SPI,
  dc: DC,
  rst: RST,
  busy: BUSY,
  delay: DELAY,
  policy: BusyPolicy,
}
impl<SPI, DC, RST, BUSY, DELAY> SpiInterface<SPI, DC, RST, BUSY, DELAY>
where
  SPI: SpiDevice,
  DC: OutputPin,
  RST: OutputPin,
  BUSY: InputPin,
  DELAY: DelayNs,
{
  /// Bundles up the bus and pins, using [BusyPolicy::DEFAULT].
  #[inline]
  pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: DELAY) -> Self {
    Self::with_policy(spi, dc, rst, busy, delay, BusyPolicy::DEFAULT)
  }

  /// Bundles up the bus and pins with a custom busy policy.
  #[inline]
  pub fn with_policy(
    spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: DELAY, policy: BusyPolicy,
  ) -> Self {
    Self { spi, dc, rst, busy, delay, policy }
  }

  /// The busy policy in use.
  #[inline]
  #[must_use]
  pub fn policy(&self) -> BusyPolicy {
    self.policy
  }

  /// Changes the busy policy.
  #[inline]
  pub fn set_policy(&mut self, policy: BusyPolicy) {
    self.policy = policy;
  }

  /// Gives back the bus and pins.
  #[inline]
  pub fn release(self) -> (SPI, DC, RST, BUSY, DELAY) {
    (self.spi, self.dc, self.rst, self.busy, self.delay)
  }
}
impl<SPI, DC, RST, BUSY, DELAY> DisplayInterface for SpiInterface<SPI, DC, RST, BUSY, DELAY>
where
  SPI: SpiDevice,
  DC: OutputPin,
  RST: OutputPin,
  BUSY: InputPin,
  DELAY: DelayNs,
{
  type Error = InterfaceError;

  fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
    self.dc.set_low().map_err(pin_err)?;
    self.spi.write(&[command]).map_err(spi_err)
  }

  fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
    self.dc.set_high().map_err(pin_err)?;
    self.spi.write(data).map_err(spi_err)
  }

  fn reset(&mut self, low_ms: u32, settle_ms: u32) -> Result<(), Self::Error> {
    self.rst.set_low().map_err(pin_err)?;
    self.delay.delay_ms(low_ms);
    self.rst.set_high().map_err(pin_err)?;
    self.delay.delay_ms(settle_ms);
    Ok(())
  }

  fn hold_reset(&mut self) -> Result<(), Self::Error> {
    self.rst.set_low().map_err(pin_err)
  }

  fn wait_for_busy(&mut self, level: BusyLevel) -> Result<(), Self::Error> {
    let interval = self.policy.poll_interval_ms.max(1);
    let polls = self.policy.max_polls();
    let mut waited_ms: u32 = 0;
    for poll in 1..=polls {
      let is_high = self.busy.is_high().map_err(pin_err)?;
      if is_high == (level == BusyLevel::High) {
        log::trace!("busy line {level:?} after {waited_ms}ms");
        return Ok(());
      }
      if poll < polls {
        self.delay.delay_ms(interval);
        waited_ms = waited_ms.saturating_add(interval);
      }
    }
    log::warn!("busy line still not {level:?} after {waited_ms}ms");
    Err(InterfaceError::BusyTimeout { level, waited_ms })
  }

  #[inline]
  fn delay_ms(&mut self, ms: u32) {
    self.delay.delay_ms(ms);
  }
}
