//! Driving the 5.65" seven-color panel.

use super::{
  command::*,
  interface::{BusyLevel, DisplayInterface},
};
use crate::{palette::DeviceColor, PANEL_BYTES_PER_LINE, PANEL_FRAME_LEN, PANEL_HEIGHT, PANEL_WIDTH};

/// Fixed delays of the panel's power sequencing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelTiming {
  /// How long the reset line is held low.
  pub reset_low_ms: u32,
  /// Wait after the reset line goes back high.
  pub reset_settle_ms: u32,
  /// Wait between the register setup and the final VCOM write.
  pub init_settle_ms: u32,
  /// Wait before and after the deep sleep command.
  pub sleep_guard_ms: u32,
  /// Wait after the panel reports power off, before anything else is sent.
  pub power_off_settle_ms: u32,
  /// Like `power_off_settle_ms`, but after a [clear](Epd5in65f::clear).
  pub clear_settle_ms: u32,
}
impl PanelTiming {
  /// The delays from the panel maker's reference driver.
  pub const DEFAULT: Self = Self {
    reset_low_ms: 1,
    reset_settle_ms: 200,
    init_settle_ms: 100,
    sleep_guard_ms: 100,
    power_off_settle_ms: 200,
    clear_settle_ms: 500,
  };
}
impl Default for PanelTiming {
  #[inline]
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// An error from the panel driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error<E> {
  /// The hardware interface failed.
  Interface(E),
  /// A full frame must be exactly [PANEL_FRAME_LEN] bytes.
  FrameLength {
    /// The length that was passed.
    actual: usize,
  },
  /// A partial image doesn't fit the panel, isn't 2-pixel aligned, or its
  /// data is the wrong length for its size.
  InvalidRegion,
}
impl<E: core::fmt::Display> core::fmt::Display for Error<E> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Interface(e) => write!(f, "{e}"),
      Self::FrameLength { actual } => {
        write!(f, "frame is {actual} bytes, expected {PANEL_FRAME_LEN}")
      }
      Self::InvalidRegion => write!(f, "region doesn't fit the panel"),
    }
  }
}
#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for Error<E> {}

/// A partial image placed on an otherwise white panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
  /// Left edge in pixels. Must be even.
  pub x: u32,
  /// Top edge in pixels.
  pub y: u32,
  /// Width in pixels. Must be even.
  pub width: u32,
  /// Height in pixels.
  pub height: u32,
  /// Packed panel color pairs, `width / 2` bytes per row, top row first.
  pub data: &'a [u8],
}
impl<'a> Region<'a> {
  /// A region in the middle of the panel.
  ///
  /// The left edge is rounded down to an even pixel. An image bigger than the
  /// panel still makes a region, it just won't pass validation.
  #[inline]
  #[must_use]
  pub const fn centered(width: u32, height: u32, data: &'a [u8]) -> Self {
    let x = (PANEL_WIDTH.saturating_sub(width) / 2) & !1;
    let y = PANEL_HEIGHT.saturating_sub(height) / 2;
    Self { x, y, width, height, data }
  }

  fn is_valid(&self) -> bool {
    let fits_x = self.x.checked_add(self.width).is_some_and(|r| r <= PANEL_WIDTH);
    let fits_y = self.y.checked_add(self.height).is_some_and(|b| b <= PANEL_HEIGHT);
    let expected_len = (self.width / 2) as usize * self.height as usize;
    fits_x && fits_y && self.x % 2 == 0 && self.width % 2 == 0 && self.data.len() == expected_len
  }
}

/// The 600x448 seven-color e-paper panel.
///
/// Frames are [PANEL_FRAME_LEN] bytes: 448 rows of 300 bytes, two pixels per
/// byte, each nibble a [DeviceColor] code.
pub struct Epd5in65f<I> {
  interface: I,
  timing: PanelTiming,
  line_buffer: [u8; PANEL_BYTES_PER_LINE],
}
impl<I> Epd5in65f<I>
where
  I: DisplayInterface,
{
  /// Wraps an interface. Nothing is sent until [init](Self::init).
  #[inline]
  pub fn new(interface: I, timing: PanelTiming) -> Self {
    Self { interface, timing, line_buffer: [0; PANEL_BYTES_PER_LINE] }
  }

  /// Gives back the interface.
  #[inline]
  pub fn release(self) -> I {
    self.interface
  }

  /// Direct access to the interface.
  #[inline]
  pub fn interface_mut(&mut self) -> &mut I {
    &mut self.interface
  }

  fn command_with(&mut self, command: u8, params: &[u8]) -> Result<(), Error<I::Error>> {
    self.interface.send_command(command).map_err(Error::Interface)?;
    if !params.is_empty() {
      self.interface.send_data(params).map_err(Error::Interface)?;
    }
    Ok(())
  }

  /// Resets the controller and sets up its registers.
  ///
  /// This is also how the panel comes back out of [sleep](Self::sleep).
  pub fn init(&mut self) -> Result<(), Error<I::Error>> {
    log::debug!("panel init");
    let PanelTiming { reset_low_ms, reset_settle_ms, .. } = self.timing;
    self.interface.reset(reset_low_ms, reset_settle_ms).map_err(Error::Interface)?;
    self.interface.wait_for_busy(BusyLevel::High).map_err(Error::Interface)?;
    for (command, params) in INIT_SEQUENCE.iter().copied() {
      self.command_with(command, params)?;
    }
    self.interface.delay_ms(self.timing.init_settle_ms);
    self.command_with(VCOM_DATA_INTERVAL, &VCOM_DATA_INTERVAL_PARAMS)?;
    Ok(())
  }

  /// Brings the panel back after [sleep](Self::sleep). Same as
  /// [init](Self::init), since only a hardware reset leaves deep sleep.
  #[inline]
  pub fn wake(&mut self) -> Result<(), Error<I::Error>> {
    self.init()
  }

  fn begin_frame(&mut self) -> Result<(), Error<I::Error>> {
    self.command_with(RESOLUTION_SETTING, &RESOLUTION_PARAMS)?;
    self.interface.send_command(DATA_START_TRANSMISSION).map_err(Error::Interface)?;
    Ok(())
  }

  fn power_on_and_refresh(&mut self) -> Result<(), Error<I::Error>> {
    self.interface.send_command(POWER_ON).map_err(Error::Interface)?;
    self.interface.wait_for_busy(BusyLevel::High).map_err(Error::Interface)?;
    self.interface.send_command(DISPLAY_REFRESH).map_err(Error::Interface)?;
    Ok(())
  }

  /// Sends a frame and starts the refresh, without waiting for it to finish.
  ///
  /// Follow up with [wait_frame_done](Self::wait_frame_done). The refresh
  /// takes several seconds, so the host can sleep in between.
  pub fn send_frame(&mut self, frame: &[u8]) -> Result<(), Error<I::Error>> {
    if frame.len() != PANEL_FRAME_LEN {
      log::warn!("frame is {} bytes, expected {PANEL_FRAME_LEN}", frame.len());
      return Err(Error::FrameLength { actual: frame.len() });
    }
    self.begin_frame()?;
    self.interface.send_data(frame).map_err(Error::Interface)?;
    self.power_on_and_refresh()
  }

  /// Waits out a refresh started by [send_frame](Self::send_frame), then
  /// powers the panel down.
  pub fn wait_frame_done(&mut self) -> Result<(), Error<I::Error>> {
    self.power_down(self.timing.power_off_settle_ms)
  }

  fn power_down(&mut self, settle_ms: u32) -> Result<(), Error<I::Error>> {
    self.interface.wait_for_busy(BusyLevel::High).map_err(Error::Interface)?;
    self.interface.send_command(POWER_OFF).map_err(Error::Interface)?;
    self.interface.wait_for_busy(BusyLevel::Low).map_err(Error::Interface)?;
    self.interface.delay_ms(settle_ms);
    Ok(())
  }

  /// Shows a full frame, blocking until the panel is powered back down.
  pub fn display_frame(&mut self, frame: &[u8]) -> Result<(), Error<I::Error>> {
    self.send_frame(frame)?;
    self.wait_frame_done()?;
    log::debug!("frame displayed");
    Ok(())
  }

  /// Paints the whole panel one color.
  pub fn clear(&mut self, color: DeviceColor) -> Result<(), Error<I::Error>> {
    self.begin_frame()?;
    self.line_buffer.fill(color.pair_byte());
    for _ in 0..PANEL_HEIGHT {
      self.interface.send_data(&self.line_buffer).map_err(Error::Interface)?;
    }
    self.power_on_and_refresh()?;
    self.power_down(self.timing.clear_settle_ms)
  }

  /// Shows a smaller image at a position, with white everywhere else.
  pub fn display_region(&mut self, region: Region<'_>) -> Result<(), Error<I::Error>> {
    if !region.is_valid() {
      log::warn!("invalid region: {}x{} at ({}, {})", region.width, region.height, region.x, region.y);
      return Err(Error::InvalidRegion);
    }
    let background = DeviceColor::White.pair_byte();
    let row_bytes = (region.width / 2) as usize;
    let left = (region.x / 2) as usize;
    self.begin_frame()?;
    for y in 0..PANEL_HEIGHT {
      self.line_buffer.fill(background);
      if (region.y..region.y + region.height).contains(&y) {
        let start = (y - region.y) as usize * row_bytes;
        self.line_buffer[left..left + row_bytes]
          .copy_from_slice(&region.data[start..start + row_bytes]);
      }
      self.interface.send_data(&self.line_buffer).map_err(Error::Interface)?;
    }
    self.power_on_and_refresh()?;
    self.wait_frame_done()
  }

  /// Puts the controller into deep sleep and holds it in reset.
  ///
  /// Call [init](Self::init) to use it again.
  pub fn sleep(&mut self) -> Result<(), Error<I::Error>> {
    self.interface.delay_ms(self.timing.sleep_guard_ms);
    self.command_with(DEEP_SLEEP, &[DEEP_SLEEP_CHECK])?;
    self.interface.delay_ms(self.timing.sleep_guard_ms);
    self.interface.hold_reset().map_err(Error::Interface)?;
    log::debug!("panel asleep");
    Ok(())
  }
}
