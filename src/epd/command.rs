//! Command bytes of the 5.65" seven-color panel controller.
//!
//! A command byte goes out with the DC line low, and its parameter bytes
//! follow with DC high.

/// Panel setting. Params: 2 bytes.
pub const PANEL_SETTING: u8 = 0x00;
/// Power setting. Params: 4 bytes.
pub const POWER_SETTING: u8 = 0x01;
/// Turns the panel's power off. BUSY goes low once it's done.
pub const POWER_OFF: u8 = 0x02;
/// Power off sequence setting. Params: 1 byte.
pub const POWER_OFF_SEQUENCE: u8 = 0x03;
/// Turns the panel's power on. BUSY goes high once it's done.
pub const POWER_ON: u8 = 0x04;
/// Booster soft start. Params: 3 bytes.
pub const BOOSTER_SOFT_START: u8 = 0x06;
/// Deep sleep. Params: [DEEP_SLEEP_CHECK]. Only a hardware reset wakes it.
pub const DEEP_SLEEP: u8 = 0x07;
/// Starts the frame data transfer. Params: the whole frame.
pub const DATA_START_TRANSMISSION: u8 = 0x10;
/// Refreshes the display from the frame data.
pub const DISPLAY_REFRESH: u8 = 0x12;
/// PLL control. Params: 1 byte.
pub const PLL_CONTROL: u8 = 0x30;
/// Temperature sensor selection. Params: 1 byte.
pub const TEMPERATURE_SENSOR: u8 = 0x41;
/// VCOM and data interval setting. Params: 1 byte.
pub const VCOM_DATA_INTERVAL: u8 = 0x50;
/// TCON setting. Params: 1 byte.
pub const TCON_SETTING: u8 = 0x60;
/// Resolution setting. Params: width and height, each big-endian `u16`.
pub const RESOLUTION_SETTING: u8 = 0x61;
/// Power saving. Params: 1 byte.
pub const POWER_SAVING: u8 = 0xE3;

/// The check code that has to follow [DEEP_SLEEP].
pub const DEEP_SLEEP_CHECK: u8 = 0xA5;

/// Controller register setup, in the order it's sent after a reset.
pub(crate) const INIT_SEQUENCE: &[(u8, &[u8])] = &[
  (PANEL_SETTING, &[0xEF, 0x08]),
  (POWER_SETTING, &[0x37, 0x00, 0x23, 0x23]),
  (POWER_OFF_SEQUENCE, &[0x00]),
  (BOOSTER_SOFT_START, &[0xC7, 0xC7, 0x1D]),
  (PLL_CONTROL, &[0x3C]),
  (TEMPERATURE_SENSOR, &[0x00]),
  (VCOM_DATA_INTERVAL, &[0x37]),
  (TCON_SETTING, &[0x22]),
  (RESOLUTION_SETTING, &RESOLUTION_PARAMS),
  (POWER_SAVING, &[0xAA]),
];

/// VCOM setting sent again once the init sequence has settled.
pub(crate) const VCOM_DATA_INTERVAL_PARAMS: [u8; 1] = [0x37];

/// [RESOLUTION_SETTING] params for the full panel.
pub const RESOLUTION_PARAMS: [u8; 4] = {
  let [w_hi, w_lo] = (crate::PANEL_WIDTH as u16).to_be_bytes();
  let [h_hi, h_lo] = (crate::PANEL_HEIGHT as u16).to_be_bytes();
  [w_hi, w_lo, h_hi, h_lo]
};

#[test]
fn test_resolution_params() {
  assert_eq!(RESOLUTION_PARAMS, [0x02, 0x58, 0x01, 0xC0]);
}
