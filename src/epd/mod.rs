//! The 5.65" seven-color e-paper panel this crate draws on.
//!
//! Showing a frame goes: set resolution, start data, stream the frame, power
//! on, wait, refresh, wait, power off, wait. The waits watch the panel's BUSY
//! line, and each one gives up with
//! [InterfaceError::BusyTimeout] once its [BusyPolicy] runs out.

pub mod command;

mod interface;
pub use interface::*;

mod display;
pub use display::*;
