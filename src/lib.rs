#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]

//! A crate for getting 16 color bitmaps onto a seven-color e-paper panel.
//!
//! The panel is 600x448 and its pixels are 3-bit color codes, two pixels per
//! byte. A matching BMP (4 bits per pixel, 16 color palette, the same size)
//! is almost the right shape already. Loading one goes:
//!
//! 1. Parse the headers and color table, checking the format and the size
//!    ([bmp]).
//! 2. Copy the raw pixel data into a caller-provided frame buffer.
//! 3. Resolve each palette color to a panel color ([palette]).
//! 4. Rewrite every pixel through that table, then mirror every scanline
//!    ([remap]).
//!
//! [load_bitmap_for_panel] does all of that, and the resulting frame goes to
//! the panel with [epd::Epd5in65f::display_frame].

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod ascii_array;
pub use ascii_array::*;

mod error;
pub use error::*;

mod util;

mod source;
pub use source::*;

pub mod bmp;

pub mod palette;

pub mod remap;

mod decoder;
pub use decoder::*;

pub mod epd;

/// Panel width in pixels.
pub const PANEL_WIDTH: u32 = 600;

/// Panel height in pixels.
pub const PANEL_HEIGHT: u32 = 448;

/// Bytes in one packed scanline, two pixels per byte.
pub const PANEL_BYTES_PER_LINE: usize = PANEL_WIDTH as usize / 2;

/// Bytes in one full frame.
pub const PANEL_FRAME_LEN: usize = PANEL_BYTES_PER_LINE * PANEL_HEIGHT as usize;

/// A frame buffer of exactly one frame, on the heap.
#[cfg(feature = "alloc")]
#[must_use]
pub fn new_frame_buffer() -> alloc::boxed::Box<[u8]> {
  alloc::vec![0_u8; PANEL_FRAME_LEN].into_boxed_slice()
}
