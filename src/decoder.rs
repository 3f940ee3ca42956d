//! Loading a bitmap file all the way to a panel-ready frame.

use crate::{
  bmp::{read_bitmap, BmpHeaders},
  palette::ColorLut,
  remap::remap_and_mirror,
  ByteSource, DecodeError, SliceSource, PANEL_BYTES_PER_LINE, PANEL_FRAME_LEN,
};

/// What a successful load produced, besides the frame itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
  /// The bitmap's headers and color table.
  pub headers: BmpHeaders,
  /// How the color table was mapped onto the panel's colors.
  pub lut: ColorLut,
  /// Bytes of pixel data the file held. The frame is the first
  /// [PANEL_FRAME_LEN] of them, zero padded if there were fewer.
  pub pixel_data_len: usize,
}

/// Reads a bitmap from `source` and leaves a panel-ready frame at the start
/// of `out`.
///
/// `out` needs room for the file's whole pixel data span, and for at least
/// [PANEL_FRAME_LEN] bytes. Afterwards `out[..PANEL_FRAME_LEN]` can go
/// straight to [Epd5in65f::display_frame](crate::epd::Epd5in65f::display_frame).
///
/// ## Failure
/// See [read_bitmap]. After a failure the contents of `out` are unspecified.
pub fn load_bitmap_for_panel<S: ByteSource + ?Sized>(
  source: &mut S, out: &mut [u8],
) -> Result<DecodedFrame, DecodeError> {
  let parts = read_bitmap(source, out)?;
  let lut = ColorLut::from_palette(&parts.headers.palette);
  // `read_bitmap` leaves a full frame, zero padded when the span is short.
  remap_and_mirror(&mut out[..PANEL_FRAME_LEN], &lut, PANEL_BYTES_PER_LINE);
  log::info!("bitmap loaded, {} bytes of pixel data", parts.pixel_data_len);
  Ok(DecodedFrame { headers: parts.headers, lut, pixel_data_len: parts.pixel_data_len })
}

/// [load_bitmap_for_panel] for a BMP file that's already in memory.
#[inline]
pub fn load_bitmap_bytes(bytes: &[u8], out: &mut [u8]) -> Result<DecodedFrame, DecodeError> {
  load_bitmap_for_panel(&mut SliceSource::try_new(bytes)?, out)
}

/// [load_bitmap_for_panel] for a BMP file on disk.
#[cfg(feature = "std")]
pub fn load_bitmap_file<P: AsRef<std::path::Path>>(
  path: P, out: &mut [u8],
) -> Result<DecodedFrame, DecodeError> {
  let start = std::time::Instant::now();
  let mut source = crate::IoSource::open(path)?;
  let frame = load_bitmap_for_panel(&mut source, out)?;
  log::info!("decode took {:?}", start.elapsed());
  Ok(frame)
}
