#![forbid(unsafe_code)]

//! Module for the Windows Bitmap files (BMP) the panel can show.
//!
//! ## Parsing The Format
//!
//! Note: All multi-byte values in BMP are always little-endian encoded.
//!
//! Only one exact flavor of BMP is accepted: 4 bits per pixel, 600 by 448,
//! with the 40 byte info header and a full 16 entry color table. That's what
//! image editors produce when asked for a "16 color bitmap" of the panel
//! size, and it means every piece of the file is a fixed size.
//!
//! * A 14 byte "file header": the `BM` tag, the total size of the file, and
//!   the position of the pixel data within the file.
//! * A 40 byte "info header": width, height, bits per pixel, and so on.
//! * A 16 entry color table. Each entry is `[b, g, r, 0]`.
//! * Possibly a gap, then the pixel array, starting at the position given in
//!   the file header and running to the end of the file.
//!
//! The pixel array has two pixels per byte, and the leftmost pixel is the
//! high 4 bits of the byte. A 600 pixel row is 300 bytes, which is already a
//! multiple of 4, so the rows have no padding.
//!
//! Rows are stored bottom-up (the usual for positive height). The panel scans
//! the other way around, and the loader accounts for it by mirroring each
//! row, see [crate::remap].

use crate::{AsciiArray, ByteSource, DecodeError, PANEL_FRAME_LEN, PANEL_HEIGHT, PANEL_WIDTH};

mod headers;
pub use headers::*;

/// The tag at the start of a windows bitmap.
pub const BMP_TAG: AsciiArray<2> = AsciiArray(*b"BM");

/// Entries in the color table of a 4bpp bitmap.
pub const PALETTE_LEN: usize = 16;

/// The bits per pixel value that's supported.
pub const SUPPORTED_BITS_PER_PIXEL: u16 = 4;

/// Where the pixel data starts when there's no gap after the color table.
pub const PIXEL_DATA_MIN_OFFSET: usize =
  BmpFileHeader::SIZE + BmpInfoHeader::SIZE + PALETTE_LEN * core::mem::size_of::<PaletteEntry>();

/// Everything before the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeaders {
  /// The file header.
  pub file: BmpFileHeader,
  /// The info header.
  pub info: BmpInfoHeader,
  /// The color table.
  pub palette: Palette,
}

/// The result of [read_bitmap]: the headers, and how much of the output
/// buffer now holds pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpParts {
  /// The parsed headers.
  pub headers: BmpHeaders,
  /// Bytes of pixel data written to the start of the output buffer.
  pub pixel_data_len: usize,
}

/// Reads the file header, info header, and color table from the source.
///
/// The source should be positioned at the start of the file, and is left just
/// past the color table.
///
/// ## Failure
/// * [DecodeError::NotABmp] if the tag isn't `BM`.
/// * [DecodeError::UnsupportedFormat] if it's not 4 bits per pixel. In this
///   case the color table isn't read.
/// * Any read error from the source.
pub fn read_bmp_headers<S: ByteSource + ?Sized>(source: &mut S) -> Result<BmpHeaders, DecodeError> {
  let file: BmpFileHeader = crate::util::read_pod::<BitmapFileHeader, S>(source)?.into();
  log::debug!(
    "file header: tag {:?}, file size {}, pixel data offset {}",
    file.tag,
    file.file_size,
    file.pixel_data_offset
  );
  if !file.has_bm_tag() {
    log::warn!("file tag is {:?}, not a BMP", file.tag);
    return Err(DecodeError::NotABmp);
  }

  let info: BmpInfoHeader = crate::util::read_pod::<BitmapInfoHeader, S>(source)?.into();
  log::debug!(
    "info header: {}x{}, {} bits per pixel, compression {}",
    info.width,
    info.height,
    info.bits_per_pixel,
    info.compression
  );
  if info.bits_per_pixel != SUPPORTED_BITS_PER_PIXEL {
    log::warn!("can only process 4 bits per pixel, found {}", info.bits_per_pixel);
    return Err(DecodeError::UnsupportedFormat { bits_per_pixel: info.bits_per_pixel });
  }

  let palette: Palette = crate::util::read_pod::<Palette, S>(source)?;
  for (i, entry) in palette.iter().enumerate() {
    log::trace!("color entry {i}: {entry:?} (r {}, g {}, b {})", entry.r, entry.g, entry.b);
  }

  Ok(BmpHeaders { file, info, palette })
}

/// Checks that the headers describe an image the panel can show, and gives
/// the length of the pixel data span, `file_size - pixel_data_offset`.
///
/// The span isn't compared against the frame size. Some editors write a
/// `file_size` that's a little short, and such files still display.
///
/// ## Failure
/// * [DecodeError::DimensionMismatch] unless the image is exactly 600x448.
/// * [DecodeError::PixelDataIllegalLength] if the pixel data offset is past
///   the end of the file.
pub fn validate_for_panel(headers: &BmpHeaders) -> Result<usize, DecodeError> {
  let BmpInfoHeader { width, height, .. } = headers.info;
  if width != PANEL_WIDTH || height != PANEL_HEIGHT {
    log::warn!("image is {width}x{height}, panel needs {PANEL_WIDTH}x{PANEL_HEIGHT}");
    return Err(DecodeError::DimensionMismatch { width, height });
  }
  let len = headers.file.pixel_data_len().ok_or_else(|| {
    log::warn!(
      "pixel data offset {} is past the file size {}",
      headers.file.pixel_data_offset,
      headers.file.file_size
    );
    DecodeError::PixelDataIllegalLength
  })?;
  let len = usize::try_from(len)?;
  if len < PANEL_FRAME_LEN {
    log::debug!("pixel data is {len} bytes, short of a {PANEL_FRAME_LEN} byte frame");
  }
  Ok(len)
}

/// Reads a panel-sized 4bpp bitmap, copying the raw pixel data into `out`.
///
/// The headers are always read in full before the size is checked. On
/// success the first `pixel_data_len` bytes of `out` hold the packed palette
/// indexes exactly as they were stored in the file. When that's less than a
/// full frame, the rest of the frame is zeroed (palette index 0).
///
/// ## Failure
/// * Everything [read_bmp_headers] and [validate_for_panel] can fail with.
/// * [DecodeError::BufferTooSmall] if `out` can't hold both the pixel data
///   and a full frame.
/// * [DecodeError::InsufficientBytes] if the source is shorter than the file
///   header claims.
pub fn read_bitmap<S: ByteSource + ?Sized>(
  source: &mut S, out: &mut [u8],
) -> Result<BmpParts, DecodeError> {
  let headers = read_bmp_headers(source)?;
  let pixel_data_len = validate_for_panel(&headers)?;
  let available = out.len();
  let needed = pixel_data_len.max(PANEL_FRAME_LEN);
  if available < needed {
    log::warn!("pixel data needs {needed} bytes, buffer is {available}");
    return Err(DecodeError::BufferTooSmall { needed, available });
  }
  let (dest, rest) = out.split_at_mut(pixel_data_len);
  source.seek(headers.file.pixel_data_offset)?;
  source.read_exact(dest)?;
  log::debug!("read {pixel_data_len} bytes of pixel data");
  if let Some(tail) = rest.get_mut(..PANEL_FRAME_LEN.saturating_sub(pixel_data_len)) {
    tail.fill(0);
  }
  Ok(BmpParts { headers, pixel_data_len })
}
