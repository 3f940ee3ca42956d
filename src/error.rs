use core::num::TryFromIntError;

/// An error from loading a bitmap for the panel.
///
/// After any of these the output buffer may be partly written. Don't show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum DecodeError {
  /// The byte source couldn't be opened, or a read/seek on it failed.
  SourceUnavailable,

  /// The file doesn't start with the `BM` tag.
  NotABmp,

  /// Only 4 bits per pixel (16 color palette) images are supported.
  UnsupportedFormat {
    /// What the info header declared.
    bits_per_pixel: u16,
  },

  /// The image isn't exactly the size of the panel.
  DimensionMismatch {
    /// What the info header declared.
    width: u32,
    /// What the info header declared.
    height: u32,
  },

  /// The byte source ended before everything the headers promised was read.
  InsufficientBytes,

  /// The pixel data span given by the file header can't hold a full frame.
  PixelDataIllegalLength,

  /// The caller's output buffer can't hold the pixel data.
  BufferTooSmall {
    /// Bytes the pixel data needs.
    needed: usize,
    /// Bytes the buffer has.
    available: usize,
  },
}
impl From<TryFromIntError> for DecodeError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::PixelDataIllegalLength
  }
}
impl core::fmt::Display for DecodeError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::SourceUnavailable => write!(f, "byte source unavailable"),
      Self::NotABmp => write!(f, "not a BMP file"),
      Self::UnsupportedFormat { bits_per_pixel } => {
        write!(f, "unsupported bit depth {bits_per_pixel}, only 4bpp is supported")
      }
      Self::DimensionMismatch { width, height } => write!(
        f,
        "image is {width}x{height}, panel is {}x{}",
        crate::PANEL_WIDTH,
        crate::PANEL_HEIGHT
      ),
      Self::InsufficientBytes => write!(f, "byte source ended early"),
      Self::PixelDataIllegalLength => write!(f, "pixel data span is invalid"),
      Self::BufferTooSmall { needed, available } => {
        write!(f, "output buffer too small: need {needed} bytes, have {available}")
      }
    }
  }
}
#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
