//! Where the bitmap bytes come from.
//!
//! The decoder only needs two things from storage: read the next `n` bytes,
//! and jump to an absolute offset (the pixel data offset from the file
//! header). [ByteSource] is that capability. There's one adapter for bytes
//! already sitting in memory, and with the `std` feature one for anything
//! that's `Read + Seek` (such as a [std::fs::File]).

use crate::DecodeError;

/// A sequential, seekable supply of bytes.
pub trait ByteSource {
  /// Fills all of `dest` from the current position, then advances past it.
  ///
  /// ## Failure
  /// * [DecodeError::InsufficientBytes] if the source ends first.
  /// * [DecodeError::SourceUnavailable] if the underlying read fails.
  fn read_exact(&mut self, dest: &mut [u8]) -> Result<(), DecodeError>;

  /// Moves the position to `offset` bytes from the start.
  fn seek(&mut self, offset: u32) -> Result<(), DecodeError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
  #[inline]
  fn read_exact(&mut self, dest: &mut [u8]) -> Result<(), DecodeError> {
    (**self).read_exact(dest)
  }
  #[inline]
  fn seek(&mut self, offset: u32) -> Result<(), DecodeError> {
    (**self).seek(offset)
  }
}

/// A bitmap that's fully resident in memory.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'b> {
  bytes: &'b [u8],
  position: usize,
}
impl<'b> SliceSource<'b> {
  /// Wraps the bytes of a whole BMP file.
  ///
  /// ## Failure
  /// * An empty slice has nothing to decode, so it's
  ///   [DecodeError::SourceUnavailable].
  #[inline]
  pub fn try_new(bytes: &'b [u8]) -> Result<Self, DecodeError> {
    if bytes.is_empty() {
      log::warn!("in-memory bitmap source is empty");
      Err(DecodeError::SourceUnavailable)
    } else {
      Ok(Self { bytes, position: 0 })
    }
  }

  /// The current read position.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.position
  }
}
impl ByteSource for SliceSource<'_> {
  #[inline]
  fn read_exact(&mut self, dest: &mut [u8]) -> Result<(), DecodeError> {
    let end = self.position.checked_add(dest.len()).ok_or(DecodeError::InsufficientBytes)?;
    let src = self.bytes.get(self.position..end).ok_or(DecodeError::InsufficientBytes)?;
    dest.copy_from_slice(src);
    self.position = end;
    Ok(())
  }

  #[inline]
  fn seek(&mut self, offset: u32) -> Result<(), DecodeError> {
    let offset = usize::try_from(offset).map_err(|_| DecodeError::InsufficientBytes)?;
    if offset > self.bytes.len() {
      return Err(DecodeError::InsufficientBytes);
    }
    self.position = offset;
    Ok(())
  }
}

/// Adapts any `std::io` reader that can seek, such as an open file.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
  inner: R,
}
#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> IoSource<R> {
  /// Wraps an already opened reader.
  #[inline]
  pub const fn new(inner: R) -> Self {
    Self { inner }
  }

  /// Gives back the reader.
  #[inline]
  pub fn into_inner(self) -> R {
    self.inner
  }
}
#[cfg(feature = "std")]
impl IoSource<std::io::BufReader<std::fs::File>> {
  /// Opens a file for decoding.
  ///
  /// ## Failure
  /// * [DecodeError::SourceUnavailable] if the file can't be opened.
  pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, DecodeError> {
    let path = path.as_ref();
    match std::fs::File::open(path) {
      Ok(file) => {
        log::debug!("opened `{}`", path.display());
        Ok(Self::new(std::io::BufReader::new(file)))
      }
      Err(e) => {
        log::warn!("can't open `{}`: {e}", path.display());
        Err(DecodeError::SourceUnavailable)
      }
    }
  }
}
#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> ByteSource for IoSource<R> {
  fn read_exact(&mut self, dest: &mut [u8]) -> Result<(), DecodeError> {
    self.inner.read_exact(dest).map_err(|e| match e.kind() {
      std::io::ErrorKind::UnexpectedEof => DecodeError::InsufficientBytes,
      _ => {
        log::warn!("read failed: {e}");
        DecodeError::SourceUnavailable
      }
    })
  }

  fn seek(&mut self, offset: u32) -> Result<(), DecodeError> {
    self.inner.seek(std::io::SeekFrom::Start(u64::from(offset))).map(|_| ()).map_err(|e| {
      log::warn!("seek to {offset} failed: {e}");
      DecodeError::SourceUnavailable
    })
  }
}
