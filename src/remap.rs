//! The in-place passes that turn raw 4bpp pixel data into panel data.
//!
//! 1. [remap_nibbles]: every nibble goes from palette index to panel color.
//! 2. [mirror_scanlines]: every scanline is reversed left to right.
//!
//! The mirror has to run second. It reads panel colors, and the remap has to
//! have finished on every scanline first.
//!
//! Two pixels share each byte, so mirroring a scanline isn't a plain byte
//! reversal. The bytes at `i` and `len-1-i` trade places *and* each has its
//! nibbles swapped: `(h, l)` and `(h', l')` become `(l', h')` and `(l, h)`.

use crate::palette::ColorLut;

/// Replaces both nibbles of every byte with their panel color codes.
///
/// The high nibble's color stays in the high nibble, and the low nibble's
/// color stays in the low nibble.
#[inline]
pub fn remap_nibbles(buf: &mut [u8], lut: &ColorLut) {
  let table = lut.byte_table();
  buf.iter_mut().for_each(|b| *b = table[usize::from(*b)]);
}

/// Swaps the two pixels held in one byte.
#[inline]
#[must_use]
pub const fn swap_nibbles(b: u8) -> u8 {
  b.rotate_left(4)
}

/// Reverses the pixel order of one packed 4bpp scanline, in place.
///
/// With an odd byte count the center byte stays put but still has its two
/// pixels swapped.
#[inline]
pub fn mirror_scanline(line: &mut [u8]) {
  let half = line.len() / 2;
  let (left, rest) = line.split_at_mut(half);
  let (center, right) = rest.split_at_mut(rest.len() - half);
  for (a, b) in left.iter_mut().zip(right.iter_mut().rev()) {
    let (new_a, new_b) = (swap_nibbles(*b), swap_nibbles(*a));
    *a = new_a;
    *b = new_b;
  }
  if let [c] = center {
    *c = swap_nibbles(*c);
  }
}

/// Mirrors every full scanline of `buf` left to right.
///
/// Scanline order is unchanged. A trailing partial scanline is left alone.
///
/// ## Panics
/// * If `bytes_per_line` is 0.
#[inline]
pub fn mirror_scanlines(buf: &mut [u8], bytes_per_line: usize) {
  buf.chunks_exact_mut(bytes_per_line).for_each(mirror_scanline);
}

/// Runs the remap pass over the whole buffer, then the mirror pass.
///
/// Sizes aren't checked here, pass exactly `height * bytes_per_line` bytes.
///
/// ## Panics
/// * If `bytes_per_line` is 0.
pub fn remap_and_mirror(buf: &mut [u8], lut: &ColorLut, bytes_per_line: usize) {
  remap_nibbles(buf, lut);
  mirror_scanlines(buf, bytes_per_line);
  log::trace!("remapped and mirrored {} scanlines", buf.len() / bytes_per_line);
}
