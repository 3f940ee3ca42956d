//! The header structures at the front of a 4bpp BMP file.
//!
//! Each has a `Pod` wire form (built from `pack1`'s alignment-1 little-endian
//! ints, so it can be read straight off the byte stream) and a plain public form
//! that's nicer to use.

use super::*;
use crate::util::try_pull_pod;
use bytemuck::{Pod, Zeroable};
use pack1::*;

pub(crate) const BI_RGB: u32 = 0;

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
pub(crate) struct BitmapFileHeader {
  pub ty: AsciiArray<2>,
  pub file_size: U32LE,
  pub reserved1: U16LE,
  pub reserved2: U16LE,
  pub bitmap_offset: U32LE,
}

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
pub(crate) struct BitmapInfoHeader {
  pub size: U32LE,
  pub width: I32LE,
  pub height: I32LE,
  pub planes: U16LE,
  pub bits_per_pixel: U16LE,
  pub compression: U32LE,
  pub image_size: U32LE,
  pub pixels_per_meter_x: I32LE,
  pub pixels_per_meter_y: I32LE,
  pub colors_used: U32LE,
  pub important_colors: U32LE,
}

/// The header at the start of all BMP files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BmpFileHeader {
  /// Should be `BM`. Other tags are OS/2 formats, which aren't supported.
  pub tag: AsciiArray<2>,

  /// The total size of the file.
  ///
  /// The pixel data is taken to run from `pixel_data_offset` to here.
  pub file_size: u32,

  /// The byte index within the file where the bitmap data starts.
  pub pixel_data_offset: u32,
}
impl From<BitmapFileHeader> for BmpFileHeader {
  #[inline]
  fn from(h: BitmapFileHeader) -> Self {
    Self { tag: h.ty, file_size: h.file_size.get(), pixel_data_offset: h.bitmap_offset.get() }
  }
}
impl From<BmpFileHeader> for [u8; 14] {
  #[inline]
  fn from(h: BmpFileHeader) -> Self {
    let raw = BitmapFileHeader {
      ty: h.tag,
      file_size: h.file_size.into(),
      reserved1: 0.into(),
      reserved2: 0.into(),
      bitmap_offset: h.pixel_data_offset.into(),
    };
    bytemuck::cast(raw)
  }
}
impl BmpFileHeader {
  /// Wire size of the file header.
  pub const SIZE: usize = 14;

  /// Tries to get the file header and remaining bytes from the bytes of a BMP
  /// file.
  ///
  /// The bytes from here should be used to get the [BmpInfoHeader].
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
    let (raw, rest) = try_pull_pod::<BitmapFileHeader>(bytes)?;
    Ok((Self::from(raw), rest))
  }

  /// If the tag is the windows `BM` tag.
  #[inline]
  #[must_use]
  pub fn has_bm_tag(&self) -> bool {
    self.tag == BMP_TAG
  }

  /// Byte length of the pixel data span, `file_size - pixel_data_offset`.
  ///
  /// `None` if the offset is past the end of the file.
  #[inline]
  #[must_use]
  pub const fn pixel_data_len(&self) -> Option<u32> {
    self.file_size.checked_sub(self.pixel_data_offset)
  }
}

/// The 40 byte `BITMAPINFOHEADER`.
///
/// Width and height are kept as the raw `u32` bit patterns, because that's
/// what gets compared against the panel size. A top-down bitmap (negative
/// height) will just fail that comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BmpInfoHeader {
  /// Declared size of the info header. Not checked.
  pub header_size: u32,
  /// Image pixel width.
  pub width: u32,
  /// Image pixel height.
  pub height: u32,
  /// Should be 1.
  pub planes: u16,
  /// Must be 4 to be usable here.
  pub bits_per_pixel: u16,
  /// Compression style. 0 is uncompressed. Read but not acted on.
  pub compression: u32,
  /// Declared pixel data size, often 0 for uncompressed images.
  pub image_size: u32,
  /// horizontal pixels per meter
  pub h_ppm: i32,
  /// vertical pixels per meter
  pub v_ppm: i32,
  /// Colors in the palette, 0 meaning `2**bits_per_pixel`.
  pub palette_len: u32,
  /// The number of "important" colors. Generally ignored.
  pub important_colors: u32,
}
impl From<BitmapInfoHeader> for BmpInfoHeader {
  #[inline]
  fn from(h: BitmapInfoHeader) -> Self {
    Self {
      header_size: h.size.get(),
      width: h.width.get() as u32,
      height: h.height.get() as u32,
      planes: h.planes.get(),
      bits_per_pixel: h.bits_per_pixel.get(),
      compression: h.compression.get(),
      image_size: h.image_size.get(),
      h_ppm: h.pixels_per_meter_x.get(),
      v_ppm: h.pixels_per_meter_y.get(),
      palette_len: h.colors_used.get(),
      important_colors: h.important_colors.get(),
    }
  }
}
impl From<BmpInfoHeader> for [u8; 40] {
  #[inline]
  fn from(h: BmpInfoHeader) -> Self {
    let raw = BitmapInfoHeader {
      size: h.header_size.into(),
      width: (h.width as i32).into(),
      height: (h.height as i32).into(),
      planes: h.planes.into(),
      bits_per_pixel: h.bits_per_pixel.into(),
      compression: h.compression.into(),
      image_size: h.image_size.into(),
      pixels_per_meter_x: h.h_ppm.into(),
      pixels_per_meter_y: h.v_ppm.into(),
      colors_used: h.palette_len.into(),
      important_colors: h.important_colors.into(),
    };
    bytemuck::cast(raw)
  }
}
impl BmpInfoHeader {
  /// Wire size of the info header.
  pub const SIZE: usize = 40;

  /// Tries to get the info header and the remaining bytes.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
    let (raw, rest) = try_pull_pod::<BitmapInfoHeader>(bytes)?;
    Ok((Self::from(raw), rest))
  }

  /// An info header describing an uncompressed panel-sized 4bpp image.
  #[inline]
  #[must_use]
  pub const fn for_panel() -> Self {
    Self {
      header_size: Self::SIZE as u32,
      width: PANEL_WIDTH,
      height: PANEL_HEIGHT,
      planes: 1,
      bits_per_pixel: 4,
      compression: BI_RGB,
      image_size: PANEL_FRAME_LEN as u32,
      h_ppm: 0,
      v_ppm: 0,
      palette_len: PALETTE_LEN as u32,
      important_colors: 0,
    }
  }
}

/// One color table entry, stored `[b, g, r, unused]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Zeroable, Pod)]
#[repr(C)]
pub struct PaletteEntry {
  /// blue
  pub b: u8,
  /// green
  pub g: u8,
  /// red
  pub r: u8,
  /// Usually 0.
  pub unused: u8,
}
impl PaletteEntry {
  /// Builds an entry from a `0x00RRGGBB` word.
  #[inline]
  #[must_use]
  pub const fn from_word(word: u32) -> Self {
    let [b, g, r, unused] = word.to_le_bytes();
    Self { b, g, r, unused }
  }

  /// The entry's bytes read as a little-endian `u32`, so `0x00RRGGBB` when the
  /// unused byte is 0.
  ///
  /// This is the value compared against the known panel colors.
  #[inline]
  #[must_use]
  pub const fn word(self) -> u32 {
    u32::from_le_bytes([self.b, self.g, self.r, self.unused])
  }
}
impl core::fmt::Debug for PaletteEntry {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "PaletteEntry(0x{:08X})", self.word())
  }
}

/// The 16 entry color table of a 4bpp image.
pub type Palette = [PaletteEntry; PALETTE_LEN];

/// Tries to get a 16 entry palette and the remaining bytes.
#[inline]
pub fn try_palette_from_bytes(bytes: &[u8]) -> Result<(Palette, &[u8]), DecodeError> {
  try_pull_pod::<Palette>(bytes)
}

#[test]
fn test_wire_sizes() {
  use core::mem::size_of;
  assert_eq!(size_of::<BitmapFileHeader>(), BmpFileHeader::SIZE);
  assert_eq!(size_of::<BitmapInfoHeader>(), BmpInfoHeader::SIZE);
  assert_eq!(size_of::<Palette>(), 64);
  assert_eq!(PIXEL_DATA_MIN_OFFSET, 118);
}

#[test]
fn test_palette_entry_word() {
  let red = PaletteEntry { b: 0x24, g: 0x1C, r: 0xED, unused: 0 };
  assert_eq!(red.word(), 0x00ED_1C24);
  assert_eq!(PaletteEntry::from_word(0x00ED_1C24), red);
}

#[test]
fn test_file_header_from_bytes() {
  let mut bytes = [0_u8; 16];
  bytes[0..2].copy_from_slice(b"BM");
  bytes[2..6].copy_from_slice(&134518_u32.to_le_bytes());
  bytes[10..14].copy_from_slice(&118_u32.to_le_bytes());
  let (h, rest) = BmpFileHeader::try_from_bytes(&bytes).unwrap();
  assert!(h.has_bm_tag());
  assert_eq!(h.file_size, 134518);
  assert_eq!(h.pixel_data_offset, 118);
  assert_eq!(h.pixel_data_len(), Some(134400));
  let short = BmpFileHeader { file_size: 134454, ..h };
  assert_eq!(short.pixel_data_len(), Some(134336));
  let backwards = BmpFileHeader { file_size: 100, ..h };
  assert_eq!(backwards.pixel_data_len(), None);
  assert_eq!(rest.len(), 2);
  assert_eq!(<[u8; 14]>::from(h), bytes[..14]);
}

#[test]
fn test_info_header_and_palette_from_bytes() {
  let mut bytes = <[u8; 40]>::from(BmpInfoHeader::for_panel()).to_vec();
  for i in 0..PALETTE_LEN as u32 {
    bytes.extend_from_slice(&(i * 0x0001_0101).to_le_bytes());
  }
  let (info, rest) = BmpInfoHeader::try_from_bytes(&bytes).unwrap();
  assert_eq!(info, BmpInfoHeader::for_panel());
  assert_eq!(info.header_size, 40);
  let (palette, rest) = try_palette_from_bytes(rest).unwrap();
  assert!(rest.is_empty());
  assert_eq!(palette[3], PaletteEntry { b: 3, g: 3, r: 3, unused: 0 });
  assert_eq!(try_palette_from_bytes(&bytes[..63]).unwrap_err(), DecodeError::InsufficientBytes);
}
