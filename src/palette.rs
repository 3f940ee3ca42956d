//! Turning BMP palette colors into panel color codes.
//!
//! The panel doesn't take RGB. Each pixel is a 3-bit code naming one of its
//! pigments. Images meant for it are drawn with exactly the RGB values listed
//! on [DeviceColor], and a palette entry is matched by its whole `0x00RRGGBB`
//! word, with no nearest-color search. An entry that matches nothing (which
//! includes the unused trailing slots of most 16 color palettes) becomes
//! [DeviceColor::Clean].

use crate::bmp::{Palette, PaletteEntry, PALETTE_LEN};

/// A color code the seven-color panel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum DeviceColor {
  Black = 0x0,
  White = 0x1,
  Green = 0x2,
  Blue = 0x3,
  Red = 0x4,
  Yellow = 0x5,
  Orange = 0x6,
  /// Leaves the pixel alone. Also what every unknown color becomes.
  #[default]
  Clean = 0x7,
}
impl DeviceColor {
  /// All the codes, in code order.
  pub const ALL: [Self; 8] = [
    Self::Black,
    Self::White,
    Self::Green,
    Self::Blue,
    Self::Red,
    Self::Yellow,
    Self::Orange,
    Self::Clean,
  ];

  /// Matches a palette word (`0x00RRGGBB`) against the known colors.
  ///
  /// Anything that's not an exact match is [DeviceColor::Clean].
  #[inline]
  #[must_use]
  pub const fn from_rgb_word(word: u32) -> Self {
    match word {
      RGB_RED => Self::Red,
      RGB_BLACK => Self::Black,
      RGB_GREEN => Self::Green,
      RGB_YELLOW => Self::Yellow,
      RGB_BLUE => Self::Blue,
      RGB_CLEAN => Self::Clean,
      RGB_WHITE => Self::White,
      _ => Self::Clean,
    }
  }

  /// The low 3 bits of `nibble` as a color.
  #[inline]
  #[must_use]
  pub const fn from_code(nibble: u8) -> Self {
    Self::ALL[(nibble & 0b111) as usize]
  }

  /// The code as sent to the panel.
  #[inline]
  #[must_use]
  pub const fn code(self) -> u8 {
    self as u8
  }

  /// The RGB word that resolves to this color, if there is one.
  ///
  /// Orange can't be produced from a bitmap, only written directly.
  #[inline]
  #[must_use]
  pub const fn rgb_word(self) -> Option<u32> {
    match self {
      Self::Black => Some(RGB_BLACK),
      Self::White => Some(RGB_WHITE),
      Self::Green => Some(RGB_GREEN),
      Self::Blue => Some(RGB_BLUE),
      Self::Red => Some(RGB_RED),
      Self::Yellow => Some(RGB_YELLOW),
      Self::Orange => None,
      Self::Clean => Some(RGB_CLEAN),
    }
  }

  /// The byte that paints two adjacent pixels with this color.
  #[inline]
  #[must_use]
  pub const fn pair_byte(self) -> u8 {
    (self.code() << 4) | self.code()
  }
}

pub const RGB_RED: u32 = 0x00ED_1C24;
pub const RGB_BLACK: u32 = 0x0000_0000;
pub const RGB_GREEN: u32 = 0x0022_B14C;
pub const RGB_YELLOW: u32 = 0x00FF_F200;
pub const RGB_BLUE: u32 = 0x003F_48CC;
/// The light orange that marks "don't touch" pixels.
pub const RGB_CLEAN: u32 = 0x00FF_E282;
pub const RGB_WHITE: u32 = 0x00FF_FFFF;

/// One palette slot and the panel color it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorLookupEntry {
  /// The color as it was in the bitmap.
  pub input: PaletteEntry,
  /// The panel color it's drawn with.
  pub output: DeviceColor,
}

/// Palette index to panel color, for one image.
///
/// Built fresh from each bitmap's palette. Every one of the 16 indexes has an
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorLut {
  entries: [ColorLookupEntry; PALETTE_LEN],
}
impl ColorLut {
  /// Resolves every entry of the palette.
  #[must_use]
  pub fn from_palette(palette: &Palette) -> Self {
    let mut entries = [ColorLookupEntry::default(); PALETTE_LEN];
    for (i, (slot, input)) in entries.iter_mut().zip(palette.iter().copied()).enumerate() {
      let output = DeviceColor::from_rgb_word(input.word());
      log::trace!("palette {i}: {input:?} -> {output:?}");
      *slot = ColorLookupEntry { input, output };
    }
    Self { entries }
  }

  /// The panel color for a palette index. Only the low 4 bits are used.
  #[inline]
  #[must_use]
  pub const fn get(&self, index: u8) -> DeviceColor {
    self.entries[(index & 0x0F) as usize].output
  }

  /// All 16 entries, by palette index.
  #[inline]
  #[must_use]
  pub const fn entries(&self) -> &[ColorLookupEntry; PALETTE_LEN] {
    &self.entries
  }

  /// Precomputes what each whole byte turns into, so the remap pass is a
  /// single table read per byte.
  #[must_use]
  pub fn byte_table(&self) -> [u8; 256] {
    let mut table = [0_u8; 256];
    for (byte, out) in table.iter_mut().enumerate() {
      let byte = byte as u8;
      *out = (self.get(byte >> 4).code() << 4) | self.get(byte & 0x0F).code();
    }
    table
  }
}
