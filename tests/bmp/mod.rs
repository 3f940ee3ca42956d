use inkframe::{
  bmp::{read_bitmap, BmpFileHeader, BmpInfoHeader, PaletteEntry, BMP_TAG, PALETTE_LEN},
  load_bitmap_bytes, load_bitmap_for_panel,
  palette::{DeviceColor, RGB_BLACK, RGB_RED},
  remap::{mirror_scanlines, remap_nibbles},
  DecodeError, SliceSource, PANEL_BYTES_PER_LINE, PANEL_FRAME_LEN,
};

use crate::rand_bytes;

const OFFSET: u32 = 118;

fn red_black_palette() -> [u32; PALETTE_LEN] {
  let mut palette = [0x0012_3456; PALETTE_LEN];
  palette[0] = RGB_RED;
  palette[1] = RGB_BLACK;
  palette
}

/// A whole BMP file: headers, palette, then `pixels` at offset 118.
fn build_bmp(info: BmpInfoHeader, palette: [u32; PALETTE_LEN], pixels: &[u8]) -> Vec<u8> {
  let file = BmpFileHeader {
    tag: BMP_TAG,
    file_size: OFFSET + pixels.len() as u32,
    pixel_data_offset: OFFSET,
  };
  let mut v = Vec::new();
  v.extend_from_slice(&<[u8; 14]>::from(file));
  v.extend_from_slice(&<[u8; 40]>::from(info));
  for word in palette {
    v.extend_from_slice(&word.to_le_bytes());
  }
  assert_eq!(v.len(), OFFSET as usize);
  v.extend_from_slice(pixels);
  v
}

fn panel_bmp(fill: u8) -> Vec<u8> {
  build_bmp(BmpInfoHeader::for_panel(), red_black_palette(), &vec![fill; PANEL_FRAME_LEN])
}

#[test]
fn test_accepts_panel_bitmap_and_copies_exact_span() {
  let mut pixels = rand_bytes(PANEL_FRAME_LEN);
  pixels[0] = 0xAB;
  let bytes = build_bmp(BmpInfoHeader::for_panel(), red_black_palette(), &pixels);
  assert_eq!(bytes.len(), 134518);
  let mut out = vec![0xEE_u8; PANEL_FRAME_LEN + 10];
  let parts = read_bitmap(&mut SliceSource::try_new(&bytes).unwrap(), &mut out).unwrap();
  assert_eq!(parts.pixel_data_len, PANEL_FRAME_LEN);
  assert_eq!(&out[..PANEL_FRAME_LEN], &pixels[..]);
  assert!(out[PANEL_FRAME_LEN..].iter().all(|&b| b == 0xEE));
  assert_eq!(parts.headers.palette[0], PaletteEntry::from_word(RGB_RED));
  assert_eq!(parts.headers.info.width, 600);
  assert_eq!(parts.headers.file.file_size, 134518);
}

#[test]
fn test_end_to_end_red_black() {
  let bytes = panel_bmp(0x01);
  let mut out = inkframe::new_frame_buffer();
  let frame = load_bitmap_bytes(&bytes, &mut out).unwrap();
  let red = DeviceColor::Red.code();
  let black = DeviceColor::Black.code();
  assert_eq!(frame.lut.get(0), DeviceColor::Red);
  assert_eq!(frame.lut.get(1), DeviceColor::Black);
  // remap gives (red, black) everywhere, and mirroring flips that to
  // (black, red)
  assert!(out.iter().all(|&b| b == (black << 4) | red));
}

#[test]
fn test_end_to_end_matches_separate_passes() {
  let mut pixels = rand_bytes(PANEL_FRAME_LEN);
  pixels[0] = 0x01;
  let bytes = build_bmp(BmpInfoHeader::for_panel(), red_black_palette(), &pixels);
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  let frame = load_bitmap_bytes(&bytes, &mut out).unwrap();

  let mut expected = pixels.clone();
  remap_nibbles(&mut expected, &frame.lut);
  let remapped_first_line = expected[..PANEL_BYTES_PER_LINE].to_vec();
  mirror_scanlines(&mut expected, PANEL_BYTES_PER_LINE);
  assert_eq!(out, expected);

  // scanline [A, B, .., Z] becomes [swap(Z), .., swap(B), swap(A)]
  for (i, b) in out[..PANEL_BYTES_PER_LINE].iter().enumerate() {
    assert_eq!(*b, remapped_first_line[PANEL_BYTES_PER_LINE - 1 - i].rotate_left(4));
  }
  assert_eq!(out[PANEL_BYTES_PER_LINE - 1], (DeviceColor::Black.code() << 4) | DeviceColor::Red.code());
}

#[test]
fn test_rejects_other_bit_depths() {
  for bits_per_pixel in [1, 8, 24] {
    let info = BmpInfoHeader { bits_per_pixel, ..BmpInfoHeader::for_panel() };
    let bytes = build_bmp(info, red_black_palette(), &vec![0; PANEL_FRAME_LEN]);
    let mut out = vec![0_u8; PANEL_FRAME_LEN];
    assert_eq!(
      load_bitmap_bytes(&bytes, &mut out).unwrap_err(),
      DecodeError::UnsupportedFormat { bits_per_pixel }
    );
  }
}

#[test]
fn test_rejects_wrong_width() {
  let info = BmpInfoHeader { width: 601, ..BmpInfoHeader::for_panel() };
  let bytes = build_bmp(info, red_black_palette(), &vec![0; PANEL_FRAME_LEN]);
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  assert_eq!(
    load_bitmap_bytes(&bytes, &mut out).unwrap_err(),
    DecodeError::DimensionMismatch { width: 601, height: 448 }
  );
}

#[test]
fn test_rejects_wrong_height() {
  let info = BmpInfoHeader { height: 447, ..BmpInfoHeader::for_panel() };
  let bytes = build_bmp(info, red_black_palette(), &vec![0; PANEL_FRAME_LEN]);
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  assert_eq!(
    load_bitmap_bytes(&bytes, &mut out).unwrap_err(),
    DecodeError::DimensionMismatch { width: 600, height: 447 }
  );
}

#[test]
fn test_rejects_missing_source() {
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  assert_eq!(load_bitmap_bytes(&[], &mut out).unwrap_err(), DecodeError::SourceUnavailable);
  assert_eq!(
    inkframe::load_bitmap_file("this/file/does/not/exist.bmp", &mut out).unwrap_err(),
    DecodeError::SourceUnavailable
  );
}

#[test]
fn test_rejects_wrong_tag() {
  let mut bytes = panel_bmp(0x00);
  bytes[0..2].copy_from_slice(b"BA");
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  assert_eq!(load_bitmap_bytes(&bytes, &mut out).unwrap_err(), DecodeError::NotABmp);
}

#[test]
fn test_rejects_small_buffer() {
  let bytes = panel_bmp(0x00);
  let mut out = vec![0_u8; PANEL_FRAME_LEN - 1];
  assert_eq!(
    load_bitmap_bytes(&bytes, &mut out).unwrap_err(),
    DecodeError::BufferTooSmall { needed: PANEL_FRAME_LEN, available: PANEL_FRAME_LEN - 1 }
  );
}

#[test]
fn test_short_pixel_span_is_zero_padded() {
  // one scanline short, so the top row is all palette index 0 (red)
  let bytes =
    build_bmp(BmpInfoHeader::for_panel(), red_black_palette(), &vec![0x11; PANEL_FRAME_LEN - 300]);
  let mut out = vec![0xEE_u8; PANEL_FRAME_LEN];
  let frame = load_bitmap_bytes(&bytes, &mut out).unwrap();
  assert_eq!(frame.pixel_data_len, PANEL_FRAME_LEN - 300);
  let black = DeviceColor::Black.pair_byte();
  let red = DeviceColor::Red.pair_byte();
  assert!(out[..PANEL_FRAME_LEN - 300].iter().all(|&b| b == black));
  assert!(out[PANEL_FRAME_LEN - 300..].iter().all(|&b| b == red));
}

#[test]
fn test_file_size_short_by_a_palette() {
  // a file size that leaves the span 64 bytes short of a frame, with a full
  // frame of data actually present
  let mut bytes = panel_bmp(0x01);
  bytes[2..6].copy_from_slice(&134454_u32.to_le_bytes());
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  let frame = load_bitmap_bytes(&bytes, &mut out).unwrap();
  assert_eq!(frame.pixel_data_len, 134336);

  // (red, black) mirrors to (black, red), the zero tail is (red, red)
  let mirrored = (DeviceColor::Black.code() << 4) | DeviceColor::Red.code();
  let red = DeviceColor::Red.pair_byte();
  let last_line = PANEL_FRAME_LEN - PANEL_BYTES_PER_LINE;
  assert!(out[..last_line].iter().all(|&b| b == mirrored));
  // the padding was at the right end of the last line, so it's now at the left
  assert!(out[last_line..last_line + 64].iter().all(|&b| b == red));
  assert!(out[last_line + 64..].iter().all(|&b| b == mirrored));
}

#[test]
fn test_short_span_still_needs_a_frame_of_buffer() {
  let mut bytes = panel_bmp(0x01);
  bytes[2..6].copy_from_slice(&134454_u32.to_le_bytes());
  let mut out = vec![0_u8; 134336];
  assert_eq!(
    load_bitmap_bytes(&bytes, &mut out).unwrap_err(),
    DecodeError::BufferTooSmall { needed: PANEL_FRAME_LEN, available: 134336 }
  );
}

#[test]
fn test_rejects_offset_past_file_size() {
  let mut bytes = panel_bmp(0x00);
  bytes[10..14].copy_from_slice(&200_000_u32.to_le_bytes());
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  assert_eq!(load_bitmap_bytes(&bytes, &mut out).unwrap_err(), DecodeError::PixelDataIllegalLength);
}

#[test]
fn test_truncated_file() {
  let mut bytes = panel_bmp(0x00);
  bytes.truncate(bytes.len() - 1);
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  assert_eq!(load_bitmap_bytes(&bytes, &mut out).unwrap_err(), DecodeError::InsufficientBytes);

  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  assert_eq!(load_bitmap_bytes(&bytes[..60], &mut out).unwrap_err(), DecodeError::InsufficientBytes);
}

#[test]
fn test_pixel_data_after_a_gap() {
  let mut bytes = panel_bmp(0x10);
  // move the pixel data 2 bytes later
  bytes.splice(118..118, [0xFF, 0xFF]);
  let file_size = bytes.len() as u32;
  bytes[2..6].copy_from_slice(&file_size.to_le_bytes());
  bytes[10..14].copy_from_slice(&120_u32.to_le_bytes());
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  load_bitmap_bytes(&bytes, &mut out).unwrap();
  // (black, red) mirrored is (red, black)
  let expected = (DeviceColor::Red.code() << 4) | DeviceColor::Black.code();
  assert!(out.iter().all(|&b| b == expected));
}

#[test]
fn test_reusing_the_buffer() {
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  let mut source_bytes = panel_bmp(0x00);
  load_bitmap_bytes(&source_bytes, &mut out).unwrap();
  let red = DeviceColor::Red.code();
  assert!(out.iter().all(|&b| b == (red << 4) | red));

  // same pixels, new palette: index 0 is now white
  source_bytes[54..58].copy_from_slice(&0x00FF_FFFF_u32.to_le_bytes());
  let frame = load_bitmap_for_panel(&mut SliceSource::try_new(&source_bytes).unwrap(), &mut out).unwrap();
  assert_eq!(frame.lut.get(0), DeviceColor::White);
  assert!(out.iter().all(|&b| b == DeviceColor::White.pair_byte()));
}

#[test]
fn test_file_source() {
  let bytes = panel_bmp(0x11);
  let path = std::env::temp_dir().join(format!("inkframe_test_{}.bmp", std::process::id()));
  std::fs::write(&path, &bytes).unwrap();
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  let result = inkframe::load_bitmap_file(&path, &mut out);
  std::fs::remove_file(&path).ok();
  result.unwrap();
  assert!(out.iter().all(|&b| b == DeviceColor::Black.pair_byte()));
}

#[test]
fn test_hostile_bytes_do_not_panic() {
  let mut out = vec![0_u8; PANEL_FRAME_LEN];
  for len in [1, 13, 14, 54, 117, 118, 4096] {
    let bytes = rand_bytes(len);
    let _ = load_bitmap_bytes(&bytes, &mut out);
  }
  // valid front half, random everything else
  let mut bytes = panel_bmp(0x00);
  let noise = rand_bytes(bytes.len() - 30);
  bytes[30..].copy_from_slice(&noise);
  let _ = load_bitmap_bytes(&bytes, &mut out);
}
