use inkframe::{load_bitmap_file, palette::DeviceColor, PANEL_FRAME_LEN};

fn main() {
  // Generic args and file opening stuff
  let args: Vec<String> = std::env::args().collect();
  if args.len() < 2 {
    println!("run this with a filename to try and load that file for the panel.");
    return;
  }
  let path = std::path::Path::new(&args[1]);
  println!("Loading `{}`...", path.display());

  // Some editors pad the pixel data a little, so leave room past one frame.
  let mut buffer = vec![0_u8; PANEL_FRAME_LEN + 1024];

  let frame = match load_bitmap_file(path, &mut buffer) {
    Ok(frame) => frame,
    Err(e) => {
      println!("{e}");
      return;
    }
  };
  println!("{:?}", frame.headers.file);
  println!("{:?}", frame.headers.info);
  for (i, entry) in frame.lut.entries().iter().enumerate() {
    println!("palette {i:>2}: {:?} -> {:?}", entry.input, entry.output);
  }

  let mut counts = [0_usize; 8];
  for byte in &buffer[..PANEL_FRAME_LEN] {
    counts[usize::from((byte >> 4) & 0x7)] += 1;
    counts[usize::from(byte & 0x7)] += 1;
  }
  for color in DeviceColor::ALL {
    println!("{color:?}: {} pixels", counts[usize::from(color.code())]);
  }
}
