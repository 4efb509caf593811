//! Decodes a PNG given on the command line and prints each emitted RGB565
//! row as a line of hex-encoded `u16`s.
//!
//! ```text
//! cargo run --example row_callback --features alloc,miniz_oxide -- some.png 2
//! ```

use std::env;
use std::fs;

use png565::{decode, Scale};

fn main() {
  let mut args = env::args().skip(1);
  let path = args.next().expect("usage: row_callback <path.png> [scale: 1|2|4]");
  let scale = match args.next().as_deref() {
    None | Some("1") => Scale::X1,
    Some("2") => Scale::X2,
    Some("4") => Scale::X4,
    Some(other) => panic!("scale must be 1, 2, or 4, got {other:?}"),
  };

  let bytes = fs::read(&path).unwrap_or_else(|e| panic!("couldn't read {path}: {e}"));

  let mut row_count: u32 = 0;
  let result = decode(&bytes, scale, |y, pixels| {
    print!("row {y}: ");
    for px in pixels {
      print!("{:04x} ", px.0);
    }
    println!();
    row_count += 1;
  });

  match result {
    Ok(()) => eprintln!("decoded {row_count} row(s) from {path}"),
    Err(e) => eprintln!("failed to decode {path}: {e}"),
  }
}
