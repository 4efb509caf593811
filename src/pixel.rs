//! C6: pixel extractor.
//!
//! Pulls one RGB8 pixel out of an unfiltered scanline, for every supported
//! color-type/bit-depth combination. 16-bit samples are truncated to their
//! most-significant byte — RGB565 output has nowhere to put the extra
//! precision, so there's no reason to carry it any further through the
//! pipeline.

use crate::{Palette, PngColorType, PngHeader};
use pixel_formats::r8g8b8_Unorm;

/// Reads the pixel at column `x` of an unfiltered scanline `row`.
///
/// `row` must be exactly [`PngHeader::stride`] bytes (the filter-type byte
/// already stripped). For indexed color, `palette` resolves the sample to
/// an RGB triple; it's ignored for every other color type.
pub fn extract_pixel(header: &PngHeader, row: &[u8], x: usize, palette: &Palette) -> r8g8b8_Unorm {
  let bpc = header.bytes_per_channel() as usize;
  let bpp = header.bytes_per_pixel();
  let sample = |channel: usize| -> u8 {
    // MSB-first: for bpc == 1 this is just row[offset].
    row[x * bpp + channel * bpc]
  };
  match header.color_type {
    PngColorType::Gray => {
      let v = sample(0);
      r8g8b8_Unorm { r: v, g: v, b: v }
    }
    PngColorType::GrayAlpha => {
      let v = sample(0);
      r8g8b8_Unorm { r: v, g: v, b: v }
    }
    PngColorType::Rgb | PngColorType::Rgba => {
      r8g8b8_Unorm { r: sample(0), g: sample(1), b: sample(2) }
    }
    PngColorType::Indexed => palette.rgb(row[x]),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Scale;

  fn header(color_type: u8, depth: u8) -> PngHeader {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&4u32.to_be_bytes());
    ihdr[4..8].copy_from_slice(&4u32.to_be_bytes());
    ihdr[8] = depth;
    ihdr[9] = color_type;
    PngHeader::validate(&ihdr, Scale::X1).unwrap()
  }

  #[test]
  fn reads_rgb8_pixel() {
    let h = header(2, 8);
    let row = [10, 20, 30, 40, 50, 60];
    let p = Palette::new();
    assert_eq!(extract_pixel(&h, &row, 1, &p), r8g8b8_Unorm { r: 40, g: 50, b: 60 });
  }

  #[test]
  fn reads_rgb16_msb_only() {
    let h = header(2, 16);
    // pixel 0: R=0xAB??, G=0xCD??, B=0xEF?? -- only the high byte matters.
    let row = [0xAB, 0x00, 0xCD, 0x00, 0xEF, 0x00];
    let p = Palette::new();
    assert_eq!(extract_pixel(&h, &row, 0, &p), r8g8b8_Unorm { r: 0xAB, g: 0xCD, b: 0xEF });
  }

  #[test]
  fn reads_gray8_pixel() {
    let h = header(0, 8);
    let row = [7, 200];
    let p = Palette::new();
    assert_eq!(extract_pixel(&h, &row, 1, &p), r8g8b8_Unorm { r: 200, g: 200, b: 200 });
  }

  #[test]
  fn reads_indexed_pixel_via_palette() {
    let h = header(3, 8);
    let mut p = Palette::new();
    p.load_rgb_triples(&[1, 2, 3, 4, 5, 6]);
    let row = [1u8, 0];
    assert_eq!(extract_pixel(&h, &row, 0, &p), r8g8b8_Unorm { r: 4, g: 5, b: 6 });
  }
}
