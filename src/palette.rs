//! Palette storage for indexed-color (`color_type == 3`) images.

use pixel_formats::r8g8b8_Unorm;

/// Up to 256 RGB entries (from `PLTE`) plus one alpha byte per entry (from
/// `tRNS`, defaulting to opaque).
///
/// Alpha is carried for structural completeness only — this crate's output
/// color space is opaque RGB565, so [`Palette::alpha`] is never consulted
/// by the pixel extractor or the RGB565 packer.
#[derive(Clone, Copy)]
pub struct Palette {
  entries: [r8g8b8_Unorm; 256],
  alpha: [u8; 256],
  len: usize,
}
impl Palette {
  pub(crate) fn new() -> Self {
    Self { entries: [r8g8b8_Unorm { r: 0, g: 0, b: 0 }; 256], alpha: [255; 256], len: 0 }
  }

  /// Copies up to `min(data.len() / 3, 256)` RGB triples from a `PLTE`
  /// chunk payload.
  pub(crate) fn load_rgb_triples(&mut self, data: &[u8]) {
    let n = (data.len() / 3).min(256);
    for (i, chunk) in data.chunks_exact(3).take(n).enumerate() {
      self.entries[i] = r8g8b8_Unorm { r: chunk[0], g: chunk[1], b: chunk[2] };
    }
    self.len = self.len.max(n);
  }

  /// Copies up to `min(data.len(), 256)` alpha bytes from a `tRNS` chunk
  /// payload.
  pub(crate) fn load_alpha(&mut self, data: &[u8]) {
    let n = data.len().min(256);
    self.alpha[..n].copy_from_slice(&data[..n]);
  }

  /// The RGB triple at `index`. Out-of-range indices are impossible to
  /// detect without knowing the original `PLTE` length (the storage is
  /// always 256 entries wide, zero-initialized), so an index past the
  /// chunk's actual entry count simply reads back as black.
  #[inline]
  pub fn rgb(&self, index: u8) -> r8g8b8_Unorm {
    self.entries[index as usize]
  }

  /// The alpha byte at `index`, defaulting to 255 (opaque) if no `tRNS`
  /// chunk touched this entry.
  #[inline]
  pub fn alpha(&self, index: u8) -> u8 {
    self.alpha[index as usize]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_to_opaque_black() {
    let p = Palette::new();
    assert_eq!(p.rgb(0).r, 0);
    assert_eq!(p.alpha(200), 255);
  }

  #[test]
  fn loads_triples_and_alpha() {
    let mut p = Palette::new();
    p.load_rgb_triples(&[10, 20, 30, 40, 50, 60]);
    assert_eq!(p.rgb(0), r8g8b8_Unorm { r: 10, g: 20, b: 30 });
    assert_eq!(p.rgb(1), r8g8b8_Unorm { r: 40, g: 50, b: 60 });
    p.load_alpha(&[0, 128]);
    assert_eq!(p.alpha(0), 0);
    assert_eq!(p.alpha(1), 128);
    assert_eq!(p.alpha(2), 255);
  }
}
