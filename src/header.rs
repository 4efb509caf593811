//! C2: header validator.
//!
//! Parses the 13-byte `IHDR` payload and rejects, up front, every
//! combination this crate doesn't implement: interlacing, compression or
//! filter methods other than the one PNG method, bit depths outside
//! `{8,16}`, 16-bit indexed color (nonsensical — palette indices are always
//! one byte), color types outside the five PNG defines, zero-sized images,
//! and a `scale` that would collapse a dimension to zero.

use crate::{PngError, PngResult, Scale};

/// The `IHDR` color type byte, restricted to the five values PNG defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngColorType {
  /// 0: grayscale.
  Gray,
  /// 2: truecolor (RGB).
  Rgb,
  /// 3: palette index into `PLTE`/`tRNS`.
  Indexed,
  /// 4: grayscale + alpha.
  GrayAlpha,
  /// 6: truecolor + alpha (RGBA).
  Rgba,
}
impl PngColorType {
  fn from_byte(b: u8) -> Option<Self> {
    Some(match b {
      0 => Self::Gray,
      2 => Self::Rgb,
      3 => Self::Indexed,
      4 => Self::GrayAlpha,
      6 => Self::Rgba,
      _ => return None,
    })
  }

  /// Number of channels this color type carries (before palette lookup).
  pub fn channels(self) -> u32 {
    match self {
      Self::Gray => 1,
      Self::Rgb => 3,
      Self::Indexed => 1,
      Self::GrayAlpha => 2,
      Self::Rgba => 4,
    }
  }
}

/// A validated, in-range `IHDR`. Every field on this type is a fact you can
/// rely on without re-checking it: [`PngHeader::validate`] is the only way
/// to construct one, and it has already ruled out everything in the
/// Non-goals list.
#[derive(Debug, Clone, Copy)]
pub struct PngHeader {
  pub width: u32,
  pub height: u32,
  pub bit_depth: u8,
  pub color_type: PngColorType,
  pub scale: Scale,
}
impl PngHeader {
  /// Parses and validates a 13-byte `IHDR` payload against `scale`.
  pub fn validate(ihdr: &[u8; 13], scale: Scale) -> PngResult<Self> {
    let width = u32::from_be_bytes([ihdr[0], ihdr[1], ihdr[2], ihdr[3]]);
    let height = u32::from_be_bytes([ihdr[4], ihdr[5], ihdr[6], ihdr[7]]);
    let bit_depth = ihdr[8];
    let color_type = ihdr[9];
    let compression_method = ihdr[10];
    let filter_method = ihdr[11];
    let interlace_method = ihdr[12];

    if width == 0 || height == 0 {
      return Err(PngError::Unsupported);
    }
    if compression_method != 0 || filter_method != 0 || interlace_method != 0 {
      return Err(PngError::Unsupported);
    }
    if bit_depth != 8 && bit_depth != 16 {
      return Err(PngError::Unsupported);
    }
    let color_type = PngColorType::from_byte(color_type).ok_or(PngError::Unsupported)?;
    if bit_depth == 16 && color_type == PngColorType::Indexed {
      return Err(PngError::Unsupported);
    }

    let factor = scale.factor();
    if width / factor == 0 || height / factor == 0 {
      return Err(PngError::Unsupported);
    }

    Ok(Self { width, height, bit_depth, color_type, scale })
  }

  /// Bytes per sample: 1 for 8-bit depth, 2 for 16-bit depth.
  #[inline]
  pub fn bytes_per_channel(&self) -> u32 {
    self.bit_depth as u32 / 8
  }

  /// Bytes occupied by one pixel in the decompressed, unfiltered scanline
  /// (i.e. the PNG "bpp" used by the filter reconstruction step — always
  /// at least 1, per the PNG spec, even for sub-byte depths this crate
  /// doesn't otherwise support).
  #[inline]
  pub fn bytes_per_pixel(&self) -> usize {
    (self.color_type.channels() * self.bytes_per_channel()) as usize
  }

  /// Bytes in one raw (pre-filter-byte) decompressed scanline.
  #[inline]
  pub fn stride(&self) -> usize {
    self.width as usize * self.bytes_per_pixel()
  }

  /// Bytes in one scanline including its leading filter-type byte.
  #[inline]
  pub fn filtered_stride(&self) -> usize {
    self.stride() + 1
  }

  /// Width of the downscaled output, in pixels.
  #[inline]
  pub fn out_width(&self) -> u32 {
    self.width / self.scale.factor()
  }

  /// Height of the downscaled output, in pixels.
  #[inline]
  pub fn out_height(&self) -> u32 {
    self.height / self.scale.factor()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ihdr(width: u32, height: u32, depth: u8, color: u8, comp: u8, filt: u8, inter: u8) -> [u8; 13] {
    let mut buf = [0u8; 13];
    buf[0..4].copy_from_slice(&width.to_be_bytes());
    buf[4..8].copy_from_slice(&height.to_be_bytes());
    buf[8] = depth;
    buf[9] = color;
    buf[10] = comp;
    buf[11] = filt;
    buf[12] = inter;
    buf
  }

  #[test]
  fn accepts_a_plain_rgb8_header() {
    let h = PngHeader::validate(&ihdr(4, 4, 8, 2, 0, 0, 0), Scale::X1).unwrap();
    assert_eq!(h.bytes_per_pixel(), 3);
    assert_eq!(h.stride(), 12);
  }

  #[test]
  fn rejects_interlacing() {
    assert_eq!(
      PngHeader::validate(&ihdr(4, 4, 8, 2, 0, 0, 1), Scale::X1).unwrap_err(),
      PngError::Unsupported
    );
  }

  #[test]
  fn rejects_odd_bit_depths() {
    assert_eq!(
      PngHeader::validate(&ihdr(4, 4, 4, 0, 0, 0, 0), Scale::X1).unwrap_err(),
      PngError::Unsupported
    );
  }

  #[test]
  fn rejects_16bit_indexed() {
    assert_eq!(
      PngHeader::validate(&ihdr(4, 4, 16, 3, 0, 0, 0), Scale::X1).unwrap_err(),
      PngError::Unsupported
    );
  }

  #[test]
  fn rejects_zero_dimensions() {
    assert_eq!(
      PngHeader::validate(&ihdr(0, 4, 8, 2, 0, 0, 0), Scale::X1).unwrap_err(),
      PngError::Unsupported
    );
  }

  #[test]
  fn rejects_scale_collapsing_a_dimension() {
    // a 3x3 image at scale 4 has out_width = out_height = 0
    assert_eq!(
      PngHeader::validate(&ihdr(3, 3, 8, 2, 0, 0, 0), Scale::X4).unwrap_err(),
      PngError::Unsupported
    );
  }

  #[test]
  fn out_dimensions_floor_divide() {
    let h = PngHeader::validate(&ihdr(5, 5, 8, 0, 0, 0, 0), Scale::X2).unwrap();
    assert_eq!(h.out_width(), 2);
    assert_eq!(h.out_height(), 2);
  }
}
