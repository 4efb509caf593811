//! C8: the orchestrator.
//!
//! The allocation-free [`crate::engine::Engine`] is the actual decoder; this
//! module is a thin `alloc`-feature convenience layer on top of it that owns
//! every working buffer as a `Vec`/`Box` sized from the validated header, so
//! callers don't have to work out the sizing rules in §5 of the design for
//! themselves. This is the literal shape of the `info`/`decode` operations a
//! typical caller reaches for first; anyone who wants to run on a target
//! with no allocator at all should use [`crate::engine::Engine`] directly.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::{
  engine::{Buffers, Engine},
  locate_ihdr, scan_chunks, BoxAverager, PngHeader, PngResult, RawChunkIter, Rgb565, Scale, DICT_SIZE,
};

#[cfg(feature = "miniz_oxide")]
use crate::MinizInflate;

/// Image dimensions, as returned by [`info`] without decoding any pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
  pub width: u32,
  pub height: u32,
}

/// Validates the PNG signature and `IHDR` chunk and returns the image's
/// dimensions, without touching any `IDAT` data.
///
/// `scale` only affects whether a given combination is even reachable (an
/// image that collapses to a zero-sized output at a given scale fails
/// validation at that scale); the returned dimensions are always the
/// original, undownscaled ones.
pub fn info(png: &[u8], scale: Scale) -> PngResult<ImageInfo> {
  let (ihdr, _rest) = locate_ihdr(png)?;
  let header = PngHeader::validate(ihdr, scale)?;
  Ok(ImageInfo { width: header.width, height: header.height })
}

/// Decodes `png`, invoking `on_row(y, pixels)` once per *output* row (i.e.
/// already downscaled, if `scale != Scale::X1`), in order, before returning.
///
/// This allocates every working buffer named in §5 of the design (the 32
/// KiB sliding dictionary, two scanline buffers, the packed output row, and
/// the downscale accumulator when `scale != Scale::X1`) for the duration of
/// the call and drops them all on every exit path, success or failure.
#[cfg(feature = "miniz_oxide")]
pub fn decode(png: &[u8], scale: Scale, mut on_row: impl FnMut(u32, &[Rgb565])) -> PngResult<()> {
  let (ihdr, rest): (&[u8; 13], RawChunkIter<'_>) = locate_ihdr(png)?;
  let header = PngHeader::validate(ihdr, scale)?;
  let (palette, idats) = scan_chunks(rest, header.color_type)?;

  let stride = header.stride();
  let averager = BoxAverager::new(header.scale, header.width);
  let out_w = averager.out_width();
  let acc_len = if header.scale == Scale::X1 { 0 } else { averager.acc_len() };

  let mut dict: Box<[u8; DICT_SIZE]> = Box::new([0u8; DICT_SIZE]);
  let mut cur: Vec<u8> = vec![0u8; stride];
  let mut prev: Vec<u8> = vec![0u8; stride];
  let mut acc: Vec<u16> = vec![0u16; acc_len];
  let mut out: Vec<Rgb565> = vec![Rgb565::default(); out_w];

  let mut engine = Engine::new(header, palette, idats);
  engine.run::<MinizInflate>(
    Buffers { dict: &mut dict, cur: &mut cur, prev: &mut prev, acc: &mut acc, out: &mut out },
    |y, pixels| on_row(y, pixels),
  )
}

// The full behavioral test matrix (scale variants, split IDATs, 16-bit
// truncation, truncated streams, etc.) lives in `tests/decode_tests.rs`,
// exercised against the public API the same way an embedder would call it.
// This module only checks the one thing only a unit test can: that `info`
// doesn't require a decodable `IDAT` at all.
#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn info_ignores_garbage_after_ihdr() {
    let mut png = crate::PNG_SIGNATURE.to_vec();
    let mut ihdr_chunk = vec![0u8; 12 + 13];
    ihdr_chunk[0..4].copy_from_slice(&13u32.to_be_bytes());
    ihdr_chunk[4..8].copy_from_slice(b"IHDR");
    ihdr_chunk[8..12].copy_from_slice(&4u32.to_be_bytes()); // width
    ihdr_chunk[12..16].copy_from_slice(&5u32.to_be_bytes()); // height
    ihdr_chunk[16] = 8; // bit depth
    ihdr_chunk[17] = 6; // color type RGBA
    png.extend_from_slice(&ihdr_chunk);
    png.extend_from_slice(&[0, 0, 0, 0]); // IHDR crc
    png.extend_from_slice(b"not a real chunk stream at all");

    assert_eq!(info(&png, Scale::X1).unwrap(), ImageInfo { width: 4, height: 5 });
  }
}
