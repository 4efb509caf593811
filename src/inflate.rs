//! C3: sliding-window inflate driver.
//!
//! Drives a streaming DEFLATE decompressor across the concatenated `IDAT`
//! stream into a fixed 32 KiB circular dictionary, the same size DEFLATE's
//! own back-reference window uses. Decoding a PNG this way needs no buffer
//! sized to the whole image: only the dictionary plus however many
//! scanlines the reconstruction step is keeping around.

use crate::{IdatList, PngError, PngResult};

/// Size of the sliding dictionary, fixed by the DEFLATE format itself.
pub const DICT_SIZE: usize = 32768;

/// A capability for turning a PNG's concatenated `IDAT` payload into a
/// stream of decompressed bytes.
///
/// There's exactly one way to get PNG image data off the wire (zlib-wrapped
/// DEFLATE), so this is a single capability rather than a type hierarchy —
/// an implementor just has to drive some inflate engine across the 32 KiB
/// circular `dict` this crate keeps.
pub trait InflateBackend: Default {
  /// Feeds `input` through the decompressor, writing newly-produced bytes
  /// into the circular `dict` starting at the cumulative position
  /// `*out_pos` (the physical index is `*out_pos % DICT_SIZE`; `*out_pos`
  /// itself only ever grows). `on_output` is called once per contiguous
  /// run of freshly-written bytes — twice, if the run straddles the end of
  /// `dict` and wraps back to the front.
  ///
  /// `has_more_input` tells the backend whether further `IDAT` bytes exist
  /// beyond `input`; this only matters for the very last slice.
  ///
  /// Returns `true` once the stream has reached its natural end (`Done`).
  fn step(
    &mut self, input: &[u8], has_more_input: bool, dict: &mut [u8; DICT_SIZE], out_pos: &mut usize,
    on_output: &mut dyn FnMut(&[u8]),
  ) -> PngResult<bool>;
}

#[cfg(feature = "miniz_oxide")]
mod miniz_backend {
  use super::*;
  use miniz_oxide::inflate::{
    core::{
      decompress,
      inflate_flags::{TINFL_FLAG_HAS_MORE_INPUT, TINFL_FLAG_IGNORE_ADLER32, TINFL_FLAG_PARSE_ZLIB_HEADER},
      DecompressorOxide,
    },
    TINFLStatus,
  };

  /// [`InflateBackend`] built on `miniz_oxide`'s streaming `tinfl` core.
  ///
  /// The zlib (not raw-deflate) framing is assumed, matching what every
  /// `IDAT` stream actually carries, and the dictionary's own Adler32
  /// checksum is ignored — see the crate's Non-goals.
  pub struct MinizInflate {
    core: DecompressorOxide,
    first_call: bool,
  }
  impl Default for MinizInflate {
    fn default() -> Self {
      Self { core: DecompressorOxide::new(), first_call: true }
    }
  }
  impl InflateBackend for MinizInflate {
    fn step(
      &mut self, mut input: &[u8], has_more_input: bool, dict: &mut [u8; DICT_SIZE], out_pos: &mut usize,
      on_output: &mut dyn FnMut(&[u8]),
    ) -> PngResult<bool> {
      loop {
        let flags = (if self.first_call { TINFL_FLAG_PARSE_ZLIB_HEADER } else { 0 })
          | TINFL_FLAG_IGNORE_ADLER32
          | (if has_more_input || !input.is_empty() { TINFL_FLAG_HAS_MORE_INPUT } else { 0 });
        let (status, in_consumed, out_consumed) = decompress(&mut self.core, input, dict, *out_pos, flags);
        self.first_call = false;
        if out_consumed > 0 {
          emit_wrapped(dict, *out_pos, out_consumed, on_output);
          *out_pos += out_consumed;
        }
        input = &input[in_consumed..];
        match status {
          TINFLStatus::Done => return Ok(true),
          TINFLStatus::NeedsMoreInput => return Ok(false),
          TINFLStatus::HasMoreOutput => continue,
          TINFLStatus::FailedCannotMakeProgress => {
            if input.is_empty() {
              return Ok(false);
            }
            return Err(PngError::DecompressFailed);
          }
          TINFLStatus::BadParam | TINFLStatus::Failed | TINFLStatus::Adler32Mismatch => {
            return Err(PngError::DecompressFailed)
          }
        }
      }
    }
  }

  /// Splits a `[start, start+len)` run (in cumulative, never-reset
  /// coordinates) into its physical slice(s) of `dict`, handling the case
  /// where it straddles the wrap point.
  fn emit_wrapped(dict: &[u8; DICT_SIZE], start: usize, len: usize, on_output: &mut dyn FnMut(&[u8])) {
    let phys = start % DICT_SIZE;
    if phys + len <= DICT_SIZE {
      on_output(&dict[phys..phys + len]);
    } else {
      let first = DICT_SIZE - phys;
      on_output(&dict[phys..]);
      on_output(&dict[..len - first]);
    }
  }
}
#[cfg(feature = "miniz_oxide")]
pub use miniz_backend::MinizInflate;

/// Drives a backend across every `IDAT` slice of an [`IdatList`] in turn.
pub struct InflateDriver<'b, B> {
  backend: B,
  idats: IdatList<'b>,
  idx: usize,
}
impl<'b, B: InflateBackend> InflateDriver<'b, B> {
  pub fn new(idats: IdatList<'b>) -> Self {
    Self { backend: B::default(), idats, idx: 0 }
  }

  /// Runs the backend across every remaining `IDAT` slice, calling
  /// `on_output` for each run of newly-produced bytes, until the stream
  /// reports `Done` or every slice has been consumed.
  ///
  /// Returns `true` if the stream reached `Done`; `false` if input ran out
  /// first (the orchestrator turns that into [`PngError::Truncated`] if
  /// fewer than `height` scanlines were produced).
  pub fn run(
    &mut self, dict: &mut [u8; DICT_SIZE], out_pos: &mut usize, mut on_output: impl FnMut(&[u8]),
  ) -> PngResult<bool> {
    let slices = self.idats.as_slices();
    while self.idx < slices.len() {
      let input = slices[self.idx];
      let has_more = self.idx + 1 < slices.len();
      let done = self.backend.step(input, has_more, dict, out_pos, &mut on_output)?;
      self.idx += 1;
      if done {
        return Ok(true);
      }
    }
    Ok(false)
  }
}

#[cfg(all(test, feature = "miniz_oxide", feature = "alloc"))]
mod tests {
  use super::*;
  use crate::IdatList;
  use alloc::vec::Vec;

  fn zlib_stored(payload: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = alloc::vec![0x78u8, 0x01];
    let mut rest = payload;
    loop {
      let n = rest.len().min(0xFFFF);
      let final_block = n == rest.len();
      out.push(if final_block { 1 } else { 0 });
      out.extend_from_slice(&(n as u16).to_le_bytes());
      out.extend_from_slice(&(!(n as u16)).to_le_bytes());
      out.extend_from_slice(&rest[..n]);
      rest = &rest[n..];
      if final_block {
        break;
      }
    }
    let adler = simple_adler32(payload);
    out.extend_from_slice(&adler.to_be_bytes());
    out
  }

  fn simple_adler32(data: &[u8]) -> u32 {
    let mut a: u32 = 1;
    let mut b: u32 = 0;
    for &byte in data {
      a = (a + byte as u32) % 65521;
      b = (b + a) % 65521;
    }
    (b << 16) | a
  }

  #[test]
  fn round_trips_a_small_stored_block() {
    let payload: Vec<u8> = (0..50u8).collect();
    let zlib = zlib_stored(&payload);
    let idats = IdatList::for_test(&[&zlib]);
    let mut driver: InflateDriver<'_, MinizInflate> = InflateDriver::new(idats);
    let mut dict = [0u8; DICT_SIZE];
    let mut out_pos = 0usize;
    let mut collected: Vec<u8> = Vec::new();
    let done =
      driver.run(&mut dict, &mut out_pos, |chunk| collected.extend_from_slice(chunk)).unwrap();
    assert!(done);
    assert_eq!(collected, payload);
  }
}
