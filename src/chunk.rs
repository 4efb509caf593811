//! C1: chunk scanner.
//!
//! Validates the PNG signature, locates the mandatory leading `IHDR`, and
//! then walks the rest of the chunk list collecting `PLTE`/`tRNS`/`IDAT`
//! descriptors until `IEND` or truncation.

use crate::{Palette, PngColorType, PngError, PngResult};

/// The eight bytes every PNG datastream must begin with.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Upper bound on the number of `IDAT` chunks a single scan will track.
/// Additional `IDAT` chunks are silently dropped, same as the reference
/// embedded decoder this crate is modeled on: an encoder that split its
/// data into more pieces than this is vanishingly unlikely to exist, and
/// dropping them just means the stream looks prematurely short, which
/// already surfaces as [`PngError::Truncated`].
pub const MAX_IDAT_CHUNKS: usize = 64;

/// A four-byte chunk type tag, e.g. `IHDR` or `IDAT`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ChunkType(pub [u8; 4]);
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const TRNS: Self = Self(*b"tRNS");
}
impl core::fmt::Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let [a, b, c, d] = self.0;
    write!(f, "{}{}{}{}", a as char, b as char, c as char, d as char)
  }
}

/// One raw `[length][type][data][crc]` record of a PNG byte stream.
///
/// The CRC is parsed off the wire (so chunk boundaries stay correct) but
/// never verified; see the crate's Non-goals.
#[derive(Clone, Copy, Debug)]
pub struct RawChunk<'b> {
  pub length: u32,
  pub chunk_type: ChunkType,
  pub data: &'b [u8],
  pub declared_crc: u32,
}

/// Iterates the chunks of a PNG byte stream.
///
/// This stops silently (yields `None`) the moment a chunk's declared
/// length would run past the end of the buffer, rather than failing —
/// scanning is permissive by design. Callers that need "ended early" to be
/// a hard error (as the top-level decoder does) check for that themselves
/// once the iterator dries up.
pub struct RawChunkIter<'b> {
  bytes: &'b [u8],
}
impl<'b> RawChunkIter<'b> {
  /// `bytes` is everything from the start of the first chunk onward (i.e.
  /// *after* the 8-byte PNG signature).
  pub fn new(bytes: &'b [u8]) -> Self {
    Self { bytes }
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = RawChunk<'b>;
  fn next(&mut self) -> Option<RawChunk<'b>> {
    if self.bytes.len() < 12 {
      return None;
    }
    let length = u32::from_be_bytes(self.bytes[0..4].try_into().unwrap());
    let chunk_type = ChunkType(self.bytes[4..8].try_into().unwrap());
    let data_end = 8usize.checked_add(length as usize)?;
    if self.bytes.len() < data_end.checked_add(4)? {
      return None;
    }
    let data = &self.bytes[8..data_end];
    let declared_crc = u32::from_be_bytes(self.bytes[data_end..data_end + 4].try_into().unwrap());
    self.bytes = &self.bytes[data_end + 4..];
    Some(RawChunk { length, chunk_type, data, declared_crc })
  }
}

/// Checks the 8-byte PNG signature and locates the mandatory leading
/// `IHDR` chunk.
///
/// On success, returns the `IHDR` chunk's 13-byte payload along with a
/// [`RawChunkIter`] positioned right after it, ready to walk the rest of
/// the chunk list.
pub fn locate_ihdr(png: &[u8]) -> PngResult<(&[u8; 13], RawChunkIter<'_>)> {
  if png.len() < 33 || png[..8] != PNG_SIGNATURE {
    return Err(PngError::MalformedSignature);
  }
  let mut it = RawChunkIter::new(&png[8..]);
  let ihdr = it.next().ok_or(PngError::MalformedHeader)?;
  if ihdr.chunk_type != ChunkType::IHDR || ihdr.length != 13 {
    return Err(PngError::MalformedHeader);
  }
  let payload: &[u8; 13] = ihdr.data.try_into().map_err(|_| PngError::MalformedHeader)?;
  Ok((payload, it))
}

/// A fixed-capacity list of `IDAT` chunk payloads, in file order.
///
/// This is the "IDAT stream" entity of the data model: logically a single
/// concatenated byte sequence, physically a list of up to
/// [`MAX_IDAT_CHUNKS`] slices that the inflate driver feeds to the
/// decompressor one at a time.
#[derive(Clone, Copy)]
pub struct IdatList<'b> {
  slices: [&'b [u8]; MAX_IDAT_CHUNKS],
  count: usize,
}
impl<'b> IdatList<'b> {
  fn new() -> Self {
    Self { slices: [&[]; MAX_IDAT_CHUNKS], count: 0 }
  }

  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  pub fn as_slices(&self) -> &[&'b [u8]] {
    &self.slices[..self.count]
  }

  fn push(&mut self, data: &'b [u8]) {
    if self.count < MAX_IDAT_CHUNKS {
      self.slices[self.count] = data;
      self.count += 1;
    }
    // Beyond the ceiling, further IDATs are silently dropped (see
    // `MAX_IDAT_CHUNKS`).
  }

  /// Builds an `IdatList` directly from slices, bypassing chunk scanning.
  #[cfg(test)]
  pub(crate) fn for_test(slices: &[&'b [u8]]) -> Self {
    let mut list = Self::new();
    for s in slices {
      list.push(s);
    }
    list
  }
}

/// Walks the chunks after `IHDR`, collecting the palette, palette alpha,
/// and `IDAT` descriptors, stopping at `IEND` or at the first truncated
/// chunk.
///
/// Fails with [`PngError::NoImageData`] if no `IDAT` chunk was found.
pub fn scan_chunks<'b>(
  rest: RawChunkIter<'b>, color_type: PngColorType,
) -> PngResult<(Palette, IdatList<'b>)> {
  let mut palette = Palette::new();
  let mut idats = IdatList::new();
  for chunk in rest {
    match chunk.chunk_type {
      ChunkType::PLTE => palette.load_rgb_triples(chunk.data),
      ChunkType::TRNS if color_type == PngColorType::Indexed => {
        palette.load_alpha(chunk.data)
      }
      ChunkType::IDAT => idats.push(chunk.data),
      ChunkType::IEND => break,
      _ => {}
    }
  }
  if idats.is_empty() {
    return Err(PngError::NoImageData);
  }
  Ok((palette, idats))
}
