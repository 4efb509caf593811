//! C4: scanline assembler.
//!
//! The inflate driver hands back decompressed bytes in whatever chunks the
//! backend happens to produce them in, which almost never line up with
//! scanline boundaries. This assembles those chunks into complete
//! `[filter byte][row bytes]` scanlines, unfilters each one as it
//! completes, and feeds it to a callback — regardless of where the
//! producing side's buffer happened to split.

use crate::{unfilter_row, FilterType};

/// Drives scanline reassembly and in-place unfiltering across arbitrary
/// input chunk boundaries.
///
/// Owns no allocation: `cur` and `prev` are caller-provided buffers, each
/// exactly [`crate::PngHeader::stride`] bytes.
pub struct ScanlineAssembler<'b> {
  bpp: usize,
  cur: &'b mut [u8],
  prev: &'b mut [u8],
  /// 0 means "expecting the next filter-type byte"; otherwise `1 +
  /// <bytes of the row body written so far>`.
  pos: usize,
  filter: FilterType,
}
impl<'b> ScanlineAssembler<'b> {
  /// `cur` and `prev` must be the same length (the scanline stride) and
  /// `prev` must start zeroed, matching the PNG spec's "previous scanline
  /// for the first row is all zeros" rule.
  pub fn new(cur: &'b mut [u8], prev: &'b mut [u8], bpp: usize) -> Self {
    Self { bpp, cur, prev, pos: 0, filter: FilterType::None }
  }

  /// Feeds a chunk of decompressed bytes through the assembler. Every time
  /// a full scanline completes, `on_row` is called with the reconstructed
  /// (unfiltered) row.
  pub fn feed<F: FnMut(&[u8])>(&mut self, mut input: &[u8], mut on_row: F) {
    let stride = self.cur.len();
    while !input.is_empty() {
      if self.pos == 0 {
        self.filter = FilterType::from_byte(input[0]);
        self.pos = 1;
        input = &input[1..];
        continue;
      }
      let row_off = self.pos - 1;
      let take = (stride - row_off).min(input.len());
      self.cur[row_off..row_off + take].copy_from_slice(&input[..take]);
      self.pos += take;
      input = &input[take..];
      if self.pos - 1 == stride {
        unfilter_row(self.filter, self.cur, self.prev, self.bpp);
        on_row(self.cur);
        core::mem::swap(&mut self.cur, &mut self.prev);
        self.pos = 0;
      }
    }
  }

  /// True if a scanline is currently mid-assembly (i.e. `feed` was last
  /// called with input that ended inside a row).
  pub fn is_mid_row(&self) -> bool {
    self.pos != 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn assembles_across_arbitrary_split_points() {
    // Two 3-byte rows (bpp=1, filter type None), fed one byte at a time.
    let stream = [0u8, 1, 2, 3, 0, 4, 5, 6];
    let mut cur = [0u8; 3];
    let mut prev = [0u8; 3];
    let mut rows: [[u8; 3]; 2] = [[0; 3]; 2];
    let mut n = 0;
    {
      let mut asm = ScanlineAssembler::new(&mut cur, &mut prev, 1);
      for byte in stream {
        asm.feed(core::slice::from_ref(&byte), |row| {
          rows[n].copy_from_slice(row);
          n += 1;
        });
      }
      assert!(!asm.is_mid_row());
    }
    assert_eq!(n, 2);
    assert_eq!(rows[0], [1, 2, 3]);
    assert_eq!(rows[1], [4, 5, 6]);
  }

  #[test]
  fn assembles_one_big_chunk_at_once() {
    let stream = [0u8, 9, 9, 9];
    let mut cur = [0u8; 3];
    let mut prev = [0u8; 3];
    let mut seen = [0u8; 3];
    let mut asm = ScanlineAssembler::new(&mut cur, &mut prev, 1);
    asm.feed(&stream, |row| seen.copy_from_slice(row));
    assert_eq!(seen, [9, 9, 9]);
    assert!(!asm.is_mid_row());
  }

  #[test]
  fn up_filter_uses_prior_reconstructed_row() {
    // Row 0: filter None, [10,10,10]. Row 1: filter Up, [1,1,1] -> [11,11,11].
    let stream = [0u8, 10, 10, 10, 2, 1, 1, 1];
    let mut cur = [0u8; 3];
    let mut prev = [0u8; 3];
    let mut rows: [[u8; 3]; 2] = [[0; 3]; 2];
    let mut n = 0;
    let mut asm = ScanlineAssembler::new(&mut cur, &mut prev, 1);
    asm.feed(&stream, |row| {
      rows[n].copy_from_slice(row);
      n += 1;
    });
    assert_eq!(rows[0], [10, 10, 10]);
    assert_eq!(rows[1], [11, 11, 11]);
  }
}
