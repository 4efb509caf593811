//! The allocation-free decoding engine.
//!
//! Everything here takes its working memory as borrowed buffers supplied
//! by the caller. There is no allocator requirement at all: an embedder
//! with a fixed 32 KiB dictionary, one or two scanline buffers, and an
//! output row buffer sitting in `.bss` can decode a PNG of any size this
//! crate supports without ever calling into a heap.
//!
//! [`crate::decode`] and [`crate::info`] are a thin `alloc`-gated
//! convenience layer built on top of this.

use crate::{
  extract_pixel, BoxAverager, IdatList, InflateBackend, InflateDriver, Palette, PngError, PngHeader,
  PngResult, Rgb565, Scale, ScanlineAssembler, DICT_SIZE,
};

/// Borrowed working buffers for one [`Engine::run`] call.
///
/// * `dict` is the 32 KiB DEFLATE sliding window; always exactly this size.
/// * `cur`/`prev` are scanline buffers, each exactly
///   [`PngHeader::stride`] bytes.
/// * `acc` is the box-averager's accumulator, needed only when `scale !=
///   Scale::X1`; pass an empty slice at scale 1. Required length is `3 *
///   out_width` `u16` lanes.
/// * `out` is the packed-pixel output row buffer, at least `out_width`
///   pixels.
pub struct Buffers<'b> {
  pub dict: &'b mut [u8; DICT_SIZE],
  pub cur: &'b mut [u8],
  pub prev: &'b mut [u8],
  pub acc: &'b mut [u16],
  pub out: &'b mut [Rgb565],
}

/// Drives header-validated chunk data through inflate, scanline assembly,
/// pixel extraction, and downscaling, with no allocation anywhere.
pub struct Engine<'b> {
  header: PngHeader,
  palette: Palette,
  idats: IdatList<'b>,
}
impl<'b> Engine<'b> {
  pub fn new(header: PngHeader, palette: Palette, idats: IdatList<'b>) -> Self {
    Self { header, palette, idats }
  }

  pub fn header(&self) -> &PngHeader {
    &self.header
  }

  /// Decodes every scanline, calling `on_row(y, pixels)` once per *output*
  /// row (i.e. already downscaled, if `scale != Scale::X1`).
  ///
  /// Fails with [`PngError::Truncated`] if the inflate stream runs dry
  /// before `header.height` input scanlines have been assembled, even if
  /// that shortfall only costs a trailing partial downscale block.
  pub fn run<B: InflateBackend>(
    &mut self, buffers: Buffers<'_>, mut on_row: impl FnMut(u32, &[Rgb565]),
  ) -> PngResult<()> {
    let header = self.header;
    let palette = self.palette;
    let Buffers { dict, cur, prev, acc, out } = buffers;

    let bpp = header.bytes_per_pixel();
    let averager = BoxAverager::new(header.scale, header.width);
    let out_w = averager.out_width();

    let mut assembler = ScanlineAssembler::new(cur, prev, bpp);
    let mut driver: InflateDriver<'_, B> = InflateDriver::new(self.idats);

    let mut in_rows_done: u32 = 0;
    let mut out_row: u32 = 0;
    let mut out_pos = 0usize;

    driver.run(dict, &mut out_pos, |bytes| {
      assembler.feed(bytes, |row| {
        if in_rows_done >= header.height {
          return;
        }
        if header.scale == Scale::X1 {
          for x in 0..header.width as usize {
            out[x] = Rgb565::pack(extract_pixel(&header, row, x, &palette));
          }
          on_row(out_row, &out[..out_w]);
          out_row += 1;
        } else {
          for x in 0..header.width as usize {
            let rgb = extract_pixel(&header, row, x, &palette);
            averager.accumulate(acc, x, rgb);
          }
          if averager.row_is_boundary(in_rows_done) {
            averager.emit_into(acc, &mut out[..out_w]);
            on_row(out_row, &out[..out_w]);
            out_row += 1;
          }
        }
        in_rows_done += 1;
      });
    })?;

    if in_rows_done < header.height {
      return Err(PngError::Truncated);
    }
    Ok(())
  }
}
