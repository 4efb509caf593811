//! Crate-wide error type.

use core::fmt;

/// Everything that can go wrong while scanning, inflating, or reconstructing
/// a PNG.
///
/// The public `decode`/`info` functions collapse every variant down to a
/// single `Result<_, PngError>`, but the variant itself is still exposed so
/// an embedder can log a reason code if they want one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PngError {
  /// Signature mismatch, or the buffer is too short to hold one.
  MalformedSignature,
  /// `IHDR` missing, not first, or of the wrong declared length.
  MalformedHeader,
  /// A feature of the header (interlacing, bit depth, color type, method,
  /// zero dimension, or an unsupported `scale`) isn't supported.
  Unsupported,
  /// No `IDAT` chunks were found before `IEND` (or before truncation).
  NoImageData,
  /// The inflate backend reported a failure status.
  DecompressFailed,
  /// The inflate stream ended (or ran out of input) before `height`
  /// scanlines had been assembled.
  Truncated,
}

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::MalformedSignature => "not a PNG file (bad signature)",
      Self::MalformedHeader => "malformed or misplaced IHDR chunk",
      Self::Unsupported => "unsupported header feature or scale factor",
      Self::NoImageData => "no IDAT chunks present",
      Self::DecompressFailed => "DEFLATE stream is corrupt",
      Self::Truncated => "fewer scanlines than the header declared",
    })
  }
}

/// Shorthand for a `Result` failing with [`PngError`].
pub type PngResult<T> = Result<T, PngError>;
