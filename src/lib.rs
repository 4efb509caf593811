#![cfg_attr(not(feature = "trace"), no_std)]
#![forbid(unsafe_code)]

//! A streaming PNG decoder for memory-constrained RGB565 framebuffers.
//!
//! The decoder accepts a complete PNG image held in memory and produces
//! scanlines of RGB565 pixels through a caller-supplied row callback,
//! optionally downscaling by a fixed integer factor (1, 2, or 4) using
//! box-average pixel reduction. See [`decode`] and [`info`] for the
//! `alloc`-feature convenience API, or [`engine::Engine`] if you'd rather
//! own every buffer yourself and run with no allocator at all.

#[cfg(feature = "trace")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_export]
macro_rules! trace {
  ($($arg:tt)*) => {
    #[cfg(feature = "trace")] {
      ::std::print!("{file}:{line}> ", file = file!(), line = line!());
      ::std::println!($($arg)*);
    }
  }
}

mod chunk;
pub use chunk::*;

mod header;
pub use header::*;

mod palette;
pub use palette::*;

mod inflate;
pub use inflate::*;

mod scanline;
pub use scanline::*;

mod filter;
pub use filter::*;

mod pixel;
pub use pixel::*;

mod downscale;
pub use downscale::*;

pub mod engine;

mod error;
pub use error::*;

#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
pub use decode::*;
