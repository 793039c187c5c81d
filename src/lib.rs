//! # premul
//!
//! Convert 32-bit pixels between straight and premultiplied alpha.
//!
//! Unpremultiplying divides by alpha through a 256-entry table of
//! fixed-point reciprocals; premultiplying is a rounded fixed-point multiply.
//! Both walk each row in probed pairs and drop into cheap copy loops for runs
//! of fully opaque or identical pixels, which is what most real surfaces are
//! made of.
//!
//! ## Core operations (always available)
//!
//! Functions in the crate root operate on raw `&[u8]` / `&mut [u8]` slices
//! holding native-endian `ARGB32` pixels (alpha in the top byte of each
//! `u32`, as cairo stores them). [`Codec`] offers the same operations for any
//! [`PixelLayout`] and lets callers opt into clamping superluminant input.
//!
//! ```rust
//! let mut row = [0x80FF_FFFFu32.to_ne_bytes(), 0xFF12_3456u32.to_ne_bytes()].concat();
//! premul::premultiply_inplace(&mut row).unwrap();
//! assert_eq!(row[..4], 0x8080_8080u32.to_ne_bytes());
//! assert_eq!(row[4..], 0xFF12_3456u32.to_ne_bytes());
//! ```
//!
//! ## Feature flags
//!
//! - **`rgb`**: in-place and copying conversions of [`rgb`] pixel slices
//!   (`Rgba<u8>`, `Bgra<u8>`) via bytemuck.
//! - **`imgref`**: whole-image conversions using [`imgref`] types
//!   (`ImgRef`, `ImgRefMut`). Implies `rgb`.

#![no_std]
#![forbid(unsafe_code)]

mod bytes;
mod layout;
mod reciprocal;
mod view;

pub use bytes::*;
pub use layout::{AlphaFirst, AlphaLast, AlphaShift, Argb32, PixelLayout, Rgba32};
pub use reciprocal::{RECIPROCAL_BITS, RECIPROCALS};
pub use view::{MAX_EXTENT, PixelView, PixelViewMut, Rect};

#[cfg(feature = "rgb")]
pub mod typed_rgb;

#[cfg(feature = "imgref")]
pub mod imgref;

/// Buffer sizes or dimensions don't describe the pixels being converted.
///
/// Zero or negative dimensions are not errors; they convert nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SizeError {
    /// Slice length is not a multiple of 4 bytes.
    NotPixelAligned,
    /// Destination holds fewer pixels than the source, or two images differ
    /// in dimensions.
    PixelCountMismatch,
    /// Stride is shorter than one row of pixels.
    InvalidStride,
    /// Slice ends before the last row does.
    BufferTooSmall,
}

impl core::fmt::Display for SizeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SizeError::NotPixelAligned => "buffer length is not a multiple of 4 bytes",
            SizeError::PixelCountMismatch => "source and destination pixel counts differ",
            SizeError::InvalidStride => "stride is shorter than a row of pixels",
            SizeError::BufferTooSmall => "buffer is too small for the given dimensions",
        })
    }
}

impl core::error::Error for SizeError {}
