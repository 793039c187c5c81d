//! Premultiply and unpremultiply [`rgb`] pixel slices via bytemuck.
//!
//! `Rgba<u8>` and `Bgra<u8>` both keep alpha in their last byte, so both are
//! converted with the [`AlphaLast`] layout; the order of the color channels
//! doesn't matter to the math.
//!
//! # In-place
//!
//! ```rust
//! use rgb::Rgba;
//! use premul::typed_rgb;
//!
//! let mut pixels = vec![Rgba::new(255u8, 128, 0, 128); 100];
//! typed_rgb::premultiply_rgba_mut(&mut pixels);
//! assert_eq!(pixels[0], Rgba::new(128, 64, 0, 128));
//! ```
//!
//! # Copy
//!
//! ```rust
//! use rgb::Bgra;
//! use premul::typed_rgb;
//!
//! let premultiplied = vec![Bgra { b: 0, g: 64, r: 128, a: 128 }; 16];
//! let mut straight = vec![Bgra::default(); 16];
//! typed_rgb::unpremultiply_bgra_buf(&premultiplied, &mut straight).unwrap();
//! assert_eq!(straight[0], Bgra { b: 0, g: 127, r: 255, a: 128 });
//! ```

use crate::SizeError;
use crate::bytes::Codec;
use crate::layout::AlphaLast;
use rgb::{Bgra, Rgba};

const CODEC: Codec<AlphaLast> = Codec::new();

// ---------------------------------------------------------------------------
// In place
// ---------------------------------------------------------------------------

/// Premultiply straight-alpha `Rgba<u8>` pixels in place.
pub fn premultiply_rgba_mut(pixels: &mut [Rgba<u8>]) {
    CODEC.premultiply_whole_pixels(bytemuck::cast_slice_mut(pixels));
}

/// Unpremultiply premultiplied `Rgba<u8>` pixels in place.
pub fn unpremultiply_rgba_mut(pixels: &mut [Rgba<u8>]) {
    CODEC.unpremultiply_whole_pixels(bytemuck::cast_slice_mut(pixels));
}

/// Premultiply straight-alpha `Bgra<u8>` pixels in place.
pub fn premultiply_bgra_mut(pixels: &mut [Bgra<u8>]) {
    CODEC.premultiply_whole_pixels(bytemuck::cast_slice_mut(pixels));
}

/// Unpremultiply premultiplied `Bgra<u8>` pixels in place.
pub fn unpremultiply_bgra_mut(pixels: &mut [Bgra<u8>]) {
    CODEC.unpremultiply_whole_pixels(bytemuck::cast_slice_mut(pixels));
}

// ---------------------------------------------------------------------------
// Copy
// ---------------------------------------------------------------------------

/// Premultiply `src` into the start of `dst`, which must be at least as long.
pub fn premultiply_rgba_buf(src: &[Rgba<u8>], dst: &mut [Rgba<u8>]) -> Result<(), SizeError> {
    CODEC.premultiply(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst))
}

/// Unpremultiply `src` into the start of `dst`, which must be at least as long.
pub fn unpremultiply_rgba_buf(src: &[Rgba<u8>], dst: &mut [Rgba<u8>]) -> Result<(), SizeError> {
    CODEC.unpremultiply(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst))
}

/// Premultiply `src` into the start of `dst`, which must be at least as long.
pub fn premultiply_bgra_buf(src: &[Bgra<u8>], dst: &mut [Bgra<u8>]) -> Result<(), SizeError> {
    CODEC.premultiply(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst))
}

/// Unpremultiply `src` into the start of `dst`, which must be at least as long.
pub fn unpremultiply_bgra_buf(src: &[Bgra<u8>], dst: &mut [Bgra<u8>]) -> Result<(), SizeError> {
    CODEC.unpremultiply(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst))
}
