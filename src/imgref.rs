//! Whole-image premultiply / unpremultiply using [`imgref`] types.
//!
//! Rows are walked with imgref's row iterators, so padding between rows
//! (`stride > width`) is never read or written. No allocation; caller owns
//! all buffers.
//!
//! # In place
//!
//! ```rust
//! use rgb::Rgba;
//! use ::imgref::ImgVec;
//! use premul::imgref;
//!
//! let mut img = ImgVec::new(vec![Rgba::new(255u8, 0, 128, 128); 4], 2, 2);
//! imgref::premultiply_img_inplace(img.as_mut());
//! assert_eq!(img.buf()[0], Rgba::new(128, 0, 64, 128));
//! ```
//!
//! # Copy (caller provides destination)
//!
//! ```rust
//! use rgb::Rgba;
//! use ::imgref::{ImgRefMut, ImgVec};
//! use premul::imgref;
//!
//! let src = ImgVec::new(vec![Rgba::new(64u8, 32, 16, 128); 4], 2, 2);
//! let mut dst_buf = vec![Rgba::default(); 4];
//! let dst = ImgRefMut::new(&mut dst_buf, 2, 2);
//! imgref::unpremultiply_img(src.as_ref(), dst).unwrap();
//! assert_eq!(dst_buf[3], Rgba::new(127, 63, 31, 128));
//! ```

use imgref::{ImgRef, ImgRefMut};
use rgb::{Bgra, Rgba};

use crate::SizeError;
use crate::typed_rgb;

fn check_dims(sw: usize, sh: usize, dw: usize, dh: usize) -> Result<(), SizeError> {
    if sw != dw || sh != dh {
        Err(SizeError::PixelCountMismatch)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In place
// ---------------------------------------------------------------------------

/// Premultiply a straight-alpha RGBA image in place.
pub fn premultiply_img_inplace(mut img: ImgRefMut<'_, Rgba<u8>>) {
    for row in img.rows_mut() {
        typed_rgb::premultiply_rgba_mut(row);
    }
}

/// Unpremultiply a premultiplied RGBA image in place.
pub fn unpremultiply_img_inplace(mut img: ImgRefMut<'_, Rgba<u8>>) {
    for row in img.rows_mut() {
        typed_rgb::unpremultiply_rgba_mut(row);
    }
}

/// Premultiply a straight-alpha BGRA image in place.
pub fn premultiply_bgra_img_inplace(mut img: ImgRefMut<'_, Bgra<u8>>) {
    for row in img.rows_mut() {
        typed_rgb::premultiply_bgra_mut(row);
    }
}

/// Unpremultiply a premultiplied BGRA image in place.
pub fn unpremultiply_bgra_img_inplace(mut img: ImgRefMut<'_, Bgra<u8>>) {
    for row in img.rows_mut() {
        typed_rgb::unpremultiply_bgra_mut(row);
    }
}

// ---------------------------------------------------------------------------
// Copy
// ---------------------------------------------------------------------------

/// Premultiply `src` into `dst`. Both images must have the same dimensions.
pub fn premultiply_img(
    src: ImgRef<'_, Rgba<u8>>,
    mut dst: ImgRefMut<'_, Rgba<u8>>,
) -> Result<(), SizeError> {
    check_dims(src.width(), src.height(), dst.width(), dst.height())?;
    for (src_row, dst_row) in src.rows().zip(dst.rows_mut()) {
        typed_rgb::premultiply_rgba_buf(src_row, dst_row)?;
    }
    Ok(())
}

/// Unpremultiply `src` into `dst`. Both images must have the same dimensions.
pub fn unpremultiply_img(
    src: ImgRef<'_, Rgba<u8>>,
    mut dst: ImgRefMut<'_, Rgba<u8>>,
) -> Result<(), SizeError> {
    check_dims(src.width(), src.height(), dst.width(), dst.height())?;
    for (src_row, dst_row) in src.rows().zip(dst.rows_mut()) {
        typed_rgb::unpremultiply_rgba_buf(src_row, dst_row)?;
    }
    Ok(())
}

/// BGRA counterpart of [`premultiply_img`].
pub fn premultiply_bgra_img(
    src: ImgRef<'_, Bgra<u8>>,
    mut dst: ImgRefMut<'_, Bgra<u8>>,
) -> Result<(), SizeError> {
    check_dims(src.width(), src.height(), dst.width(), dst.height())?;
    for (src_row, dst_row) in src.rows().zip(dst.rows_mut()) {
        typed_rgb::premultiply_bgra_buf(src_row, dst_row)?;
    }
    Ok(())
}

/// BGRA counterpart of [`unpremultiply_img`].
pub fn unpremultiply_bgra_img(
    src: ImgRef<'_, Bgra<u8>>,
    mut dst: ImgRefMut<'_, Bgra<u8>>,
) -> Result<(), SizeError> {
    check_dims(src.width(), src.height(), dst.width(), dst.height())?;
    for (src_row, dst_row) in src.rows().zip(dst.rows_mut()) {
        typed_rgb::unpremultiply_bgra_buf(src_row, dst_row)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
