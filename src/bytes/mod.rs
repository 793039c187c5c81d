// ---------------------------------------------------------------------------
// Row-level premultiply / unpremultiply over byte slices.
//
// Architecture: row.rs holds the per-pixel transforms and the run-detecting
// row driver. This file validates buffers, then wires layouts and the
// superluminant policy into the drivers for single rows, strided images and
// rectangle lists.
// ---------------------------------------------------------------------------

use core::marker::PhantomData;

use crate::SizeError;
use crate::layout::{Argb32, PixelLayout};
use crate::view::{PixelView, PixelViewMut, Rect};

mod row;
use row::*;

#[cfg(test)]
mod tests;

// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_inplace(len: usize) -> Result<(), SizeError> {
    if !len.is_multiple_of(4) {
        Err(SizeError::NotPixelAligned)
    } else {
        Ok(())
    }
}

#[inline]
fn check_copy(src_len: usize, dst_len: usize) -> Result<(), SizeError> {
    if !src_len.is_multiple_of(4) {
        return Err(SizeError::NotPixelAligned);
    }
    if dst_len < src_len {
        return Err(SizeError::PixelCountMismatch);
    }
    Ok(())
}

/// Validate a `width × height` region with rows `stride` bytes apart.
/// Empty regions are always valid.
#[inline]
pub(crate) fn check_strided(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(), SizeError> {
    if width == 0 || height == 0 {
        return Ok(());
    }
    let row_bytes = width.checked_mul(4).ok_or(SizeError::InvalidStride)?;
    if row_bytes > stride {
        return Err(SizeError::InvalidStride);
    }
    let total = (height - 1)
        .checked_mul(stride)
        .and_then(|t| t.checked_add(row_bytes))
        .ok_or(SizeError::BufferTooSmall)?;
    if len < total {
        return Err(SizeError::BufferTooSmall);
    }
    Ok(())
}

/// Negative dimensions convert nothing.
#[inline]
fn dims(width: i32, height: i32) -> Option<(usize, usize)> {
    if width <= 0 || height <= 0 {
        None
    } else {
        Some((width as usize, height as usize))
    }
}

// ===========================================================================
// Codec
// ===========================================================================

/// What to do with premultiplied input whose color exceeds its alpha.
///
/// Well-behaved producers (cairo, pixman) never emit such pixels, so by
/// default they are not looked for and any channel that would exceed 255
/// after unpremultiplying saturates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Superluminant {
    /// Trust the input.
    #[default]
    Unchecked,
    /// Limit each color channel to alpha before unpremultiplying. Output
    /// matches `Unchecked`, since over-range channels saturate anyway.
    Clamp,
}

/// Premultiply/unpremultiply for one fixed pixel layout.
///
/// The layout is a type parameter so that channel shifts are constants in
/// the inner loops; the superluminant policy is chosen once per codec.
///
/// ```rust
/// use premul::{AlphaLast, Codec, Superluminant};
///
/// let codec = Codec::<AlphaLast>::new().with_superluminant(Superluminant::Clamp);
/// let mut rgba = [200u8, 100, 0, 128];
/// codec.premultiply_inplace(&mut rgba).unwrap();
/// assert_eq!(rgba, [100, 50, 0, 128]);
/// codec.unpremultiply_inplace(&mut rgba).unwrap();
/// assert_eq!(rgba, [199, 99, 0, 128]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Codec<L = Argb32> {
    superluminant: Superluminant,
    layout: PhantomData<L>,
}

impl<L: PixelLayout> Default for Codec<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bind `$f` to the unpremultiply transform selected by `$codec`'s policy.
macro_rules! with_unpremultiplier {
    ($codec:expr, $f:ident => $body:expr) => {
        match $codec.superluminant {
            Superluminant::Unchecked => {
                let $f = unpremultiply_pixel::<L, false>;
                $body
            }
            Superluminant::Clamp => {
                let $f = unpremultiply_pixel::<L, true>;
                $body
            }
        }
    };
}

impl<L: PixelLayout> Codec<L> {
    pub const fn new() -> Self {
        Self {
            superluminant: Superluminant::Unchecked,
            layout: PhantomData,
        }
    }

    pub const fn with_superluminant(mut self, policy: Superluminant) -> Self {
        self.superluminant = policy;
        self
    }

    pub const fn superluminant(&self) -> Superluminant {
        self.superluminant
    }

    // -----------------------------------------------------------------------
    // Contiguous
    // -----------------------------------------------------------------------

    /// Premultiply 4bpp pixels from `src` into `dst`.
    pub fn premultiply(&self, src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
        check_copy(src.len(), dst.len())?;
        convert_row::<L, _>(&mut Split { src, dst }, premultiply_pixel::<L>);
        Ok(())
    }

    /// Premultiply 4bpp pixels in place.
    pub fn premultiply_inplace(&self, buf: &mut [u8]) -> Result<(), SizeError> {
        check_inplace(buf.len())?;
        self.premultiply_whole_pixels(buf);
        Ok(())
    }

    /// Unpremultiply 4bpp pixels from `src` into `dst`.
    pub fn unpremultiply(&self, src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
        check_copy(src.len(), dst.len())?;
        with_unpremultiplier!(self, f => convert_row::<L, _>(&mut Split { src, dst }, f));
        Ok(())
    }

    /// Unpremultiply 4bpp pixels in place.
    pub fn unpremultiply_inplace(&self, buf: &mut [u8]) -> Result<(), SizeError> {
        check_inplace(buf.len())?;
        self.unpremultiply_whole_pixels(buf);
        Ok(())
    }

    /// Premultiply every complete pixel of `buf`; a trailing partial pixel
    /// is left alone.
    pub(crate) fn premultiply_whole_pixels(&self, buf: &mut [u8]) {
        convert_row::<L, _>(&mut InPlace(buf), premultiply_pixel::<L>);
    }

    /// Unpremultiply every complete pixel of `buf`; a trailing partial pixel
    /// is left alone.
    pub(crate) fn unpremultiply_whole_pixels(&self, buf: &mut [u8]) {
        with_unpremultiplier!(self, f => convert_row::<L, _>(&mut InPlace(buf), f));
    }

    // -----------------------------------------------------------------------
    // Native `u32` pixels
    // -----------------------------------------------------------------------

    /// Premultiply `u32` pixels from `src` into `dst`.
    pub fn premultiply_pixels(&self, src: &[u32], dst: &mut [u32]) -> Result<(), SizeError> {
        self.premultiply(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst))
    }

    pub fn premultiply_pixels_inplace(&self, pixels: &mut [u32]) {
        self.premultiply_whole_pixels(bytemuck::cast_slice_mut(pixels));
    }

    /// Unpremultiply `u32` pixels from `src` into `dst`.
    pub fn unpremultiply_pixels(&self, src: &[u32], dst: &mut [u32]) -> Result<(), SizeError> {
        self.unpremultiply(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst))
    }

    pub fn unpremultiply_pixels_inplace(&self, pixels: &mut [u32]) {
        self.unpremultiply_whole_pixels(bytemuck::cast_slice_mut(pixels));
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Premultiply every row of `src` into the same row of `dst`.
    ///
    /// Both views must have the same width and height.
    pub fn premultiply_view(
        &self,
        src: &PixelView<'_>,
        dst: &mut PixelViewMut<'_>,
    ) -> Result<(), SizeError> {
        check_same_dims(src, dst)?;
        blit::<L>(src, dst, premultiply_pixel::<L>);
        Ok(())
    }

    pub fn premultiply_view_inplace(&self, buf: &mut PixelViewMut<'_>) {
        blit_inplace::<L>(buf, premultiply_pixel::<L>);
    }

    /// Unpremultiply every row of `src` into the same row of `dst`.
    ///
    /// Both views must have the same width and height.
    pub fn unpremultiply_view(
        &self,
        src: &PixelView<'_>,
        dst: &mut PixelViewMut<'_>,
    ) -> Result<(), SizeError> {
        check_same_dims(src, dst)?;
        with_unpremultiplier!(self, f => blit::<L>(src, dst, f));
        Ok(())
    }

    pub fn unpremultiply_view_inplace(&self, buf: &mut PixelViewMut<'_>) {
        with_unpremultiplier!(self, f => blit_inplace::<L>(buf, f));
    }

    // -----------------------------------------------------------------------
    // Rectangle lists
    // -----------------------------------------------------------------------

    /// Premultiply each of `rects` from `src` into `dst`.
    ///
    /// Rectangles are clipped to the area both views cover; those that clip
    /// to nothing are skipped. Returns how many rectangles were converted.
    pub fn premultiply_rects(
        &self,
        src: &PixelView<'_>,
        dst: &mut PixelViewMut<'_>,
        rects: &[Rect],
    ) -> usize {
        blit_rects::<L>(src, dst, rects, premultiply_pixel::<L>)
    }

    /// Unpremultiply each of `rects` from `src` into `dst`.
    ///
    /// Rectangles are clipped to the area both views cover; those that clip
    /// to nothing are skipped. Returns how many rectangles were converted.
    pub fn unpremultiply_rects(
        &self,
        src: &PixelView<'_>,
        dst: &mut PixelViewMut<'_>,
        rects: &[Rect],
    ) -> usize {
        with_unpremultiplier!(self, f => blit_rects::<L>(src, dst, rects, f))
    }
}

fn check_same_dims(src: &PixelView<'_>, dst: &PixelViewMut<'_>) -> Result<(), SizeError> {
    if src.width() != dst.width() || src.height() != dst.height() {
        Err(SizeError::PixelCountMismatch)
    } else {
        Ok(())
    }
}

fn blit<L: PixelLayout>(src: &PixelView<'_>, dst: &mut PixelViewMut<'_>, f: impl Fn(u32) -> u32) {
    let (w, h) = (src.width(), src.height());
    let (ss, ds) = (src.stride(), dst.stride());
    convert_strided::<L>(src.data(), dst.data_mut(), w, h, ss, ds, f);
}

fn blit_inplace<L: PixelLayout>(buf: &mut PixelViewMut<'_>, f: impl Fn(u32) -> u32) {
    let (w, h, stride) = (buf.width(), buf.height(), buf.stride());
    convert_inplace_strided::<L>(buf.data_mut(), w, h, stride, f);
}

fn blit_rects<L: PixelLayout>(
    src: &PixelView<'_>,
    dst: &mut PixelViewMut<'_>,
    rects: &[Rect],
    f: impl Fn(u32) -> u32,
) -> usize {
    let width = src.width().min(dst.width());
    let height = src.height().min(dst.height());
    let mut converted = 0;
    for rect in rects {
        let Some(r) = rect.clip(width, height) else {
            continue;
        };
        let (Some(s), Some(mut d)) = (src.sub_view(r), dst.sub_view_mut(r)) else {
            continue;
        };
        blit::<L>(&s, &mut d, &f);
        converted += 1;
    }
    converted
}

// ===========================================================================
// Public API: default layout (ARGB32)
// ===========================================================================

const DEFAULT: Codec<Argb32> = Codec::new();

/// Premultiply ARGB32 pixels from `src` into `dst`.
pub fn premultiply(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    DEFAULT.premultiply(src, dst)
}

/// Premultiply ARGB32 pixels in place.
pub fn premultiply_inplace(buf: &mut [u8]) -> Result<(), SizeError> {
    DEFAULT.premultiply_inplace(buf)
}

/// Unpremultiply ARGB32 pixels from `src` into `dst`.
pub fn unpremultiply(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    DEFAULT.unpremultiply(src, dst)
}

/// Unpremultiply ARGB32 pixels in place.
pub fn unpremultiply_inplace(buf: &mut [u8]) -> Result<(), SizeError> {
    DEFAULT.unpremultiply_inplace(buf)
}

/// Copy a `width × height` block of premultiplied ARGB32 pixels from `src`
/// into `dst`, unpremultiplying on the way.
///
/// `dst_stride` / `src_stride` are the distances in bytes between the start
/// of consecutive rows. Padding bytes between rows are never read or
/// written. A zero or negative `width` or `height` converts nothing and
/// succeeds.
pub fn blit_and_unpremultiply(
    dst: &mut [u8],
    dst_stride: usize,
    src: &[u8],
    src_stride: usize,
    width: i32,
    height: i32,
) -> Result<(), SizeError> {
    let Some((w, h)) = dims(width, height) else {
        return Ok(());
    };
    let src = PixelView::new(src, src_stride, w, h)?;
    let mut dst = PixelViewMut::new(dst, dst_stride, w, h)?;
    DEFAULT.unpremultiply_view(&src, &mut dst)
}

/// Copy a `width × height` block of straight-alpha ARGB32 pixels from `src`
/// into `dst`, premultiplying on the way.
///
/// `dst_stride` / `src_stride` are the distances in bytes between the start
/// of consecutive rows. Padding bytes between rows are never read or
/// written. A zero or negative `width` or `height` converts nothing and
/// succeeds.
pub fn blit_and_premultiply(
    dst: &mut [u8],
    dst_stride: usize,
    src: &[u8],
    src_stride: usize,
    width: i32,
    height: i32,
) -> Result<(), SizeError> {
    let Some((w, h)) = dims(width, height) else {
        return Ok(());
    };
    let src = PixelView::new(src, src_stride, w, h)?;
    let mut dst = PixelViewMut::new(dst, dst_stride, w, h)?;
    DEFAULT.premultiply_view(&src, &mut dst)
}

/// Unpremultiply a strided ARGB32 image in place.
///
/// `stride` is the distance in bytes between the start of consecutive rows.
/// Must be ≥ `width × 4`. Padding bytes between rows are never read or written.
pub fn unpremultiply_inplace_strided(
    buf: &mut [u8],
    stride: usize,
    width: i32,
    height: i32,
) -> Result<(), SizeError> {
    let Some((w, h)) = dims(width, height) else {
        return Ok(());
    };
    DEFAULT.unpremultiply_view_inplace(&mut PixelViewMut::new(buf, stride, w, h)?);
    Ok(())
}

/// Premultiply a strided ARGB32 image in place.
///
/// `stride` is the distance in bytes between the start of consecutive rows.
/// Must be ≥ `width × 4`. Padding bytes between rows are never read or written.
pub fn premultiply_inplace_strided(
    buf: &mut [u8],
    stride: usize,
    width: i32,
    height: i32,
) -> Result<(), SizeError> {
    let Some((w, h)) = dims(width, height) else {
        return Ok(());
    };
    DEFAULT.premultiply_view_inplace(&mut PixelViewMut::new(buf, stride, w, h)?);
    Ok(())
}
