//! Borrowed rectangular pixel regions.
//!
//! A view is a byte slice plus a row stride and pixel dimensions. Row `y`
//! starts at byte `y * stride` and holds `width * 4` bytes; anything between
//! the end of one row and the start of the next is padding that is never
//! touched.

use crate::SizeError;
use crate::bytes::check_strided;

/// Largest coordinate a [`Rect`] can address. [`Rect::full`] spans it.
pub const MAX_EXTENT: i32 = 32767;

/// A rectangle in pixel coordinates, as handed over by a windowing layer.
///
/// Origins may be negative and extents may run past the surface; use
/// [`Rect::clip`] before addressing pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole addressable area, for "everything is dirty".
    pub const fn full() -> Self {
        Self::new(0, 0, MAX_EXTENT, MAX_EXTENT)
    }

    /// Intersect with `[0, bounds_width) × [0, bounds_height)`.
    ///
    /// A negative origin eats into the extent; the far edges are cut at the
    /// bounds. Returns `None` when nothing is left.
    pub fn clip(self, bounds_width: usize, bounds_height: usize) -> Option<Rect> {
        let (x, w) = clip_span(self.x, self.width, bounds_width)?;
        let (y, h) = clip_span(self.y, self.height, bounds_height)?;
        Some(Rect::new(x, y, w, h))
    }
}

fn clip_span(start: i32, len: i32, bound: usize) -> Option<(i32, i32)> {
    let bound = bound.min(i32::MAX as usize) as i64;
    let (mut start, mut len) = (start as i64, len as i64);
    if start < 0 {
        len += start;
        start = 0;
    }
    if start >= bound {
        return None;
    }
    len = len.min(bound - start);
    if len <= 0 {
        return None;
    }
    Some((start as i32, len as i32))
}

/// Read-only pixel region.
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    data: &'a [u8],
    stride: usize,
    width: usize,
    height: usize,
}

impl<'a> PixelView<'a> {
    /// Describe `height` rows of `width` pixels, `stride` bytes apart.
    ///
    /// A zero width or height always succeeds and yields an empty view.
    pub fn new(
        data: &'a [u8],
        stride: usize,
        width: usize,
        height: usize,
    ) -> Result<Self, SizeError> {
        check_strided(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            stride,
            width,
            height,
        })
    }

    /// Tightly packed rows: `stride == width * 4`.
    pub fn packed(data: &'a [u8], width: usize, height: usize) -> Result<Self, SizeError> {
        let stride = width.checked_mul(4).ok_or(SizeError::InvalidStride)?;
        Self::new(data, stride, width, height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The pixels of row `y`, without padding.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height || self.is_empty() {
            return None;
        }
        Some(&self.data[y * self.stride..][..self.width * 4])
    }

    /// Narrow to `rect`, which is clipped to this view first.
    pub fn sub_view(&self, rect: Rect) -> Option<PixelView<'a>> {
        let r = rect.clip(self.width, self.height)?;
        let (x, y, w, h) = (r.x as usize, r.y as usize, r.width as usize, r.height as usize);
        Some(PixelView {
            data: &self.data[y * self.stride + x * 4..],
            stride: self.stride,
            width: w,
            height: h,
        })
    }

    pub(crate) fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Mutable pixel region. Conversions write through it in place.
#[derive(Debug)]
pub struct PixelViewMut<'a> {
    data: &'a mut [u8],
    stride: usize,
    width: usize,
    height: usize,
}

impl<'a> PixelViewMut<'a> {
    /// Describe `height` rows of `width` pixels, `stride` bytes apart.
    ///
    /// A zero width or height always succeeds and yields an empty view.
    pub fn new(
        data: &'a mut [u8],
        stride: usize,
        width: usize,
        height: usize,
    ) -> Result<Self, SizeError> {
        check_strided(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            stride,
            width,
            height,
        })
    }

    /// Tightly packed rows: `stride == width * 4`.
    pub fn packed(data: &'a mut [u8], width: usize, height: usize) -> Result<Self, SizeError> {
        let stride = width.checked_mul(4).ok_or(SizeError::InvalidStride)?;
        Self::new(data, stride, width, height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> PixelView<'_> {
        PixelView {
            data: &*self.data,
            stride: self.stride,
            width: self.width,
            height: self.height,
        }
    }

    /// The pixels of row `y`, without padding.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height || self.is_empty() {
            return None;
        }
        Some(&mut self.data[y * self.stride..][..self.width * 4])
    }

    /// Narrow to `rect`, which is clipped to this view first.
    pub fn sub_view_mut(&mut self, rect: Rect) -> Option<PixelViewMut<'_>> {
        let r = rect.clip(self.width, self.height)?;
        let (x, y, w, h) = (r.x as usize, r.y as usize, r.width as usize, r.height as usize);
        Some(PixelViewMut {
            data: &mut self.data[y * self.stride + x * 4..],
            stride: self.stride,
            width: w,
            height: h,
        })
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}
