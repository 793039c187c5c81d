use crate::layout::{PixelLayout, alpha};
use crate::reciprocal::{RECIPROCAL_BITS, RECIPROCALS};

// ===========================================================================
// Per-pixel transforms
// ===========================================================================

/// Reduce a fixed-point channel product to 8 bits and move it into place.
#[inline(always)]
fn place(product: u32, frac_bits: u32, shift: u32) -> u32 {
    (product >> frac_bits).min(0xFF) << shift
}

/// Straight → premultiplied: `round(c * a / 255)` per color channel.
///
/// Uses `(c * a * 257 + 32768) >> 16`; 257 / 65536 stands in for 1 / 255.
/// A few products near the top of the range land one level low.
#[inline(always)]
pub(crate) fn premultiply_pixel<L: PixelLayout>(px: u32) -> u32 {
    let a = alpha::<L>(px);
    let channel = |shift: u32| {
        let c = (px >> shift) & 0xFF;
        place(c * a * 257 + 32768, 16, shift)
    };
    channel(L::RED_SHIFT) | channel(L::GREEN_SHIFT) | channel(L::BLUE_SHIFT) | (px & L::ALPHA_MASK)
}

/// Premultiplied → straight: `c * 255 / a` via the reciprocal table.
///
/// With `CLAMP`, color is first limited to alpha so superluminant input
/// saturates the same way a legal `c == a` pixel does.
#[inline(always)]
pub(crate) fn unpremultiply_pixel<L: PixelLayout, const CLAMP: bool>(px: u32) -> u32 {
    let a = alpha::<L>(px);
    let recip = RECIPROCALS[a as usize];
    let channel = |shift: u32| {
        let mut c = (px >> shift) & 0xFF;
        if CLAMP {
            c = c.min(a);
        }
        place(c * recip, RECIPROCAL_BITS, shift)
    };
    channel(L::RED_SHIFT) | channel(L::GREEN_SHIFT) | channel(L::BLUE_SHIFT) | (px & L::ALPHA_MASK)
}

// ===========================================================================
// Row access
// ===========================================================================

#[inline(always)]
fn read_px(buf: &[u8], i: usize) -> u32 {
    let p = &buf[i * 4..][..4];
    u32::from_ne_bytes([p[0], p[1], p[2], p[3]])
}

#[inline(always)]
fn write_px(buf: &mut [u8], i: usize, px: u32) {
    buf[i * 4..][..4].copy_from_slice(&px.to_ne_bytes());
}

/// A row of 4-byte pixels that is read at index `i` before index `i` is
/// written. Reads never look behind the last write, so one buffer can be
/// both source and destination.
pub(crate) trait RowIo {
    fn pixels(&self) -> usize;
    fn load(&self, i: usize) -> u32;
    fn store(&mut self, i: usize, px: u32);
}

/// Disjoint source and destination rows.
pub(crate) struct Split<'a> {
    pub src: &'a [u8],
    pub dst: &'a mut [u8],
}

impl RowIo for Split<'_> {
    #[inline(always)]
    fn pixels(&self) -> usize {
        (self.src.len() / 4).min(self.dst.len() / 4)
    }
    #[inline(always)]
    fn load(&self, i: usize) -> u32 {
        read_px(self.src, i)
    }
    #[inline(always)]
    fn store(&mut self, i: usize, px: u32) {
        write_px(self.dst, i, px);
    }
}

/// One row converted in place.
pub(crate) struct InPlace<'a>(pub &'a mut [u8]);

impl RowIo for InPlace<'_> {
    #[inline(always)]
    fn pixels(&self) -> usize {
        self.0.len() / 4
    }
    #[inline(always)]
    fn load(&self, i: usize) -> u32 {
        read_px(self.0, i)
    }
    #[inline(always)]
    fn store(&mut self, i: usize, px: u32) {
        write_px(self.0, i, px);
    }
}

// ===========================================================================
// Run-detecting row driver
// ===========================================================================

/// What a probed pair says about the pixels that follow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Run {
    /// Both alphas are 255: copy while alpha stays 255.
    Solid,
    /// Both pixels are bit-identical: reuse the cached output while input repeats.
    Constant,
    /// Neither: probe the next pair.
    Probe,
}

/// `accu` is the sum of the pair's alphas minus 510, `diff` the XOR of the pair.
#[inline(always)]
fn classify(accu: u32, diff: u32) -> Run {
    if accu & diff != 0 {
        Run::Probe
    } else if accu == 0 {
        Run::Solid
    } else if diff == 0 {
        Run::Constant
    } else {
        Run::Probe
    }
}

/// Apply `convert` to every pixel of `row`.
///
/// Pixels are probed in pairs. A fully opaque pair switches to verbatim
/// copying, since both conversions are the identity at alpha 255. An
/// identical pair switches to writing the first pixel's cached output. Both
/// runs last until the first pixel that breaks them.
pub(crate) fn convert_row<L: PixelLayout, R: RowIo>(row: &mut R, convert: impl Fn(u32) -> u32) {
    let () = L::VALID;
    let n = row.pixels();
    let mut i = 0;
    while i < n {
        let first = row.load(i);
        let first_out = convert(first);
        row.store(i, first_out);
        if i + 1 == n {
            return;
        }

        let second = row.load(i + 1);
        row.store(i + 1, convert(second));
        i += 2;

        let accu = (alpha::<L>(first) + alpha::<L>(second)).wrapping_sub(2 * 255);
        let diff = first ^ second;

        match classify(accu, diff) {
            Run::Probe => {}
            Run::Solid => {
                while i < n {
                    let px = row.load(i);
                    if px & L::ALPHA_MASK != L::ALPHA_MASK {
                        break;
                    }
                    row.store(i, px);
                    i += 1;
                }
            }
            Run::Constant => {
                while i < n && row.load(i) == first {
                    row.store(i, first_out);
                    i += 1;
                }
            }
        }
    }
}

// ===========================================================================
// Strided drivers
// ===========================================================================

/// Convert `h` rows of `w` pixels from `src` into `dst`. Callers validate
/// that both buffers cover `(h - 1) * stride + w * 4` bytes.
pub(crate) fn convert_strided<L: PixelLayout>(
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
    convert: impl Fn(u32) -> u32,
) {
    if w == 0 {
        return;
    }
    for y in 0..h {
        let mut row = Split {
            src: &src[y * ss..][..w * 4],
            dst: &mut dst[y * ds..][..w * 4],
        };
        convert_row::<L, _>(&mut row, &convert);
    }
}

/// In-place counterpart of [`convert_strided`].
pub(crate) fn convert_inplace_strided<L: PixelLayout>(
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
    convert: impl Fn(u32) -> u32,
) {
    if w == 0 {
        return;
    }
    for y in 0..h {
        convert_row::<L, _>(&mut InPlace(&mut buf[y * stride..][..w * 4]), &convert);
    }
}
