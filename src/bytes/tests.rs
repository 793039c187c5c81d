extern crate alloc;
use super::*;
use crate::layout::{AlphaLast, AlphaShift, Rgba32};
use alloc::{vec, vec::Vec};

// --- Helpers to generate test data ---

fn to_bytes(px: &[u32]) -> Vec<u8> {
    px.iter().flat_map(|p| p.to_ne_bytes()).collect()
}

fn from_bytes(b: &[u8]) -> Vec<u32> {
    b.chunks_exact(4)
        .map(|p| u32::from_ne_bytes([p[0], p[1], p[2], p[3]]))
        .collect()
}

/// Cheap deterministic noise.
fn xorshift(state: &mut u32) -> u32 {
    *state ^= *state << 13;
    *state ^= *state >> 17;
    *state ^= *state << 5;
    *state
}

/// Legal premultiplied ARGB32: every color channel ≤ alpha.
fn premultiplied_argb(seed: u32, n: usize) -> Vec<u32> {
    let mut s = seed | 1;
    (0..n)
        .map(|_| {
            let r = xorshift(&mut s);
            let a = r >> 24;
            let c = |v: u32| if a == 0 { 0 } else { v % (a + 1) };
            (a << 24) | (c(r >> 16 & 0xFF) << 16) | (c(r >> 8 & 0xFF) << 8) | c(r & 0xFF)
        })
        .collect()
}

/// Rows with long opaque and constant stretches broken up by noise.
fn runny(seed: u32, n: usize) -> Vec<u32> {
    let mut s = seed | 1;
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let r = xorshift(&mut s);
        let len = (r % 9) as usize;
        let px = match r % 4 {
            0 => 0xFF00_0000 | (r & 0xFF_FFFF),
            1 => 0x8040_2010,
            2 => 0,
            _ => r,
        };
        for k in 0..len {
            // opaque runs vary in color, constant runs don't
            out.push(if r % 4 == 0 { px ^ (k as u32) } else { px });
        }
        out.push(xorshift(&mut s));
    }
    out.truncate(n);
    out
}

// --- Reference (no run detection) implementations for comparison ---

fn ref_premultiply(px: &[u32]) -> Vec<u32> {
    px.iter().map(|&p| premultiply_pixel::<Argb32>(p)).collect()
}

fn ref_unpremultiply(px: &[u32]) -> Vec<u32> {
    px.iter().map(|&p| unpremultiply_pixel::<Argb32, false>(p)).collect()
}

/// Bit-exact rendering of the channel math with divisions instead of tables.
fn ref_unpremultiply_division(p: u32) -> u32 {
    let a = p >> 24;
    let ch = |shift: u32| {
        let c = (p >> shift) & 0xFF;
        if a == 0 {
            0
        } else {
            // ceil(255 * 65536 / a) * c >> 16
            let recip = (255u64 * 65536).div_ceil(a as u64);
            (((c as u64 * recip) >> 16).min(255) as u32) << shift
        }
    };
    (a << 24) | ch(16) | ch(8) | ch(0)
}

// Small (pair/tail edge cases), medium, large
const TEST_PIXEL_COUNTS: &[usize] = &[0, 1, 2, 3, 4, 5, 7, 8, 15, 16, 31, 33, 64, 100, 257];

// -----------------------------------------------------------------------
// Run-detecting rows match the per-pixel reference
// -----------------------------------------------------------------------

#[test]
fn premultiply_matches_reference() {
    for &n in TEST_PIXEL_COUNTS {
        for seed in [1u32, 7, 0xBEEF] {
            for px in [runny(seed, n), premultiplied_argb(seed, n)] {
                let src = to_bytes(&px);
                let mut dst = vec![0u8; src.len()];
                premultiply(&src, &mut dst).unwrap();
                assert_eq!(from_bytes(&dst), ref_premultiply(&px), "n={n} seed={seed}");
            }
        }
    }
}

#[test]
fn unpremultiply_matches_reference() {
    for &n in TEST_PIXEL_COUNTS {
        for seed in [1u32, 7, 0xBEEF] {
            for px in [runny(seed, n), premultiplied_argb(seed, n)] {
                let src = to_bytes(&px);
                let mut dst = vec![0u8; src.len()];
                unpremultiply(&src, &mut dst).unwrap();
                assert_eq!(from_bytes(&dst), ref_unpremultiply(&px), "n={n} seed={seed}");
            }
        }
    }
}

#[test]
fn unpremultiply_table_matches_division() {
    let px = premultiplied_argb(42, 4096);
    let mut buf = to_bytes(&px);
    unpremultiply_inplace(&mut buf).unwrap();
    for (got, &p) in from_bytes(&buf).iter().zip(&px) {
        assert_eq!(*got, ref_unpremultiply_division(p), "px={p:#010x}");
    }
}

#[test]
fn identical_rows_of_every_length() {
    for n in 0..40 {
        for p in [0x8040_2010u32, 0xFF11_2233, 0x0012_3456, 0x01FF_FFFF, 0xFE01_0203] {
            let px = vec![p; n];
            let src = to_bytes(&px);

            let mut dst = vec![0u8; src.len()];
            premultiply(&src, &mut dst).unwrap();
            assert_eq!(from_bytes(&dst), ref_premultiply(&px), "premultiply n={n} p={p:#x}");

            unpremultiply(&src, &mut dst).unwrap();
            assert_eq!(from_bytes(&dst), ref_unpremultiply(&px), "unpremultiply n={n} p={p:#x}");
        }
    }
}

/// Move alpha from bit 24 to `L`'s offset. Color channels follow it, since
/// every layout derives them by the same rotation.
fn to_layout<L: PixelLayout>(px: &[u32]) -> Vec<u32> {
    px.iter().map(|p| p.rotate_right(24 - L::ALPHA_SHIFT)).collect()
}

fn check_layout_rows<L: PixelLayout>() {
    let codec = Codec::<L>::new();
    for &n in TEST_PIXEL_COUNTS {
        for seed in [1u32, 7, 0xBEEF] {
            let mut rows = vec![runny(seed, n), premultiplied_argb(seed, n)];
            rows.extend([0x8040_2010u32, 0xFF11_2233].map(|p| vec![p; n]));
            for px in rows {
                let px = to_layout::<L>(&px);
                let mut out = vec![0u32; n];

                codec.premultiply_pixels(&px, &mut out).unwrap();
                let want: Vec<u32> = px.iter().map(|&p| premultiply_pixel::<L>(p)).collect();
                assert_eq!(out, want, "premultiply shift={} n={n}", L::ALPHA_SHIFT);

                codec.unpremultiply_pixels(&px, &mut out).unwrap();
                let want: Vec<u32> = px
                    .iter()
                    .map(|&p| unpremultiply_pixel::<L, false>(p))
                    .collect();
                assert_eq!(out, want, "unpremultiply shift={} n={n}", L::ALPHA_SHIFT);

                let mut inplace = px.clone();
                codec.unpremultiply_pixels_inplace(&mut inplace);
                assert_eq!(inplace, out, "inplace shift={} n={n}", L::ALPHA_SHIFT);
            }
        }
    }
}

#[test]
fn run_detection_at_every_alpha_position() {
    check_layout_rows::<Rgba32>();
    check_layout_rows::<AlphaShift<8>>();
    check_layout_rows::<AlphaShift<16>>();
    check_layout_rows::<Argb32>();
}

#[test]
fn opaque_run_copies_verbatim_at_alpha_zero_shift() {
    // alpha in the low byte: opaque pixels pass through untouched, the
    // translucent one that ends the run is converted
    let px = [0x1122_33FF, 0x4455_66FF, 0x7788_99FF, 0xFFFF_FF80, 0x0102_03FF];
    let mut out = [0u32; 5];
    Codec::<Rgba32>::new().premultiply_pixels(&px, &mut out).unwrap();
    assert_eq!(out, [0x1122_33FF, 0x4455_66FF, 0x7788_99FF, 0x8080_8080, 0x0102_03FF]);
}

// -----------------------------------------------------------------------
// Properties
// -----------------------------------------------------------------------

#[test]
fn round_trip_within_alpha_quantization() {
    for a in 1u32..256 {
        for c in 0u32..256 {
            let straight = (a << 24) | (c << 16) | (c << 8) | (255 - c);
            let mut buf = to_bytes(&[straight]);
            premultiply_inplace(&mut buf).unwrap();
            unpremultiply_inplace(&mut buf).unwrap();
            let back = from_bytes(&buf)[0];
            assert_eq!(back >> 24, a, "alpha changed");
            for shift in [0, 8, 16] {
                let (x, y) = ((straight >> shift) & 0xFF, (back >> shift) & 0xFF);
                // Premultiplying at alpha a keeps only a + 1 color levels,
                // so the way back can be off by up to ceil(255 / a).
                if a == 255 {
                    assert_eq!(x, y);
                } else {
                    let step = 255u32.div_ceil(a);
                    assert!(x.abs_diff(y) <= step, "c={x} a={a} back={y}");
                }
            }
        }
    }
}

#[test]
fn round_trip_exact_for_representable_colors() {
    // Colors that are already premultiplied-representable survive exactly
    // up to the reciprocal rounding: one level at most.
    for a in 1u32..256 {
        for pc in 0..=a {
            let premultiplied = (a << 24) | (pc << 16) | (pc << 8) | pc;
            let mut buf = to_bytes(&[premultiplied]);
            unpremultiply_inplace(&mut buf).unwrap();
            premultiply_inplace(&mut buf).unwrap();
            let back = from_bytes(&buf)[0];
            assert_eq!(back >> 24, a);
            assert!((back & 0xFF).abs_diff(pc) <= 1, "pc={pc} a={a}");
        }
    }
}

#[test]
fn opaque_is_identity() {
    let px: Vec<u32> = (0..300u32)
        .map(|i| 0xFF00_0000 | i.wrapping_mul(0x9E37_79B9) >> 8)
        .collect();
    let src = to_bytes(&px);
    let mut dst = vec![0u8; src.len()];
    premultiply(&src, &mut dst).unwrap();
    assert_eq!(dst, src);
    unpremultiply(&src, &mut dst).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn transparent_is_zeroed() {
    let px: Vec<u32> = (0..50u32).map(|i| i.wrapping_mul(0x0101_0101) & 0x00FF_FFFF).collect();
    let mut buf = to_bytes(&px);
    unpremultiply_inplace(&mut buf).unwrap();
    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn inplace_matches_copy() {
    for &n in TEST_PIXEL_COUNTS {
        let px = runny(n as u32 + 3, n);
        let src = to_bytes(&px);

        let mut copy = vec![0u8; src.len()];
        unpremultiply(&src, &mut copy).unwrap();
        let mut inplace = src.clone();
        unpremultiply_inplace(&mut inplace).unwrap();
        assert_eq!(copy, inplace, "unpremultiply n={n}");

        premultiply(&src, &mut copy).unwrap();
        let mut inplace = src.clone();
        premultiply_inplace(&mut inplace).unwrap();
        assert_eq!(copy, inplace, "premultiply n={n}");
    }
}

#[test]
fn unpremultiply_scenario() {
    let px = [0xFF80_4020, 0xFF80_4020, 0xFF80_4020, 0x8040_2010];
    let src = to_bytes(&px);
    let mut dst = vec![0u8; 16];
    blit_and_unpremultiply(&mut dst, 16, &src, 16, 4, 1).unwrap();
    let out = from_bytes(&dst);
    assert_eq!(out[..3], px[..3]);
    // alpha 0x80: channels roughly double
    assert_eq!(out[3], 0x807F_3F1F);
}

// -----------------------------------------------------------------------
// Strided
// -----------------------------------------------------------------------

#[test]
fn strided_unpremultiply_skips_padding() {
    // 10 pixels wide, stride 48 bytes (12 pixels × 4bpp), 4 rows
    let w = 10;
    let h = 4;
    let src_stride = 48;
    let dst_stride = 44;
    let px = premultiplied_argb(9, 12 * h);
    let src = to_bytes(&px);
    let mut dst = vec![0xCCu8; dst_stride * h];
    blit_and_unpremultiply(&mut dst, dst_stride, &src, src_stride, w as i32, h as i32).unwrap();
    for y in 0..h {
        let want = ref_unpremultiply(&px[y * 12..][..w]);
        assert_eq!(from_bytes(&dst[y * dst_stride..][..w * 4]), want, "row {y}");
        // Padding untouched
        for i in (w * 4)..dst_stride {
            assert_eq!(dst[y * dst_stride + i], 0xCC, "padding corrupted y={y} i={i}");
        }
    }
}

#[test]
fn strided_premultiply_inplace_skips_padding() {
    let w = 5;
    let h = 3;
    let stride = w * 4 + 12;
    let mut buf = vec![0x77u8; stride * h];
    for y in 0..h {
        for x in 0..w {
            let px = ((x as u32 * 50) << 24) | 0x00FF_8040;
            buf[y * stride + x * 4..][..4].copy_from_slice(&px.to_ne_bytes());
        }
    }
    let orig = buf.clone();
    premultiply_inplace_strided(&mut buf, stride, w as i32, h as i32).unwrap();
    for y in 0..h {
        let row = &orig[y * stride..][..w * 4];
        assert_eq!(
            from_bytes(&buf[y * stride..][..w * 4]),
            ref_premultiply(&from_bytes(row))
        );
        assert_eq!(buf[y * stride + w * 4..][..12], [0x77u8; 12]);
    }

    unpremultiply_inplace_strided(&mut buf, stride, w as i32, h as i32).unwrap();
    assert_eq!(buf[stride - 12..stride], [0x77u8; 12]);
}

#[test]
fn zero_and_negative_dimensions_are_noops() {
    let src = to_bytes(&[0x8040_2010; 8]);
    let orig = vec![0x5Au8; 32];
    for (w, h) in [(0, 2), (2, 0), (-1, 2), (2, -7), (0, 0), (i32::MIN, i32::MIN)] {
        let mut dst = orig.clone();
        blit_and_unpremultiply(&mut dst, 16, &src, 16, w, h).unwrap();
        assert_eq!(dst, orig);
        blit_and_premultiply(&mut dst, 16, &src, 16, w, h).unwrap();
        assert_eq!(dst, orig);
        premultiply_inplace_strided(&mut dst, 16, w, h).unwrap();
        unpremultiply_inplace_strided(&mut dst, 16, w, h).unwrap();
        assert_eq!(dst, orig);
    }
    // Nothing is validated when there is nothing to convert.
    blit_and_premultiply(&mut [], 0, &[], 0, 0, 100).unwrap();
    premultiply(&[], &mut []).unwrap();
    unpremultiply_inplace(&mut []).unwrap();
}

// -----------------------------------------------------------------------
// Size validation
// -----------------------------------------------------------------------

#[test]
fn test_size_errors() {
    assert_eq!(premultiply_inplace(&mut [0; 5]), Err(SizeError::NotPixelAligned));
    assert_eq!(unpremultiply(&[0; 6], &mut [0; 8]), Err(SizeError::NotPixelAligned));
    assert_eq!(unpremultiply(&[0; 8], &mut [0; 4]), Err(SizeError::PixelCountMismatch));
}

#[test]
fn test_strided_size_errors() {
    // stride < width * 4
    assert_eq!(
        blit_and_premultiply(&mut [0; 32], 4, &[0; 32], 8, 2, 2),
        Err(SizeError::InvalidStride)
    );
    // source too small
    assert_eq!(
        blit_and_premultiply(&mut [0; 32], 16, &[0; 20], 16, 2, 2),
        Err(SizeError::BufferTooSmall)
    );
    // destination too small
    assert_eq!(
        unpremultiply_inplace_strided(&mut [0; 10], 8, 2, 2),
        Err(SizeError::BufferTooSmall)
    );
    // last row only needs width * 4 bytes, not a full stride
    assert_eq!(blit_and_premultiply(&mut [0; 24], 16, &[0; 24], 16, 2, 2), Ok(()));
}

#[test]
fn view_dimension_mismatch() {
    let src = [0u8; 16];
    let mut dst = [0u8; 16];
    let s = PixelView::packed(&src, 2, 2).unwrap();
    let mut d = PixelViewMut::packed(&mut dst, 4, 1).unwrap();
    assert_eq!(
        DEFAULT.premultiply_view(&s, &mut d),
        Err(SizeError::PixelCountMismatch)
    );
}

// -----------------------------------------------------------------------
// Layouts and policy
// -----------------------------------------------------------------------

#[test]
fn layouts_agree_on_the_same_channels() {
    // The same logical pixel in three layouts: a=0x80 r=0xFF g=0x80 b=0x00.
    let argb = 0x80FF_8000u32;
    let rgba = 0xFF80_0080u32;
    let a8 = 0x8000_80FFu32; // alpha at bit 8: r at 0, g at 24, b at 16

    let mut p = [argb];
    Codec::<Argb32>::new().premultiply_pixels_inplace(&mut p);
    assert_eq!(p, [0x8080_4000]);

    let mut p = [rgba];
    Codec::<Rgba32>::new().premultiply_pixels_inplace(&mut p);
    assert_eq!(p, [0x8040_0080]);

    let mut p = [a8];
    Codec::<AlphaShift<8>>::new().premultiply_pixels_inplace(&mut p);
    assert_eq!(p, [0x4000_8080]);
}

#[test]
fn alpha_last_bytes() {
    let codec = Codec::<AlphaLast>::new();
    let mut rgba = [255u8, 128, 0, 128, 10, 20, 30, 255, 99, 99, 99, 0];
    codec.premultiply_inplace(&mut rgba).unwrap();
    assert_eq!(rgba, [128, 64, 0, 128, 10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn superluminant_policy() {
    // r = 0x90 exceeds alpha 0x40; g is legal
    let px = [0x4090_2000u32];
    let mut out = [0u32];

    let unchecked = Codec::<Argb32>::new();
    assert_eq!(unchecked.superluminant(), Superluminant::Unchecked);
    unchecked.unpremultiply_pixels(&px, &mut out).unwrap();
    assert_eq!(out, [0x40FF_7F00]);

    let clamp = Codec::<Argb32>::new().with_superluminant(Superluminant::Clamp);
    clamp.unpremultiply_pixels(&px, &mut out).unwrap();
    assert_eq!(out, [0x40FF_7F00]);

    // Channels above alpha saturate either way, so the policies agree on
    // every input.
    let px: Vec<u32> = (0..256u32).map(|a| (a << 24) | 0x00FF_8001).collect();
    let mut a = vec![0u32; px.len()];
    let mut b = vec![0u32; px.len()];
    unchecked.unpremultiply_pixels(&px, &mut a).unwrap();
    clamp.unpremultiply_pixels(&px, &mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn pixels_count_mismatch() {
    let src = [0u32; 4];
    let mut dst = [0u32; 3];
    assert_eq!(
        DEFAULT.premultiply_pixels(&src, &mut dst),
        Err(SizeError::PixelCountMismatch)
    );
}

// -----------------------------------------------------------------------
// Rectangle lists
// -----------------------------------------------------------------------

#[test]
fn rects_are_clipped_to_both_views() {
    // src 6×4, dst 4×6: common area 4×4
    let src_px: Vec<u32> = (0..24).map(|i| 0x8000_0000 | (i * 3)).collect();
    let src_bytes = to_bytes(&src_px);
    let mut dst_bytes = vec![0u8; 24 * 4];
    let src = PixelView::packed(&src_bytes, 6, 4).unwrap();
    let mut dst = PixelViewMut::packed(&mut dst_bytes, 4, 6).unwrap();

    let rects = [
        Rect::new(-1, -1, 2, 2), // → (0,0) 1×1
        Rect::new(3, 3, 10, 10), // → (3,3) 1×1
        Rect::new(4, 0, 2, 4),   // outside the common width
        Rect::new(1, 1, 0, 2),   // empty
    ];
    assert_eq!(DEFAULT.unpremultiply_rects(&src, &mut dst, &rects), 2);

    let out = from_bytes(&dst_bytes);
    for y in 0..6 {
        for x in 0..4 {
            let got = out[y * 4 + x];
            if (x, y) == (0, 0) || (x, y) == (3, 3) {
                let want = unpremultiply_pixel::<Argb32, false>(src_px[y * 6 + x]);
                assert_eq!(got, want, "x={x} y={y}");
            } else {
                assert_eq!(got, 0, "x={x} y={y} touched");
            }
        }
    }
}

#[test]
fn full_rect_converts_everything() {
    let px = premultiplied_argb(5, 12);
    let src_bytes = to_bytes(&px);
    let mut dst_bytes = vec![0u8; 48];
    let src = PixelView::packed(&src_bytes, 4, 3).unwrap();
    let mut dst = PixelViewMut::packed(&mut dst_bytes, 4, 3).unwrap();
    assert_eq!(DEFAULT.unpremultiply_rects(&src, &mut dst, &[Rect::full()]), 1);
    assert_eq!(from_bytes(&dst_bytes), ref_unpremultiply(&px));

    let straight = from_bytes(&dst_bytes);
    let src_bytes = to_bytes(&straight);
    let mut back = vec![0u8; 48];
    let src = PixelView::packed(&src_bytes, 4, 3).unwrap();
    let mut dst = PixelViewMut::packed(&mut back, 4, 3).unwrap();
    assert_eq!(DEFAULT.premultiply_rects(&src, &mut dst, &[Rect::full()]), 1);
    assert_eq!(from_bytes(&back), ref_premultiply(&straight));
}
