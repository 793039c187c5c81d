//! Fixed-point reciprocals of alpha.
//!
//! Unpremultiplying divides each color channel by alpha. The table turns
//! that division into a multiply and a shift: entry `a` holds
//! `255 * 2^16 / a` rounded up, so `c * RECIPROCALS[a] >> 16` never lands
//! below `c * 255 / a` and overshoots by less than one level.

/// Fractional bits of every table entry.
pub const RECIPROCAL_BITS: u32 = 16;

/// `ceil((255 << RECIPROCAL_BITS) / a)` for `a` in `1..=255`, and 0 at `a = 0`
/// so that fully transparent pixels come out black.
pub const RECIPROCALS: [u32; 256] = build();

const fn build() -> [u32; 256] {
    let mut table = [0u32; 256];
    let numerator: u32 = 255 << RECIPROCAL_BITS;
    let mut a: u32 = 1;
    while a < 256 {
        table[a as usize] = numerator.div_ceil(a);
        a += 1;
    }
    table
}
