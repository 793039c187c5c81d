//! In-memory layouts of 32-bit pixels.
//!
//! A pixel is a `u32` in native byte order holding four 8-bit channels. Only
//! the alpha position is free; red, green and blue follow it by fixed
//! rotation, so a layout is fully described by [`PixelLayout::ALPHA_SHIFT`].
//!
//! | layout          | alpha bit | red | green | blue |
//! |-----------------|-----------|-----|-------|------|
//! | [`Argb32`]      | 24        | 16  | 8     | 0    |
//! | [`Rgba32`]      | 0         | 24  | 16    | 8    |
//!
//! The color channels are treated identically by every transform in this
//! crate, so `RGBA` and `BGRA` byte orders share a layout: only where alpha
//! sits in memory matters. [`AlphaLast`] and [`AlphaFirst`] name that
//! position in bytes and resolve to the right bit offset for the target's
//! endianness.

/// Position of the four channels inside a native-endian `u32` pixel.
///
/// Implementors set `ALPHA_SHIFT` to 0, 8, 16 or 24. Anything else is
/// rejected at compile time the first time the layout is used.
pub trait PixelLayout {
    /// Bit offset of the alpha channel.
    const ALPHA_SHIFT: u32;

    /// Bit offset of the red channel.
    const RED_SHIFT: u32 = (Self::ALPHA_SHIFT + 24) % 32;
    /// Bit offset of the green channel.
    const GREEN_SHIFT: u32 = (Self::ALPHA_SHIFT + 16) % 32;
    /// Bit offset of the blue channel.
    const BLUE_SHIFT: u32 = (Self::ALPHA_SHIFT + 8) % 32;

    const ALPHA_MASK: u32 = 0xFF << Self::ALPHA_SHIFT;
    const RED_MASK: u32 = 0xFF << Self::RED_SHIFT;
    const GREEN_MASK: u32 = 0xFF << Self::GREEN_SHIFT;
    const BLUE_MASK: u32 = 0xFF << Self::BLUE_SHIFT;

    #[doc(hidden)]
    const VALID: () = assert!(
        Self::ALPHA_SHIFT % 8 == 0 && Self::ALPHA_SHIFT < 32,
        "alpha must sit on a byte boundary inside the pixel"
    );
}

/// Alpha in the top byte of the native word: cairo's `ARGB32`.
///
/// This is the layout used by the crate-root functions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb32;

impl PixelLayout for Argb32 {
    const ALPHA_SHIFT: u32 = 24;
}

/// Alpha in the bottom byte of the native word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba32;

impl PixelLayout for Rgba32 {
    const ALPHA_SHIFT: u32 = 0;
}

/// Alpha is the last byte in memory (`RGBA`, `BGRA`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AlphaLast;

impl PixelLayout for AlphaLast {
    const ALPHA_SHIFT: u32 = if cfg!(target_endian = "little") { 24 } else { 0 };
}

/// Alpha is the first byte in memory (`ARGB`, `ABGR`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AlphaFirst;

impl PixelLayout for AlphaFirst {
    const ALPHA_SHIFT: u32 = if cfg!(target_endian = "little") { 0 } else { 24 };
}

/// Alpha at an explicit bit offset.
///
/// ```rust
/// use premul::{AlphaShift, PixelLayout};
///
/// assert_eq!(<AlphaShift<8>>::RED_SHIFT, 0);
/// assert_eq!(<AlphaShift<8>>::BLUE_SHIFT, 16);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AlphaShift<const SHIFT: u32>;

impl<const SHIFT: u32> PixelLayout for AlphaShift<SHIFT> {
    const ALPHA_SHIFT: u32 = SHIFT;
}

/// Alpha level of `px`.
#[inline(always)]
pub(crate) fn alpha<L: PixelLayout>(px: u32) -> u32 {
    (px >> L::ALPHA_SHIFT) & 0xFF
}
