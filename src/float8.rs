use core::cmp::Ordering;
use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub,
    SubAssign,
};

use bytemuck::{Pod, Zeroable};

use crate::{Error, Float8Class, Result};

/// An 8-bit floating point value in the E4M3FN layout.
///
/// ```text
///  7   6     3 2    0
/// [s | e e e e | m m m]   bias 7, no infinities, NaN = s.1111.111
/// ```
///
/// The wrapped byte is the storage representation and is never validated:
/// any of the 256 patterns may be wrapped and all of them decode.
/// Equality and ordering are numeric (through `f32`), so `+0 == -0` and NaN
/// is unequal to itself. Compare `to_bits()` for bitwise identity.
#[derive(Clone, Copy, Default, Zeroable, Pod)]
#[repr(transparent)]
pub struct Float8E4M3(u8);

const _: () = assert!(
    core::mem::size_of::<Float8E4M3>() == 1
        && core::mem::align_of::<Float8E4M3>() == 1
);

const SIGN_MASK: u8 = 0x80;
const MAGNITUDE_MASK: u8 = 0x7F;
const MANTISSA_MASK: u8 = 0x07;
const MANTISSA_BITS: u32 = 3;

// f32 field layout
const F32_MANTISSA_BITS: u32 = 23;
const F32_BIAS: u32 = 127;
const F32_EXP_INF: u32 = 0xFF;

// Biased f32 exponent of 2^-6, the smallest E4M3 normal.
const F32_EXP_MIN_NORMAL: u32 = F32_BIAS - 6;
// Biased f32 exponents below this round to zero (magnitude < 2^-10).
const F32_EXP_FLUSH: u32 = F32_BIAS - 10;
// Subtract from a biased f32 exponent to get the E4M3 exponent field.
const EXP_REBIAS: u32 = F32_BIAS - Float8E4M3::EXPONENT_BIAS as u32;

impl Float8E4M3 {
    // ──────────────────────────────── Constants ─────────────────────────────

    pub const RADIX: u32 = 2;
    /// Significand digits including the implicit leading bit.
    pub const MANTISSA_DIGITS: u32 = MANTISSA_BITS + 1;
    pub const EXPONENT_BIAS: i32 = 7;
    /// One greater than the minimum normal power of two, as for `f32::MIN_EXP`.
    pub const MIN_EXP: i32 = -5;
    /// One greater than the maximum finite power of two, as for `f32::MAX_EXP`.
    pub const MAX_EXP: i32 = 9;

    pub const ZERO: Self = Self(0x00);
    pub const NEG_ZERO: Self = Self(0x80);
    pub const ONE: Self = Self(0x38);
    pub const NEG_ONE: Self = Self(0xB8);

    /// Largest finite value, 448 (s=0, e=15, m=6).
    pub const MAX: Self = Self(0x7E);
    /// Smallest finite value, -448.
    pub const MIN: Self = Self(0xFE);
    /// Smallest positive normal, 2^-6.
    pub const MIN_POSITIVE: Self = Self(0x08);
    /// Smallest positive subnormal, 2^-9.
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x01);
    /// Difference between 1.0 and the next larger value, 2^-3.
    pub const EPSILON: Self = Self(0x20);

    pub const NAN: Self = Self(0x7F);
    pub const NEG_NAN: Self = Self(0xFF);

    // ───────────────────────────── Constructors ─────────────────────────────

    /// Wraps a raw bit pattern verbatim.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Converts from `f32`, rounding to nearest with ties to even.
    ///
    /// NaN and both infinities map to the NaN pattern carrying the sign of
    /// the input. Magnitudes that round above 448 also become NaN; magnitudes
    /// that round below 2^-9 become a zero of the input's sign.
    pub const fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        let sign = ((bits >> 24) as u8) & SIGN_MASK;
        let abs = bits & 0x7FFF_FFFF;
        let exp = abs >> F32_MANTISSA_BITS;

        if exp == F32_EXP_INF {
            return Self(sign | Self::NAN.0);
        }

        let magnitude = if exp < F32_EXP_FLUSH {
            0
        } else if exp < F32_EXP_MIN_NORMAL {
            // Subnormal grid: count multiples of 2^-9. The f32 value is
            // mant * 2^(exp - 150), so mant * 2^(exp - 141) units.
            let mant = (abs & 0x007F_FFFF) | 0x0080_0000;
            round_nearest_even(mant, F32_BIAS + F32_MANTISSA_BITS - 9 - exp)
        } else {
            // Exponent and mantissa are adjacent in both layouts, so a carry
            // out of the rounded mantissa bumps the exponent for free.
            let rebased = ((exp - EXP_REBIAS) << F32_MANTISSA_BITS)
                | (abs & 0x007F_FFFF);
            round_nearest_even(rebased, F32_MANTISSA_BITS - MANTISSA_BITS)
        };

        if magnitude > Self::MAX.0 as u32 {
            return Self(sign | Self::NAN.0);
        }
        Self(sign | magnitude as u8)
    }

    // ───────────────────────────── Accessors ────────────────────────────────

    /// Returns the raw bit pattern.
    #[inline]
    pub const fn to_bits(self) -> u8 {
        self.0
    }

    /// Decodes to `f32`. Exact for every pattern; NaN keeps its sign.
    pub const fn to_f32(self) -> f32 {
        let sign = ((self.0 & SIGN_MASK) as u32) << 24;
        let exp = self.exponent_field() as u32;
        let mant = self.mantissa_field() as u32;

        if self.is_nan() {
            return f32::from_bits(sign | 0x7FC0_0000);
        }
        if exp == 0 {
            if mant == 0 {
                return f32::from_bits(sign);
            }
            // mant * 2^-9 normalised: the leading one at bit k becomes the
            // implicit bit of an f32 with exponent k - 9.
            let k = 31 - mant.leading_zeros();
            let f32_exp = F32_BIAS + k - 9;
            let f32_mant = (mant ^ (1 << k)) << (F32_MANTISSA_BITS - k);
            return f32::from_bits(sign | (f32_exp << F32_MANTISSA_BITS) | f32_mant);
        }
        f32::from_bits(
            sign | ((exp + EXP_REBIAS) << F32_MANTISSA_BITS)
                | (mant << (F32_MANTISSA_BITS - MANTISSA_BITS)),
        )
    }

    /// Decodes to `f64`. Exact for every pattern.
    #[inline]
    pub fn to_f64(self) -> f64 {
        f64::from(self.to_f32())
    }

    /// The 4-bit biased exponent field.
    #[inline]
    pub const fn exponent_field(self) -> u8 {
        (self.0 >> MANTISSA_BITS) & 0x0F
    }

    /// The 3-bit mantissa field.
    #[inline]
    pub const fn mantissa_field(self) -> u8 {
        self.0 & MANTISSA_MASK
    }

    // ──────────────────────────── Classification ────────────────────────────

    /// Returns the class of the bit pattern.
    pub const fn classify(self) -> Float8Class {
        Float8Class::from_bits(self.0)
    }

    /// True for `0x7F` and `0xFF`.
    #[inline]
    pub const fn is_nan(self) -> bool {
        self.0 & MAGNITUDE_MASK == MAGNITUDE_MASK
    }

    /// True for every pattern except the two NaNs.
    #[inline]
    pub const fn is_finite(self) -> bool {
        !self.is_nan()
    }

    /// Always false: the format has no infinities.
    #[inline]
    pub const fn is_infinite(self) -> bool {
        false
    }

    /// True for exponent field 1..=15, excluding NaN.
    pub const fn is_normal(self) -> bool {
        matches!(self.classify(), Float8Class::Normal)
    }

    /// True for exponent field 0 with a nonzero mantissa.
    pub const fn is_subnormal(self) -> bool {
        matches!(self.classify(), Float8Class::Subnormal)
    }

    /// True for `+0` and `-0`.
    pub const fn is_zero(self) -> bool {
        self.0 & MAGNITUDE_MASK == 0
    }

    /// True if the sign bit is clear, including for `+0` and `NAN`.
    #[inline]
    pub const fn is_sign_positive(self) -> bool {
        self.0 & SIGN_MASK == 0
    }

    /// True if the sign bit is set, including for `-0` and `NEG_NAN`.
    #[inline]
    pub const fn is_sign_negative(self) -> bool {
        !self.is_sign_positive()
    }

    // ─────────────────────────────── Sign ops ───────────────────────────────

    /// Clears the sign bit.
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0 & MAGNITUDE_MASK)
    }

    /// Magnitude of `self` with the sign bit of `sign`.
    #[inline]
    pub const fn copysign(self, sign: Self) -> Self {
        Self((self.0 & MAGNITUDE_MASK) | (sign.0 & SIGN_MASK))
    }

    /// Larger of two values; a NaN operand is ignored as in `f32::max`.
    pub fn max(self, other: Self) -> Self {
        Self::from_f32(self.to_f32().max(other.to_f32()))
    }

    /// Smaller of two values; a NaN operand is ignored as in `f32::min`.
    pub fn min(self, other: Self) -> Self {
        Self::from_f32(self.to_f32().min(other.to_f32()))
    }

    // ─────────────────────────────── Rendering ──────────────────────────────

    /// Writes the decimal form of the decoded `f32` to a text sink.
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{}", self.to_f32())
    }

    /// Writes the decimal form of the decoded `f32` to a byte sink.
    pub fn write_io<W: std::io::Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}", self.to_f32())?;
        Ok(())
    }

    /// Returns the raw bit pattern as two lowercase hex digits.
    pub fn to_hex(self) -> String {
        hex::encode([self.0])
    }

    /// Parses a raw bit pattern from exactly two hex digits.
    pub fn from_hex(digits: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = hex::decode(digits)?;
        match bytes.as_slice() {
            [bits] => Ok(Self(*bits)),
            _ => Err(Error::InvalidLength(bytes.len())),
        }
    }
}

// ──────────────────────────── f32/f64 Conversions ───────────────────────────

impl From<f32> for Float8E4M3 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<Float8E4M3> for f32 {
    #[inline]
    fn from(value: Float8E4M3) -> Self {
        value.to_f32()
    }
}

impl From<Float8E4M3> for f64 {
    #[inline]
    fn from(value: Float8E4M3) -> Self {
        value.to_f64()
    }
}

// ──────────────────────────────── Formatting ────────────────────────────────

impl fmt::Display for Float8E4M3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

impl fmt::Debug for Float8E4M3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Float8E4M3({}, bits=0x{:02X})", self.to_f32(), self.0)
    }
}

// ──────────────────────────────── Comparison ────────────────────────────────

impl PartialEq for Float8E4M3 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.to_f32() == other.to_f32()
    }
}

impl PartialOrd for Float8E4M3 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_f32().partial_cmp(&other.to_f32())
    }
}

// ──────────────────────────────── Arithmetic ────────────────────────────────

impl Neg for Float8E4M3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(self.0 ^ SIGN_MASK)
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Float8E4M3 {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self::Output {
                Self::from_f32(self.to_f32() $op rhs.to_f32())
            }
        }

        impl $assign_trait for Float8E4M3 {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }
    };
}

binary_op!(Add, add, AddAssign, add_assign, +);
binary_op!(Sub, sub, SubAssign, sub_assign, -);
binary_op!(Mul, mul, MulAssign, mul_assign, *);
binary_op!(Div, div, DivAssign, div_assign, /);
binary_op!(Rem, rem, RemAssign, rem_assign, %);

/// Accumulates in `f32` and rounds once at the end.
impl Sum for Float8E4M3 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::from_f32(iter.map(Self::to_f32).sum())
    }
}

impl<'a> Sum<&'a Float8E4M3> for Float8E4M3 {
    fn sum<I: Iterator<Item = &'a Float8E4M3>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Accumulates in `f32` and rounds once at the end.
impl Product for Float8E4M3 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::from_f32(iter.map(Self::to_f32).product())
    }
}

impl<'a> Product<&'a Float8E4M3> for Float8E4M3 {
    fn product<I: Iterator<Item = &'a Float8E4M3>>(iter: I) -> Self {
        iter.copied().product()
    }
}

// ────────────────────────────────── Internals ───────────────────────────────

/// Drops the low `shift` bits of `value`, rounding to nearest, ties to even.
/// `shift` must be in `1..32`.
const fn round_nearest_even(value: u32, shift: u32) -> u32 {
    let kept = value >> shift;
    let rest = value & ((1 << shift) - 1);
    let half = 1 << (shift - 1);
    if rest > half || (rest == half && kept & 1 == 1) {
        kept + 1
    } else {
        kept
    }
}
