use core::num::FpCategory;

/// Classification of an E4M3FN bit pattern.
///
/// There is no infinite class: the format is finite-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Float8Class {
    /// Exponent and mantissa fields both zero (either sign).
    Zero,
    /// Exponent field zero, mantissa nonzero.
    Subnormal,
    /// Exponent field 1..=15, excluding the NaN mantissa at 15.
    Normal,
    /// `0x7F` or `0xFF`.
    Nan,
}

impl Float8Class {
    pub const fn from_bits(bits: u8) -> Self {
        match (bits & 0x7F, bits & 0x78) {
            (0x7F, _) => Self::Nan,
            (0x00, _) => Self::Zero,
            (_, 0x00) => Self::Subnormal,
            _ => Self::Normal,
        }
    }

    pub const fn is_finite(self) -> bool {
        !matches!(self, Self::Nan)
    }
}

impl From<Float8Class> for FpCategory {
    fn from(class: Float8Class) -> Self {
        match class {
            Float8Class::Zero => FpCategory::Zero,
            Float8Class::Subnormal => FpCategory::Subnormal,
            Float8Class::Normal => FpCategory::Normal,
            Float8Class::Nan => FpCategory::Nan,
        }
    }
}
