//! An 8-bit E4M3 Floating Point Type
//! Implements the "E4M3FN" layout: 1 sign bit, 4 exponent bits, 3 mantissa
//! bits, exponent bias 7.
//!
//! This crate defines `Float8E4M3`, a one-byte value type with bit-exact,
//! total conversion to and from `f32`. The format has no infinities; the two
//! all-ones patterns (`0x7F` and `0xFF`) are NaN, and every other pattern is a
//! finite number, with a largest magnitude of 448.
//!
//! Conversion from `f32` rounds to nearest, ties to even. Results too small
//! for the subnormal grid flush to a signed zero, and results above 448
//! become NaN of the matching sign.
//!
//! NOTE: Comparison and arithmetic are defined by widening both operands to
//! `f32` and re-encoding the result, so NaN and signed zero behave exactly as
//! they do for IEEE‑754 binary32.

mod float8;
pub use float8::*;
mod float8_class;
pub use float8_class::*;
mod cbor;
mod error;
pub use error::*;
