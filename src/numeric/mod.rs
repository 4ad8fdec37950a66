// ============================================================================
// Numeric Module
// Exact decimal arithmetic for series evaluation
// ============================================================================
//
// This module provides:
// - ScaledDecimal: arbitrary-precision fixed-point decimal (BigInt + scale)
// - RoundingMode: explicit rounding for division and rescaling
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - No floating-point operations
// - Addition and subtraction are exact; only division and rescale round
// - Every fallible operation returns Result (no panics)

mod errors;
mod scaled_decimal;

pub use errors::{NumericError, NumericResult};
pub use scaled_decimal::{RoundingMode, ScaledDecimal};
