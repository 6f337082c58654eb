use serde::Serialize;

/// Numeric cells pass when `|a - e| <= abs_tol` or
/// `|a - e| <= rel_tol * max(|e|, relative_floor)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericTolerance {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub relative_floor: f64,
}

impl NumericTolerance {
    pub const EXACT: Self = Self {
        abs_tol: 0.0,
        rel_tol: 0.0,
        relative_floor: 1.0,
    };

    pub const fn absolute(abs_tol: f64) -> Self {
        Self {
            abs_tol,
            rel_tol: 0.0,
            relative_floor: 1.0,
        }
    }
}

impl Default for NumericTolerance {
    fn default() -> Self {
        Self::absolute(1e-4)
    }
}

pub fn values_within_tolerance(expected: f64, actual: f64, tolerance: NumericTolerance) -> bool {
    if !expected.is_finite() || !actual.is_finite() {
        return non_finite_values_match(expected, actual);
    }

    let abs_diff = (actual - expected).abs();
    let rel_denominator = expected.abs().max(tolerance.relative_floor);
    abs_diff <= tolerance.abs_tol || abs_diff <= tolerance.rel_tol * rel_denominator
}

fn non_finite_values_match(expected: f64, actual: f64) -> bool {
    if expected.is_nan() || actual.is_nan() {
        return expected.is_nan() && actual.is_nan();
    }

    expected.is_infinite() && actual.is_infinite() && expected.signum() == actual.signum()
}
