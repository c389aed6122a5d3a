use crate::CtError;

/// Floating point type used throughout the toolkit
pub type Real = f64;

/// Coefficient tolerance: polynomial canonicalisation, equality, pivots.
pub const EPS: Real = 1e-10;

/// Tolerance when matching roots against each other. Roots found by
/// Newton deflation are only accurate to about 1e-9.
pub const ROOT_EPS: Real = 1e-6;

/// True if `v` lies within [`EPS`] of zero.
pub fn is_zero(v: Real) -> bool {
    v.abs() <= EPS
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CtError::NonFinite { what, value: v })
    }
}

/// Shortest round-trip formatting in the style of C's `%g`.
///
/// Exponent notation is used below 1e-4 and from 1e6 upwards, with at
/// least two exponent digits (`2e-06`, `1.5e+07`).
pub fn format_g(v: Real) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if v == 0.0 {
        return format!("{v}");
    }

    let sci = format!("{v:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };
    if (-4..6).contains(&exp) {
        format!("{v}")
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn format_g_parses_back_exactly(v in any::<f64>()) {
            prop_assume!(v.is_finite());
            let text = format_g(v);
            prop_assert_eq!(text.parse::<f64>().unwrap(), v, "{}", text);
            if v != 0.0 {
                let plain = (1e-4..1e6).contains(&v.abs());
                prop_assert_eq!(text.contains('e'), !plain, "{}", text);
            }
        }
    }
}
