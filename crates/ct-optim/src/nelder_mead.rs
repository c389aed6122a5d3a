//! Downhill simplex minimiser.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OptimError, OptimResult};

/// Nelder–Mead coefficients and stopping criteria.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadConfig {
    /// Reflection
    pub alpha: f64,
    /// Expansion
    pub gamma: f64,
    /// Contraction
    pub beta: f64,
    /// Shrink
    pub sigma: f64,
    pub max_iterations: usize,
    /// Relative simplex size at which the search stops
    pub tolerance: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            gamma: 2.0,
            beta: 0.5,
            sigma: 0.5,
            max_iterations: 1000,
            tolerance: 1e-13,
        }
    }
}

/// Best vertex found.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimum {
    pub x: DVector<f64>,
    pub value: f64,
    /// Simplex updates performed
    pub iterations: usize,
}

#[derive(Clone, Debug)]
struct Vertex {
    x: DVector<f64>,
    value: f64,
}

/// Minimise `f` with the default coefficients and the given iteration cap.
pub fn minimize<F, E>(f: F, initial: Vec<DVector<f64>>, max_iterations: usize) -> OptimResult<Minimum, E>
where
    F: FnMut(&DVector<f64>) -> Result<f64, E>,
{
    let config = NelderMeadConfig {
        max_iterations,
        ..NelderMeadConfig::default()
    };
    nelder_mead(f, initial, &config)
}

/// Minimise `f` starting from the `n+1` vertices in `initial`.
///
/// Any error returned by `f` aborts the search and is passed through as
/// [`OptimError::Objective`].
pub fn nelder_mead<F, E>(
    mut f: F,
    initial: Vec<DVector<f64>>,
    config: &NelderMeadConfig,
) -> OptimResult<Minimum, E>
where
    F: FnMut(&DVector<f64>) -> Result<f64, E>,
{
    if initial.len() < 2 {
        return Err(OptimError::InvalidArg {
            what: "simplex needs at least two vertices",
        });
    }
    let n = initial.len() - 1;
    if initial.iter().any(|x| x.len() != n) {
        return Err(OptimError::InvalidArg {
            what: "simplex vertices must have one dimension less than the vertex count",
        });
    }

    let mut eval = |x: DVector<f64>| -> OptimResult<Vertex, E> {
        let value = f(&x).map_err(OptimError::Objective)?;
        Ok(Vertex { x, value })
    };
    let mut s = Vec::with_capacity(initial.len());
    for x in initial {
        s.push(eval(x)?);
    }

    // ofs + (a - b)·m
    let mut operate = |ofs: &DVector<f64>, a: &DVector<f64>, b: &DVector<f64>, m: f64| {
        eval(ofs + (a - b) * m)
    };

    let mut iterations = 0;
    loop {
        if iterations >= config.max_iterations {
            debug!(iterations, "nelder-mead gave up");
            return Err(OptimError::MaxIterations);
        }

        if size(&s) < config.tolerance {
            let best = s
                .into_iter()
                .min_by(|a, b| a.value.total_cmp(&b.value))
                .ok_or(OptimError::InvalidArg { what: "empty simplex" })?;
            debug!(iterations, value = best.value, "nelder-mead converged");
            return Ok(Minimum {
                x: best.x,
                value: best.value,
                iterations,
            });
        }
        iterations += 1;

        s.sort_by(|a, b| a.value.total_cmp(&b.value));
        let mid = s[..n].iter().fold(DVector::zeros(n), |acc, v| acc + &v.x) / n as f64;

        let sr = operate(&mid, &mid, &s[n].x, config.alpha)?;
        if sr.value < s[0].value {
            let xe = operate(&sr.x, &sr.x, &mid, config.gamma)?;
            s[n] = if xe.value < sr.value { xe } else { sr };
        } else if sr.value < s[n - 1].value {
            s[n] = sr;
        } else {
            let h = if sr.value < s[n].value { sr.x } else { s[n].x.clone() };
            let sc = operate(&h, &mid, &h, config.beta)?;
            if sc.value < s[n].value {
                s[n] = sc;
            } else {
                for i in 1..=n {
                    let shrunk = operate(&s[i].x, &s[0].x, &s[i].x, config.sigma)?;
                    s[i] = shrunk;
                }
            }
        }
    }
}

/// Largest per-axis spread relative to the axis maximum.
fn size(s: &[Vertex]) -> f64 {
    let dims = s.len() - 1;
    let mut delta = 0.0;
    for axis in 0..dims {
        let (min, max) = s.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.x[axis]), hi.max(v.x[axis]))
        });
        let d = (max - min) / max;
        // NaN (all zero) and negative spreads are ignored
        if d > delta {
            delta = d;
        }
    }
    delta
}

/// Start simplex around `centre`.
///
/// Vertex `0` is the centre, vertex `i` moves coordinate `i-1` by its delta.
/// A missing or zero delta becomes 10 % of the coordinate, or `0.1` if the
/// coordinate itself is zero.
pub fn simplex_around(centre: &DVector<f64>, delta: Option<&DVector<f64>>) -> Vec<DVector<f64>> {
    let n = centre.len();
    let del = DVector::from_fn(n, |i, _| {
        let d = delta.and_then(|d| d.get(i).copied()).unwrap_or(0.0);
        if d != 0.0 {
            d
        } else if centre[i] == 0.0 {
            0.1
        } else {
            centre[i] * 0.1
        }
    });

    let mut out = Vec::with_capacity(n + 1);
    out.push(centre.clone());
    for i in 0..n {
        let mut v = centre.clone();
        v[i] += del[i];
        out.push(v);
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn finds_minimum_of_shifted_paraboloid(a in 1.0..5.0_f64, b in 1.0..5.0_f64) {
            let f = |x: &DVector<f64>| -> Result<f64, String> {
                Ok((x[0] - a).powi(2) + 2.0 * (x[1] - b).powi(2))
            };
            let start = DVector::from_column_slice(&[a + 2.0, b + 2.0]);
            let min = nelder_mead(f, simplex_around(&start, None), &NelderMeadConfig::default()).unwrap();
            prop_assert!((min.x[0] - a).abs() < 1e-6, "{}", min.x);
            prop_assert!((min.x[1] - b).abs() < 1e-6, "{}", min.x);
            prop_assert!(min.value < 1e-10);
        }
    }
}
