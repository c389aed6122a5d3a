//! Root finding: closed forms up to degree two, Newton iteration in the
//! complex plane with deflation above.

use ct_core::{Real, EPS};
use num_complex::Complex64;
use tracing::{trace, warn};

use crate::error::{PolyError, PolyResult};
use crate::polynomial::Polynomial;
use crate::roots::Roots;

/// Iteration cap for a single Newton search.
pub const MAX_NEWTON_ITERATIONS: usize = 1000;

/// Residual |p(z)| a Newton candidate must reach on the normalised polynomial.
pub const RESIDUAL_TOL: Real = 1e-9;

/// Imaginary parts below this are treated as noise on a real root.
const IMAG_NOISE: Real = 1e-7;

impl Polynomial {
    /// All roots of the polynomial in factored form.
    ///
    /// Complex roots are reported once, with positive imaginary part.
    pub fn roots(&self) -> PolyResult<Roots> {
        let c = self.coefficients();
        let Some(&lead) = c.last() else {
            return Err(PolyError::NoCoefficients);
        };
        if lead.abs() < EPS {
            return Err(PolyError::NotCanonical);
        }

        let mut found: Vec<Complex64> = Vec::new();
        let mut p = self.clone();
        loop {
            let c = p.coefficients();
            if c.len() > 1 && c[0].abs() < EPS {
                found.push(Complex64::new(0.0, 0.0));
                p = Polynomial::new(c[1..].to_vec());
                continue;
            }

            let closed = match c {
                &[a] => Roots::with_factor(a, Vec::new()),
                &[b, a] => Roots::with_factor(a, vec![Complex64::new(-b / a, 0.0)]),
                &[c0, b, a] => quadratic(a, b, c0),
                _ => {
                    let z = find_root_newton(&p)?;
                    let (quot, _) = p.div(&Polynomial::from_root(z))?;
                    found.push(z);
                    p = quot;
                    continue;
                }
            };
            return Ok(closed.mul(&Roots::new(found)));
        }
    }
}

fn quadratic(a: Real, b: Real, c: Real) -> Roots {
    let d = b * b - 4.0 * a * c;
    if d < 0.0 {
        let im = ((-d).sqrt() / (2.0 * a)).abs();
        Roots::with_factor(a, vec![Complex64::new(-b / (2.0 * a), im)])
    } else {
        let sd = d.sqrt();
        Roots::with_factor(
            a,
            vec![
                Complex64::new((-b + sd) / (2.0 * a), 0.0),
                Complex64::new((-b - sd) / (2.0 * a), 0.0),
            ],
        )
    }
}

fn clean_up(z: Complex64) -> Complex64 {
    let im = z.im.abs();
    if im < IMAG_NOISE {
        Complex64::new(z.re, 0.0)
    } else {
        Complex64::new(z.re, im)
    }
}

/// Newton search for one root of `p`, started at 1+i.
fn find_root_newton(p: &Polynomial) -> PolyResult<Complex64> {
    let search = p.normalize();
    let deriv = search.derivative();
    let mut last = Complex64::new(0.0, 0.0);
    let mut z = Complex64::new(1.0, 1.0);
    let mut f = Complex64::new(0.0, 0.0);
    for i in 0..MAX_NEWTON_ITERATIONS {
        f = search.eval_complex(z);
        if (z - last).norm() < EPS && f.norm() < RESIDUAL_TOL {
            trace!(iterations = i, re = z.re, im = z.im, "newton converged");
            return Ok(clean_up(z));
        }
        last = z;
        z -= f / deriv.eval_complex(z);
    }

    // Multiple roots converge slowly; accept a small residual.
    if f.norm() < RESIDUAL_TOL {
        return Ok(clean_up(z));
    }

    let z = clean_up(z);
    let fz = p.eval_complex(z);
    warn!(poly = %p, re = z.re, im = z.im, "newton did not converge");
    Err(PolyError::NoConvergence {
        poly: p.to_string(),
        z: z.to_string(),
        f: fz.to_string(),
    })
}
