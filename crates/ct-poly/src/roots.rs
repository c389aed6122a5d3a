//! Factored polynomials: `factor · ∏(x - r)`.
//!
//! Roots coming from a real polynomial store one member of each complex
//! conjugate pair (the one with non-negative imaginary part); expanding a
//! complex root always yields the real quadratic of the pair.

use core::fmt;

use ct_core::{format_g, Point, Real, EPS, ROOT_EPS};
use num_complex::Complex64;

use crate::error::{PolyError, PolyResult};
use crate::polynomial::Polynomial;

#[derive(Clone, Debug, PartialEq)]
pub struct Roots {
    factor: Real,
    roots: Vec<Complex64>,
}

/// Two roots match if both components agree within [`ROOT_EPS`].
pub fn roots_match(a: Complex64, b: Complex64) -> bool {
    (a.re - b.re).abs() < ROOT_EPS && (a.im - b.im).abs() < ROOT_EPS
}

impl Roots {
    /// Roots with a leading factor of one.
    pub fn new(roots: Vec<Complex64>) -> Self {
        Self { factor: 1.0, roots }
    }

    pub fn with_factor(factor: Real, roots: Vec<Complex64>) -> Self {
        Self { factor, roots }
    }

    pub fn factor(&self) -> Real {
        self.factor
    }

    pub fn roots(&self) -> &[Complex64] {
        &self.roots
    }

    /// A zero factor marks an unusable value.
    pub fn is_valid(&self) -> bool {
        self.factor != 0.0
    }

    pub fn polynomial(&self) -> Polynomial {
        self.roots
            .iter()
            .fold(Polynomial::new(vec![self.factor]), |p, &r| {
                p.mul(&Polynomial::from_root(r))
            })
    }

    pub fn mul(&self, b: &Roots) -> Roots {
        let mut roots = self.roots.clone();
        roots.extend_from_slice(&b.roots);
        Roots {
            factor: self.factor * b.factor,
            roots,
        }
    }

    pub fn mul_scalar(&self, k: Real) -> Roots {
        Roots {
            factor: self.factor * k,
            roots: self.roots.clone(),
        }
    }

    /// Cancel matching zero/pole pairs, `self` being the zeros.
    ///
    /// Each zero removes the first matching pole in storage order. The flag
    /// reports whether anything was cancelled.
    pub fn reduce(&self, poles: &Roots) -> (Roots, Roots, bool) {
        let mut zeros = Roots::with_factor(self.factor, Vec::new());
        let mut remaining = poles.clone();
        let mut cancelled = false;
        for &z in &self.roots {
            match remaining.roots.iter().position(|&p| roots_match(z, p)) {
                Some(i) => {
                    remaining.roots.remove(i);
                    cancelled = true;
                }
                None => zeros.roots.push(z),
            }
        }
        (zeros, remaining, cancelled)
    }

    /// Append the root of `a·x + b`.
    pub fn append_real(mut self, a: Real, b: Real) -> PolyResult<Roots> {
        if a == 0.0 {
            return Err(PolyError::NotARealRoot);
        }
        self.roots.push(Complex64::new(-b / a, 0.0));
        self.factor *= a;
        Ok(self)
    }

    /// Append the roots of `a·x² + b·x + c`.
    pub fn append_quadratic(mut self, a: Real, b: Real, c: Real) -> PolyResult<Roots> {
        if a == 0.0 {
            return self.append_real(b, c);
        }
        let d = b * b - 4.0 * a * c;
        if d < 0.0 {
            let im = ((-d).sqrt() / (2.0 * a)).abs();
            self.roots.push(Complex64::new(-b / (2.0 * a), im));
        } else {
            let sd = d.sqrt();
            self.roots.push(Complex64::new((-b - sd) / (2.0 * a), 0.0));
            self.roots.push(Complex64::new((-b + sd) / (2.0 * a), 0.0));
        }
        self.factor *= a;
        Ok(self)
    }

    /// Algebraic degree: complex roots count twice.
    pub fn count(&self) -> usize {
        self.roots
            .iter()
            .map(|r| if r.im.abs() < EPS { 1 } else { 2 })
            .sum()
    }

    pub fn only_real(&self) -> Vec<Real> {
        self.roots
            .iter()
            .filter(|r| r.im.abs() < EPS)
            .map(|r| r.re)
            .collect()
    }

    /// Root locations in the complex plane, conjugates included.
    pub fn to_points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.count());
        for r in &self.roots {
            points.push(Point::new(r.re, r.im));
            if r.im.abs() > EPS {
                points.push(Point::new(r.re, -r.im));
            }
        }
        points
    }

    /// Factor within ε and the roots pairwise matching, in any order.
    pub fn equals(&self, b: &Roots) -> bool {
        if (self.factor - b.factor).abs() > EPS || self.roots.len() != b.roots.len() {
            return false;
        }
        let mut unused: Vec<Complex64> = b.roots.clone();
        self.roots.iter().all(|&r| {
            match unused.iter().position(|&u| roots_match(r, u)) {
                Some(i) => {
                    unused.swap_remove(i);
                    true
                }
                None => false,
            }
        })
    }
}

impl fmt::Display for Roots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit_factor = (1.0 - self.factor).abs() <= EPS;
        match (unit_factor, self.roots.as_slice()) {
            (true, []) => return f.write_str(&format_g(self.factor)),
            (true, [r]) if r.norm() >= EPS => return write!(f, "{}", Polynomial::from_root(*r)),
            _ => {}
        }

        let mut parts: Vec<String> = Vec::new();
        if !unit_factor {
            parts.push(format_g(self.factor));
        }
        for &r in &self.roots {
            if r.norm() < EPS {
                parts.push("x".to_string());
            } else {
                parts.push(format!("({})", Polynomial::from_root(r)));
            }
        }
        f.write_str(&parts.join("⋅"))
    }
}
