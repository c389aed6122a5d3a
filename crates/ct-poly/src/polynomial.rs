//! Dense univariate polynomials with real coefficients.
//!
//! Coefficients are stored constant term first: `[c0, c1, c2]` is
//! `c0 + c1·x + c2·x²`.

use core::fmt;

use ct_core::{format_g, is_zero, Real, EPS};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{PolyError, PolyResult};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial(Vec<Real>);

impl Polynomial {
    pub fn new(coefficients: Vec<Real>) -> Self {
        Self(coefficients)
    }

    /// The zero polynomial (no coefficients).
    pub fn zero() -> Self {
        Self(Vec::new())
    }

    pub fn one() -> Self {
        Self(vec![1.0])
    }

    /// The factor belonging to a single root: `x - r` for a real root, the
    /// real quadratic `x² - 2·Re(r)·x + |r|²` for a complex one.
    pub fn from_root(root: Complex64) -> Self {
        if root.im.abs() < EPS {
            Self(vec![-root.re, 1.0])
        } else {
            Self(vec![root.norm_sqr(), -2.0 * root.re, 1.0])
        }
    }

    pub fn coefficients(&self) -> &[Real] {
        &self.0
    }

    pub fn into_coefficients(self) -> Vec<Real> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coefficient of `x^i`, zero beyond the stored length.
    pub fn coefficient(&self, i: usize) -> Real {
        self.0.get(i).copied().unwrap_or(0.0)
    }

    /// Index of the last coefficient exceeding ε; -1 for the zero polynomial.
    pub fn degree(&self) -> isize {
        self.0
            .iter()
            .rposition(|c| c.abs() > EPS)
            .map_or(-1, |i| i as isize)
    }

    pub fn eval(&self, x: Real) -> Real {
        self.0.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn eval_complex(&self, z: Complex64) -> Complex64 {
        self.0
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c)
    }

    /// Trailing coefficients with magnitude ≤ ε removed.
    pub fn canonical(&self) -> Polynomial {
        let n = (self.degree() + 1) as usize;
        Self(self.0[..n].to_vec())
    }

    pub fn add(&self, q: &Polynomial) -> Polynomial {
        let (long, short) = if self.len() >= q.len() {
            (self, q)
        } else {
            (q, self)
        };
        let mut result = long.0.clone();
        for (r, c) in result.iter_mut().zip(&short.0) {
            *r += c;
        }
        Self(result)
    }

    pub fn add_scalar(&self, f: Real) -> Polynomial {
        let mut result = self.0.clone();
        match result.first_mut() {
            Some(c0) => *c0 += f,
            None => result.push(f),
        }
        Self(result)
    }

    pub fn mul(&self, q: &Polynomial) -> Polynomial {
        if self.is_empty() || q.is_empty() {
            return Self::zero();
        }
        let mut result = vec![0.0; self.len() + q.len() - 1];
        for (i, a) in self.0.iter().enumerate() {
            for (j, b) in q.0.iter().enumerate() {
                result[i + j] += a * b;
            }
        }
        Self(result)
    }

    pub fn mul_scalar(&self, f: Real) -> Polynomial {
        Self(self.0.iter().map(|c| c * f).collect())
    }

    /// Same polynomial divided by its leading coefficient.
    pub fn normalize(&self) -> Polynomial {
        let p = self.canonical();
        match p.0.last().copied() {
            Some(lead) => p.mul_scalar(1.0 / lead),
            None => p,
        }
    }

    pub fn derivative(&self) -> Polynomial {
        Self(
            self.0
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| i as Real * c)
                .collect(),
        )
    }

    /// Long division; returns `(quotient, remainder)` with a canonical
    /// remainder of degree below the divisor's.
    pub fn div(&self, q: &Polynomial) -> PolyResult<(Polynomial, Polynomial)> {
        let q = q.canonical();
        if q.is_empty() {
            return Err(PolyError::DivisionByZero);
        }
        if self.degree() < q.degree() {
            return Ok((Self::zero(), self.clone()));
        }

        let dq = q.len() - 1;
        let lead = q.0[dq];
        let mut rem = self.canonical().0;
        let mut quot = vec![0.0; rem.len() - dq];
        for i in (0..quot.len()).rev() {
            let c = rem[i + dq] / lead;
            quot[i] = c;
            for (j, qj) in q.0.iter().enumerate() {
                rem[i + j] -= c * qj;
            }
        }
        rem.truncate(dq);
        Ok((Self(quot), Self(rem).canonical()))
    }

    pub fn pow(&self, n: u32) -> Polynomial {
        (0..n).fold(Self::one(), |acc, _| acc.mul(self))
    }

    /// Same length and every coefficient within ε.
    pub fn equals(&self, q: &Polynomial) -> bool {
        self.len() == q.len() && self.0.iter().zip(&q.0).all(|(a, b)| (a - b).abs() <= EPS)
    }

    pub fn is_one(&self) -> bool {
        self.len() == 1 && (self.0[0] - 1.0).abs() < EPS
    }

    /// True if at least two terms are non-zero.
    pub fn is_sum(&self) -> bool {
        self.0.iter().filter(|c| c.abs() > EPS).count() > 1
    }
}

impl From<Vec<Real>> for Polynomial {
    fn from(coefficients: Vec<Real>) -> Self {
        Self(coefficients)
    }
}

fn superscript(n: usize) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    n.to_string()
        .bytes()
        .map(|b| DIGITS[(b - b'0') as usize])
        .collect()
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (n, &c) in self.0.iter().enumerate().rev() {
            if is_zero(c) {
                continue;
            }
            if c < 0.0 {
                f.write_str("-")?;
            } else if !first {
                f.write_str("+")?;
            }
            first = false;

            let c = c.abs();
            if c != 1.0 || n == 0 {
                f.write_str(&format_g(c))?;
            }
            match n {
                0 => {}
                1 => f.write_str("x")?,
                _ => write!(f, "x{}", superscript(n))?,
            }
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}
