//! Rational transfer functions `N(s)/D(s)`.
//!
//! Zeros and poles are cached next to the polynomials. Operations take the
//! factored path when both operands already know the matching roots and fall
//! back to plain polynomial arithmetic otherwise, so Newton iteration only
//! runs when a caller actually asks for roots.

use core::fmt;
use std::sync::OnceLock;

use ct_core::{Real, EPS};
use num_complex::Complex64;

use crate::error::{PolyError, PolyResult};
use crate::polynomial::Polynomial;
use crate::roots::Roots;

/// Observable state of a [`RootsCache`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CacheState<'a> {
    NotComputed,
    Computed(&'a Roots),
    Failed(&'a PolyError),
}

/// Lazily computed roots of one side of a transfer function.
///
/// A failed computation is remembered as well and never retried.
#[derive(Clone, Debug, Default)]
pub struct RootsCache(OnceLock<PolyResult<Roots>>);

impl RootsCache {
    pub fn computed(roots: Roots) -> Self {
        Self(OnceLock::from(Ok(roots)))
    }

    pub fn state(&self) -> CacheState<'_> {
        match self.0.get() {
            None => CacheState::NotComputed,
            Some(Ok(r)) => CacheState::Computed(r),
            Some(Err(e)) => CacheState::Failed(e),
        }
    }

    fn known(&self) -> Option<&Roots> {
        match self.0.get() {
            Some(Ok(r)) => Some(r),
            _ => None,
        }
    }

    fn get_or_compute(&self, p: &Polynomial) -> &PolyResult<Roots> {
        self.0.get_or_init(|| p.roots())
    }
}

fn from_known(roots: Option<Roots>) -> RootsCache {
    roots.map(RootsCache::computed).unwrap_or_default()
}

/// Product of two cached root sets, if both are known.
fn known_product(a: &RootsCache, b: &RootsCache) -> Option<Roots> {
    Some(a.known()?.mul(b.known()?))
}

/// Move an integer ratio of the leading factors into the numerator.
fn reduce_factor(zeros: Roots, poles: Roots) -> (Roots, Roots) {
    let ratio = zeros.factor() / poles.factor();
    let rounded = ratio.round();
    if rounded != 0.0 && (ratio - rounded).abs() < EPS {
        (
            Roots::with_factor(rounded, zeros.roots().to_vec()),
            Roots::with_factor(1.0, poles.roots().to_vec()),
        )
    } else {
        (zeros, poles)
    }
}

#[derive(Clone, Debug)]
pub struct Linear {
    numerator: Polynomial,
    denominator: Polynomial,
    zeros: RootsCache,
    poles: RootsCache,
}

impl Linear {
    pub fn from_polynomials(numerator: Polynomial, denominator: Polynomial) -> Self {
        Self {
            numerator: numerator.canonical(),
            denominator: denominator.canonical(),
            zeros: RootsCache::default(),
            poles: RootsCache::default(),
        }
    }

    /// `c / 1`, with both caches filled.
    pub fn constant(c: Real) -> Self {
        let zeros = if c != 0.0 {
            RootsCache::computed(Roots::with_factor(c, Vec::new()))
        } else {
            RootsCache::default()
        };
        Self {
            numerator: Polynomial::new(vec![c]).canonical(),
            denominator: Polynomial::one(),
            zeros,
            poles: RootsCache::computed(Roots::new(Vec::new())),
        }
    }

    /// Build from factored numerator and denominator, cancelling common
    /// roots right away.
    pub fn from_roots(zeros: Roots, poles: Roots) -> Self {
        let (zeros, poles, _) = zeros.reduce(&poles);
        let (zeros, poles) = reduce_factor(zeros, poles);
        Self::from_factored(zeros, poles)
    }

    fn from_factored(zeros: Roots, poles: Roots) -> Self {
        Self {
            numerator: zeros.polynomial(),
            denominator: poles.polynomial(),
            zeros: RootsCache::computed(zeros),
            poles: RootsCache::computed(poles),
        }
    }

    /// Polynomial result of an operation plus whatever roots are known;
    /// when both sides are known the result is reduced on the spot.
    fn combine(
        numerator: Polynomial,
        denominator: Polynomial,
        zeros: Option<Roots>,
        poles: Option<Roots>,
    ) -> Self {
        match (zeros, poles) {
            (Some(z), Some(p)) => Self::from_roots(z, p),
            (z, p) => Self {
                numerator: numerator.canonical(),
                denominator: denominator.canonical(),
                zeros: from_known(z),
                poles: from_known(p),
            },
        }
    }

    /// Ideal PID controller `kp·(1 + 1/(ti·s) + td·s)`.
    pub fn pid(kp: Real, ti: Real, td: Real) -> PolyResult<Self> {
        Self::pid_real(kp, ti, td, 0.0)
    }

    /// PID controller with a first order lag `tp` on the derivative part:
    /// `kp·(1 + 1/(ti·s) + td·s/(tp·s + 1))`.
    pub fn pid_real(kp: Real, ti: Real, td: Real, tp: Real) -> PolyResult<Self> {
        if ti == 0.0 {
            return Err(PolyError::InvalidArg {
                what: "Ti must not be zero",
            });
        }
        let numerator = Polynomial::new(vec![1.0, ti + tp, ti * tp + ti * td]).mul_scalar(kp);
        let denominator = Polynomial::new(vec![0.0, ti, ti * tp]);
        Ok(Self::from_polynomials(numerator, denominator))
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.numerator
    }

    pub fn denominator(&self) -> &Polynomial {
        &self.denominator
    }

    pub fn zeros_state(&self) -> CacheState<'_> {
        self.zeros.state()
    }

    pub fn poles_state(&self) -> CacheState<'_> {
        self.poles.state()
    }

    pub fn eval(&self, s: Complex64) -> Complex64 {
        self.numerator.eval_complex(s) / self.denominator.eval_complex(s)
    }

    /// Roots of the numerator, computed on first use.
    pub fn zeros(&self) -> PolyResult<&Roots> {
        match self.zeros.get_or_compute(&self.numerator) {
            Ok(r) => Ok(r),
            Err(e) => Err(e
                .clone()
                .context(format!("error in calculating zeros of {self}"))),
        }
    }

    /// Roots of the denominator, computed on first use.
    pub fn poles(&self) -> PolyResult<&Roots> {
        match self.poles.get_or_compute(&self.denominator) {
            Ok(r) => Ok(r),
            Err(e) => Err(e
                .clone()
                .context(format!("error in calculating poles of {self}"))),
        }
    }

    pub fn mul(&self, b: &Linear) -> Linear {
        Self::combine(
            self.numerator.mul(&b.numerator),
            self.denominator.mul(&b.denominator),
            known_product(&self.zeros, &b.zeros),
            known_product(&self.poles, &b.poles),
        )
    }

    pub fn mul_scalar(&self, f: Real) -> Linear {
        Self {
            numerator: self.numerator.mul_scalar(f).canonical(),
            denominator: self.denominator.clone(),
            zeros: from_known(self.zeros.known().map(|z| z.mul_scalar(f))),
            poles: self.poles.clone(),
        }
    }

    /// `D/N`; fails for a zero numerator.
    pub fn inv(&self) -> PolyResult<Linear> {
        if self.numerator.degree() < 0 {
            return Err(PolyError::DivisionByZero);
        }
        Ok(Self {
            numerator: self.denominator.clone(),
            denominator: self.numerator.clone(),
            zeros: self.poles.clone(),
            poles: self.zeros.clone(),
        })
    }

    pub fn div(&self, b: &Linear) -> PolyResult<Linear> {
        Ok(self.mul(&b.inv()?))
    }

    /// Sum of two transfer functions. The zeros of the sum are left to be
    /// computed on demand.
    pub fn add(&self, b: &Linear) -> Linear {
        let numerator = self
            .numerator
            .mul(&b.denominator)
            .add(&b.numerator.mul(&self.denominator));
        Self::combine(
            numerator,
            self.denominator.mul(&b.denominator),
            None,
            known_product(&self.poles, &b.poles),
        )
    }

    /// Closed loop with unit feedback: `L / (1 + L)`.
    pub fn closed_loop(&self) -> PolyResult<Linear> {
        let d = self.add(&Linear::constant(1.0)).reduce()?;
        self.div(&d)?.reduce()
    }

    /// Cancel common zeros and poles. Computes both root sets if needed.
    pub fn reduce(&self) -> PolyResult<Linear> {
        let zeros = self.zeros()?.clone();
        let poles = self.poles()?.clone();
        Ok(Self::from_roots(zeros, poles))
    }

    pub fn pow(&self, n: u32) -> Linear {
        (0..n).fold(Linear::constant(1.0), |acc, _| acc.mul(self))
    }

    /// Quotient rule: `(N'D - ND') / D²`.
    pub fn derivative(&self) -> Linear {
        let n = &self.numerator;
        let d = &self.denominator;
        let numerator = n
            .derivative()
            .mul(d)
            .add(&n.mul(&d.derivative()).mul_scalar(-1.0));
        Self::from_polynomials(numerator, d.mul(d))
    }

    fn normalized(&self) -> (Polynomial, Polynomial) {
        let d = self.denominator.canonical();
        let lead = d.coefficients().last().copied().unwrap_or(1.0);
        (
            self.numerator.canonical().mul_scalar(1.0 / lead),
            d.mul_scalar(1.0 / lead),
        )
    }

    /// Same rational function: both sides agree within ε once the
    /// denominators are made monic.
    pub fn equals(&self, b: &Linear) -> bool {
        let (n1, d1) = self.normalized();
        let (n2, d2) = b.normalized();
        n1.equals(&n2) && d1.equals(&d2)
    }

    /// Polynomial form regardless of any cached roots.
    pub fn string_poly(&self) -> String {
        format!("({})/({})", self.numerator, self.denominator)
    }
}

fn side(p: &Polynomial, cache: &RootsCache) -> String {
    match cache.state() {
        CacheState::Computed(r) => r.to_string(),
        _ => p.to_string(),
    }
}

impl fmt::Display for Linear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({})/({})",
            side(&self.numerator, &self.zeros),
            side(&self.denominator, &self.poles)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lin(n: &[Real], d: &[Real]) -> Linear {
        Linear::from_polynomials(Polynomial::new(n.to_vec()), Polynomial::new(d.to_vec()))
    }

    fn real_roots(values: &[Real]) -> Roots {
        Roots::new(values.iter().map(|&v| Complex64::new(v, 0.0)).collect())
    }

    #[test]
    fn mul_string() {
        let l = lin(&[4.0, 5.0], &[1.0, 2.0, 3.0]);
        let m = lin(&[5.0], &[-2.0, 1.0, 4.0]);
        assert_eq!(l.mul(&m).to_string(), "(25x+20)/(12x⁴+11x³-3x-2)");
    }

    #[test]
    fn add_string() {
        let l = lin(&[4.0, 5.0], &[1.0, 2.0, 3.0]);
        let m = lin(&[5.0], &[-2.0, 1.0, 4.0]);
        assert_eq!(
            l.add(&m).to_string(),
            "(20x³+36x²+4x-3)/(12x⁴+11x³-3x-2)"
        );
    }

    #[test]
    fn from_roots_cancels() {
        let l = Linear::from_roots(real_roots(&[-2.0, 1.0]), real_roots(&[-1.0, 1.0]));
        assert_eq!(l.to_string(), "(x+2)/(x+1)");
        assert_eq!(l.string_poly(), "(x+2)/(x+1)");
    }

    #[test]
    fn from_roots_without_cancellation() {
        let l = Linear::from_roots(real_roots(&[-2.0, 1.0]), real_roots(&[-1.0, 2.0]));
        assert_eq!(l.to_string(), "((x+2)⋅(x-1))/((x+1)⋅(x-2))");
        assert_eq!(l.string_poly(), "(x²+x-2)/(x²-x-2)");
    }

    #[test]
    fn pid_string() {
        let pid = Linear::pid(12.0, 1.5, 2.0).unwrap();
        assert_eq!(pid.to_string(), "(36x²+18x+12)/(1.5x)");
    }

    #[test]
    fn pid_rejects_zero_ti() {
        let err = Linear::pid(1.0, 0.0, 1.0).unwrap_err();
        assert_eq!(err.to_string(), "Ti must not be zero");
    }

    #[test]
    fn pid_real_without_lag_is_pid() {
        let a = Linear::pid_real(2.0, 3.0, 0.5, 0.0).unwrap();
        let b = Linear::pid(2.0, 3.0, 0.5).unwrap();
        assert!(a.equals(&b));

        let c = Linear::pid_real(0.3, 1.14, 0.77, 0.05).unwrap();
        let s = Complex64::new(0.7, 1.3);
        let want = 0.3 * (1.0 + 1.0 / (1.14 * s) + 0.77 * s / (0.05 * s + 1.0));
        assert!((c.eval(s) - want).norm() < 1e-12);
    }

    #[test]
    fn constant_has_roots_cached() {
        let c = Linear::constant(5.0);
        assert!(matches!(c.zeros_state(), CacheState::Computed(_)));
        assert!(matches!(c.poles_state(), CacheState::Computed(_)));
        assert_eq!(c.to_string(), "(5)/(1)");
    }

    #[test]
    fn zeros_are_cached_and_failures_remembered() {
        let l = lin(&[2.0, 3.0, 1.0], &[1.0, 1.0]);
        assert!(matches!(l.zeros_state(), CacheState::NotComputed));
        let z = l.zeros().unwrap();
        assert_eq!(z.count(), 2);
        assert!(matches!(l.zeros_state(), CacheState::Computed(_)));

        let zero = lin(&[0.0], &[1.0, 1.0]);
        let err = zero.zeros().unwrap_err();
        assert!(err.to_string().starts_with("error in calculating zeros of"));
        assert!(err.to_string().ends_with("no coefficients given"));
        assert!(matches!(zero.zeros_state(), CacheState::Failed(_)));
    }

    #[test]
    fn display_switches_to_factored_after_root_computation() {
        let l = lin(&[2.0, 1.0], &[2.0, 3.0, 1.0]);
        assert_eq!(l.to_string(), "(x+2)/(x²+3x+2)");
        l.poles().unwrap();
        assert_eq!(l.to_string(), "(x+2)/((x+1)⋅(x+2))");
        assert_eq!(l.string_poly(), "(x+2)/(x²+3x+2)");
    }

    #[test]
    fn div_by_zero_function_fails() {
        let l = lin(&[1.0], &[1.0, 1.0]);
        let zero = lin(&[0.0], &[1.0]);
        assert_eq!(l.div(&zero).unwrap_err().to_string(), "division by zero");
    }

    #[test]
    fn mul_scalar_keeps_poles() {
        let l = Linear::from_roots(real_roots(&[-1.0]), real_roots(&[-2.0]));
        let m = l.mul_scalar(3.0);
        assert_eq!(m.numerator(), &Polynomial::new(vec![3.0, 3.0]));
        assert_eq!(m.to_string(), "(3⋅(x+1))/(x+2)");
    }

    #[test]
    fn pow_and_inv() {
        let l = lin(&[1.0], &[1.0, 1.0]);
        let p = l.pow(2);
        assert!(p.equals(&lin(&[1.0], &[1.0, 2.0, 1.0])));
        assert!(l.pow(0).equals(&Linear::constant(1.0)));
        assert!(l.inv().unwrap().equals(&lin(&[1.0, 1.0], &[1.0])));
    }

    #[test]
    fn derivative_quotient_rule() {
        let l = lin(&[1.0, 3.0], &[1.0, 2.0, 3.0]);
        let expected = lin(&[1.0, -6.0, -9.0], &[1.0, 4.0, 10.0, 12.0, 9.0]);
        assert!(l.derivative().equals(&expected));
    }

    #[test]
    fn equals_ignores_common_scale() {
        let a = lin(&[2.0, 4.0], &[2.0, 2.0]);
        let b = lin(&[1.0, 2.0], &[1.0, 1.0]);
        assert!(a.equals(&b));
        assert!(!a.equals(&lin(&[1.0, 2.0], &[1.0, 2.0])));
    }
}
