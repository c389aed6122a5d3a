//! Controllable companion form of a proper SISO transfer function.

use nalgebra::{DMatrix, DVector};

use ct_core::Real;

use crate::error::{PolyError, PolyResult};
use crate::linear::Linear;

/// `ẋ = A·x + e·u`, `y = c·x + d·u`, with `e` the last unit vector.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    pub a: DMatrix<Real>,
    pub c: DVector<Real>,
    pub d: Real,
}

impl StateSpace {
    /// Number of states.
    pub fn order(&self) -> usize {
        self.c.len()
    }
}

impl Linear {
    pub fn state_space(&self) -> PolyResult<StateSpace> {
        let den = self.denominator().canonical();
        let num = self.numerator().canonical();
        let Some(&lead) = den.coefficients().last() else {
            return Err(PolyError::DivisionByZero);
        };
        let n = den.len() - 1;
        if num.degree() > n as isize {
            return Err(PolyError::NotProper);
        }

        let d = if num.degree() == n as isize {
            num.coefficient(n) / lead
        } else {
            0.0
        };

        let c = DVector::from_fn(n, |i, _| (num.coefficient(i) - d * den.coefficient(i)) / lead);
        let a = DMatrix::from_fn(n, n, |row, col| {
            if row + 1 == n {
                -den.coefficient(col) / lead
            } else if col == row + 1 {
                1.0
            } else {
                0.0
            }
        });
        Ok(StateSpace { a, c, d })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial;

    fn lin(n: &[Real], d: &[Real]) -> Linear {
        Linear::from_polynomials(Polynomial::new(n.to_vec()), Polynomial::new(d.to_vec()))
    }

    #[test]
    fn pt1() {
        let (kp, t) = (2.0, 3.0);
        let ss = lin(&[kp], &[1.0, t]).state_space().unwrap();
        assert_eq!(ss.a, DMatrix::from_row_slice(1, 1, &[-1.0 / t]));
        assert_eq!(ss.c, DVector::from_vec(vec![kp / t]));
        assert_eq!(ss.d, 0.0);
    }

    #[test]
    fn pt2() {
        let (kp, t, damp) = (2.0, 3.0, 0.5);
        let ss = lin(&[kp], &[1.0, 2.0 * damp * t, t * t])
            .state_space()
            .unwrap();
        let want_a =
            DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0 / (t * t), -2.0 * damp / t]);
        assert!((ss.a - want_a).abs().max() < 1e-15);
        assert!((ss.c[0] - kp / (t * t)).abs() < 1e-15);
        assert_eq!(ss.c[1], 0.0);
        assert_eq!(ss.d, 0.0);
    }

    #[test]
    fn phase_lead_has_feedthrough() {
        let (t1, t2) = (3.0, 2.0);
        let ss = lin(&[1.0, t1], &[1.0, t2]).state_space().unwrap();
        assert!((ss.d - t1 / t2).abs() < 1e-15);
        assert!((ss.c[0] - (1.0 / t2 - t1 / (t2 * t2))).abs() < 1e-15);
    }

    #[test]
    fn constant_has_no_states() {
        let ss = Linear::constant(4.0).state_space().unwrap();
        assert_eq!(ss.order(), 0);
        assert_eq!(ss.d, 4.0);
    }

    #[test]
    fn improper_is_rejected() {
        let err = lin(&[1.0, 1.0, 1.0], &[1.0, 1.0]).state_space().unwrap_err();
        assert_eq!(err.to_string(), "transfer function is not proper");
    }

    #[test]
    fn transfer_matches_rational() {
        let l = lin(&[1.0, 2.0, 0.5], &[2.0, 3.0, 1.0, 0.25]);
        let ss = l.state_space().unwrap();
        let n = ss.order();
        for &w in &[0.1, 1.0, 7.0] {
            let s = num_complex::Complex64::new(0.2, w);
            // c·(sI - A)⁻¹·e + d
            let m = DMatrix::from_fn(n, n, |i, j| {
                let id = if i == j { s } else { 0.0.into() };
                id - ss.a[(i, j)]
            });
            let mut e = DVector::from_element(n, num_complex::Complex64::new(0.0, 0.0));
            e[n - 1] = 1.0.into();
            let x = m.lu().solve(&e).unwrap();
            let y: num_complex::Complex64 =
                (0..n).map(|i| x[i] * ss.c[i]).sum::<num_complex::Complex64>() + ss.d;
            assert!((y - l.eval(s)).norm() < 1e-10);
        }
    }
}
