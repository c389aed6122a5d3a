//! Transfer-function algebra with every combination of cached and uncached
//! zeros/poles on both operands.

use ct_poly::{Complex64, Linear, Polynomial, Roots};

fn lin(n: &[f64], d: &[f64]) -> Linear {
    Linear::from_polynomials(Polynomial::new(n.to_vec()), Polynomial::new(d.to_vec()))
}

/// The four cache variants of `l`: none, zeros only, poles only, both.
fn variants(n: &[f64], d: &[f64]) -> Vec<Linear> {
    let zeros = lin(n, d);
    zeros.zeros().unwrap();
    let poles = lin(n, d);
    poles.poles().unwrap();
    let both = lin(n, d);
    both.zeros().unwrap();
    both.poles().unwrap();
    vec![lin(n, d), zeros, poles, both]
}

fn check_binary<F>(a: (&[f64], &[f64]), b: (&[f64], &[f64]), op: F, expected: &Linear)
where
    F: Fn(&Linear, &Linear) -> Linear,
{
    for x in variants(a.0, a.1) {
        for y in variants(b.0, b.1) {
            let got = op(&x, &y);
            assert!(
                got.equals(expected),
                "got {} expected {}",
                got.string_poly(),
                expected.string_poly()
            );
        }
    }
}

#[test]
fn mul_all_cache_combinations() {
    let expected = lin(&[20.0, 25.0], &[-2.0, -3.0, 0.0, 11.0, 12.0]);
    check_binary(
        (&[4.0, 5.0], &[1.0, 2.0, 3.0]),
        (&[5.0], &[-2.0, 1.0, 4.0]),
        |a, b| a.mul(b),
        &expected,
    );
}

#[test]
fn div_all_cache_combinations() {
    let expected = lin(&[-8.0, -6.0, 21.0, 20.0], &[5.0, 10.0, 15.0]);
    check_binary(
        (&[4.0, 5.0], &[1.0, 2.0, 3.0]),
        (&[5.0], &[-2.0, 1.0, 4.0]),
        |a, b| a.div(b).unwrap(),
        &expected,
    );
}

#[test]
fn add_all_cache_combinations() {
    let expected = lin(&[4.0, 20.0, 22.0, 4.0], &[-16.0, -8.0, 8.0, 12.0, 4.0]);
    check_binary(
        (&[4.0, 2.0], &[4.0, 4.0, 2.0]),
        (&[5.0], &[-4.0, 2.0, 2.0]),
        |a, b| a.add(b),
        &expected,
    );
}

#[test]
fn closed_loop_all_cache_combinations() {
    let expected = lin(&[2.0, 1.0], &[4.0, 3.0, 1.0]);
    for g in variants(&[4.0, 2.0], &[4.0, 4.0, 2.0]) {
        let closed = g.closed_loop().unwrap();
        assert!(closed.equals(&expected), "got {}", closed.string_poly());
        let den = closed.denominator().normalize();
        assert_eq!(den.len(), 3, "denominator {den}");
        for (got, want) in den.coefficients().iter().zip([4.0, 3.0, 1.0]) {
            assert!((got - want).abs() < 1e-9, "denominator {den}");
        }
    }
}

#[test]
fn closed_loop_matches_pointwise_feedback() {
    let g = lin(&[1.0, 0.5], &[2.0, 3.0, 1.5, 0.2]);
    let closed = g.closed_loop().unwrap();
    for s in [
        Complex64::new(0.0, 0.5),
        Complex64::new(0.3, 2.0),
        Complex64::new(-0.1, 7.0),
    ] {
        let l = g.eval(s);
        let want = l / (1.0 + l);
        assert!((closed.eval(s) - want).norm() < 1e-9);
    }
}

#[test]
fn controller_and_plant_closed_loop_poles() {
    let n = Roots::new(vec![]).append_real(1.5, 1.0).unwrap();
    let d = Roots::new(vec![])
        .append_real(2.0, 1.0)
        .unwrap()
        .append_real(1.0, 1.0)
        .unwrap()
        .append_quadratic(1.0, 3.0, 3.1)
        .unwrap();
    let plant = Linear::from_roots(n, d);
    let controller = Linear::pid(12.0, 1.5, 1.0).unwrap();

    let closed = plant.mul(&controller).closed_loop().unwrap();
    let poles = closed.poles().unwrap();

    let expected = Roots::new(vec![
        Complex64::new(-1.4838920018993484, 3.04283839228145),
        Complex64::new(-0.6814635644285129, 0.0),
        Complex64::new(-0.42537621588638014, 0.5755095234855198),
    ]);
    assert!(poles.equals(&expected), "got {poles:?}");
}

#[test]
fn reduce_cancels_common_factor() {
    // (x+1)(x+3) / ((x+1)(x+2))
    let l = lin(&[3.0, 4.0, 1.0], &[2.0, 3.0, 1.0]);
    let r = l.reduce().unwrap();
    assert_eq!(r.to_string(), "(x+3)/(x+2)");
    assert!(r.equals(&lin(&[3.0, 1.0], &[2.0, 1.0])));
}

#[test]
fn reduce_moves_integer_factor_ratio_to_numerator() {
    let l = lin(&[6.0, 6.0], &[2.0, 1.0]);
    let r = l.reduce().unwrap();
    assert_eq!(r.to_string(), "(6⋅(x+1))/(x+2)");

    let l = lin(&[1.0, 1.0], &[4.0, 2.0]);
    let r = l.reduce().unwrap();
    assert_eq!(r.zeros().unwrap().factor(), 1.0);
    assert_eq!(r.poles().unwrap().factor(), 2.0);
}
