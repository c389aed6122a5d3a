//! Closed PID loop around a third-order plant, built in code and from YAML.

use ct_poly::{Complex64, Linear, Polynomial, Roots};
use ct_sim::builtins::{constant, limit, linear, sub};
use ct_sim::{SimOptions, System, SystemDef};

fn plant() -> Linear {
    let poles = Roots::new(vec![
        Complex64::new(-1.0, 0.0),
        Complex64::new(-2.0, 0.0),
        Complex64::new(-2.5, 0.0),
    ]);
    Linear::from_polynomials(Polynomial::new(vec![70.0]), poles.polynomial())
}

#[test]
fn limited_pid_loop_settles_on_setpoint() {
    let controller = Linear::pid_real(0.3, 1.14, 0.77, 0.05).unwrap();

    let mut s = System::new();
    s.add_block(&[], "w", constant(1.0))
        .add_block(&["ul"], "y", linear(&plant()))
        .add_block(&["e"], "u", linear(&controller))
        .add_block(&["w", "y"], "e", sub())
        .add_block(&["u"], "ul", limit(0.0, 0.8));
    s.initialize().unwrap();

    let rec = s.run(10.0).unwrap();
    assert_eq!(rec.names(), &["w", "y", "u", "e", "ul"]);
    assert!((rec.len() as i64 - 1000).abs() <= 1, "{} samples", rec.len());

    let y = rec.last("y").unwrap().unwrap();
    assert!((y - 1.0).abs() < 0.05, "y(10) = {y}");

    // the limiter is active while the loop pulls up
    let ul = rec.values("ul").unwrap();
    assert!(ul.iter().all(|&v| (0.0..=0.8).contains(&v)));
    assert!(ul.iter().any(|&v| v == 0.8));
}

#[test]
fn same_loop_from_yaml() {
    let def = SystemDef::from_yaml(
        r#"
options:
  skip: 500
blocks:
  - output: w
    block: { type: Const, value: 1 }
  - inputs: [ul]
    output: y
    block: { type: Linear, numerator: [70], denominator: [5, 9.5, 5.5, 1] }
  - inputs: [e]
    output: u
    block: { type: PidReal, kp: 0.3, ti: 1.14, td: 0.77, tp: 0.05 }
  - inputs: [w, y]
    output: e
    block: { type: Sub }
  - inputs: [u]
    output: ul
    block: { type: Limit, min: 0, max: 0.8 }
"#,
    )
    .unwrap();
    assert_eq!(def.options, SimOptions { dt: 1e-5, skip: 500 });

    let rec = def.simulate(10.0).unwrap();
    assert!((rec.len() as i64 - 2000).abs() <= 1);
    let y = rec.last("y").unwrap().unwrap();
    assert!((y - 1.0).abs() < 0.05, "y(10) = {y}");
}

#[test]
fn recorded_run_exports_to_dat() {
    let mut s = System::new().with_options(SimOptions { dt: 0.25, skip: 2 });
    s.add_block(&[], "one", constant(1.0));
    s.initialize().unwrap();
    let text = s.run(1.0).unwrap().into_data("s").dat_file().unwrap();
    assert_eq!(text, "#time[s]\tone[]\n0.25\t1\n0.75\t1");
}
