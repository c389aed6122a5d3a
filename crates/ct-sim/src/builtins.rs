//! Built-in blocks.

use std::sync::Arc;

use ct_core::format_g;
use ct_poly::Linear;
use nalgebra::DVector;

use crate::block::{step, BlockFactory, Inputs};
use crate::error::{SimError, SimResult};

pub fn constant(c: f64) -> BlockFactory {
    BlockFactory::stateless(format!("Const {}", format_g(c)), 0, move |_| c)
}

pub fn gain(g: f64) -> BlockFactory {
    BlockFactory::stateless(format!("Gain {}", format_g(g)), 1, move |i| i.get(0) * g)
}

pub fn add() -> BlockFactory {
    BlockFactory::stateless("Add", 2, |i| i.get(0) + i.get(1))
}

pub fn sub() -> BlockFactory {
    BlockFactory::stateless("Sub", 2, |i| i.get(0) - i.get(1))
}

pub fn mul() -> BlockFactory {
    BlockFactory::stateless("Mul", 2, |i| i.get(0) * i.get(1))
}

/// Sum of `n` inputs.
pub fn add_n(n: usize) -> BlockFactory {
    BlockFactory::stateless("Add", n, |i| i.iter().sum())
}

/// Clamp the input to `[min, max]`.
pub fn limit(min: f64, max: f64) -> BlockFactory {
    let name = format!("Limit {}-{}", format_g(min), format_g(max));
    BlockFactory::stateless(name, 1, move |i| {
        let v = i.get(0);
        if v < min {
            min
        } else if v > max {
            max
        } else {
            v
        }
    })
}

/// Running integral; outputs the sum before adding the current input.
pub fn integrate() -> BlockFactory {
    BlockFactory::new("Integrate", 1, || {
        let mut sum = 0.0;
        Ok(step(move |i, _, dt| {
            let out = sum;
            sum += i.get(0) * dt;
            Ok(out)
        }))
    })
}

/// Backward difference against the previous input.
pub fn differentiate() -> BlockFactory {
    BlockFactory::new("Differentiate", 1, || {
        let mut last = 0.0;
        Ok(step(move |i, _, dt| {
            let v = i.get(0);
            let dif = (v - last) / dt;
            last = v;
            Ok(dif)
        }))
    })
}

/// Dead time of `delay` seconds, realised as a ring buffer of
/// `delay / dt` samples sized on the first step.
///
/// Fails at block creation for a non-positive delay.
pub fn delay(delay: f64) -> BlockFactory {
    BlockFactory::new("Delay", 1, move || {
        if delay.is_nan() || delay <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "delay time must be greater than zero".to_string(),
            });
        }
        let mut buffer: Vec<f64> = Vec::new();
        let mut pos = 0;
        Ok(step(move |i, _, dt| {
            if buffer.is_empty() {
                let n = ((delay / dt) as usize).max(1);
                buffer = vec![0.0; n];
            }
            let out = std::mem::replace(&mut buffer[pos], i.get(0));
            pos = (pos + 1) % buffer.len();
            Ok(out)
        }))
    })
}

/// Discrete PID acting on the control error.
///
/// `u = kp·(e + ∫e/ti + td·de/dt)`, with a backward difference and a
/// rectangle-rule integral.
pub fn pid(kp: f64, ti: f64, td: f64) -> SimResult<BlockFactory> {
    if ti == 0.0 {
        return Err(SimError::InvalidArg {
            what: "Ti must not be zero".to_string(),
        });
    }
    let name = format!(
        "PID kp={}, Ti={}, Td={}",
        format_g(kp),
        format_g(ti),
        format_g(td)
    );
    Ok(BlockFactory::new(name, 1, move || {
        let mut sum = 0.0;
        let mut last = 0.0;
        Ok(step(move |i, _, dt| {
            let e = i.get(0);
            let dif = (e - last) / dt;
            let u = kp * (e + sum / ti + dif * td);
            last = e;
            sum += e * dt;
            Ok(u)
        }))
    }))
}

/// Transfer function integrated with one explicit Euler step per call
/// on its controllable companion form.
///
/// Fails at block creation if the transfer function is not proper.
pub fn linear(lin: &Linear) -> BlockFactory {
    let lin = lin.clone();
    BlockFactory::new(format!("Linear {lin}"), 1, move || {
        let ss = lin.state_space()?;
        let n = ss.order();
        let mut x = DVector::<f64>::zeros(n);
        let mut x_dot = DVector::<f64>::zeros(n);
        Ok(step(move |i, _, dt| {
            let u = i.get(0);
            if n == 0 {
                return Ok(ss.d * u);
            }
            let y = ss.c.dot(&x) + ss.d * u;
            x_dot.gemv(1.0, &ss.a, &x, 0.0);
            x_dot[n - 1] += u;
            x.axpy(dt, &x_dot, 1.0);
            Ok(y)
        }))
    })
}

/// Block computing `f` of its `n` inputs.
pub fn func<F>(n: usize, f: F) -> BlockFactory
where
    F: Fn(&[f64]) -> SimResult<f64> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    BlockFactory::new("function of input signals", n, move || {
        let f = Arc::clone(&f);
        let mut args = vec![0.0; n];
        Ok(step(move |i: &Inputs<'_>, _, _| {
            for (slot, v) in args.iter_mut().zip(i.iter()) {
                *slot = v;
            }
            f(&args)
        }))
    })
}

/// Source block computing `f(t)`.
pub fn time_fn<F>(f: F) -> BlockFactory
where
    F: Fn(f64) -> SimResult<f64> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    BlockFactory::new("function of time", 0, move || {
        let f = Arc::clone(&f);
        Ok(step(move |_, t, _| f(t)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::SignalId;
    use ct_poly::Polynomial;

    /// Drive a single-input block with the given input sequence.
    fn drive(factory: &BlockFactory, input: &[f64], dt: f64) -> Vec<f64> {
        let mut next = factory.create().unwrap();
        let ids = [SignalId::from_index(0).unwrap()];
        input
            .iter()
            .enumerate()
            .map(|(k, &u)| {
                let values = [u];
                next(&Inputs::new(&values, &ids), k as f64 * dt, dt).unwrap()
            })
            .collect()
    }

    fn drive2(factory: &BlockFactory, a: f64, b: f64) -> f64 {
        let mut next = factory.create().unwrap();
        let ids = [SignalId::from_index(0).unwrap(), SignalId::from_index(1).unwrap()];
        next(&Inputs::new(&[a, b], &ids), 0.0, 1.0).unwrap()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(drive2(&add(), 2.0, 3.0), 5.0);
        assert_eq!(drive2(&sub(), 2.0, 3.0), -1.0);
        assert_eq!(drive2(&mul(), 2.0, 3.0), 6.0);
        assert_eq!(drive(&gain(2.5), &[2.0], 1.0), vec![5.0]);
        assert_eq!(add_n(3).arity(), 3);
    }

    #[test]
    fn names() {
        assert_eq!(constant(1.0).name(), "Const 1");
        assert_eq!(limit(0.0, 0.8).name(), "Limit 0-0.8");
        assert_eq!(pid(1.0, 2.0, 0.5).unwrap().name(), "PID kp=1, Ti=2, Td=0.5");
    }

    #[test]
    fn limiter_clamps() {
        assert_eq!(drive(&limit(0.0, 0.8), &[-1.0, 0.5, 2.0], 1.0), vec![0.0, 0.5, 0.8]);
    }

    #[test]
    fn integrator_lags_one_step() {
        assert_eq!(drive(&integrate(), &[1.0, 1.0, 1.0], 0.5), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn differentiator_uses_previous_input() {
        assert_eq!(drive(&differentiate(), &[1.0, 3.0, 3.0], 0.5), vec![2.0, 4.0, 0.0]);
    }

    #[test]
    fn delay_shifts_by_buffer_length() {
        let out = drive(&delay(0.5), &[1.0, 2.0, 3.0, 4.0, 5.0], 0.25);
        assert_eq!(out, vec![0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn delay_must_be_positive() {
        let err = delay(0.0).create().err().unwrap();
        assert_eq!(err.to_string(), "Invalid argument: delay time must be greater than zero");
    }

    #[test]
    fn pid_block() {
        assert!(pid(1.0, 0.0, 1.0).is_err());
        // kp=2, Ti=1, Td=0.5, dt=0.5: e=1 then e=1
        let out = drive(&pid(2.0, 1.0, 0.5).unwrap(), &[1.0, 1.0], 0.5);
        assert_eq!(out, vec![2.0 * (1.0 + 0.0 + 2.0 * 0.5), 2.0 * (1.0 + 0.5 + 0.0)]);
    }

    #[test]
    fn linear_pt1_step_response() {
        // 1/(1+s): x' = -x + u, y = x
        let lin = Linear::from_polynomials(Polynomial::new(vec![1.0]), Polynomial::new(vec![1.0, 1.0]));
        let dt = 1e-3;
        let out = drive(&linear(&lin), &[1.0; 1001], dt);
        assert_eq!(out[0], 0.0);
        let want = 1.0 - (-1.0f64).exp();
        assert!((out[1000] - want).abs() < 1e-3, "{}", out[1000]);
    }

    #[test]
    fn linear_constant_is_gain() {
        assert_eq!(drive(&linear(&Linear::constant(3.0)), &[2.0], 0.1), vec![6.0]);
    }

    #[test]
    fn linear_improper_fails_on_creation() {
        let lin = Linear::from_polynomials(Polynomial::new(vec![0.0, 0.0, 1.0]), Polynomial::new(vec![1.0]));
        let err = linear(&lin).create().err().unwrap();
        assert_eq!(err.to_string(), "transfer function is not proper");
    }

    #[test]
    fn closures() {
        let f = func(2, |a| Ok(a[0] * 10.0 + a[1]));
        assert_eq!(drive2(&f, 1.0, 2.0), 12.0);

        let mut next = time_fn(|t| Ok(t * t)).create().unwrap();
        assert_eq!(next(&Inputs::new(&[], &[]), 3.0, 0.1).unwrap(), 9.0);

        let mut failing = time_fn(|_| Err(SimError::block("bad"))).create().unwrap();
        assert_eq!(failing(&Inputs::new(&[], &[]), 0.0, 0.1).unwrap_err().to_string(), "bad");
    }
}
