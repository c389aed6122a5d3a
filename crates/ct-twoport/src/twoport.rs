//! Two-port parameter sets and their conversions.
//!
//! With port 1 quantities `U1, I1` and port 2 quantities `U2, I2` (`I2`
//! flowing into the port) the kinds read:
//!
//! | kind | relation |
//! |------|----------|
//! | Z | `(U1, U2) = M·(I1, I2)` |
//! | Y | `(I1, I2) = M·(U1, U2)` |
//! | H | `(U1, I2) = M·(I1, U2)` |
//! | C | `(I1, U2) = M·(U1, I2)` |
//! | A | `(U1, I1) = M·(U2, -I2)` |

use core::fmt;

use ct_core::format_g;
use num_complex::Complex64;

use crate::error::{TwoPortError, TwoPortResult};

type C = Complex64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TpKind {
    H,
    Z,
    Y,
    C,
    A,
}

impl fmt::Display for TpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TpKind::H => "H",
            TpKind::Z => "Z",
            TpKind::Y => "Y",
            TpKind::C => "C",
            TpKind::A => "A",
        };
        f.write_str(s)
    }
}

/// A 2×2 complex matrix interpreted according to its [`TpKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoPort {
    m11: C,
    m12: C,
    m21: C,
    m22: C,
    kind: TpKind,
}

fn one() -> C {
    C::new(1.0, 0.0)
}

fn zero() -> C {
    C::new(0.0, 0.0)
}

impl TwoPort {
    pub fn new(m11: C, m12: C, m21: C, m22: C, kind: TpKind) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            kind,
        }
    }

    /// Series impedance `z` between the ports.
    pub fn new_series(z: C) -> Self {
        Self::new(one(), z, zero(), one(), TpKind::A)
    }

    /// Shunt impedance `z` across the port.
    pub fn new_shunt(z: C) -> Self {
        Self::new(one(), zero(), one() / z, one(), TpKind::A)
    }

    pub fn kind(&self) -> TpKind {
        self.kind
    }

    pub fn m11(&self) -> C {
        self.m11
    }

    pub fn m12(&self) -> C {
        self.m12
    }

    pub fn m21(&self) -> C {
        self.m21
    }

    pub fn m22(&self) -> C {
        self.m22
    }

    pub fn det(&self) -> C {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Matrix `[a b; c d] / d` tagged with `kind`.
    fn scaled(kind: TpKind, m: [C; 4], divisor: C) -> TwoPortResult<TwoPort> {
        if divisor == zero() {
            return Err(TwoPortError::DivisionByZero);
        }
        Ok(Self::new(
            m[0] / divisor,
            m[1] / divisor,
            m[2] / divisor,
            m[3] / divisor,
            kind,
        ))
    }

    /// Convert to the given parameter set.
    pub fn to(&self, kind: TpKind) -> TwoPortResult<TwoPort> {
        match kind {
            TpKind::Y => self.to_y(),
            TpKind::Z => self.to_z(),
            TpKind::A => self.to_a(),
            TpKind::H => self.to_h(),
            TpKind::C => self.to_c(),
        }
    }

    pub fn to_y(&self) -> TwoPortResult<TwoPort> {
        let (m11, m12, m21, m22, det) = (self.m11, self.m12, self.m21, self.m22, self.det());
        let k = TpKind::Y;
        match self.kind {
            TpKind::Y => Ok(*self),
            TpKind::A => Self::scaled(k, [m22, -det, -one(), m11], m12),
            TpKind::H => Self::scaled(k, [one(), -m12, m21, det], m11),
            TpKind::Z => Self::scaled(k, [m22, -m12, -m21, m11], det),
            TpKind::C => Self::scaled(k, [det, m12, -m21, one()], m22),
        }
    }

    pub fn to_z(&self) -> TwoPortResult<TwoPort> {
        let (m11, m12, m21, m22, det) = (self.m11, self.m12, self.m21, self.m22, self.det());
        let k = TpKind::Z;
        match self.kind {
            TpKind::Z => Ok(*self),
            TpKind::Y => Self::scaled(k, [m22, -m12, -m21, m11], det),
            TpKind::A => Self::scaled(k, [m11, det, one(), m22], m21),
            TpKind::H => Self::scaled(k, [det, m12, -m21, one()], m22),
            TpKind::C => Self::scaled(k, [one(), -m12, m21, det], m11),
        }
    }

    pub fn to_a(&self) -> TwoPortResult<TwoPort> {
        let (m11, m21, m22, det) = (self.m11, self.m21, self.m22, self.det());
        let k = TpKind::A;
        match self.kind {
            TpKind::A => Ok(*self),
            TpKind::Y => Self::scaled(k, [-m22, -one(), -det, -m11], m21),
            TpKind::H => Self::scaled(k, [-det, -m11, -m22, -one()], m21),
            TpKind::Z => Self::scaled(k, [m11, det, one(), m22], m21),
            TpKind::C => Self::scaled(k, [one(), m22, m11, det], m21),
        }
    }

    pub fn to_h(&self) -> TwoPortResult<TwoPort> {
        let (m11, m12, m21, m22, det) = (self.m11, self.m12, self.m21, self.m22, self.det());
        let k = TpKind::H;
        match self.kind {
            TpKind::H => Ok(*self),
            TpKind::Y => Self::scaled(k, [one(), -m12, m21, det], m11),
            TpKind::A => Self::scaled(k, [m12, det, -one(), m21], m22),
            TpKind::Z => Self::scaled(k, [det, m12, -m21, one()], m22),
            TpKind::C => Self::scaled(k, [m22, -m12, -m21, m11], det),
        }
    }

    pub fn to_c(&self) -> TwoPortResult<TwoPort> {
        let (m11, m12, m21, m22, det) = (self.m11, self.m12, self.m21, self.m22, self.det());
        let k = TpKind::C;
        match self.kind {
            TpKind::C => Ok(*self),
            TpKind::Y => Self::scaled(k, [det, m12, -m21, one()], m22),
            TpKind::A => Self::scaled(k, [m21, -det, one(), m12], m11),
            TpKind::H => Self::scaled(k, [m22, -m12, -m21, m11], det),
            TpKind::Z => Self::scaled(k, [one(), -m12, m21, det], m11),
        }
    }

    /// `U2/U1` with `load` connected to port 2; a zero load shorts the output.
    pub fn voltage_gain(&self, load: C) -> C {
        if load == zero() {
            return zero();
        }
        let (m11, m12, m21, m22, det) = (self.m11, self.m12, self.m21, self.m22, self.det());
        let l = load;
        match self.kind {
            TpKind::Y => -m21 / (m22 + 1.0 / l),
            TpKind::A => 1.0 / (m11 + m12 / l),
            TpKind::H => -m21 / (det + m11 / l),
            TpKind::Z => m21 / (m11 + det / l),
            TpKind::C => m21 / (1.0 + m22 / l),
        }
    }

    /// `U2/U1` with port 2 open.
    pub fn voltage_gain_open(&self) -> C {
        let (m11, m21, m22, det) = (self.m11, self.m21, self.m22, self.det());
        match self.kind {
            TpKind::Y => -m21 / m22,
            TpKind::A => 1.0 / m11,
            TpKind::H => -m21 / det,
            TpKind::Z => m21 / m11,
            TpKind::C => m21,
        }
    }

    /// Current through `load` over `I1`; a zero load is the short circuit.
    pub fn current_gain(&self, load: C) -> C {
        if load == zero() {
            return self.current_gain_short();
        }
        let (m11, m21, m22, det) = (self.m11, self.m21, self.m22, self.det());
        let l = load;
        match self.kind {
            TpKind::Y => m21 / l / (det + m11 / l),
            TpKind::A => -1.0 / l / (m21 + m22 / l),
            TpKind::H => m21 / l / (m22 + 1.0 / l),
            TpKind::Z => -m21 / l / (1.0 + m22 / l),
            TpKind::C => -m21 / l / (m11 + det / l),
        }
    }

    pub fn current_gain_short(&self) -> C {
        let (m11, m21, m22, det) = (self.m11, self.m21, self.m22, self.det());
        match self.kind {
            TpKind::Y => m21 / m11,
            TpKind::A => -1.0 / m22,
            TpKind::H => m21,
            TpKind::Z => -m21 / m22,
            TpKind::C => -m21 / det,
        }
    }

    /// Impedance seen at port 1 with `load` on port 2.
    pub fn input_impedance(&self, load: C) -> C {
        if load == zero() {
            return self.input_impedance_short();
        }
        let (m11, m12, m21, m22, det) = (self.m11, self.m12, self.m21, self.m22, self.det());
        let l = load;
        match self.kind {
            TpKind::Y => (m22 + 1.0 / l) / (det + m11 / l),
            TpKind::Z => (m11 + det / l) / (1.0 + m22 / l),
            TpKind::H => (det + m11 / l) / (m22 + 1.0 / l),
            TpKind::C => (1.0 + m22 / l) / (m11 + det / l),
            TpKind::A => (m11 + m12 / l) / (m21 + m22 / l),
        }
    }

    pub fn input_impedance_open(&self) -> C {
        let (m11, m21, m22, det) = (self.m11, self.m21, self.m22, self.det());
        match self.kind {
            TpKind::Y => m22 / det,
            TpKind::Z => m11,
            TpKind::H => det / m22,
            TpKind::C => 1.0 / m11,
            TpKind::A => m11 / m21,
        }
    }

    pub fn input_impedance_short(&self) -> C {
        let (m11, m12, m22, det) = (self.m11, self.m12, self.m22, self.det());
        match self.kind {
            TpKind::Y => 1.0 / m11,
            TpKind::Z => det / m22,
            TpKind::H => m11,
            TpKind::C => m22 / det,
            TpKind::A => m12 / m22,
        }
    }

    /// Impedance seen at port 2 with a source impedance `load` on port 1.
    pub fn output_impedance(&self, load: C) -> C {
        if load == zero() {
            return self.output_impedance_short();
        }
        let (m11, m12, m21, m22, det) = (self.m11, self.m12, self.m21, self.m22, self.det());
        let l = load;
        match self.kind {
            TpKind::Y => (m11 + 1.0 / l) / (det + m22 / l),
            TpKind::Z => (m22 + det / l) / (1.0 + m11 / l),
            TpKind::H => (1.0 + m11 / l) / (m22 + det / l),
            TpKind::C => (det + m22 / l) / (m11 + 1.0 / l),
            TpKind::A => (m22 + m12 / l) / (m21 + m11 / l),
        }
    }

    pub fn output_impedance_open(&self) -> C {
        let (m11, m21, m22, det) = (self.m11, self.m21, self.m22, self.det());
        match self.kind {
            TpKind::Y => m11 / det,
            TpKind::Z => m22,
            TpKind::H => 1.0 / m22,
            TpKind::C => det / m11,
            TpKind::A => m22 / m21,
        }
    }

    pub fn output_impedance_short(&self) -> C {
        let (m11, m12, m22, det) = (self.m11, self.m12, self.m22, self.det());
        match self.kind {
            TpKind::Y => 1.0 / m22,
            TpKind::Z => det / m11,
            TpKind::H => m11 / det,
            TpKind::C => m22,
            TpKind::A => m12 / m11,
        }
    }

    /// Element-wise sum of two ports of the same kind.
    pub fn add(&self, b: &TwoPort) -> TwoPortResult<TwoPort> {
        if self.kind != b.kind {
            return Err(TwoPortError::KindMismatch {
                a: self.kind,
                b: b.kind,
            });
        }
        Ok(Self::new(
            self.m11 + b.m11,
            self.m12 + b.m12,
            self.m21 + b.m21,
            self.m22 + b.m22,
            self.kind,
        ))
    }

    /// Both ports in series on both sides (Z parameters add).
    pub fn series(&self, b: &TwoPort) -> TwoPortResult<TwoPort> {
        self.to_z()?.add(&b.to_z()?)
    }

    /// Both ports in parallel on both sides (Y parameters add).
    pub fn parallel(&self, b: &TwoPort) -> TwoPortResult<TwoPort> {
        self.to_y()?.add(&b.to_y()?)
    }

    /// Series at the input, parallel at the output (H parameters add).
    pub fn series_parallel(&self, b: &TwoPort) -> TwoPortResult<TwoPort> {
        self.to_h()?.add(&b.to_h()?)
    }

    /// Parallel at the input, series at the output (C parameters add).
    pub fn parallel_series(&self, b: &TwoPort) -> TwoPortResult<TwoPort> {
        self.to_c()?.add(&b.to_c()?)
    }

    /// `self` followed by `b` (A parameters multiply).
    pub fn cascade(&self, b: &TwoPort) -> TwoPortResult<TwoPort> {
        let a = self.to_a()?;
        let b = b.to_a()?;
        Ok(Self::new(
            a.m11 * b.m11 + a.m12 * b.m21,
            a.m11 * b.m12 + a.m12 * b.m22,
            a.m21 * b.m11 + a.m22 * b.m21,
            a.m21 * b.m12 + a.m22 * b.m22,
            TpKind::A,
        ))
    }
}

/// Cascade a chain of ports from input to output.
pub fn cascade_all(ports: &[TwoPort]) -> TwoPortResult<TwoPort> {
    let (first, rest) = ports.split_first().ok_or(TwoPortError::NoPorts)?;
    rest.iter().try_fold(first.to_a()?, |acc, p| acc.cascade(p))
}

/// Compact complex formatting: `2`, `i`, `-2⋅i`, `1+2⋅i`.
fn fmt_complex(c: C) -> String {
    let imag = |v: f64| {
        if v == 1.0 {
            "i".to_string()
        } else {
            format!("{}⋅i", format_g(v))
        }
    };
    if c.im == 0.0 {
        return format_g(c.re);
    }
    if c.re == 0.0 {
        return if c.im < 0.0 {
            format!("-{}", imag(-c.im))
        } else {
            imag(c.im)
        };
    }
    let sign = if c.im < 0.0 { '-' } else { '+' };
    format!("{}{}{}", format_g(c.re), sign, imag(c.im.abs()))
}

impl fmt::Display for TwoPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}=({}, {}; {}, {})",
            self.kind,
            fmt_complex(self.m11),
            fmt_complex(self.m12),
            fmt_complex(self.m21),
            fmt_complex(self.m22)
        )
    }
}
