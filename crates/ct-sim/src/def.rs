//! Declarative system description, loadable from YAML or JSON.
//!
//! ```yaml
//! options:
//!   skip: 100
//! blocks:
//!   - output: w
//!     block: { type: Const, value: 1 }
//!   - inputs: [w, y]
//!     output: e
//!     block: { type: Sub }
//! ```

use ct_poly::{Linear, Polynomial};
use serde::{Deserialize, Serialize};

use crate::block::BlockFactory;
use crate::builtins;
use crate::error::{SimError, SimResult};
use crate::record::SimRecord;
use crate::system::{SimOptions, System};

/// Block type and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockDef {
    Const {
        value: f64,
    },
    Gain {
        gain: f64,
    },
    /// Sum of all inputs.
    Add,
    Sub,
    Mul,
    Limit {
        min: f64,
        max: f64,
    },
    Integrate,
    Differentiate,
    Delay {
        time: f64,
    },
    /// Discrete PID on the input.
    Pid {
        kp: f64,
        ti: f64,
        td: f64,
    },
    /// PID with a first-order lag on the derivative, simulated as a
    /// transfer function.
    PidReal {
        kp: f64,
        ti: f64,
        td: f64,
        #[serde(default)]
        tp: f64,
    },
    /// Transfer function; coefficients in ascending powers of `s`.
    Linear {
        numerator: Vec<f64>,
        denominator: Vec<f64>,
    },
}

impl BlockDef {
    /// Factory for this block fed by `inputs` signals.
    pub fn factory(&self, inputs: usize) -> SimResult<BlockFactory> {
        Ok(match self {
            BlockDef::Const { value } => builtins::constant(*value),
            BlockDef::Gain { gain } => builtins::gain(*gain),
            BlockDef::Add if inputs > 2 => builtins::add_n(inputs),
            BlockDef::Add => builtins::add(),
            BlockDef::Sub => builtins::sub(),
            BlockDef::Mul => builtins::mul(),
            BlockDef::Limit { min, max } => builtins::limit(*min, *max),
            BlockDef::Integrate => builtins::integrate(),
            BlockDef::Differentiate => builtins::differentiate(),
            BlockDef::Delay { time } => builtins::delay(*time),
            BlockDef::Pid { kp, ti, td } => builtins::pid(*kp, *ti, *td)?,
            BlockDef::PidReal { kp, ti, td, tp } => {
                builtins::linear(&Linear::pid_real(*kp, *ti, *td, *tp)?)
            }
            BlockDef::Linear {
                numerator,
                denominator,
            } => builtins::linear(&Linear::from_polynomials(
                Polynomial::new(numerator.clone()),
                Polynomial::new(denominator.clone()),
            )),
        })
    }
}

/// One block of a [`SystemDef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    #[serde(default)]
    pub inputs: Vec<String>,
    pub output: String,
    pub block: BlockDef,
}

/// Serializable description of a block system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDef {
    #[serde(default)]
    pub options: SimOptions,
    pub blocks: Vec<BlockEntry>,
}

impl SystemDef {
    pub fn from_yaml(text: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate signal names and assemble an uninitialised [`System`].
    pub fn build(&self) -> SimResult<System> {
        let mut system = System::new().with_options(self.options.clone());
        for entry in &self.blocks {
            for name in entry.inputs.iter().chain(std::iter::once(&entry.output)) {
                if !is_ident(name) {
                    return Err(SimError::InvalidSignalName { name: name.clone() });
                }
            }
            let factory = entry.block.factory(entry.inputs.len())?;
            let inputs: Vec<&str> = entry.inputs.iter().map(String::as_str).collect();
            system.add_block(&inputs, &entry.output, factory);
        }
        Ok(system)
    }

    /// Build, initialise and run to `t_max`.
    pub fn simulate(&self, t_max: f64) -> SimResult<SimRecord> {
        let mut system = self.build()?;
        system.initialize()?;
        system.run(t_max)
    }
}

/// Letter first, then letters, digits or underscores.
fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}
