//! Block system: signal wiring and the fixed-step driver.

use std::collections::HashMap;
use std::fmt;

use ct_core::{ensure_finite, SignalId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{BlockFactory, Inputs, StepFn};
use crate::error::{SimError, SimResult};
use crate::record::SimRecord;

/// Integrator settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Euler step width in seconds
    pub dt: f64,
    /// Steps between two recorded samples
    pub skip: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-5,
            skip: 1000,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if ensure_finite(self.dt, "time step")? <= 0.0 {
            return Err(SimError::InvalidArg {
                what: format!("time step must be positive, got {}", self.dt),
            });
        }
        if self.skip == 0 {
            return Err(SimError::InvalidArg {
                what: "skip must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

struct SystemBlock {
    factory: BlockFactory,
    inputs: Vec<String>,
    output: String,
}

impl fmt::Display for SystemBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}]->{}", self.factory.name(), self.inputs.join(", "), self.output)
    }
}

struct BoundBlock {
    label: String,
    inputs: Vec<SignalId>,
    step: StepFn,
}

struct Running {
    outputs: Vec<String>,
    blocks: Vec<BoundBlock>,
    values: Vec<f64>,
}

/// Ordered list of blocks, each reading named signals and producing one.
///
/// Inputs may name outputs of later blocks: within a step every block sees
/// the values of the previous step, so declaration order does not matter.
#[derive(Default)]
pub struct System {
    blocks: Vec<SystemBlock>,
    options: SimOptions,
    running: Option<Running>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: SimOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Append a block reading `inputs` and writing `output`.
    ///
    /// Wiring is checked by [`System::initialize`].
    pub fn add_block(&mut self, inputs: &[&str], output: &str, factory: BlockFactory) -> &mut Self {
        self.blocks.push(SystemBlock {
            factory,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
        });
        self.running = None;
        self
    }

    /// Output signal names in block order.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.output.as_str())
    }

    /// Check the wiring, allocate the signal array and create fresh step
    /// functions.
    ///
    /// Calling it again restarts the system from rest.
    pub fn initialize(&mut self) -> SimResult<()> {
        self.running = None;

        let mut slots: HashMap<&str, SignalId> = HashMap::new();
        let mut outputs = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if block.inputs.len() != block.factory.arity() {
                return Err(SimError::InputCount {
                    block: block.to_string(),
                });
            }
            if slots.contains_key(block.output.as_str()) {
                return Err(SimError::DuplicateSignal {
                    name: block.output.clone(),
                });
            }
            let id = SignalId::from_index(outputs.len()).ok_or_else(|| SimError::InvalidArg {
                what: "too many signals".to_string(),
            })?;
            slots.insert(block.output.as_str(), id);
            outputs.push(block.output.clone());
        }
        if outputs.is_empty() {
            return Err(SimError::NoOutputs);
        }

        for block in &self.blocks {
            if let Some(missing) = block.inputs.iter().find(|i| !slots.contains_key(i.as_str())) {
                return Err(SimError::UndefinedInput {
                    name: missing.clone(),
                });
            }
        }

        let mut bound = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let step = block.factory.create().map_err(|e| SimError::BlockCreation {
                block: block.to_string(),
                source: Box::new(e),
            })?;
            bound.push(BoundBlock {
                label: block.to_string(),
                inputs: block.inputs.iter().map(|i| slots[i.as_str()]).collect(),
                step,
            });
        }

        debug!(blocks = bound.len(), signals = outputs.len(), "system initialized");
        self.running = Some(Running {
            values: vec![0.0; outputs.len()],
            outputs,
            blocks: bound,
        });
        Ok(())
    }

    /// Simulate from `t = 0` to `t_max` with the system's options.
    pub fn run(&mut self, t_max: f64) -> SimResult<SimRecord> {
        let options = self.options.clone();
        self.run_with(t_max, &options)
    }

    /// Simulate from `t = 0` to `t_max` with explicit Euler steps.
    ///
    /// Every `skip`-th step records the current value of every signal
    /// before the blocks advance. Block state carries over from a previous
    /// run unless the system is initialised again.
    pub fn run_with(&mut self, t_max: f64, options: &SimOptions) -> SimResult<SimRecord> {
        options.validate()?;
        ensure_finite(t_max, "simulation end time")?;
        let Running {
            outputs,
            blocks,
            values,
        } = self.running.as_mut().ok_or(SimError::NotInitialized)?;

        debug!(t_max, dt = options.dt, skip = options.skip, "simulation started");
        let mut record = SimRecord::new(outputs.clone());
        let mut next = vec![0.0; values.len()];
        let mut count = options.skip;
        let mut t = 0.0;
        while t < t_max {
            count -= 1;
            if count == 0 {
                record.push(t, &values[..]);
                count = options.skip;
            }

            for (slot, block) in next.iter_mut().zip(blocks.iter_mut()) {
                let inputs = Inputs::new(&values[..], &block.inputs);
                *slot = (block.step)(&inputs, t, options.dt).map_err(|e| SimError::Step {
                    block: block.label.clone(),
                    source: Box::new(e),
                })?;
            }
            values.copy_from_slice(&next);
            t += options.dt;
        }
        debug!(samples = record.len(), t, "simulation finished");
        Ok(record)
    }
}
