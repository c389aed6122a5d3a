//! ct-sim: fixed-step simulation of block diagrams.
//!
//! Contains:
//! - block (block factories, step functions, input views)
//! - builtins (constant, arithmetic, limiter, integrator, PID, transfer function, ...)
//! - system (signal wiring, initialisation, explicit Euler driver)
//! - record (sampled output of a run)
//! - def (serde description of a system, YAML or JSON)
//! - error (crate error type)

pub mod block;
pub mod builtins;
pub mod def;
pub mod error;
pub mod record;
pub mod system;

pub use block::{BlockFactory, Inputs, StepFn};
pub use def::{BlockDef, BlockEntry, SystemDef};
pub use error::{SimError, SimResult};
pub use record::SimRecord;
pub use system::{SimOptions, System};
