//! Error types for building and running block systems.

use ct_core::CtError;
use ct_poly::PolyError;
use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid number of inputs in '{block}'")]
    InputCount { block: String },

    #[error("signal {name} is created twice")]
    DuplicateSignal { name: String },

    #[error("no outputs defined")]
    NoOutputs,

    #[error("input {name} is not defined")]
    UndefinedInput { name: String },

    #[error("invalid signal name {name}")]
    InvalidSignalName { name: String },

    #[error("error creating block '{block}': {source}")]
    BlockCreation {
        block: String,
        #[source]
        source: Box<SimError>,
    },

    #[error("error in block '{block}': {source}")]
    Step {
        block: String,
        #[source]
        source: Box<SimError>,
    },

    #[error("system is not initialized")]
    NotInitialized,

    #[error("unknown signal {name}")]
    UnknownSignal { name: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("{message}")]
    Block { message: String },

    #[error(transparent)]
    Core(#[from] CtError),

    #[error(transparent)]
    Poly(#[from] PolyError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Failure raised inside a user supplied block function.
    pub fn block(message: impl Into<String>) -> Self {
        Self::Block {
            message: message.into(),
        }
    }
}
