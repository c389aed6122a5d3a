use thiserror::Error;

use crate::twoport::TpKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TwoPortError {
    #[error("cannot create parameters: division by zero")]
    DivisionByZero,

    #[error("cannot add two ports of different types: {a} and {b}")]
    KindMismatch { a: TpKind, b: TpKind },

    #[error("no ports to cascade")]
    NoPorts,
}

pub type TwoPortResult<T> = Result<T, TwoPortError>;
