use ct_core::{format_g, CtError};
use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("error reading data for '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: CtError,
    },

    #[error("data points '{name}' are not in ascending order: {} < {}", g(.new), g(.old))]
    NotAscending { name: String, new: f64, old: f64 },

    #[error("time {} is not a valid unix date", g(.value))]
    InvalidDate { value: f64 },
}

fn g(v: &f64) -> String {
    format_g(*v)
}
