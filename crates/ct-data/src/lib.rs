//! ct-data: tabular export of sample streams.
//!
//! Contains:
//! - data (named series bundled with a time axis)
//! - format (DAT and CSV row writers)
//! - merge (concurrent merge of ascending streams into rows)
//! - error (export errors)

pub mod data;
pub mod error;
pub mod format;
mod merge;

pub use data::{Data, DataContent};
pub use error::{DataError, DataResult};
pub use format::{Csv, Dat, Format};
