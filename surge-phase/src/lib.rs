//! Phase plumbing for surge
//!
//! Each phase reads the previous phase's JSON-Lines output, hands every
//! `(worker, iteration)` pair its own slice of that input and appends one
//! record per completed iteration to its own output file.

pub mod error;
pub mod exchange;
pub mod partition;
pub mod records;
pub mod shuffle;

pub use error::{ExchangeError, ExchangeResult};
pub use exchange::{PhaseFile, PhaseWriter};
pub use partition::{wallet_index, ExecutionContext};
pub use records::*;
pub use shuffle::{shuffle, shuffled};
