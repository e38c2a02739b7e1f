//! Logging initialisation for surge
//!
//! Installs a global `tracing` subscriber. The fmt layer also bridges
//! records emitted through the `log` facade (used by the retry engine).

mod init;

pub use init::{build_filter, init_logging, init_simple_tracing};
