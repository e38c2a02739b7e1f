//! Backend operations, one module per API area
//!
//! Lookups that may legitimately find nothing return `Ok(None)`; the
//! caller decides whether that fails the iteration.

pub mod connections;
pub mod definitions;
pub mod issuance;
pub mod revocation;
pub mod tenants;
pub mod trust_registry;
pub mod verification;
