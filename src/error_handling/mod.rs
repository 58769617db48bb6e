//! Error handling.
//!
//! Typed errors for the fallible seams of the crate:
//! - **Initialization**: logger setup
//! - **Provisioning**: network and validation failures while fetching databases
//! - **Tables**: batch input/output failures
//!
//! Address parsing errors live in `address`, and the PureIPDB reader has its
//! own `IpdbError`. Neither ever escapes the resolver.

mod types;

// Re-export public API
pub use types::{InitializationError, ProvisionError, TableError};
