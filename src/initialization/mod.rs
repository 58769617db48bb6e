//! Application initialization.
//!
//! Only the logger needs process-wide setup; database handles are owned by
//! the `Session` and HTTP clients are built per provisioning run.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
