// ============================================================================
// Utilities Module
// Helper functions for running simulations
// ============================================================================

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::{init_logging, init_logging_with_filter};
