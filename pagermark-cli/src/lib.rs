// All core functionality is in pagermark-core
// This CLI acts as a thin wrapper around the core library

// Re-export core types for convenience
pub use pagermark_core::*;
