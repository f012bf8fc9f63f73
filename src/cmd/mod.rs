//! Command handlers for the depcost CLI
//!
//! Thin presentation layer: argument plumbing, progress display, and result
//! formatting. The measurement logic lives in [`crate::analyzer`].

pub mod completions;
pub mod cost;

pub use completions::cmd_completions;
pub use cost::cmd_cost;
