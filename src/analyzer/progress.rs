//! Pluggable progress reporting for long-running analysis runs.
//!
//! An analysis can take seconds to minutes per combination (network fetch
//! plus a from-scratch build), so the engine emits coarse progress events
//! through this trait. The default sink does nothing; the CLI plugs in a
//! progress bar.

/// Receiver for analysis progress events
pub trait ProgressSink {
    /// Called once before any measurement, with the total measurement count
    /// (baselines plus combinations)
    fn begin(&self, _total: usize) {}

    /// Called before each measurement with a human-readable label
    fn measuring(&self, _label: &str) {}

    /// Called once after the last measurement
    fn finished(&self) {}
}

/// Sink that discards all events (default)
pub struct NoOpSink;

impl ProgressSink for NoOpSink {}
