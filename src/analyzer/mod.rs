//! Matrix-driven analysis engine.
//!
//! Computes one baseline binary size per target platform, one
//! with-dependency size per (dependency, platform) combination, and derives
//! the per-dependency size cost, with per-combination error isolation.

pub mod config;
pub mod engine;
pub mod progress;
pub mod result;

pub use config::{default_work_root, AnalysisConfig, AnalysisConfigBuilder, ConfigError};
pub use engine::{Analyzer, AnalyzerError};
pub use progress::{NoOpSink, ProgressSink};
pub use result::DependencyCost;
