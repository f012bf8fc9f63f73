#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! depcost library
//!
//! Estimates the binary-size cost of adding a crate to a program: a
//! minimal baseline binary is built, a second binary with a
//! side-effect-only import of the target crate is built, and the size
//! delta is reported per target platform. The CLI is a thin layer over
//! this library.
//!
//! # Basic Example
//!
//! Configuring an analysis run:
//!
//! ```
//! use depcost::analyzer::AnalysisConfig;
//! use depcost::platform::{TargetArch, TargetOs};
//!
//! let config = AnalysisConfig::builder()
//!     .dependency("serde")
//!     .target_os(TargetOs::Linux)
//!     .target_arch(TargetArch::X86_64)
//!     .build()
//!     .expect("non-empty dependency set");
//!
//! assert_eq!(config.dependencies(), ["serde"]);
//! ```
//!
//! # Running an analysis
//!
//! `Analyzer::analyze()` walks the full OS × arch × dependency cross
//! product, building each combination from scratch in an isolated
//! working directory:
//!
//! ```no_run
//! use depcost::analyzer::{AnalysisConfig, Analyzer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AnalysisConfig::builder()
//!     .dependency("serde")
//!     .dependency("tokio")
//!     .build()?;
//!
//! let results = Analyzer::new(config).analyze()?;
//! for cost in &results {
//!     match &cost.error {
//!         None => println!("{} {}: {} bytes", cost.package, cost.version, cost.cost_bytes),
//!         Some(err) => eprintln!("{}: build failed: {}", cost.package, err),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Matrix-driven analysis engine, configuration, and results
pub mod analyzer;
/// Command handlers for CLI operations
pub mod cmd;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Minimal probe-project generation
pub mod generator;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Manifest and lockfile reading
pub mod manifest;
/// Single-combination size measurement
pub mod measure;
/// Target OS / architecture model and triple mapping
pub mod platform;
/// External toolchain invocation
pub mod toolchain;
