//! Enhanced error types with contextual suggestions
//!
//! Provides structured top-level errors that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Proper exit codes for CI/CD

use std::path::PathBuf;
use thiserror::Error;

use crate::analyzer::{AnalyzerError, ConfigError};

/// Top-level depcost errors with contextual suggestions
#[derive(Error, Debug)]
pub enum DepcostError {
    /// Required tool is not installed
    #[error("Tool not installed: {tool}")]
    ToolMissing {
        /// Tool name
        tool: String,
        /// Installation command
        install_cmd: String,
    },

    /// Invalid analysis configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Manifest supplied for dependency discovery could not be read
    #[error("Manifest not found: {path}")]
    ManifestNotFound {
        /// Path to the manifest
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// The analysis run aborted
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalyzerError),

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl DepcostError {
    /// Get actionable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ToolMissing { install_cmd, .. } => Some(format!("Install with: {}", install_cmd)),
            Self::Config(ConfigError::NoDependencies) => Some(
                "Pass one or more crate names, or discover them with --from-manifest Cargo.toml"
                    .to_string(),
            ),
            Self::Config(ConfigError::Manifest(_)) => {
                Some("Check that the supplied manifest is valid TOML".to_string())
            }
            Self::ManifestNotFound { path, .. } => Some(format!(
                "Ensure {} exists, or omit --from-manifest and pass crate names directly",
                path.display()
            )),
            Self::Analysis(AnalyzerError::Baseline { platform, .. }) => Some(format!(
                "The zero-dependency baseline must build before anything can be measured.\n  \
                 If this is a cross-compilation target, install it first: rustup target add {}",
                platform.triple()
            )),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error, following sysexits.h
    /// conventions where one applies.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolMissing { .. } => 127, // Command not found (Unix convention)
            Self::Config(_) => 64,           // EX_USAGE
            Self::ManifestNotFound { .. } => 66, // EX_NOINPUT
            Self::Analysis(_) => 1,          // Generic error (run failed)
            Self::Io { .. } => 74,           // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with cause chain and suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(dc_error) = error.downcast_ref::<DepcostError>() {
            if let Some(suggestion) = dc_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(dc_error) = error.downcast_ref::<DepcostError>() {
            dc_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}
