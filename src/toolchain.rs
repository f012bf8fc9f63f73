//! External toolchain invocation.
//!
//! The engine only needs a narrow capability from the build toolchain: fetch
//! the dependencies of a generated project, compile it to a single
//! fixed-named binary for a pinned platform, and say where that binary lands.
//! [`Toolchain`] captures exactly that, so the engine is testable with a fake
//! implementation that never shells out. [`CargoToolchain`] is the real one.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::generator::PROBE_BIN;
use crate::infra::{CommandExecutor, RealCommandExecutor};
use crate::platform::Platform;

/// Errors that can occur invoking the external toolchain
#[derive(Error, Debug)]
pub enum ToolchainError {
    /// cargo is not installed or not in PATH
    #[error("cargo not found in PATH")]
    CargoMissing,

    /// The toolchain process could not be spawned
    #[error("failed to run cargo: {0}")]
    Spawn(#[from] std::io::Error),

    /// Dependency fetch exited non-zero; message is the raw stderr
    #[error("dependency fetch failed: {0}")]
    FetchFailed(String),

    /// Compilation exited non-zero; message is the raw stderr
    #[error("build failed: {0}")]
    BuildFailed(String),
}

/// Narrow capability the analysis engine needs from a build toolchain
pub trait Toolchain {
    /// Fetch/resolve all dependencies referenced by the project in `work_dir`
    fn prepare(&self, work_dir: &Path, platform: Platform) -> Result<(), ToolchainError>;

    /// Compile the project in `work_dir` to a single output binary
    fn compile(&self, work_dir: &Path, platform: Platform) -> Result<(), ToolchainError>;

    /// Where the output binary lands after a successful [`Toolchain::compile`]
    fn binary_path(&self, work_dir: &Path, platform: Platform) -> PathBuf;
}

/// Verify that cargo is installed, returning its path.
pub fn ensure_cargo() -> Result<PathBuf, ToolchainError> {
    which::which("cargo").map_err(|_| ToolchainError::CargoMissing)
}

/// Toolchain implementation that shells out to cargo.
///
/// Platform purity: the target triple is always passed explicitly (host
/// included) and inherited rustc/cargo environment is scrubbed, so the
/// measured size reflects only the generated source for the pinned platform.
#[derive(Debug, Clone)]
pub struct CargoToolchain<CE: CommandExecutor = RealCommandExecutor> {
    executor: CE,
}

impl Default for CargoToolchain {
    fn default() -> Self {
        Self::with_executor(RealCommandExecutor)
    }
}

impl CargoToolchain {
    /// Create a toolchain that runs the real cargo binary
    pub fn new() -> Self {
        Self::default()
    }
}

impl<CE: CommandExecutor> CargoToolchain<CE> {
    /// Create a toolchain with a custom command executor
    pub fn with_executor(executor: CE) -> Self {
        Self { executor }
    }

    fn run_cargo(
        &self,
        work_dir: &Path,
        platform: Platform,
        args: &[&str],
    ) -> Result<std::process::Output, ToolchainError> {
        let output = self.executor.execute(
            |cmd| {
                cmd.current_dir(work_dir)
                    .args(args)
                    .arg("--target")
                    .arg(platform.triple())
                    // Strip inherited build flags (including coverage
                    // instrumentation under cargo llvm-cov) so the probe
                    // build is not skewed by the ambient environment. The
                    // target-dir overrides would also redirect the output
                    // binary away from where binary_path expects it.
                    .env_remove("CARGO_INCREMENTAL")
                    .env_remove("RUSTFLAGS")
                    .env_remove("CARGO_ENCODED_RUSTFLAGS")
                    .env_remove("CARGO_TARGET_DIR")
                    .env_remove("CARGO_BUILD_TARGET_DIR")
                    .env_remove("LLVM_PROFILE_FILE")
                    .env_remove("CARGO_LLVM_COV")
                    .env_remove("CARGO_LLVM_COV_TARGET_DIR")
            },
            "cargo",
        )?;
        Ok(output)
    }
}

impl<CE: CommandExecutor> Toolchain for CargoToolchain<CE> {
    fn prepare(&self, work_dir: &Path, platform: Platform) -> Result<(), ToolchainError> {
        let output = self.run_cargo(work_dir, platform, &["fetch"])?;
        if !output.status.success() {
            return Err(ToolchainError::FetchFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(())
    }

    fn compile(&self, work_dir: &Path, platform: Platform) -> Result<(), ToolchainError> {
        // Explicit --target-dir pins the output location even against a
        // build.target-dir in the user's cargo config.
        let output = self.run_cargo(
            work_dir,
            platform,
            &["build", "--release", "--target-dir", "target"],
        )?;
        if !output.status.success() {
            return Err(ToolchainError::BuildFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(())
    }

    fn binary_path(&self, work_dir: &Path, platform: Platform) -> PathBuf {
        work_dir
            .join("target")
            .join(platform.triple())
            .join("release")
            .join(format!("{}{}", PROBE_BIN, platform.exe_suffix()))
    }
}
