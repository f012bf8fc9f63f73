//! Single-combination size measurement.
//!
//! One measurement = generate a probe project into a working directory, run
//! the toolchain's fetch and compile steps for the requested platform, then
//! stat the produced binary. Fails fast at the first sub-step failure;
//! cleanup of the working directory is the caller's responsibility.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::generator::{self, DependencySpec, GeneratorError};
use crate::infra::FileSystem;
use crate::platform::Platform;
use crate::toolchain::{Toolchain, ToolchainError};

/// Errors that can occur measuring one (dependency, platform) combination
#[derive(Error, Debug)]
pub enum MeasureError {
    /// Probe-project generation failed
    #[error(transparent)]
    Generate(#[from] GeneratorError),

    /// Toolchain fetch or compile failed
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// The lockfile produced by the build could not be parsed
    #[error(transparent)]
    Manifest(#[from] crate::manifest::ManifestError),

    /// I/O error preparing the working directory or statting the binary
    #[error("I/O error ({context}): {source}")]
    Io {
        /// What was being done when the error occurred
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The produced binary path is unexpectedly a directory
    #[error("expected output binary, found a directory: {0}")]
    NotAFile(std::path::PathBuf),
}

/// Outcome of one successful measurement
#[derive(Debug, Clone)]
pub struct MeasuredBuild {
    /// Size of the produced binary in bytes
    pub bytes: u64,
    /// Package name of the generated probe project (the lockfile's root)
    pub package_name: String,
}

/// Measures the binary size of one probe build.
pub struct SizeMeasurer<'a, T: Toolchain, FS: FileSystem> {
    toolchain: &'a T,
    fs: &'a FS,
}

impl<'a, T: Toolchain, FS: FileSystem> SizeMeasurer<'a, T, FS> {
    /// Create a measurer over the given toolchain and filesystem
    pub fn new(toolchain: &'a T, fs: &'a FS) -> Self {
        Self { toolchain, fs }
    }

    /// Generate, build, and stat one probe project in `work_dir`.
    ///
    /// `dependency` of `None` measures the zero-dependency baseline.
    pub fn measure(
        &self,
        work_dir: &Path,
        dependency: Option<&DependencySpec>,
        platform: Platform,
    ) -> Result<MeasuredBuild, MeasureError> {
        let project = generator::generate(dependency)?;

        self.fs
            .create_dir_all(work_dir)
            .map_err(|source| MeasureError::Io {
                context: format!("creating {}", work_dir.display()),
                source,
            })?;
        self.fs
            .write(&work_dir.join("Cargo.toml"), &project.manifest)
            .map_err(|source| MeasureError::Io {
                context: "writing Cargo.toml".to_string(),
                source,
            })?;
        self.fs
            .write(&work_dir.join("main.rs"), &project.entry_point)
            .map_err(|source| MeasureError::Io {
                context: "writing main.rs".to_string(),
                source,
            })?;

        self.toolchain.prepare(work_dir, platform)?;
        self.toolchain.compile(work_dir, platform)?;

        let binary = self.toolchain.binary_path(work_dir, platform);
        let metadata = self
            .fs
            .metadata(&binary)
            .map_err(|source| MeasureError::Io {
                context: format!("statting {}", binary.display()),
                source,
            })?;
        if metadata.is_dir() {
            return Err(MeasureError::NotAFile(binary));
        }

        Ok(MeasuredBuild {
            bytes: metadata.len(),
            package_name: project.package_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::RealFileSystem;
    use crate::platform::{TargetArch, TargetOs};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Toolchain fake that writes a binary of a configured size instead of
    /// shelling out.
    #[derive(Clone)]
    struct FakeToolchain {
        binary_size: u64,
        fail_prepare: Arc<Mutex<bool>>,
        fail_compile: Arc<Mutex<bool>>,
    }

    impl FakeToolchain {
        fn new(binary_size: u64) -> Self {
            Self {
                binary_size,
                fail_prepare: Arc::new(Mutex::new(false)),
                fail_compile: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl Toolchain for FakeToolchain {
        fn prepare(&self, _work_dir: &Path, _platform: Platform) -> Result<(), ToolchainError> {
            if *self.fail_prepare.lock().unwrap() {
                return Err(ToolchainError::FetchFailed("no such package".to_string()));
            }
            Ok(())
        }

        fn compile(&self, work_dir: &Path, platform: Platform) -> Result<(), ToolchainError> {
            if *self.fail_compile.lock().unwrap() {
                return Err(ToolchainError::BuildFailed("compile error".to_string()));
            }
            let binary = self.binary_path(work_dir, platform);
            std::fs::create_dir_all(binary.parent().unwrap())?;
            std::fs::write(&binary, vec![0u8; self.binary_size as usize])?;
            Ok(())
        }

        fn binary_path(&self, work_dir: &Path, _platform: Platform) -> PathBuf {
            work_dir.join("out").join("probe")
        }
    }

    fn linux_amd64() -> Platform {
        Platform::new(TargetOs::Linux, TargetArch::X86_64)
    }

    #[test]
    fn test_measure_baseline_returns_binary_size() {
        let temp = TempDir::new().unwrap();
        let toolchain = FakeToolchain::new(4096);
        let fs = RealFileSystem;
        let measurer = SizeMeasurer::new(&toolchain, &fs);

        let measured = measurer
            .measure(&temp.path().join("base"), None, linux_amd64())
            .unwrap();

        assert_eq!(measured.bytes, 4096);
        assert_eq!(measured.package_name, "sizeprobe");
    }

    #[test]
    fn test_measure_writes_generated_project_files() {
        let temp = TempDir::new().unwrap();
        let toolchain = FakeToolchain::new(1);
        let fs = RealFileSystem;
        let measurer = SizeMeasurer::new(&toolchain, &fs);

        let dep = DependencySpec::parse("serde");
        let work_dir = temp.path().join("serde");
        measurer.measure(&work_dir, Some(&dep), linux_amd64()).unwrap();

        let manifest = std::fs::read_to_string(work_dir.join("Cargo.toml")).unwrap();
        assert!(manifest.contains("sizeprobe-serde"));
        let entry = std::fs::read_to_string(work_dir.join("main.rs")).unwrap();
        assert!(entry.contains("use serde as _;"));
    }

    #[test]
    fn test_measure_fails_fast_on_fetch_error() {
        let temp = TempDir::new().unwrap();
        let toolchain = FakeToolchain::new(1);
        *toolchain.fail_prepare.lock().unwrap() = true;
        let fs = RealFileSystem;
        let measurer = SizeMeasurer::new(&toolchain, &fs);

        let err = measurer
            .measure(temp.path(), None, linux_amd64())
            .unwrap_err();
        assert!(matches!(
            err,
            MeasureError::Toolchain(ToolchainError::FetchFailed(_))
        ));
        // Compile never ran, so no binary was produced.
        assert!(!temp.path().join("out").exists());
    }

    #[test]
    fn test_measure_surfaces_compile_error() {
        let temp = TempDir::new().unwrap();
        let toolchain = FakeToolchain::new(1);
        *toolchain.fail_compile.lock().unwrap() = true;
        let fs = RealFileSystem;
        let measurer = SizeMeasurer::new(&toolchain, &fs);

        let err = measurer
            .measure(temp.path(), None, linux_amd64())
            .unwrap_err();
        assert!(matches!(
            err,
            MeasureError::Toolchain(ToolchainError::BuildFailed(_))
        ));
    }

    #[test]
    fn test_measure_rejects_directory_at_binary_path() {
        // Toolchain "succeeds" but leaves a directory where the binary
        // should be.
        #[derive(Clone)]
        struct DirToolchain;
        impl Toolchain for DirToolchain {
            fn prepare(&self, _: &Path, _: Platform) -> Result<(), ToolchainError> {
                Ok(())
            }
            fn compile(&self, work_dir: &Path, platform: Platform) -> Result<(), ToolchainError> {
                std::fs::create_dir_all(self.binary_path(work_dir, platform))?;
                Ok(())
            }
            fn binary_path(&self, work_dir: &Path, _: Platform) -> PathBuf {
                work_dir.join("probe")
            }
        }

        let temp = TempDir::new().unwrap();
        let fs = RealFileSystem;
        let measurer = SizeMeasurer::new(&DirToolchain, &fs);

        let err = measurer
            .measure(temp.path(), None, linux_amd64())
            .unwrap_err();
        assert!(matches!(err, MeasureError::NotAFile(_)));
    }

    #[test]
    fn test_measure_invalid_dependency_name_is_generation_error() {
        let temp = TempDir::new().unwrap();
        let toolchain = FakeToolchain::new(1);
        let fs = RealFileSystem;
        let measurer = SizeMeasurer::new(&toolchain, &fs);

        let dep = DependencySpec::parse("9lives");
        let err = measurer
            .measure(temp.path(), Some(&dep), linux_amd64())
            .unwrap_err();
        assert!(matches!(err, MeasureError::Generate(_)));
    }
}
