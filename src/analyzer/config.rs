//! Analysis configuration and its validating builder.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::{self, ManifestError};
use crate::platform::{TargetArch, TargetOs};

/// Errors that can occur constructing an [`AnalysisConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No dependency identifiers were supplied
    #[error("must specify at least one dependency to analyze")]
    NoDependencies,

    /// A supplied manifest could not be parsed for dependency discovery
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Default work root: a fixed subdirectory of the system temp directory.
///
/// Pure default resolution; callers opt in by not setting an explicit root.
pub fn default_work_root() -> PathBuf {
    std::env::temp_dir().join("depcost")
}

/// Immutable configuration for one analysis run.
///
/// Built once via [`AnalysisConfig::builder`], validated at construction,
/// then reused read-only for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    work_root: PathBuf,
    dependencies: Vec<String>,
    target_oses: Vec<TargetOs>,
    target_arches: Vec<TargetArch>,
}

impl AnalysisConfig {
    /// Start building a configuration
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Root directory under which per-build working directories are created
    pub fn work_root(&self) -> &Path {
        &self.work_root
    }

    /// Dependency identifiers to measure
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Target operating systems
    pub fn target_oses(&self) -> &[TargetOs] {
        &self.target_oses
    }

    /// Target architectures
    pub fn target_arches(&self) -> &[TargetArch] {
        &self.target_arches
    }
}

/// Builder for [`AnalysisConfig`].
///
/// Defaults are applied only where nothing was set: host OS, host
/// architecture, [`default_work_root`]. An empty dependency set fails
/// validation; no working directory is created by construction.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    work_root: Option<PathBuf>,
    dependencies: Vec<String>,
    target_oses: Vec<TargetOs>,
    target_arches: Vec<TargetArch>,
}

impl AnalysisConfigBuilder {
    /// Set the work root directory
    pub fn work_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_root = Some(path.into());
        self
    }

    /// Add one dependency identifier
    pub fn dependency(mut self, identifier: impl Into<String>) -> Self {
        self.dependencies.push(identifier.into());
        self
    }

    /// Add many dependency identifiers
    pub fn dependencies<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Add the direct dependencies declared by an existing Cargo.toml
    pub fn dependencies_from_manifest(mut self, manifest: &str) -> Result<Self, ConfigError> {
        self.dependencies.extend(manifest::direct_dependencies(manifest)?);
        Ok(self)
    }

    /// Add one target operating system
    pub fn target_os(mut self, os: TargetOs) -> Self {
        self.target_oses.push(os);
        self
    }

    /// Add one target architecture
    pub fn target_arch(mut self, arch: TargetArch) -> Self {
        self.target_arches.push(arch);
        self
    }

    /// Add many target operating systems
    pub fn target_oses(mut self, oses: impl IntoIterator<Item = TargetOs>) -> Self {
        self.target_oses.extend(oses);
        self
    }

    /// Add many target architectures
    pub fn target_arches(mut self, arches: impl IntoIterator<Item = TargetArch>) -> Self {
        self.target_arches.extend(arches);
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        if self.dependencies.is_empty() {
            return Err(ConfigError::NoDependencies);
        }

        let mut target_oses = self.target_oses;
        if target_oses.is_empty() {
            target_oses.push(TargetOs::host());
        }
        let mut target_arches = self.target_arches;
        if target_arches.is_empty() {
            target_arches.push(TargetArch::host());
        }

        Ok(AnalysisConfig {
            work_root: self.work_root.unwrap_or_else(default_work_root),
            dependencies: self.dependencies,
            target_oses,
            target_arches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dependency_set_fails_validation() {
        let result = AnalysisConfig::builder().build();
        assert!(matches!(result, Err(ConfigError::NoDependencies)));
    }

    #[test]
    fn test_failed_construction_creates_no_working_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("never-created");

        let result = AnalysisConfig::builder().work_root(&root).build();
        assert!(result.is_err());
        assert!(!root.exists());
    }

    #[test]
    fn test_successful_construction_creates_no_working_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("lazy");

        let config = AnalysisConfig::builder()
            .work_root(&root)
            .dependency("serde")
            .build()
            .unwrap();
        assert_eq!(config.work_root(), root);
        assert!(!root.exists());
    }

    #[test]
    fn test_defaults_applied_only_where_unset() {
        let config = AnalysisConfig::builder()
            .dependency("serde")
            .target_os(TargetOs::Windows)
            .build()
            .unwrap();

        assert_eq!(config.target_oses(), [TargetOs::Windows]);
        assert_eq!(config.target_arches(), [TargetArch::host()]);
        assert_eq!(config.work_root(), default_work_root());
    }

    #[test]
    fn test_dependencies_accumulate_in_order() {
        let config = AnalysisConfig::builder()
            .dependency("serde")
            .dependencies(["tokio", "log"])
            .build()
            .unwrap();
        assert_eq!(config.dependencies(), ["serde", "tokio", "log"]);
    }

    #[test]
    fn test_dependencies_from_manifest_discovers_direct_deps() {
        let manifest = r#"
[package]
name = "app"

[dependencies]
serde = "1"
log = "0.4"
"#;
        let config = AnalysisConfig::builder()
            .dependencies_from_manifest(manifest)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.dependencies(), ["serde", "log"]);
    }

    #[test]
    fn test_manifest_with_no_deps_still_requires_explicit_ones() {
        let builder = AnalysisConfig::builder()
            .dependencies_from_manifest("[package]\nname = \"app\"\n")
            .unwrap();
        assert!(matches!(builder.build(), Err(ConfigError::NoDependencies)));
    }

    #[test]
    fn test_default_work_root_is_temp_subdirectory() {
        let root = default_work_root();
        assert!(root.starts_with(std::env::temp_dir()));
        assert!(root.ends_with("depcost"));
    }
}
