//! The analysis engine: matrix-driven build/measure/diff.
//!
//! Walks the OS × architecture × dependency cross product sequentially. One
//! baseline is measured per platform and memoized for the run; baselines are
//! foundational, so any baseline failure aborts the whole run. Per-dependency
//! measurements are isolated in their own working directories so that one
//! dependency's breakage (bad identifier, network failure, version conflict)
//! never blocks measurement of the others.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::generator::DependencySpec;
use crate::infra::{FileSystem, RealFileSystem};
use crate::manifest::{self, ResolvedDependency};
use crate::measure::{MeasureError, SizeMeasurer};
use crate::platform::Platform;
use crate::toolchain::{CargoToolchain, Toolchain};

use super::config::AnalysisConfig;
use super::progress::{NoOpSink, ProgressSink};
use super::result::DependencyCost;

/// Errors that abort an entire analysis run
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A baseline could not be established for some platform
    #[error("baseline measurement failed for {platform}: {source}")]
    Baseline {
        /// Platform whose baseline failed
        platform: Platform,
        /// Underlying measurement error
        #[source]
        source: MeasureError,
    },
}

/// Runs the analysis described by an [`AnalysisConfig`].
///
/// Generic over [`Toolchain`] and [`FileSystem`] so the matrix orchestration,
/// error isolation, and cost derivation are testable without shelling out.
pub struct Analyzer<T: Toolchain = CargoToolchain, FS: FileSystem = RealFileSystem> {
    config: AnalysisConfig,
    toolchain: T,
    fs: FS,
    progress: Box<dyn ProgressSink>,
}

impl Analyzer {
    /// Create an analyzer that builds with the real cargo toolchain
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_parts(config, CargoToolchain::new(), RealFileSystem)
    }
}

impl<T: Toolchain, FS: FileSystem> Analyzer<T, FS> {
    /// Create an analyzer with custom toolchain and filesystem implementations
    pub fn with_parts(config: AnalysisConfig, toolchain: T, fs: FS) -> Self {
        Self {
            config,
            toolchain,
            fs,
            progress: Box::new(NoOpSink),
        }
    }

    /// Attach a progress sink
    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// The configuration this analyzer was built with
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Measure every configured combination.
    ///
    /// Returns one [`DependencyCost`] per (OS, architecture, dependency)
    /// triple, ordered OS-outer, architecture-middle, dependency-inner.
    /// Individual entries may represent failures; only a failed *baseline*
    /// aborts the run, since no result is usable without one.
    pub fn analyze(&self) -> Result<Vec<DependencyCost>, AnalyzerError> {
        let measurer = SizeMeasurer::new(&self.toolchain, &self.fs);
        let dependencies: Vec<DependencySpec> = self
            .config
            .dependencies()
            .iter()
            .map(|id| DependencySpec::parse(id))
            .collect();

        let mut platforms = Vec::new();
        for &os in self.config.target_oses() {
            for &arch in self.config.target_arches() {
                platforms.push(Platform::new(os, arch));
            }
        }

        self.progress
            .begin(platforms.len() * (1 + dependencies.len()));

        // Phase 1: one baseline per platform, memoized for the run. A missing
        // baseline invalidates every result on that platform, so any failure
        // here aborts the run.
        let mut baselines: HashMap<Platform, u64> = HashMap::new();
        for &platform in &platforms {
            self.progress.measuring(&format!("baseline {platform}"));
            let work_dir = self.platform_dir(platform).join("baseline");
            let outcome = measurer.measure(&work_dir, None, platform);
            self.cleanup(&work_dir);
            let measured =
                outcome.map_err(|source| AnalyzerError::Baseline { platform, source })?;
            baselines.insert(platform, measured.bytes);
        }

        // Phase 2: the full cross product, one isolated working directory per
        // triple, removed unconditionally afterward.
        let mut results = Vec::with_capacity(platforms.len() * dependencies.len());
        for &platform in &platforms {
            let baseline = baselines[&platform];
            for dep in &dependencies {
                self.progress
                    .measuring(&format!("{} on {platform}", dep.raw()));
                let work_dir = self.platform_dir(platform).join(dep.slug());
                let start = Instant::now();
                let outcome = self.measure_with_version(&measurer, &work_dir, dep, platform);
                self.cleanup(&work_dir);
                let duration = start.elapsed();

                match outcome {
                    Ok((bytes, resolved)) => results.push(DependencyCost {
                        duration,
                        error: None,
                        package: resolved.package,
                        version: resolved.version,
                        os: platform.os,
                        arch: platform.arch,
                        baseline_bytes: baseline,
                        with_dependency_bytes: bytes,
                        cost_bytes: bytes as i64 - baseline as i64,
                    }),
                    Err(err) => results.push(DependencyCost::failed(
                        dep.raw(),
                        platform,
                        duration,
                        err.to_string(),
                    )),
                }
            }
        }

        for &platform in &platforms {
            self.cleanup(&self.platform_dir(platform));
        }
        self.progress.finished();

        Ok(results)
    }

    fn measure_with_version(
        &self,
        measurer: &SizeMeasurer<'_, T, FS>,
        work_dir: &Path,
        dep: &DependencySpec,
        platform: Platform,
    ) -> Result<(u64, ResolvedDependency), MeasureError> {
        let measured = measurer.measure(work_dir, Some(dep), platform)?;

        let lockfile = self
            .fs
            .read_to_string(&work_dir.join("Cargo.lock"))
            .map_err(|source| MeasureError::Io {
                context: "reading Cargo.lock".to_string(),
                source,
            })?;
        let resolved = manifest::resolve_version(&lockfile, &measured.package_name, dep.slug())?;

        Ok((measured.bytes, resolved))
    }

    fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.config.work_root().join(platform.slug())
    }

    /// Best-effort removal of a working directory. Deletion failures are
    /// logged, never escalated: cleanup is not essential to the correctness
    /// of the returned results.
    fn cleanup(&self, dir: &Path) {
        if let Err(err) = self.fs.remove_dir_all(dir) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("unable to remove '{}': {}", dir.display(), err);
            }
        }
    }
}
