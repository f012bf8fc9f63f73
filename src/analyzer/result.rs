//! Per-combination analysis results.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::platform::{Platform, TargetArch, TargetOs};

/// Outcome of measuring one (dependency, OS, architecture) combination.
///
/// When `error` is present, the size and version fields are zero-valued and
/// must not be interpreted. When it is absent, `cost_bytes` is exactly
/// `with_dependency_bytes - baseline_bytes`; the cost is signed, so a
/// with-dependency binary smaller than the baseline yields a negative cost
/// rather than wrapping.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyCost {
    /// How long this combination took to measure
    #[serde(rename = "duration_ms", serialize_with = "duration_ms")]
    pub duration: Duration,
    /// Failure message, if the combination could not be measured
    pub error: Option<String>,
    /// Resolved package name (requested identifier on failure)
    pub package: String,
    /// Resolved version (empty on failure)
    pub version: String,
    /// Target operating system
    pub os: TargetOs,
    /// Target architecture
    pub arch: TargetArch,
    /// Baseline binary size in bytes
    pub baseline_bytes: u64,
    /// With-dependency binary size in bytes
    pub with_dependency_bytes: u64,
    /// Size cost of the dependency in bytes
    pub cost_bytes: i64,
}

impl DependencyCost {
    /// Whether this combination failed to measure
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn failed(
        identifier: &str,
        platform: Platform,
        duration: Duration,
        error: String,
    ) -> Self {
        Self {
            duration,
            error: Some(error),
            package: identifier.to_string(),
            version: String::new(),
            os: platform.os,
            arch: platform.arch,
            baseline_bytes: 0,
            with_dependency_bytes: 0,
            cost_bytes: 0,
        }
    }
}

fn duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
