//! Manifest and lockfile reading.
//!
//! Pure functions over manifest bytes: resolving the concrete version of a
//! measured dependency from the lockfile a build produced, and listing the
//! direct dependencies of an existing project manifest.

use thiserror::Error;
use toml_edit::DocumentMut;

/// Sentinel version reported when a dependency's concrete version cannot be
/// attributed from the lockfile.
///
/// A dependency can be present in the build graph only transitively; in that
/// case its true version cannot always be pinned down, and the resolution
/// falls back to this sentinel rather than failing. This is documented
/// best-effort behavior, not an error.
pub const UNKNOWN_VERSION: &str = "<unknown>";

/// Errors that can occur while reading a manifest or lockfile
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The document is not valid TOML
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml_edit::TomlError),
}

/// A dependency identity resolved from a build's lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// Resolved package name
    pub package: String,
    /// Resolved version, or [`UNKNOWN_VERSION`]
    pub version: String,
}

/// Resolve the concrete identity and version of `dependency` from the
/// lockfile produced by a probe build.
///
/// Selection rule, in declared order: the first package whose name equals the
/// requested dependency; otherwise the first package that is a direct
/// (non-transitive) requirement of `root_package`; otherwise the requested
/// identifier with the [`UNKNOWN_VERSION`] sentinel.
pub fn resolve_version(
    lockfile: &str,
    root_package: &str,
    dependency: &str,
) -> Result<ResolvedDependency, ManifestError> {
    let doc: DocumentMut = lockfile.parse()?;

    let packages: Vec<(String, String, Vec<String>)> = doc
        .get("package")
        .and_then(|item| item.as_array_of_tables())
        .map(|tables| {
            tables
                .iter()
                .map(|pkg| {
                    let name = pkg
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    let version = pkg
                        .get("version")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    let deps = pkg
                        .get("dependencies")
                        .and_then(|v| v.as_array())
                        .map(|arr| {
                            arr.iter()
                                .filter_map(|e| e.as_str())
                                // Lockfile entries are "name" or "name version".
                                .filter_map(|e| e.split_whitespace().next())
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default();
                    (name, version, deps)
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some((name, version, _)) = packages.iter().find(|(name, _, _)| name == dependency) {
        return Ok(ResolvedDependency {
            package: name.clone(),
            version: version.clone(),
        });
    }

    let direct: Vec<&str> = packages
        .iter()
        .find(|(name, _, _)| name == root_package)
        .map(|(_, _, deps)| deps.iter().map(String::as_str).collect())
        .unwrap_or_default();

    if let Some((name, version, _)) = packages
        .iter()
        .find(|(name, _, _)| name != root_package && direct.contains(&name.as_str()))
    {
        return Ok(ResolvedDependency {
            package: name.clone(),
            version: version.clone(),
        });
    }

    Ok(ResolvedDependency {
        package: dependency.to_string(),
        version: UNKNOWN_VERSION.to_string(),
    })
}

/// List the direct dependencies declared by an existing Cargo.toml, in
/// declaration order.
///
/// Used to derive an analysis dependency set from a real project's manifest.
pub fn direct_dependencies(manifest: &str) -> Result<Vec<String>, ManifestError> {
    let doc: DocumentMut = manifest.parse()?;

    Ok(doc
        .get("dependencies")
        .and_then(|item| item.as_table())
        .map(|table| table.iter().map(|(key, _)| key.to_string()).collect())
        .unwrap_or_default())
}
