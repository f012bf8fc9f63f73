//! Minimal probe-project generation.
//!
//! Pure functions that produce the manifest and entry point for a probe
//! project: either the zero-dependency baseline, or a project that performs a
//! side-effect-only import of exactly one target crate. The generated program
//! does no real work; with a dependency, the crate is linked in but none of
//! its API is called, so the measured delta is link-time footprint rather
//! than runtime behavior.

use thiserror::Error;
use toml_edit::{value, ArrayOfTables, DocumentMut, Item, Table};

/// Fixed package name of the baseline probe project.
///
/// With-dependency projects namespace this with the dependency's final path
/// segment so that many dependencies can be measured in one run without
/// package-name collisions.
pub const BASE_PACKAGE: &str = "sizeprobe";

/// Fixed name of the produced binary, independent of the package name.
pub const PROBE_BIN: &str = "probe";

/// Errors that can occur while generating a probe project
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The dependency identifier does not yield a usable package name
    #[error("invalid package name derived from '{0}': names must start with a letter and contain only letters, digits, '-' and '_'")]
    InvalidPackageName(String),
}

/// A parsed dependency identifier.
///
/// Accepts a bare crate name (`serde`), a name with a version requirement
/// (`serde@1.0`), or a path-style identifier whose final segment names the
/// crate (`registry.example/serde`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    raw: String,
    name: String,
    version_req: Option<String>,
}

impl DependencySpec {
    /// Parse a dependency identifier as supplied on the command line
    pub fn parse(identifier: &str) -> Self {
        let (name, version_req) = match identifier.split_once('@') {
            Some((name, req)) if !req.is_empty() => (name, Some(req.to_string())),
            _ => (identifier, None),
        };
        Self {
            raw: identifier.to_string(),
            name: name.to_string(),
            version_req,
        }
    }

    /// The identifier exactly as supplied
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The final path segment of the identifier, used as crate name and
    /// namespace suffix
    pub fn slug(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// The version requirement to declare, defaulting to any version
    pub fn version_req(&self) -> &str {
        self.version_req.as_deref().unwrap_or("*")
    }
}

/// A generated probe project, ready to be written to a working directory
#[derive(Debug, Clone)]
pub struct GeneratedProject {
    /// Package name declared in the manifest
    pub package_name: String,
    /// Manifest (Cargo.toml) contents
    pub manifest: String,
    /// Entry point (main.rs) contents
    pub entry_point: String,
}

/// Generate the probe project for the given dependency, or the baseline
/// project when `dependency` is `None`.
pub fn generate(dependency: Option<&DependencySpec>) -> Result<GeneratedProject, GeneratorError> {
    let package_name = match dependency {
        None => BASE_PACKAGE.to_string(),
        Some(dep) => {
            validate_package_name(dep.slug()).ok_or_else(|| {
                GeneratorError::InvalidPackageName(dep.raw().to_string())
            })?;
            format!("{}-{}", BASE_PACKAGE, dep.slug())
        }
    };

    Ok(GeneratedProject {
        manifest: manifest(&package_name, dependency),
        entry_point: entry_point(dependency),
        package_name,
    })
}

/// Check a crate name against the charset cargo accepts.
fn validate_package_name(name: &str) -> Option<()> {
    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        .then_some(())
}

fn manifest(package_name: &str, dependency: Option<&DependencySpec>) -> String {
    let mut doc = DocumentMut::new();

    let mut package = Table::new();
    package["name"] = value(package_name);
    package["version"] = value("0.0.0");
    package["edition"] = value("2021");
    doc["package"] = Item::Table(package);

    // Empty workspace table keeps the probe out of any enclosing workspace
    // the work root happens to live under.
    doc["workspace"] = Item::Table(Table::new());

    // Fixed [[bin]] name so the output path does not depend on the
    // (namespaced) package name.
    let mut bin = Table::new();
    bin["name"] = value(PROBE_BIN);
    bin["path"] = value("main.rs");
    let mut bins = ArrayOfTables::new();
    bins.push(bin);
    doc["bin"] = Item::ArrayOfTables(bins);

    let mut deps = Table::new();
    if let Some(dep) = dependency {
        deps[dep.slug()] = value(dep.version_req());
    }
    doc["dependencies"] = Item::Table(deps);

    doc.to_string()
}

fn entry_point(dependency: Option<&DependencySpec>) -> String {
    let mut src = String::new();
    if let Some(dep) = dependency {
        // Side-effect-only import: links the crate without calling its API.
        src.push_str(&format!("use {} as _;\n\n", dep.slug().replace('-', "_")));
    }
    src.push_str("fn main() {\n    println!(\"ok\");\n}\n");
    src
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_project_has_fixed_name_and_no_deps() {
        let project = generate(None).unwrap();
        assert_eq!(project.package_name, BASE_PACKAGE);
        assert!(project.manifest.contains("name = \"sizeprobe\""));
        assert!(project.manifest.contains("[dependencies]"));
        assert!(!project.entry_point.contains("use "));
    }

    #[test]
    fn test_with_dependency_namespaces_package_name() {
        let dep = DependencySpec::parse("serde");
        let project = generate(Some(&dep)).unwrap();
        assert_eq!(project.package_name, "sizeprobe-serde");
        assert!(project.manifest.contains("serde = \"*\""));
    }

    #[test]
    fn test_entry_point_imports_dependency_for_side_effects_only() {
        let dep = DependencySpec::parse("tokio-util");
        let project = generate(Some(&dep)).unwrap();
        assert!(project.entry_point.contains("use tokio_util as _;"));
        assert!(project.entry_point.contains("fn main()"));
    }

    #[test]
    fn test_manifest_declares_fixed_bin_name() {
        let dep = DependencySpec::parse("serde");
        let project = generate(Some(&dep)).unwrap();
        assert!(project.manifest.contains("[[bin]]"));
        assert!(project.manifest.contains(&format!("name = \"{PROBE_BIN}\"")));
    }

    #[test]
    fn test_version_requirement_carried_into_manifest() {
        let dep = DependencySpec::parse("serde@1.0");
        let project = generate(Some(&dep)).unwrap();
        assert!(project.manifest.contains("serde = \"1.0\""));
    }

    #[test]
    fn test_path_identifier_slugs_to_final_segment() {
        let dep = DependencySpec::parse("registry.example/team/serde@1");
        assert_eq!(dep.slug(), "serde");
        assert_eq!(dep.version_req(), "1");
        let project = generate(Some(&dep)).unwrap();
        assert_eq!(project.package_name, "sizeprobe-serde");
    }

    #[test]
    fn test_invalid_package_name_is_rejected() {
        let dep = DependencySpec::parse("1nvalid");
        assert!(matches!(
            generate(Some(&dep)),
            Err(GeneratorError::InvalidPackageName(_))
        ));

        let dep = DependencySpec::parse("bad name!");
        assert!(generate(Some(&dep)).is_err());
    }

    #[test]
    fn test_generated_manifest_is_parseable_toml() {
        let dep = DependencySpec::parse("serde");
        let project = generate(Some(&dep)).unwrap();
        let doc: DocumentMut = project.manifest.parse().unwrap();
        assert_eq!(
            doc["package"]["name"].as_str(),
            Some("sizeprobe-serde")
        );
    }
}
