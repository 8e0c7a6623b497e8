//! The renv.lock document and the profile-to-lock projection.

use crate::origin::{classify, OriginClass};
use crate::profile::{ExportError, Package, Profile};
use crate::upstream::upstream_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Registry entry written into every lock header.
pub const PRIMARY_REPOSITORY_URL: &str = "https://cloud.r-project.org";

/// Build kind exported by default.
pub const DEFAULT_BUILD_SYSTEM: &str = "r";

/// A complete renv.lock document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenvLock {
    #[serde(rename = "R")]
    pub runtime: RuntimeBlock,
    #[serde(rename = "Packages")]
    pub packages: BTreeMap<String, LockEntry>,
}

/// The fixed header: runtime name and version plus the repository
/// registry renv should install from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeBlock {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Repositories")]
    pub repositories: Vec<RepositoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
}

/// One exported package. Origin fields are all optional: an entry for
/// an unsupported origin carries only name and version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockEntry {
    #[serde(rename = "Package")]
    pub package: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "Repository", default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(rename = "RemoteType", default, skip_serializing_if = "Option::is_none")]
    pub remote_type: Option<String>,
    #[serde(rename = "RemoteUrl", default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(rename = "RemoteRef", default, skip_serializing_if = "Option::is_none")]
    pub remote_ref: Option<String>,
}

/// Knobs for the projection.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Only packages of this build kind are exported.
    pub build_system: String,
    /// Runtime version for the header. When absent, the profile is
    /// scanned for an `r` / `r-minimal` package.
    pub r_version: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            build_system: DEFAULT_BUILD_SYSTEM.to_owned(),
            r_version: None,
        }
    }
}

/// A non-fatal problem found while exporting one package.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportWarning {
    pub package: String,
    pub detail: String,
}

/// The lock document plus every warning collected along the way.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub lock: RenvLock,
    pub warnings: Vec<ExportWarning>,
}

/// Project a resolved profile into a lock document.
///
/// Packages of other build kinds are skipped silently. Duplicate
/// upstream names resolve last-write-wins in profile order; the
/// serialized `Packages` object is keyed lexicographically so output is
/// deterministic regardless of dependency-graph order.
pub fn export_profile(profile: &Profile, options: &ExportOptions) -> ExportOutcome {
    let mut packages = BTreeMap::new();
    let mut warnings = Vec::new();

    for package in profile
        .packages()
        .filter(|p| p.build_system == options.build_system)
    {
        let name = upstream_name(package);
        let mut entry = LockEntry {
            package: name.clone(),
            version: package.version.clone(),
            source: None,
            repository: None,
            remote_type: None,
            remote_url: None,
            remote_ref: None,
        };
        match classify(package.source.as_ref()) {
            OriginClass::Repository { name: repository } => {
                entry.source = Some("Repository".to_owned());
                entry.repository = Some(repository.to_owned());
            }
            OriginClass::Git { url, commit } => {
                entry.source = Some("git".to_owned());
                entry.remote_type = Some("git".to_owned());
                entry.remote_url = Some(url);
                entry.remote_ref = Some(commit);
            }
            OriginClass::Unsupported { detail } => {
                warnings.push(ExportWarning {
                    package: package.name.clone(),
                    detail,
                });
            }
        }
        packages.insert(name, entry);
    }

    let version = options
        .r_version
        .clone()
        .or_else(|| detect_r_version(profile))
        .unwrap_or_default();

    ExportOutcome {
        lock: RenvLock {
            runtime: RuntimeBlock {
                name: "R".to_owned(),
                version,
                repositories: vec![RepositoryEntry {
                    name: "CRAN".to_owned(),
                    url: PRIMARY_REPOSITORY_URL.to_owned(),
                }],
            },
            packages,
        },
        warnings,
    }
}

fn detect_r_version(profile: &Profile) -> Option<String> {
    profile
        .packages()
        .find(|p| p.name == "r" || p.name == "r-minimal")
        .map(|p| p.version.clone())
}

impl RenvLock {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(ExportError::Serialize)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let content = self.to_json_pretty()?;
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
        if let Ok(f) = fs::File::open(dir) {
            let _ = f.sync_all();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::parse_profile_str;

    fn export(input: &str) -> ExportOutcome {
        let profile = parse_profile_str(input).unwrap();
        export_profile(&profile, &ExportOptions::default())
    }

    #[test]
    fn cran_package_becomes_repository_entry() {
        let outcome = export(
            r#"{"entries": [{
                "name": "r-dplyr", "version": "1.0.0", "build-system": "r",
                "source": {"type": "url",
                           "urls": ["mirror://cran/src/contrib/dplyr_1.0.0.tar.gz"]}
            }]}"#,
        );
        let entry = &outcome.lock.packages["dplyr"];
        assert_eq!(entry.package, "dplyr");
        assert_eq!(entry.version, "1.0.0");
        assert_eq!(entry.source.as_deref(), Some("Repository"));
        assert_eq!(entry.repository.as_deref(), Some("CRAN"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn git_package_becomes_git_entry() {
        let outcome = export(
            r#"{"entries": [{
                "name": "r-devpkg", "version": "0.1", "build-system": "r",
                "source": {"type": "git",
                           "url": "https://example.org/pkg.git", "commit": "abc123"}
            }]}"#,
        );
        let entry = &outcome.lock.packages["devpkg"];
        assert_eq!(entry.source.as_deref(), Some("git"));
        assert_eq!(entry.remote_type.as_deref(), Some("git"));
        assert_eq!(entry.remote_url.as_deref(), Some("https://example.org/pkg.git"));
        assert_eq!(entry.remote_ref.as_deref(), Some("abc123"));
        assert_eq!(entry.repository, None);
    }

    #[test]
    fn other_build_kinds_are_skipped() {
        let outcome = export(
            r#"{"entries": [
                {"name": "tini", "version": "0.19.0", "build-system": "gnu"},
                {"name": "r-rlang", "version": "0.4.11", "build-system": "r",
                 "source": {"type": "url",
                            "urls": ["mirror://cran/src/contrib/rlang_0.4.11.tar.gz"]}}
            ]}"#,
        );
        assert_eq!(outcome.lock.packages.len(), 1);
        assert!(outcome.lock.packages.contains_key("rlang"));
    }

    #[test]
    fn dependencies_are_exported_too() {
        let outcome = export(
            r#"{"entries": [{
                "name": "r-dplyr", "version": "1.0.0", "build-system": "r",
                "source": {"type": "url",
                           "urls": ["mirror://cran/src/contrib/dplyr_1.0.0.tar.gz"]},
                "dependencies": [
                    {"name": "r-rlang", "version": "0.4.11", "build-system": "r",
                     "source": {"type": "url",
                                "urls": ["mirror://cran/src/contrib/rlang_0.4.11.tar.gz"]}}
                ]
            }]}"#,
        );
        assert_eq!(outcome.lock.packages.len(), 2);
        assert!(outcome.lock.packages.contains_key("rlang"));
    }

    #[test]
    fn duplicate_upstream_names_last_write_wins() {
        let outcome = export(
            r#"{"entries": [
                {"name": "r-dplyr", "version": "1.0.0", "build-system": "r",
                 "source": {"type": "url",
                            "urls": ["mirror://cran/src/contrib/dplyr_1.0.0.tar.gz"]}},
                {"name": "r-dplyr-dev", "version": "1.1.0", "build-system": "r",
                 "properties": {"upstream-name": "dplyr"},
                 "source": {"type": "git",
                            "url": "https://example.org/dplyr.git", "commit": "fff000"}}
            ]}"#,
        );
        assert_eq!(outcome.lock.packages.len(), 1);
        let entry = &outcome.lock.packages["dplyr"];
        assert_eq!(entry.version, "1.1.0");
        assert_eq!(entry.source.as_deref(), Some("git"));
    }

    #[test]
    fn unsupported_origin_degrades_to_partial_entry() {
        let outcome = export(
            r#"{"entries": [{
                "name": "r-local", "version": "0.1", "build-system": "r",
                "source": {"type": "url", "urls": ["https://example.org/local_0.1.tar.gz"]}
            }]}"#,
        );
        let entry = &outcome.lock.packages["local"];
        assert_eq!(entry.source, None);
        assert_eq!(entry.repository, None);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].package, "r-local");
    }

    #[test]
    fn partial_entry_serializes_without_origin_fields() {
        let outcome = export(
            r#"{"entries": [{
                "name": "r-local", "version": "0.1", "build-system": "r"
            }]}"#,
        );
        let json = outcome.lock.to_json_pretty().unwrap();
        assert!(json.contains("\"Package\": \"local\""));
        assert!(json.contains("\"Version\": \"0.1\""));
        assert!(!json.contains("\"Source\""));
        assert!(!json.contains("\"RemoteType\""));
    }

    #[test]
    fn header_names_cran_registry() {
        let outcome = export(r"{}");
        assert_eq!(outcome.lock.runtime.name, "R");
        assert_eq!(outcome.lock.runtime.repositories.len(), 1);
        assert_eq!(outcome.lock.runtime.repositories[0].name, "CRAN");
        assert_eq!(
            outcome.lock.runtime.repositories[0].url,
            PRIMARY_REPOSITORY_URL
        );
    }

    #[test]
    fn r_version_inferred_from_profile() {
        let outcome = export(
            r#"{"entries": [
                {"name": "r-minimal", "version": "4.2.1", "build-system": "gnu"}
            ]}"#,
        );
        assert_eq!(outcome.lock.runtime.version, "4.2.1");
    }

    #[test]
    fn explicit_r_version_wins() {
        let profile = parse_profile_str(
            r#"{"entries": [
                {"name": "r-minimal", "version": "4.2.1", "build-system": "gnu"}
            ]}"#,
        )
        .unwrap();
        let outcome = export_profile(
            &profile,
            &ExportOptions {
                build_system: DEFAULT_BUILD_SYSTEM.to_owned(),
                r_version: Some("4.3.0".to_owned()),
            },
        );
        assert_eq!(outcome.lock.runtime.version, "4.3.0");
    }

    #[test]
    fn output_key_order_is_lexicographic() {
        let outcome = export(
            r#"{"entries": [
                {"name": "r-zoo", "version": "1.8", "build-system": "r",
                 "source": {"type": "url",
                            "urls": ["mirror://cran/src/contrib/zoo_1.8.tar.gz"]}},
                {"name": "r-abind", "version": "1.4", "build-system": "r",
                 "source": {"type": "url",
                            "urls": ["mirror://cran/src/contrib/abind_1.4.tar.gz"]}}
            ]}"#,
        );
        let names: Vec<&String> = outcome.lock.packages.keys().collect();
        assert_eq!(names, vec!["abind", "zoo"]);
        let json = outcome.lock.to_json_pretty().unwrap();
        assert!(json.find("abind").unwrap() < json.find("zoo").unwrap());
    }

    #[test]
    fn lock_json_roundtrip() {
        let outcome = export(
            r#"{"entries": [{
                "name": "r-dplyr", "version": "1.0.0", "build-system": "r",
                "source": {"type": "url",
                           "urls": ["mirror://cran/src/contrib/dplyr_1.0.0.tar.gz"]}
            }]}"#,
        );
        let json = outcome.lock.to_json_pretty().unwrap();
        let back: RenvLock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome.lock);
    }

    #[test]
    fn write_to_file_persists_atomically() {
        let outcome = export(r"{}");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renv.lock");
        outcome.lock.write_to_file(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let back: RenvLock = serde_json::from_str(&content).unwrap();
        assert_eq!(back, outcome.lock);
    }
}
