//! The resolved-profile document: packages plus their expanded
//! transitive dependencies, as dumped by the package manager.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse profile: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to serialize lock document: {0}")]
    Serialize(serde_json::Error),
}

/// A resolved profile: every top-level manifest entry with its
/// transitive dependency packages already expanded.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

/// One top-level entry: the package itself plus its dependencies.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ManifestEntry {
    #[serde(flatten)]
    pub package: Package,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Package>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    /// Build-recipe kind, e.g. `"r"` for the R build system.
    #[serde(rename = "build-system", default)]
    pub build_system: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PackageSource>,
    #[serde(default, skip_serializing_if = "PackageProperties::is_empty")]
    pub properties: PackageProperties,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PackageProperties {
    #[serde(
        rename = "upstream-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub upstream_name: Option<String>,
}

impl PackageProperties {
    fn is_empty(&self) -> bool {
        self.upstream_name.is_none()
    }
}

/// A package's declared origin. Unrecognized origin kinds deserialize
/// to `Unsupported` so a single odd package cannot fail a whole export.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PackageSource {
    /// An archive fetched from one or more mirror URIs.
    Url {
        #[serde(alias = "url", deserialize_with = "one_or_many")]
        urls: Vec<String>,
    },
    /// A version-control checkout pinned to a commit.
    Git { url: String, commit: String },
    #[serde(other)]
    Unsupported,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(url) => vec![url],
        OneOrMany::Many(urls) => urls,
    })
}

impl Profile {
    /// Every package in the profile: each entry followed by its
    /// dependencies, in document order. Duplicates across entries are
    /// yielded as-is; the lock document resolves them by name.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.entries
            .iter()
            .flat_map(|entry| std::iter::once(&entry.package).chain(entry.dependencies.iter()))
    }
}

pub fn parse_profile_str(input: &str) -> Result<Profile, ExportError> {
    Ok(serde_json::from_str(input)?)
}

pub fn parse_profile_file(path: impl AsRef<Path>) -> Result<Profile, ExportError> {
    let content = fs::read_to_string(path)?;
    parse_profile_str(&content)
}
