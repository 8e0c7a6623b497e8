//! Origin classification: mapping a package's declared source onto the
//! renv notion of where a package comes from.

use crate::profile::PackageSource;

/// A repository family recognized by URI prefix.
pub struct KnownRepository {
    pub name: &'static str,
    pub prefixes: &'static [&'static str],
}

/// The repository families renv understands, checked in order.
pub const KNOWN_REPOSITORIES: &[KnownRepository] = &[
    KnownRepository {
        name: "CRAN",
        prefixes: &[
            "mirror://cran",
            "https://cran.r-project.org/src/contrib",
            "https://cloud.r-project.org/src/contrib",
        ],
    },
    KnownRepository {
        name: "Bioconductor",
        prefixes: &[
            "mirror://bioconductor",
            "https://bioconductor.org/packages",
        ],
    },
];

/// The outcome of classifying one package's origin.
///
/// `Unsupported` is a first-class result, not an error: the exporter
/// records the detail as a warning and emits a partial lock entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginClass {
    /// Fetched from a recognized repository mirror.
    Repository { name: &'static str },
    /// A version-control checkout pinned to a commit.
    Git { url: String, commit: String },
    /// No recognized provenance; carries a human-readable reason.
    Unsupported { detail: String },
}

/// Classify a declared source. Never fails.
pub fn classify(source: Option<&PackageSource>) -> OriginClass {
    match source {
        Some(PackageSource::Url { urls }) => {
            for url in urls {
                for repo in KNOWN_REPOSITORIES {
                    if repo.prefixes.iter().any(|prefix| url.starts_with(prefix)) {
                        return OriginClass::Repository { name: repo.name };
                    }
                }
            }
            let shown = urls.first().map_or("<no uri>", String::as_str);
            OriginClass::Unsupported {
                detail: format!("no known repository matches '{shown}'"),
            }
        }
        Some(PackageSource::Git { url, commit }) => OriginClass::Git {
            url: url.clone(),
            commit: commit.clone(),
        },
        Some(PackageSource::Unsupported) => OriginClass::Unsupported {
            detail: "unrecognized origin kind".to_owned(),
        },
        None => OriginClass::Unsupported {
            detail: "package declares no source".to_owned(),
        },
    }
}
