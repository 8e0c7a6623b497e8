//! Resolved-profile reading and renv.lock export for remora.
//!
//! This crate defines the semantic layer of the exporter: the resolved
//! profile document (`Profile`, `Package`, `PackageSource`), upstream
//! name inference (`upstream_name`), origin classification
//! (`classify`, `OriginClass`), and the lock projection
//! (`export_profile`, `RenvLock`). Unsupported origins degrade to
//! partial entries with collected warnings; nothing in the projection
//! itself is fatal.

pub mod lock;
pub mod origin;
pub mod profile;
pub mod upstream;

pub use lock::{
    export_profile, ExportOptions, ExportOutcome, ExportWarning, LockEntry, RenvLock,
    RepositoryEntry, RuntimeBlock, DEFAULT_BUILD_SYSTEM, PRIMARY_REPOSITORY_URL,
};
pub use origin::{classify, KnownRepository, OriginClass, KNOWN_REPOSITORIES};
pub use profile::{
    parse_profile_file, parse_profile_str, ExportError, ManifestEntry, Package,
    PackageProperties, PackageSource, Profile,
};
pub use upstream::upstream_name;
