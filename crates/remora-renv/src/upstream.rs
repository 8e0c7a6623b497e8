//! Canonical upstream-name inference for exported packages.
//!
//! Packages of the R build system are conventionally named with an
//! `r-` prefix and lowercased, so the renv name has to be recovered.
//! Resolution is an ordered chain of independent rules; the first rule
//! that produces a name wins.

use crate::profile::{Package, PackageSource};

/// Length of the local ecosystem prefix (`r-`) stripped by the final
/// fallback rule.
const ECOSYSTEM_PREFIX_LEN: usize = 2;

type Resolver = fn(&Package) -> Option<String>;

/// Resolution order: explicit property, origin URI, local name.
const RESOLVERS: &[Resolver] = &[explicit_property, source_uri_basename, stripped_local_name];

/// Infer the upstream name for a package.
pub fn upstream_name(package: &Package) -> String {
    RESOLVERS
        .iter()
        .find_map(|resolve| resolve(package))
        .unwrap_or_else(|| package.name.clone())
}

/// Rule 1: an explicit `upstream-name` property wins outright.
fn explicit_property(package: &Package) -> Option<String> {
    package
        .properties
        .upstream_name
        .clone()
        .filter(|name| !name.is_empty())
}

/// Rule 2: archive basenames follow `<name>_<version>.tar.gz`, so the
/// part before the first underscore is the upstream name.
fn source_uri_basename(package: &Package) -> Option<String> {
    let Some(PackageSource::Url { urls }) = &package.source else {
        return None;
    };
    let basename = urls.first()?.rsplit('/').next()?;
    let (name, _rest) = basename.split_once('_')?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_owned())
    }
}

/// Rule 3: strip the fixed-length `r-` prefix from the local name.
fn stripped_local_name(package: &Package) -> Option<String> {
    package
        .name
        .get(ECOSYSTEM_PREFIX_LEN..)
        .filter(|rest| !rest.is_empty())
        .map(str::to_owned)
}
