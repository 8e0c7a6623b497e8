use super::{write_atomic, EXIT_SUCCESS};
use remora_renv::{export_profile, parse_profile_file, ExportOptions};
use std::path::Path;
use tracing::warn;

/// Project a resolved profile into an renv.lock document.
///
/// A missing profile argument is not an error: a usage line goes to
/// stderr and the run falls through without producing a lock file.
/// Unsupported package origins are reported as warnings and degrade to
/// partial entries; only an unreadable profile is fatal.
pub fn run(
    profile: Option<&Path>,
    output: Option<&Path>,
    build_system: &str,
    r_version: Option<&str>,
) -> Result<u8, String> {
    let Some(path) = profile else {
        eprintln!("usage: remora export <profile.json>");
        return Ok(EXIT_SUCCESS);
    };

    let profile = parse_profile_file(path).map_err(|e| e.to_string())?;
    let options = ExportOptions {
        build_system: build_system.to_owned(),
        r_version: r_version.map(str::to_owned),
    };
    let outcome = export_profile(&profile, &options);
    for warning in &outcome.warnings {
        warn!("{}: {}", warning.package, warning.detail);
    }

    let json = outcome.lock.to_json_pretty().map_err(|e| e.to_string())?;
    match output {
        Some(path) => write_atomic(path, &json)?,
        None => println!("{json}"),
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remora_renv::RenvLock;

    fn write_profile(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("profile.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_argument_falls_through() {
        assert_eq!(run(None, None, "r", None).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn exports_lock_file_to_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let profile = write_profile(
            dir.path(),
            r#"{"entries": [{
                "name": "r-dplyr", "version": "1.0.0", "build-system": "r",
                "source": {"type": "url",
                           "urls": ["mirror://cran/src/contrib/dplyr_1.0.0.tar.gz"]}
            }]}"#,
        );
        let out = dir.path().join("renv.lock");
        let code = run(Some(&profile), Some(&out), "r", Some("4.2.1")).unwrap();
        assert_eq!(code, EXIT_SUCCESS);

        let lock: RenvLock =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(lock.runtime.version, "4.2.1");
        assert_eq!(lock.packages["dplyr"].repository.as_deref(), Some("CRAN"));
    }

    #[test]
    fn unreadable_profile_is_fatal() {
        let err = run(Some(Path::new("/nonexistent/profile.json")), None, "r", None).unwrap_err();
        assert!(err.starts_with("failed to read profile"));
    }

    #[test]
    fn unparsable_profile_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let profile = write_profile(dir.path(), "not json");
        let err = run(Some(&profile), None, "r", None).unwrap_err();
        assert!(err.starts_with("failed to parse profile"));
    }

    #[test]
    fn unsupported_origin_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let profile = write_profile(
            dir.path(),
            r#"{"entries": [{"name": "r-local", "version": "0.1", "build-system": "r"}]}"#,
        );
        let out = dir.path().join("renv.lock");
        assert_eq!(
            run(Some(&profile), Some(&out), "r", None).unwrap(),
            EXIT_SUCCESS
        );
        let lock: RenvLock =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(lock.packages["local"].source, None);
    }
}
