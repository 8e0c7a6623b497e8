use super::{write_atomic, EXIT_SUCCESS};
use remora_scheme::{edit_document, parse_document, EditSet};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Apply `+spec` / `-spec` operations to a manifest document.
///
/// Without `--manifest` the document is read from stdin and written to
/// stdout; with it, the file is rewritten in place atomically. A
/// malformed operation aborts before the document is even read, so a
/// failed run never produces partial output.
pub fn run(specs: &[String], manifest: Option<&Path>) -> Result<u8, String> {
    let edits = EditSet::parse(specs).map_err(|e| e.to_string())?;

    let source = match manifest {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read manifest {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read manifest from stdin: {e}"))?;
            buf
        }
    };

    let mut document =
        parse_document(&source).map_err(|e| format!("failed to parse manifest: {e}"))?;
    if !edit_document(&mut document, &edits) {
        debug!("no specifications list found; emitting document unchanged");
    }
    let output = document.to_text();

    match manifest {
        Some(path) => write_atomic(path, &output)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("failed to write manifest to stdout: {e}"))?;
        }
    }

    Ok(EXIT_SUCCESS)
}
