//! Discovery of image files under the night's directories.
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::autolog_errors::AutologError;

/// Whether `path` has one of `extensions` (compared case-insensitively, without the dot).
fn has_extension(path: &Utf8Path, extensions: &[String]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Recursively collect the image files under each root.
///
/// Arguments
/// -----------------
/// * `roots`: Directories to walk (light, dark, flat, bias, ...).
/// * `extensions`: Accepted file extensions, e.g. `["fit", "fits"]`.
///
/// Return
/// ----------
/// * The matching paths, sorted and deduplicated, so the result never depends on the
///   filesystem's iteration order.
/// * [`AutologError::DirectoryNotFound`] if a root is not a directory.
///
/// Non-UTF-8 paths are skipped with a warning.
pub fn collect_sources(
    roots: &[Utf8PathBuf],
    extensions: &[String],
) -> Result<Vec<Utf8PathBuf>, AutologError> {
    let mut sources = Vec::new();

    for root in roots {
        if !root.is_dir() {
            return Err(AutologError::DirectoryNotFound(root.to_string()));
        }

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(path) => path,
                Err(path) => {
                    warn!(path = %path.display(), "skipping non UTF-8 path");
                    continue;
                }
            };
            if has_extension(&path, extensions) {
                sources.push(path);
            }
        }
        debug!(%root, total = sources.len(), "directory walked");
    }

    sources.sort();
    sources.dedup();
    Ok(sources)
}

#[cfg(test)]
mod discovery_test {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_sources() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("LIGHT/M42")).unwrap();
        fs::create_dir_all(root.join("DARK")).unwrap();
        fs::write(root.join("LIGHT/M42/b.fits"), b"").unwrap();
        fs::write(root.join("LIGHT/M42/a.FIT"), b"").unwrap();
        fs::write(root.join("LIGHT/M42/notes.txt"), b"").unwrap();
        fs::write(root.join("DARK/d.fit"), b"").unwrap();

        let exts = vec!["fit".to_string(), "fits".to_string()];
        let sources = collect_sources(&[root.join("LIGHT"), root.join("DARK")], &exts).unwrap();

        assert_eq!(
            sources,
            vec![
                root.join("DARK/d.fit"),
                root.join("LIGHT/M42/a.FIT"),
                root.join("LIGHT/M42/b.fits"),
            ]
        );
    }

    #[test]
    fn test_missing_root() {
        let err = collect_sources(&[Utf8PathBuf::from("/no/such/night")], &[]).unwrap_err();
        assert_eq!(
            err,
            AutologError::DirectoryNotFound("/no/such/night".into())
        );
    }
}
