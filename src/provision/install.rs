//! Atomic file replacement.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error_handling::ProvisionError;

/// Writes `bytes` to a temporary file next to `dest` and renames it over
/// `dest`. On any failure the temporary file is removed and `dest` is left
/// as it was.
pub(crate) fn install_atomically(dest: &Path, bytes: &[u8]) -> Result<(), ProvisionError> {
    let io_error = |source: std::io::Error| ProvisionError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(bytes).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(dest).map_err(|e| io_error(e.error))?;

    log::info!("Installed {} ({} bytes)", dest.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_install_creates_parent_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("PureIPDB").join("qqwry.ipdb");
        install_atomically(&dest, b"new contents").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new contents");
    }

    #[test]
    fn test_install_replaces_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("db.bin");
        std::fs::write(&dest, b"old").unwrap();
        install_atomically(&dest, b"new").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn test_install_leaves_no_temp_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("db.bin");
        install_atomically(&dest, b"data").unwrap();
        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("db.bin")]);
    }
}
