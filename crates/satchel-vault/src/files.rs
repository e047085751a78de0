use std::{
    fs::{self, File},
    io::{ErrorKind, Read, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::VaultError;

/// Read a whole file, mapping a missing path to `VaultError::NotFound`.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, VaultError> {
    let mut file = File::open(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            not_found(path)
        } else {
            io_err(err)
        }
    })?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(io_err)?;
    Ok(buf)
}

/// Write bytes through a temp file in the target directory, then persist over `path`.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), VaultError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Delete an existing target so it can be rewritten. Missing files are fine.
///
/// Not atomic with the write that follows: if that write fails, neither the old
/// nor the new file is left at `path`.
pub(crate) fn remove_target(path: &Path) -> Result<(), VaultError> {
    clear_hidden_attribute(path);
    match fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_err(err)),
    }
}

#[cfg(windows)]
fn clear_hidden_attribute(path: &Path) {
    match std::process::Command::new("attrib")
        .arg("-h")
        .arg(path)
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => debug!(?path, %status, "attrib -h did not succeed"),
        Err(err) => debug!(?path, "attrib -h unavailable: {err}"),
    }
}

#[cfg(not(windows))]
fn clear_hidden_attribute(path: &Path) {
    debug!(?path, "no hidden attribute to clear on this platform");
}

pub(crate) fn not_found(path: &Path) -> VaultError {
    VaultError::NotFound {
        path: path.to_string_lossy().to_string(),
    }
}

pub(crate) fn io_err<E: ToString>(err: E) -> VaultError {
    VaultError::Io {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_replaces_existing_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("out.bin");

        write_file(&path, b"first").expect("first write");
        write_file(&path, b"second").expect("second write");

        assert_eq!(read_file(&path).expect("read"), b"second");
        // only the target remains, no stray temp files
        let entries = fs::read_dir(path.parent().expect("parent"))
            .expect("read_dir")
            .count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_file(&dir.path().join("absent")).expect_err("should be missing");
        assert!(matches!(err, VaultError::NotFound { .. }));
    }

    #[test]
    fn remove_target_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gone.txt");
        fs::write(&path, "x").expect("seed");

        remove_target(&path).expect("remove");
        remove_target(&path).expect("remove again");
        assert!(!path.exists());
    }
}
