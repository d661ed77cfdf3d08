//! Atomic artifact writes.

use std::fs;
use std::io;
use std::path::Path;

/// Writes `bytes` to `path` by staging them in a sibling temporary file and
/// renaming it over the target. A failed render or write never leaves a
/// partial artifact behind at `path`.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "artifact path has no file name")
    })?;
    let mut staged_name = file_name.to_os_string();
    staged_name.push(".tmp");
    let staged = path.with_file_name(staged_name);

    if let Err(err) = fs::write(&staged, bytes) {
        let _ = fs::remove_file(&staged);
        return Err(err);
    }
    if let Err(err) = fs::rename(&staged, path) {
        let _ = fs::remove_file(&staged);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_bytes_and_removes_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.svg");

        write_artifact(&target, b"<svg/>").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"<svg/>");
        assert!(!dir.path().join("out.svg.tmp").exists());
    }

    #[test]
    fn replaces_an_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.svg");
        fs::write(&target, b"old").unwrap();

        write_artifact(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn rejects_a_path_without_a_file_name() {
        let err = write_artifact(Path::new("/"), b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
