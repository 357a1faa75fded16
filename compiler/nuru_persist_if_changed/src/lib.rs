//! Write generated files to disk only when their contents actually changed.
//!
//! `nuruc` re-emits the interceptor source on every incremental compilation pass; most
//! of the time nothing about the route set changed and the bytes are byte-for-byte
//! identical. Skipping the write keeps mtimes stable, which keeps downstream build
//! tools (and `cargo`'s own fingerprinting) from treating the crate as dirty.

use std::path::Path;

/// Persist `content` to `path`, creating parent directories as needed, but only if the
/// file doesn't already hold exactly `content`.
pub fn persist_if_changed(path: &Path, content: &[u8]) -> Result<(), anyhow::Error> {
    if !has_changed_file2buffer(path, content)? {
        tracing::trace!(path = %path.display(), "Generated file is unchanged, skipping write");
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, content)?;
    tracing::trace!(path = %path.display(), "Wrote generated file");
    Ok(())
}

/// `true` if `path` doesn't exist, or exists with different contents than `content`.
pub fn has_changed_file2buffer(path: &Path, content: &[u8]) -> Result<bool, anyhow::Error> {
    match fs_err::read(path) {
        Ok(existing) => Ok(existing != content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated.rs");
        persist_if_changed(&path, b"fn main() {}").unwrap();
        assert_eq!(fs_err::read(&path).unwrap(), b"fn main() {}");
    }

    #[test]
    fn skips_when_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated.rs");
        persist_if_changed(&path, b"fn main() {}").unwrap();
        let before = fs_err::metadata(&path).unwrap().modified().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        persist_if_changed(&path, b"fn main() {}").unwrap();
        let after = fs_err::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn rewrites_when_different() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated.rs");
        persist_if_changed(&path, b"fn main() {}").unwrap();
        persist_if_changed(&path, b"fn main() { loop {} }").unwrap();
        assert_eq!(fs_err::read(&path).unwrap(), b"fn main() { loop {} }");
    }
}
