use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::FileStore;

/// Files under one root directory.
///
/// Paths are relative to the root; absolute paths and `..` components are
/// rejected with `ErrorKind::InvalidInput`.
#[derive(Debug, Clone)]
pub struct DirFileStore {
    root: PathBuf,
}

impl DirFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path {} is not relative to the store root", path.display()),
            ));
        }
        Ok(self.root.join(path))
    }
}

impl FileStore for DirFileStore {
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path)?)
    }

    /// Writes the whole file, creating parent directories.
    fn save_bytes(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, data)?;
        log::debug!("saved {} bytes to {}", data.len(), full.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(name: &str) -> DirFileStore {
        let root = std::env::temp_dir().join(format!("poly-files-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        DirFileStore::new(root)
    }

    #[test]
    fn bytes_round_trip_through_nested_dirs() {
        let store = store("bytes");
        let path = Path::new("a/b/data.bin");
        store.save_bytes(path, &[1, 2, 3, 255]).unwrap();
        assert_eq!(store.load_bytes(path).unwrap(), vec![1, 2, 3, 255]);
        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn string_helpers_use_utf8() {
        let store = store("strings");
        store.save_string(Path::new("note.txt"), "héllo").unwrap();
        assert_eq!(store.load_string(Path::new("note.txt")).unwrap(), "héllo");

        store.save_bytes(Path::new("bad.txt"), &[0xff, 0xfe]).unwrap();
        let err = store.load_string(Path::new("bad.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn missing_file_is_not_found() {
        let store = store("missing");
        let err = store.load_bytes(Path::new("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let store = store("escape");
        for path in ["../x", "/etc/passwd", "a/../../b", ""] {
            let err = store.load_bytes(Path::new(path)).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{path}");
        }
    }
}
