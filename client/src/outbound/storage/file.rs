//! Directory-backed local storage: one file per key.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic::{single_file_name, write_atomic};
use crate::domain::ports::{LocalStorage, LocalStorageError};

/// Local storage kept as plain files inside a single directory.
///
/// Each key maps to a file of the same name holding the raw value. Writes are
/// atomic, so a crash mid-write leaves the previous value intact.
#[derive(Debug)]
pub struct FileStorage {
    root: Utf8PathBuf,
    dir: Dir,
}

impl FileStorage {
    /// Open (creating if needed) the storage directory at `root`.
    ///
    /// # Errors
    /// Returns [`LocalStorageError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, LocalStorageError> {
        let root = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|err| io_error(&root, &err))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|err| io_error(&root, &err))?;
        Ok(Self { root, dir })
    }

    /// Directory holding the stored keys.
    pub fn root(&self) -> &Utf8Path {
        self.root.as_path()
    }

    fn key_path<'a>(&self, key: &'a str) -> Result<&'a Utf8Path, LocalStorageError> {
        let path = Utf8Path::new(key);
        single_file_name(path).map_err(|err| io_error(&self.root, &err))?;
        Ok(path)
    }
}

fn io_error(root: &Utf8Path, err: &io::Error) -> LocalStorageError {
    LocalStorageError::io(format!("{root}: {err}"))
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStorageError> {
        let path = self.key_path(key)?;
        match self.dir.read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => Err(
                LocalStorageError::corrupt(key, "value is not valid UTF-8"),
            ),
            Err(err) => Err(io_error(&self.root, &err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        let path = self.key_path(key)?;
        debug!(key, root = %self.root, "writing local storage key");
        write_atomic(&self.dir, path, value.as_bytes()).map_err(|err| io_error(&self.root, &err))
    }

    fn remove(&self, key: &str) -> Result<(), LocalStorageError> {
        let path = self.key_path(key)?;
        match self.dir.remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&self.root, &err)),
        }
    }
}
