//! File-backed mirror store.

use crate::domain::repositories::{MirrorResult, MirrorStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores each key as `<dir>/<key>.json`.
///
/// A missing file reads as "nothing stored". The directory is created on the
/// first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl MirrorStore for FileStore {
    fn get(&self, key: &str) -> MirrorResult<Option<String>> {
        let path = self.path_for(key);

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Mirror READ: {}", path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Mirror EMPTY: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> MirrorResult<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        debug!("Mirror WRITE: {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}
