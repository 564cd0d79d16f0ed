//! String-keyed value stores the post snapshot is mirrored into.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use shared::error::{NotesError, NotesResult};

/// Whole-value reads and writes under string keys, in the manner of a browser's local storage.
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> NotesResult<Option<String>>;
    fn set_string(&mut self, key: &str, value: String) -> NotesResult<()>;
    fn remove(&mut self, key: &str) -> NotesResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_string(&self, key: &str) -> NotesResult<Option<String>> {
        (**self).get_string(key)
    }

    fn set_string(&mut self, key: &str, value: String) -> NotesResult<()> {
        (**self).set_string(key, value)
    }

    fn remove(&mut self, key: &str) -> NotesResult<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_string(&self, key: &str) -> NotesResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: String) -> NotesResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> NotesResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under `root`; a write lands in a sibling temp file and is renamed over
/// the previous value.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn open(root: impl Into<PathBuf>) -> NotesResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| NotesError::io(&root, err))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> NotesResult<PathBuf> {
        let segment = sanitize_key(key)?;
        Ok(self.root.join(format!("{segment}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_string(&self, key: &str) -> NotesResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(NotesError::io(path, err)),
        }
    }

    fn set_string(&mut self, key: &str, value: String) -> NotesResult<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|err| NotesError::io(&tmp_path, err))?;
        fs::rename(&tmp_path, &path).map_err(|err| NotesError::io(&path, err))
    }

    fn remove(&mut self, key: &str) -> NotesResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(NotesError::io(path, err)),
        }
    }
}

/// Maps a key onto a file-name segment made of `[A-Za-z0-9._-]`.
pub fn sanitize_key(key: &str) -> NotesResult<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() || trimmed.chars().all(|ch| ch == '.') {
        return Err(NotesError::InvalidKey(key.to_string()));
    }

    Ok(trimmed
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "tests/kv_tests.rs"]
mod tests;
