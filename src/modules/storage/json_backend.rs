use crate::core::error::{ProgressError, ProgressResult};
use crate::core::models::{ProgressKey, ProgressRecord};
use crate::core::traits::ProgressStore;
use crate::utils::{APP_NAME, STORE_FILE_NAME};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One persisted row: the key alongside its record
#[derive(Serialize, Deserialize, Debug, Clone)]
struct StoredEntry {
    #[serde(flatten)]
    key: ProgressKey,
    #[serde(flatten)]
    record: ProgressRecord,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct StoreFile {
    records: Vec<StoredEntry>,
}

impl StoreFile {
    fn find(&self, key: &ProgressKey) -> Option<&ProgressRecord> {
        self.records
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| &entry.record)
    }

    fn upsert(&mut self, key: &ProgressKey, record: &ProgressRecord) {
        match self.records.iter_mut().find(|entry| &entry.key == key) {
            Some(entry) => entry.record = record.clone(),
            None => self.records.push(StoredEntry {
                key: key.clone(),
                record: record.clone(),
            }),
        }
    }
}

/// Durable store keeping every record in one pretty-printed JSON file
///
/// Writers take an exclusive lock on `<file>.lock` next to the store, so
/// several processes can share one file without losing each other's updates.
pub struct JsonProgressStore {
    file_path: PathBuf,
}

impl JsonProgressStore {
    /// Store in `<config_dir>/watch-progress/progress.json`
    pub fn new() -> ProgressResult<Self> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            ProgressError::Transport(std::io::Error::new(
                ErrorKind::NotFound,
                "could not find config directory",
            ))
        })?;
        path.push(APP_NAME);
        path.push(STORE_FILE_NAME);
        Self::with_path(path)
    }

    /// Store in an explicit file, creating its parent directory
    pub fn with_path(path: impl Into<PathBuf>) -> ProgressResult<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { file_path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_all(&self) -> ProgressResult<StoreFile> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Run `op` while holding the cross-process write lock
    fn locked<T>(&self, op: impl FnOnce() -> ProgressResult<T>) -> ProgressResult<T> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.file_path.with_extension("json.lock"))?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock.write()?;
        op()
    }

    fn write_all(&self, file: &StoreFile) -> ProgressResult<()> {
        let content = serde_json::to_string_pretty(file)?;
        // Write then rename so a crash never leaves a half-written store.
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self, key: &ProgressKey) -> ProgressResult<Option<ProgressRecord>> {
        // Renames are atomic, so readers never need the lock.
        Ok(self.read_all()?.find(key).cloned())
    }

    fn save(&mut self, key: &ProgressKey, record: &ProgressRecord) -> ProgressResult<()> {
        self.locked(|| {
            let mut file = self.read_all()?;
            file.upsert(key, record);
            self.write_all(&file)
        })
    }

    fn update(
        &mut self,
        key: &ProgressKey,
        modify: &mut dyn FnMut(&mut ProgressRecord),
    ) -> ProgressResult<ProgressRecord> {
        self.locked(|| {
            let mut file = self.read_all()?;
            let mut record = file.find(key).cloned().unwrap_or_default();
            modify(&mut record);
            file.upsert(key, &record);
            self.write_all(&file)?;
            Ok(record)
        })
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
