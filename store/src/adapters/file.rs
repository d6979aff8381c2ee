use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::StoreResult;
use crate::store::KeyValueStore;

pub const STORE_FILE_NAME: &str = "store.json";

/// KeyValueStore backed by a single JSON object file.
///
/// Every `get` reads the whole file and every `set` rewrites it through a
/// temporary file and a rename. Writes within one process are serialised.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store living at `<dir>/store.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORE_FILE_NAME))
    }

    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(values)?).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut values = self.read_all().await?;
        Ok(values.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value);
        self.write_all(&values).await?;
        debug!(key, path = %self.path.display(), "Saved value to store file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use tempfile::tempdir;
    use tokio::test;

    #[test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.get("history").await.unwrap(), None);
    }

    #[test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("recipe-chat");

        let store = FileStore::in_dir(&data_dir);
        store.set("shop", r#"["salt"]"#.to_string()).await.unwrap();
        store.set("history", "[]".to_string()).await.unwrap();

        let reopened = FileStore::in_dir(&data_dir);
        assert_eq!(reopened.get("shop").await.unwrap().as_deref(), Some(r#"["salt"]"#));
        assert_eq!(reopened.get("history").await.unwrap().as_deref(), Some("[]"));
        assert!(!data_dir.join("store.json.tmp").exists());
    }

    #[test]
    async fn test_corrupt_file_is_json_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.get("shop").await, Err(StoreError::Json(_))));
    }
}
