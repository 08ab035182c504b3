use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, error, warn};

/// Whole-file persistence backend for a JSON collection.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Returns `None` when nothing has been written yet.
    async fn read(&self) -> anyhow::Result<Option<Vec<u8>>>;
    async fn write(&self, body: Vec<u8>) -> anyhow::Result<()>;
}

#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageClient for FileStorage {
    async fn read(&self) -> anyhow::Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", self.path.display())),
        }
    }

    async fn write(&self, body: Vec<u8>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        fs::write(&self.path, body)
            .await
            .with_context(|| format!("write {}", self.path.display()))?;
        debug!(path = %self.path.display(), "collection file saved");
        Ok(())
    }
}

/// In-memory array mirrored to a [`StorageClient`] on every mutation.
pub struct JsonCollection<T> {
    items: RwLock<Vec<T>>,
    storage: Box<dyn StorageClient>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    pub async fn load(storage: impl StorageClient + 'static) -> anyhow::Result<Self> {
        let items = match storage.read().await? {
            Some(bytes) => serde_json::from_slice::<Vec<T>>(&bytes).context("parse collection file")?,
            None => {
                warn!("collection file missing, starting empty");
                Vec::new()
            }
        };
        Ok(Self {
            items: RwLock::new(items),
            storage: Box::new(storage),
        })
    }

    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let items = self.items.read().await;
        f(items.as_slice())
    }

    /// Applies `f` to a working copy, persists it, then publishes it.
    ///
    /// If `f` fails or the write fails, neither memory nor storage changes.
    pub async fn mutate<R, E>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<anyhow::Error>,
    {
        let mut items = self.items.write().await;
        let mut working = items.clone();
        let out = f(&mut working)?;

        let body = serde_json::to_vec_pretty(&working)
            .context("serialize collection")
            .map_err(E::from)?;
        if let Err(e) = self.storage.write(body).await {
            error!(error = %e, "collection write failed");
            return Err(E::from(e));
        }

        *items = working;
        Ok(out)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{MemoryStorage, ReadOnlyStorage};
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("toyshop_{}", uuid::Uuid::new_v4()))
            .join("items.json")
    }

    #[tokio::test]
    async fn missing_file_loads_empty_and_first_write_creates_it() -> anyhow::Result<()> {
        let path = temp_path();
        let coll = JsonCollection::<String>::load(FileStorage::new(&path)).await?;
        assert_eq!(coll.read(|items| items.len()).await, 0);

        coll.mutate(|items| {
            items.push("a".into());
            Ok::<_, anyhow::Error>(())
        })
        .await?;

        let reloaded = JsonCollection::<String>::load(FileStorage::new(&path)).await?;
        assert_eq!(reloaded.read(|items| items.to_vec()).await, vec!["a".to_string()]);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn writes_pretty_json_with_two_space_indent() -> anyhow::Result<()> {
        let storage = MemoryStorage::default();
        let coll = JsonCollection::<serde_json::Value>::load(storage.clone()).await?;
        coll.mutate(|items| {
            items.push(serde_json::json!({ "name": "Bear" }));
            Ok::<_, anyhow::Error>(())
        })
        .await?;

        assert_eq!(storage.contents().unwrap(), "[\n  {\n    \"name\": \"Bear\"\n  }\n]");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_a_load_error() {
        let storage = MemoryStorage::default();
        storage.write(b"{ not json".to_vec()).await.unwrap();
        assert!(JsonCollection::<String>::load(storage).await.is_err());
    }

    #[tokio::test]
    async fn failed_closure_leaves_everything_untouched() -> anyhow::Result<()> {
        let storage = MemoryStorage::with_json(serde_json::json!(["a"]));
        let before = storage.contents();
        let coll = JsonCollection::<String>::load(storage.clone()).await?;

        let res: anyhow::Result<()> = coll
            .mutate(|items| {
                items.clear();
                anyhow::bail!("nope")
            })
            .await;

        assert!(res.is_err());
        assert_eq!(coll.read(|items| items.len()).await, 1);
        assert_eq!(storage.contents(), before);
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_propagates_and_keeps_memory() -> anyhow::Result<()> {
        let storage = ReadOnlyStorage(MemoryStorage::with_json(serde_json::json!(["a"])));
        let coll = JsonCollection::<String>::load(storage).await?;

        let err = coll
            .mutate(|items| {
                items.push("b".into());
                Ok::<_, anyhow::Error>(())
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("read-only"));
        assert_eq!(coll.read(|items| items.to_vec()).await, vec!["a".to_string()]);
        Ok(())
    }
}
