//! Filesystem document store.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, instrument};

use crmkit_core::error::{Error, StoreError};
use crmkit_core::record::{Fields, RawDoc};
use crmkit_core::traits::{FetchConstraints, RemoteStore};
use crmkit_core::types::{CollectionName, RecordId};
use crmkit_core::Result;

fn map_io(err: std::io::Error) -> Error {
    StoreError::from(err).into()
}

fn malformed(path: &Path, err: impl std::fmt::Display) -> Error {
    StoreError::Malformed {
        message: format!("{}: {}", path.display(), err),
    }
    .into()
}

/// A [`RemoteStore`] that keeps each record as a JSON file.
///
/// ```text
/// <root>/collections/<collection>/<id>.json
/// <root>/store.lock
/// ```
///
/// Writes from every process sharing `root` are serialized through an
/// advisory lock on `store.lock` and land atomically (temp file + rename).
/// Reads take no lock.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at the given directory.
    ///
    /// Nothing is created on disk until the first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    fn collection_dir(&self, collection: &CollectionName) -> PathBuf {
        self.collections_dir().join(collection.as_str())
    }

    fn record_path(&self, collection: &CollectionName, id: &RecordId) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.json", id.as_str()))
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join("store.lock")
    }

    /// Take the store-wide write lock. Released when the handle is dropped.
    fn lock(&self) -> Result<File> {
        fs::create_dir_all(&self.root).map_err(map_io)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)?;

        lock_file.lock_exclusive().map_err(map_io)?;
        Ok(lock_file)
    }

    fn read_fields(path: &Path) -> Result<Option<Fields>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(map_io(err)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| malformed(path, e))
    }

    fn write_fields(path: &Path, fields: &Fields) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let content = serde_json::to_string_pretty(fields).map_err(|e| malformed(path, e))?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content).map_err(map_io)?;
        fs::rename(&temp_path, path).map_err(map_io)?;

        Ok(())
    }

    /// Record identifiers present in a collection, in store order.
    fn record_ids(&self, collection: &CollectionName) -> Result<Vec<RecordId>> {
        let dir = self.collection_dir(collection);

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(map_io(err)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(map_io)?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            // Foreign files that don't name a valid id are not records.
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| RecordId::new(s).ok())
            {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl RemoteStore for FileStore {
    #[instrument(skip(self), fields(%collection, limit = constraints.limit))]
    async fn fetch_many(
        &self,
        collection: &CollectionName,
        constraints: &FetchConstraints,
    ) -> Result<Vec<RawDoc>> {
        let ids = self.record_ids(collection)?;
        let limit = constraints.limit as usize;

        let mut docs = Vec::with_capacity(limit.min(ids.len()));
        let candidates = ids
            .into_iter()
            .filter(|id| constraints.start_after.as_ref().is_none_or(|after| id > after));

        for id in candidates {
            if docs.len() == limit {
                break;
            }
            // A record removed between listing and reading is skipped.
            if let Some(fields) = Self::read_fields(&self.record_path(collection, &id))? {
                docs.push(RawDoc::new(id, fields));
            }
        }

        debug!(count = docs.len(), "Fetched documents");
        Ok(docs)
    }

    #[instrument(skip(self), fields(%collection, %id))]
    async fn fetch_one(
        &self,
        collection: &CollectionName,
        id: &RecordId,
    ) -> Result<Option<RawDoc>> {
        let fields = Self::read_fields(&self.record_path(collection, id))?;
        debug!(found = fields.is_some(), "Fetched document");
        Ok(fields.map(|fields| RawDoc::new(id.clone(), fields)))
    }

    #[instrument(skip(self, fields), fields(%collection))]
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<RecordId> {
        let _lock = self.lock()?;

        let id = RecordId::generate();
        Self::write_fields(&self.record_path(collection, &id), fields)?;

        debug!(%id, "Inserted document");
        Ok(id)
    }

    #[instrument(skip(self, fields), fields(%collection, %id))]
    async fn patch(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<()> {
        let _lock = self.lock()?;

        let path = self.record_path(collection, id);
        let mut existing = Self::read_fields(&path)?.ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;

        for (key, value) in fields {
            existing.insert(key.clone(), value.clone());
        }
        Self::write_fields(&path, &existing)?;

        debug!(changed = fields.len(), "Patched document");
        Ok(())
    }

    #[instrument(skip(self), fields(%collection, %id))]
    async fn remove(&self, collection: &CollectionName, id: &RecordId) -> Result<()> {
        let _lock = self.lock()?;

        match fs::remove_file(self.record_path(collection, id)) {
            Ok(()) => debug!("Removed document"),
            Err(err) if err.kind() == ErrorKind::NotFound => debug!("Document already absent"),
            Err(err) => return Err(map_io(err)),
        }

        Ok(())
    }
}
