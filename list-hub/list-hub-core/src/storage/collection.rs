//! Filesystem-backed document collection.
//!
//! Each document lives in its own `<id>.json` file and the whole collection is
//! loaded at startup. Writes go through a single write lock and replace the
//! file via rename, so a conditional update is atomic with respect to other
//! readers and writers of the same collection.

use crate::storage::filter::UpdateOutcome;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateScope {
    One,
    Many,
}

pub struct Collection<T> {
    dir: Option<PathBuf>,
    docs: RwLock<Vec<T>>,
}

impl<T: Record> Collection<T> {
    /// Open (creating if needed) a collection rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let mut docs = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }
            let bytes = std::fs::read(&path)?;
            match serde_json::from_slice::<T>(&bytes) {
                Ok(doc) => docs.push(doc),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable document"),
            }
        }
        docs.sort_by_key(|d| (d.created_at(), d.id()));
        Ok(Self {
            dir: Some(dir),
            docs: RwLock::new(docs),
        })
    }

    /// A collection that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            docs: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&self, doc: T) -> Result<()> {
        let mut docs = self.docs.write();
        if docs.iter().any(|d| d.id() == doc.id()) {
            return Err(anyhow!("duplicate document id {}", doc.id()));
        }
        self.persist(&doc)?;
        docs.push(doc);
        Ok(())
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.docs.read().iter().filter(|d| pred(d)).cloned().collect()
    }

    pub fn find_one(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.docs.read().iter().find(|d| pred(d)).cloned()
    }

    /// Apply `apply` to the documents matching `pred` while holding the write
    /// lock. `apply` works on a copy; the stored document is only replaced
    /// once the new version has been persisted.
    pub fn update(
        &self,
        pred: impl Fn(&T) -> bool,
        scope: UpdateScope,
        apply: impl Fn(&mut T) -> bool,
    ) -> Result<UpdateOutcome> {
        let mut docs = self.docs.write();
        let mut outcome = UpdateOutcome::default();
        for doc in docs.iter_mut() {
            if !pred(doc) {
                continue;
            }
            outcome.matched += 1;
            let mut next = doc.clone();
            if apply(&mut next) {
                self.persist(&next)?;
                *doc = next;
                outcome.modified += 1;
            }
            if scope == UpdateScope::One {
                break;
            }
        }
        Ok(outcome)
    }

    /// Remove the first document matching `pred`.
    pub fn delete_one(&self, pred: impl Fn(&T) -> bool) -> Result<bool> {
        let mut docs = self.docs.write();
        let Some(pos) = docs.iter().position(|d| pred(d)) else {
            return Ok(false);
        };
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{}.json", docs[pos].id()));
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        docs.remove(pos);
        Ok(true)
    }

    fn persist(&self, doc: &T) -> Result<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = dir.join(format!("{}.json", doc.id()));
        let tmp = dir.join(format!("{}.json.tmp", doc.id()));
        std::fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
