use crate::storage::collection::{Collection, Record, UpdateScope};
use crate::storage::filter::{ListFilter, ListUpdate, UpdateOutcome};
use crate::storage::model::ShoppingList;
use crate::storage::ListStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

impl Record for ShoppingList {
    fn id(&self) -> Uuid {
        ShoppingList::id(self)
    }

    fn created_at(&self) -> DateTime<Utc> {
        ShoppingList::created_at(self)
    }
}

/// Shopping list documents, one file per list.
pub struct ListCollection {
    inner: Collection<ShoppingList>,
}

impl ListCollection {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            inner: Collection::open(dir)?,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            inner: Collection::in_memory(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Direct read by id, bypassing any access filter. Intended for
    /// inspection and tests.
    pub fn get(&self, id: Uuid) -> Option<ShoppingList> {
        self.inner.find_one(|l| l.id() == id)
    }

    fn update(
        &self,
        filter: &ListFilter,
        update: &ListUpdate,
        scope: UpdateScope,
    ) -> Result<UpdateOutcome> {
        self.inner
            .update(|l| filter.matches(l), scope, |l| update.apply(l))
    }
}

#[async_trait]
impl ListStore for ListCollection {
    async fn insert_list(&self, list: ShoppingList) -> Result<()> {
        self.inner.insert(list)
    }

    async fn find_lists(&self, filter: &ListFilter) -> Result<Vec<ShoppingList>> {
        Ok(self.inner.find(|l| filter.matches(l)))
    }

    async fn update_one(&self, filter: &ListFilter, update: &ListUpdate) -> Result<UpdateOutcome> {
        self.update(filter, update, UpdateScope::One)
    }

    async fn update_many(
        &self,
        filter: &ListFilter,
        update: &ListUpdate,
    ) -> Result<UpdateOutcome> {
        self.update(filter, update, UpdateScope::Many)
    }

    async fn delete_one(&self, filter: &ListFilter) -> Result<bool> {
        self.inner.delete_one(|l| filter.matches(l))
    }
}
