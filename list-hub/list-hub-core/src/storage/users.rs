use crate::storage::collection::{Collection, Record};
use crate::storage::model::User;
use crate::storage::UserStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// User documents. Name uniqueness is not enforced here; registration checks
/// for an existing name before inserting.
pub struct UserCollection {
    inner: Collection<User>,
}

impl UserCollection {
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
}

#[async_trait]
impl UserStore for UserCollection {
    async fn insert_user(&self, user: User) -> Result<()> {
        self.inner.insert(user)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.inner.find_one(|u| u.name == name))
    }

    async fn resolve_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        Ok(self
            .inner
            .find(|u| ids.contains(&u.id))
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect())
    }
}
