//! Storage seam between the list operations and the document store.
//!
//! Services only talk to [`ListStore`] and [`UserStore`]. Every mutation is
//! expressed as a filter plus a modification that the store applies
//! atomically per document; no caller reads a document, edits it locally and
//! writes it back.

pub mod collection;
pub mod filter;
pub mod lists;
pub mod model;
pub mod users;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use self::filter::{ListFilter, ListUpdate, UpdateOutcome};
use self::lists::ListCollection;
use self::model::{ShoppingList, User};
use self::users::UserCollection;

#[async_trait]
pub trait ListStore: Send + Sync {
    async fn insert_list(&self, list: ShoppingList) -> Result<()>;
    async fn find_lists(&self, filter: &ListFilter) -> Result<Vec<ShoppingList>>;
    /// Apply `update` to the first document matching `filter`.
    async fn update_one(&self, filter: &ListFilter, update: &ListUpdate) -> Result<UpdateOutcome>;
    /// Apply `update` to every document matching `filter`.
    async fn update_many(&self, filter: &ListFilter, update: &ListUpdate)
        -> Result<UpdateOutcome>;
    async fn delete_one(&self, filter: &ListFilter) -> Result<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<()>;
    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;
    /// Resolve ids to user names. Unknown ids are absent from the map.
    async fn resolve_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>>;
}

/// The two collections backing the service, rooted at one data directory.
#[derive(Clone)]
pub struct Database {
    pub lists: Arc<ListCollection>,
    pub users: Arc<UserCollection>,
}

impl Database {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let lists = ListCollection::open(dir.join("lists"))?;
        let users = UserCollection::open(dir.join("users"))?;
        tracing::info!(
            dir = %dir.display(),
            lists = lists.len(),
            users = users.len(),
            "document store opened"
        );
        Ok(Self {
            lists: Arc::new(lists),
            users: Arc::new(users),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            lists: Arc::new(ListCollection::in_memory()),
            users: Arc::new(UserCollection::in_memory()),
        }
    }

    pub fn list_store(&self) -> Arc<dyn ListStore> {
        self.lists.clone()
    }

    pub fn user_store(&self) -> Arc<dyn UserStore> {
        self.users.clone()
    }
}
