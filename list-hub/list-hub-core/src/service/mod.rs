//! List, item and sharing operations.
//!
//! Every operation is a single call into the store with the access rule
//! folded into the filter. `ListService` itself holds no state beyond the
//! store handles and can be shared freely between request tasks.

mod lists;
mod projection;
mod sharing;

pub use lists::{NewItem, NewList};
pub use projection::ListView;

use crate::storage::{Database, ListStore, UserStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct ListService {
    lists: Arc<dyn ListStore>,
    users: Arc<dyn UserStore>,
}

impl ListService {
    pub fn new(lists: Arc<dyn ListStore>, users: Arc<dyn UserStore>) -> Self {
        Self { lists, users }
    }

    pub fn from_database(db: &Database) -> Self {
        Self::new(db.list_store(), db.user_store())
    }
}
