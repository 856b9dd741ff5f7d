//! Documents persisted by the store: users and shopping lists with their
//! embedded items and access-control sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered user. Never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub is_completed: bool,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_completed: false,
        }
    }
}

/// Insertion-ordered set of user ids. `insert` and `remove` are idempotent
/// and report whether the set changed.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IdSet(Vec<Uuid>);

impl IdSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: Uuid) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.0.len();
        self.0.retain(|x| *x != id);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }
}

impl FromIterator<Uuid> for IdSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// A shopping list document.
///
/// The owner never appears in either access set, and `sharing_ids` and
/// `sharing_invite_ids` never share a member. All mutators below keep both
/// rules and return `true` only when the document actually changed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    items: Vec<Item>,
    sharing_ids: IdSet,
    sharing_invite_ids: IdSet,
    created_at: DateTime<Utc>,
}

impl ShoppingList {
    pub fn new(owner_id: Uuid, name: String) -> Self {
        Self::with_items(owner_id, name, Vec::new())
    }

    pub fn with_items(owner_id: Uuid, name: String, items: Vec<Item>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            items,
            sharing_ids: IdSet::new(),
            sharing_invite_ids: IdSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn sharing_ids(&self) -> &IdSet {
        &self.sharing_ids
    }

    pub fn sharing_invite_ids(&self) -> &IdSet {
        &self.sharing_invite_ids
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn contains_item(&self, item_id: Uuid) -> bool {
        self.items.iter().any(|i| i.id == item_id)
    }

    pub fn push_item(&mut self, item: Item) -> bool {
        self.items.push(item);
        true
    }

    /// Replace name and completion of the item with the same id.
    pub fn replace_item(&mut self, item: &Item) -> bool {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) if existing != item => {
                existing.name = item.name.clone();
                existing.is_completed = item.is_completed;
                true
            }
            _ => false,
        }
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        self.items.len() != before
    }

    /// Drop every completed item, keeping the rest in order.
    pub fn checkout(&mut self) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.is_completed);
        self.items.len() != before
    }

    /// `NONE -> INVITED`. No-op for the owner and for current sharers.
    pub fn invite(&mut self, user: Uuid) -> bool {
        if user == self.owner_id || self.sharing_ids.contains(user) {
            return false;
        }
        self.sharing_invite_ids.insert(user)
    }

    /// `INVITED -> SHARED`.
    pub fn accept_invite(&mut self, user: Uuid) -> bool {
        if !self.sharing_invite_ids.remove(user) {
            return false;
        }
        self.sharing_ids.insert(user);
        true
    }

    /// `INVITED -> NONE`.
    pub fn decline_invite(&mut self, user: Uuid) -> bool {
        self.sharing_invite_ids.remove(user)
    }
}
