//! Access policy for lists and their items.
//!
//! A user may read or mutate a list iff they own it or hold an active share.
//! Callers never evaluate this after fetching a document; it is handed to the
//! store as [`ListFilter::AccessibleBy`](crate::storage::filter::ListFilter)
//! so the check and the read or write happen as one step.

use crate::storage::model::ShoppingList;
use uuid::Uuid;

pub fn can_access(list: &ShoppingList, user: Uuid) -> bool {
    list.owner_id() == user || list.sharing_ids().contains(user)
}

pub fn is_owner(list: &ShoppingList, user: Uuid) -> bool {
    list.owner_id() == user
}
