//! Match conditions and modifications understood by the list store.
//!
//! A store applies a `ListUpdate` to documents matching a `ListFilter` as a
//! single step, so the precondition a caller relies on can never be
//! invalidated between the check and the write.

use crate::access;
use crate::storage::model::{Item, ShoppingList};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListFilter {
    Id(Uuid),
    Owner(Uuid),
    AccessibleBy(Uuid),
    InvitedUser(Uuid),
    ContainsItem(Uuid),
    All(Vec<ListFilter>),
}

impl ListFilter {
    pub fn id(id: Uuid) -> Self {
        ListFilter::Id(id)
    }

    pub fn and(self, other: ListFilter) -> Self {
        match self {
            ListFilter::All(mut parts) => {
                parts.push(other);
                ListFilter::All(parts)
            }
            first => ListFilter::All(vec![first, other]),
        }
    }

    pub fn matches(&self, list: &ShoppingList) -> bool {
        match self {
            ListFilter::Id(id) => list.id() == *id,
            ListFilter::Owner(owner) => access::is_owner(list, *owner),
            ListFilter::AccessibleBy(user) => access::can_access(list, *user),
            ListFilter::InvitedUser(user) => list.sharing_invite_ids().contains(*user),
            ListFilter::ContainsItem(item) => list.contains_item(*item),
            ListFilter::All(parts) => parts.iter().all(|f| f.matches(list)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListUpdate {
    PushItem(Item),
    ReplaceItem(Item),
    PullItem(Uuid),
    PullCompleted,
    Invite(Uuid),
    AcceptInvite(Uuid),
    DeclineInvite(Uuid),
}

impl ListUpdate {
    /// Apply to one document, returning whether it changed.
    pub fn apply(&self, list: &mut ShoppingList) -> bool {
        match self {
            ListUpdate::PushItem(item) => list.push_item(item.clone()),
            ListUpdate::ReplaceItem(item) => list.replace_item(item),
            ListUpdate::PullItem(id) => list.remove_item(*id),
            ListUpdate::PullCompleted => list.checkout(),
            ListUpdate::Invite(user) => list.invite(*user),
            ListUpdate::AcceptInvite(user) => list.accept_invite(*user),
            ListUpdate::DeclineInvite(user) => list.decline_invite(*user),
        }
    }
}

/// Counts reported by a conditional update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: usize,
    pub modified: usize,
}

impl UpdateOutcome {
    pub fn matched_any(&self) -> bool {
        self.matched > 0
    }

    pub fn modified_any(&self) -> bool {
        self.modified > 0
    }
}
