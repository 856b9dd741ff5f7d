use super::ListService;
use crate::storage::model::{Item, ShoppingList};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// A list as presented to callers, with owner and sharer names resolved at
/// read time. Names are never written back to the store.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub name: String,
    pub items: Vec<Item>,
    pub sharing_ids: Vec<Uuid>,
    pub sharing_invite_ids: Vec<Uuid>,
    pub sharing_names: Vec<String>,
}

impl ListView {
    fn build(list: ShoppingList, names: &HashMap<Uuid, String>) -> Self {
        let sharing_names = list
            .sharing_ids()
            .iter()
            .filter_map(|id| names.get(&id).cloned())
            .collect();
        Self {
            id: list.id(),
            owner_id: list.owner_id(),
            owner_name: names.get(&list.owner_id()).cloned(),
            name: list.name().to_string(),
            items: list.items().to_vec(),
            sharing_ids: list.sharing_ids().as_slice().to_vec(),
            sharing_invite_ids: list.sharing_invite_ids().as_slice().to_vec(),
            sharing_names,
        }
    }
}

impl ListService {
    /// Resolve owner and sharer names for a batch of lists with one lookup.
    /// A failed lookup degrades to missing names instead of failing the read.
    pub(super) async fn project(&self, lists: Vec<ShoppingList>) -> Vec<ListView> {
        let mut ids: Vec<Uuid> = Vec::new();
        for list in &lists {
            ids.push(list.owner_id());
            ids.extend(list.sharing_ids().iter());
        }
        ids.sort();
        ids.dedup();

        let names = match self.users.resolve_names(&ids).await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "name resolution failed; returning lists without names");
                HashMap::new()
            }
        };
        lists
            .into_iter()
            .map(|l| ListView::build(l, &names))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::model::User;
    use crate::storage::{Database, ListStore, UserStore};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct UnreachableUsers;

    #[async_trait]
    impl UserStore for UnreachableUsers {
        async fn insert_user(&self, _user: User) -> anyhow::Result<()> {
            anyhow::bail!("user store offline")
        }

        async fn find_by_name(&self, _name: &str) -> anyhow::Result<Option<User>> {
            anyhow::bail!("user store offline")
        }

        async fn resolve_names(&self, _ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, String>> {
            anyhow::bail!("user store offline")
        }
    }

    #[tokio::test]
    async fn lists_survive_name_lookup_failure() {
        let db = Database::in_memory();
        let svc = ListService::new(db.list_store(), Arc::new(UnreachableUsers));
        let owner = Uuid::new_v4();
        let sharer = Uuid::new_v4();
        let mut list = ShoppingList::new(owner, "Groceries".into());
        list.invite(sharer);
        list.accept_invite(sharer);
        db.lists.insert_list(list).await.unwrap();

        let views = svc.list_lists(sharer).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].owner_name, None);
        assert_eq!(views[0].sharing_ids, vec![sharer]);
        assert!(views[0].sharing_names.is_empty());
    }
}
