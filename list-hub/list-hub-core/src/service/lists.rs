use super::{ListService, ListView};
use crate::error::{HubError, HubResult};
use crate::storage::filter::{ListFilter, ListUpdate};
use crate::storage::model::{Item, ShoppingList};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One entry of a bulk import.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    pub name: String,
    #[serde(default)]
    pub items: Vec<NewItem>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
}

fn require_name(name: &str, what: &str) -> HubResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HubError::validation(format!("{what} name must not be empty")));
    }
    Ok(name.to_string())
}

impl ListService {
    /// Lists the user owns or shares, oldest first.
    pub async fn list_lists(&self, user: Uuid) -> HubResult<Vec<ListView>> {
        let lists = self
            .lists
            .find_lists(&ListFilter::AccessibleBy(user))
            .await?;
        debug!(user = %user, count = lists.len(), "listing lists");
        Ok(self.project(lists).await)
    }

    pub async fn create_list(&self, owner: Uuid, name: &str) -> HubResult<Uuid> {
        let name = require_name(name, "list")?;
        let list = ShoppingList::new(owner, name);
        let id = list.id();
        self.lists.insert_list(list).await?;
        info!(list = %id, owner = %owner, "list created");
        Ok(id)
    }

    /// Only the owner may delete. Anyone else gets `NotFound`, as if the list
    /// did not exist.
    pub async fn delete_list(&self, list_id: Uuid, owner: Uuid) -> HubResult<()> {
        let filter = ListFilter::id(list_id).and(ListFilter::Owner(owner));
        if !self.lists.delete_one(&filter).await? {
            return Err(HubError::NotFound);
        }
        info!(list = %list_id, owner = %owner, "list deleted");
        Ok(())
    }

    /// Insert each list as its own document, stopping at the first failure.
    /// Lists inserted before the failure stay in place.
    pub async fn bulk_create_lists(
        &self,
        lists: Vec<NewList>,
        owner: Uuid,
    ) -> HubResult<Vec<Uuid>> {
        let mut docs = Vec::with_capacity(lists.len());
        for new in lists {
            let name = require_name(&new.name, "list")?;
            let mut items = Vec::with_capacity(new.items.len());
            for item in new.items {
                let mut fresh = Item::new(require_name(&item.name, "item")?);
                fresh.is_completed = item.is_completed;
                items.push(fresh);
            }
            docs.push(ShoppingList::with_items(owner, name, items));
        }

        let total = docs.len();
        let mut ids = Vec::with_capacity(total);
        for list in docs {
            let id = list.id();
            if let Err(e) = self.lists.insert_list(list).await {
                warn!(owner = %owner, inserted = ids.len(), total, error = %e, "bulk insert stopped");
                return Err(e.into());
            }
            ids.push(id);
        }
        info!(owner = %owner, count = total, "lists imported");
        Ok(ids)
    }

    /// Remove completed items. There is no access check here: anyone holding
    /// the list id can check it out.
    pub async fn checkout_list(&self, list_id: Uuid) -> HubResult<()> {
        let outcome = self
            .lists
            .update_one(&ListFilter::id(list_id), &ListUpdate::PullCompleted)
            .await?;
        if !outcome.matched_any() {
            return Err(HubError::NotFound);
        }
        info!(list = %list_id, removed = outcome.modified_any(), "list checked out");
        Ok(())
    }

    pub async fn add_item(&self, name: &str, user: Uuid, list_id: Uuid) -> HubResult<Item> {
        let item = Item::new(require_name(name, "item")?);
        let filter = ListFilter::id(list_id).and(ListFilter::AccessibleBy(user));
        let outcome = self
            .lists
            .update_one(&filter, &ListUpdate::PushItem(item.clone()))
            .await?;
        if !outcome.matched_any() {
            return Err(HubError::NotFound);
        }
        debug!(list = %list_id, item = %item.id, "item added");
        Ok(item)
    }

    /// Remove the item from whichever accessible list holds it.
    pub async fn remove_item(&self, item_id: Uuid, user: Uuid) -> HubResult<()> {
        let filter = ListFilter::AccessibleBy(user).and(ListFilter::ContainsItem(item_id));
        let outcome = self
            .lists
            .update_many(&filter, &ListUpdate::PullItem(item_id))
            .await?;
        if !outcome.modified_any() {
            return Err(HubError::NotFound);
        }
        debug!(item = %item_id, lists = outcome.modified, "item removed");
        Ok(())
    }

    /// Replace name and completion of an item in a list the user can access.
    pub async fn modify_item(&self, user: Uuid, item: Item) -> HubResult<()> {
        let item = Item {
            name: require_name(&item.name, "item")?,
            ..item
        };
        let filter = ListFilter::AccessibleBy(user).and(ListFilter::ContainsItem(item.id));
        let outcome = self
            .lists
            .update_one(&filter, &ListUpdate::ReplaceItem(item.clone()))
            .await?;
        if !outcome.matched_any() {
            return Err(HubError::NotFound);
        }
        debug!(item = %item.id, changed = outcome.modified_any(), "item modified");
        Ok(())
    }
}
