//! Invite lifecycle: `NONE -> INVITED -> SHARED`, or back to `NONE` on
//! decline. Every transition is one conditional update, so concurrent
//! responses to the same invite cannot both take effect.

use super::{ListService, ListView};
use crate::error::{HubError, HubResult};
use crate::storage::filter::{ListFilter, ListUpdate};
use tracing::{debug, info};
use uuid::Uuid;

impl ListService {
    /// Invite `user_name` to a list owned by `owner`. Returns the invitee id.
    ///
    /// Re-inviting a pending invitee or a current sharer succeeds without
    /// changing anything.
    pub async fn create_invite(
        &self,
        owner: Uuid,
        list_id: Uuid,
        user_name: &str,
    ) -> HubResult<Uuid> {
        let Some(invitee) = self.users.find_by_name(user_name.trim()).await? else {
            return Err(HubError::NotFound);
        };
        if invitee.id == owner {
            return Err(HubError::validation("cannot invite yourself"));
        }

        let filter = ListFilter::id(list_id).and(ListFilter::Owner(owner));
        let outcome = self
            .lists
            .update_one(&filter, &ListUpdate::Invite(invitee.id))
            .await?;
        if !outcome.matched_any() {
            return Err(HubError::NotFound);
        }
        if outcome.modified_any() {
            info!(list = %list_id, invitee = %invitee.id, "invite created");
        } else {
            debug!(list = %list_id, invitee = %invitee.id, "invite already present");
        }
        Ok(invitee.id)
    }

    /// Lists with a pending invite for `user`.
    pub async fn list_invites(&self, user: Uuid) -> HubResult<Vec<ListView>> {
        let lists = self
            .lists
            .find_lists(&ListFilter::InvitedUser(user))
            .await?;
        Ok(self.project(lists).await)
    }

    pub async fn respond_to_invite(
        &self,
        list_id: Uuid,
        user: Uuid,
        accept: bool,
    ) -> HubResult<()> {
        let update = if accept {
            ListUpdate::AcceptInvite(user)
        } else {
            ListUpdate::DeclineInvite(user)
        };
        let filter = ListFilter::id(list_id).and(ListFilter::InvitedUser(user));
        let outcome = self.lists.update_one(&filter, &update).await?;
        if !outcome.modified_any() {
            return Err(HubError::NotFound);
        }
        info!(list = %list_id, user = %user, accept, "invite answered");
        Ok(())
    }
}
