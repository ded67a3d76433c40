use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::models::{Confirmation, Filter, Project, ProjectStatus, UpdateProject};
use crate::sync::{SyncState, ViewState};

/// Mutating calls the admin review screens need. Seam for swapping the
/// real client out in unit tests.
#[async_trait]
pub trait ModerationApi: Send + Sync {
    async fn list_projects(
        &self,
        filter: &Filter,
        status: Option<ProjectStatus>,
    ) -> ClientResult<Vec<Project>>;
    async fn update_project_status(&self, id: &str, status: ProjectStatus)
        -> ClientResult<Project>;
    async fn update_project(&self, id: &str, fields: &UpdateProject) -> ClientResult<Project>;
    async fn delete_project(&self, id: &str) -> ClientResult<Confirmation>;
}

#[async_trait]
impl ModerationApi for ApiClient {
    async fn list_projects(
        &self,
        filter: &Filter,
        status: Option<ProjectStatus>,
    ) -> ClientResult<Vec<Project>> {
        ApiClient::list_projects(self, filter, status).await
    }
    async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
    ) -> ClientResult<Project> {
        ApiClient::update_project_status(self, id, status).await
    }
    async fn update_project(&self, id: &str, fields: &UpdateProject) -> ClientResult<Project> {
        ApiClient::update_project(self, id, fields).await
    }
    async fn delete_project(&self, id: &str) -> ClientResult<Confirmation> {
        ApiClient::delete_project(self, id).await
    }
}

/// One admin review list (pending queue, approved list, moderation tab).
/// Mutating actions update the displayed list in place after the server
/// confirms; on failure the item stays put and the error propagates to the
/// caller for surfacing. No automatic retry.
pub struct ModerationQueue {
    api: Arc<dyn ModerationApi>,
    status: Option<ProjectStatus>,
    items: SyncState<Vec<Project>>,
}

impl ModerationQueue {
    pub fn new(api: Arc<dyn ModerationApi>, status: Option<ProjectStatus>) -> Self {
        Self { api, status, items: SyncState::new() }
    }

    pub fn view(&self) -> ViewState<Vec<Project>> {
        self.items.view()
    }

    pub fn items(&self) -> Vec<Project> {
        self.items.view().ready().cloned().unwrap_or_default()
    }

    /// Re-fetch the full list; stale responses from superseded loads are
    /// discarded by the sync layer.
    pub async fn load(&self) -> ClientResult<()> {
        let filter = Filter::default();
        crate::sync::run(&self.items, self.api.list_projects(&filter, self.status)).await?;
        Ok(())
    }

    /// `pending → approved`. Removing by id is idempotent against the local
    /// list, so a repeated approve cannot duplicate or resurrect anything.
    pub async fn approve(&self, id: &str) -> ClientResult<Project> {
        let updated = self.api.update_project_status(id, ProjectStatus::Approved).await?;
        self.remove_locally(id);
        info!(id, "project approved");
        Ok(updated)
    }

    /// `pending → rejected`.
    pub async fn reject(&self, id: &str) -> ClientResult<Project> {
        let updated = self.api.update_project_status(id, ProjectStatus::Rejected).await?;
        self.remove_locally(id);
        info!(id, "project rejected");
        Ok(updated)
    }

    /// `any → removed` (client list only; the backend keeps history).
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.api.delete_project(id).await?;
        self.remove_locally(id);
        info!(id, "project deleted");
        Ok(())
    }

    /// Edit in place: the confirmed server copy replaces the list entry.
    pub async fn edit(&self, id: &str, fields: &UpdateProject) -> ClientResult<Project> {
        let updated = self.api.update_project(id, fields).await?;
        let replacement = updated.clone();
        self.items.update(|items| {
            if let Some(slot) = items.iter_mut().find(|p| p.id == id) {
                *slot = replacement;
            }
        });
        Ok(updated)
    }

    fn remove_locally(&self, id: &str) {
        self.items.update(|items| items.retain(|p| p.id != id));
    }
}
