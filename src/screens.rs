//! Per-screen controllers. Each screen owns its view state exclusively;
//! navigating away and back constructs fresh state and re-fetches rather
//! than reusing anything cached.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{Comment, Filter, Project, ProjectStats, ProjectStatus, Role};
use crate::moderation::ModerationQueue;
use crate::sync::{self, SyncState, ViewState};

/// Public browse screen: filter state plus the approved-project list.
/// Rapid filter changes are race-safe; the displayed list always reflects
/// the most recently applied filter.
pub struct ProjectBrowser {
    client: ApiClient,
    filter: Mutex<Filter>,
    projects: SyncState<Vec<Project>>,
}

impl ProjectBrowser {
    pub fn new(client: ApiClient) -> Self {
        Self { client, filter: Mutex::new(Filter::default()), projects: SyncState::new() }
    }

    pub fn filter(&self) -> Filter {
        self.filter.lock().unwrap().clone()
    }

    pub fn view(&self) -> ViewState<Vec<Project>> {
        self.projects.view()
    }

    /// Replace the filter and fetch the matching list. Returns whether the
    /// response was applied; a response superseded by a newer filter change
    /// is discarded.
    pub async fn apply_filter(&self, filter: Filter) -> ClientResult<bool> {
        *self.filter.lock().unwrap() = filter.clone();
        sync::run(
            &self.projects,
            self.client.list_projects(&filter, Some(ProjectStatus::Approved)),
        )
        .await
    }

    /// Re-fetch with the current filter.
    pub async fn refresh(&self) -> ClientResult<bool> {
        let filter = self.filter();
        sync::run(
            &self.projects,
            self.client.list_projects(&filter, Some(ProjectStatus::Approved)),
        )
        .await
    }

    /// Called when the user navigates away; any in-flight response becomes
    /// stale and the next visit starts from a fresh fetch.
    pub fn leave(&self) {
        self.projects.reset();
    }
}

/// One project's detail view with its comment thread.
pub struct ProjectDetail {
    client: ApiClient,
    id: String,
    project: SyncState<Project>,
    comments: SyncState<Vec<Comment>>,
}

impl ProjectDetail {
    pub fn new(client: ApiClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            project: SyncState::new(),
            comments: SyncState::new(),
        }
    }

    pub fn project(&self) -> ViewState<Project> {
        self.project.view()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.comments.view().ready().cloned().unwrap_or_default()
    }

    /// One fetch feeds both slices: the project body and its comment list.
    pub async fn load(&self) -> ClientResult<()> {
        let project_gen = self.project.begin();
        let comments_gen = self.comments.begin();
        match self.client.get_project(&self.id).await {
            Ok(mut project) => {
                let comments = project.comments.take().unwrap_or_default();
                self.project.apply_ok(project_gen, project);
                self.comments.apply_ok(comments_gen, comments);
                Ok(())
            }
            Err(e) => {
                self.project.apply_err(project_gen, &e);
                self.comments.apply_err(comments_gen, &e);
                Err(e)
            }
        }
    }

    /// Post a comment; it is prepended to the thread only after the server
    /// confirms creation.
    pub async fn add_comment(&self, content: &str) -> ClientResult<Comment> {
        let created = self.client.add_comment(&self.id, content).await?;
        let prepend = created.clone();
        self.comments.update(|list| list.insert(0, prepend));
        Ok(created)
    }
}

/// Admin review screen: stats plus the pending and approved queues.
/// Construction is gated on the authenticated user's role.
pub struct AdminDashboard {
    client: ApiClient,
    stats: SyncState<ProjectStats>,
    pending: ModerationQueue,
    approved: ModerationQueue,
}

impl std::fmt::Debug for AdminDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDashboard").finish_non_exhaustive()
    }
}

impl AdminDashboard {
    /// Verify the current session belongs to an admin, then build the
    /// screen. Non-admins are turned away before anything is fetched.
    pub async fn open(client: ApiClient) -> ClientResult<Self> {
        let user = client.current_user().await?;
        if user.role != Role::Admin {
            return Err(ClientError::Unauthorized);
        }
        info!(user = %user.name, "admin dashboard opened");
        let api: Arc<ApiClient> = Arc::new(client.clone());
        Ok(Self {
            stats: SyncState::new(),
            pending: ModerationQueue::new(api.clone(), Some(ProjectStatus::Pending)),
            approved: ModerationQueue::new(api, Some(ProjectStatus::Approved)),
            client,
        })
    }

    pub fn stats(&self) -> ViewState<ProjectStats> {
        self.stats.view()
    }

    pub fn pending(&self) -> &ModerationQueue {
        &self.pending
    }

    pub fn approved(&self) -> &ModerationQueue {
        &self.approved
    }

    pub async fn load_stats(&self) -> ClientResult<bool> {
        sync::run(&self.stats, self.client.project_stats()).await
    }

    /// Initial load: stats and both queues. Every slice is attempted even
    /// when an earlier one fails; the first error is reported.
    pub async fn load(&self) -> ClientResult<()> {
        let stats = self.load_stats().await.map(|_| ());
        let pending = self.pending.load().await;
        let approved = self.approved.load().await;
        stats.and(pending).and(approved)
    }
}
