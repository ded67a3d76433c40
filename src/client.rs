use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::draft::{ProjectDraft, SignupDraft};
use crate::endpoints::Endpoints;
use crate::error::{ClientError, ClientResult};
use crate::models::*;
use crate::session::SessionStore;

/// Where a successful login should land the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    AdminDashboard,
    Home,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub destination: Destination,
}

/// Async client for the showcase REST API. Cheap to clone; clones share
/// the underlying connection pool and session slot.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints, session: SessionStore) -> Self {
        Self { http: reqwest::Client::new(), endpoints, session }
    }

    pub fn from_env() -> Self {
        Self::new(Endpoints::from_env(), SessionStore::new())
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // Authenticated operations fail here, before any network call, when no
    // token is held.
    fn bearer(&self) -> ClientResult<String> {
        self.session.get().ok_or(ClientError::Unauthorized)
    }

    /// Validate status and parse the payload. A 401/403 means the token is
    /// missing/invalid/expired; the session is cleared so the next screen
    /// sends the user back through login.
    async fn expect_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ClientError::from_status(status, &body);
            if err.is_auth_failure() && self.session.is_authenticated() {
                warn!(%status, "token rejected, clearing session");
                self.session.clear();
            }
            return Err(err);
        }
        Ok(response.json().await?)
    }

    /// Backend liveness probe; the login screen checks this first to give a
    /// clearer message than a raw connection error.
    #[tracing::instrument(skip(self))]
    pub async fn health(&self) -> ClientResult<()> {
        let response = self.http.get(self.endpoints.health()).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }
        Ok(())
    }

    /// Authenticate, store the bearer token, and report the
    /// role-appropriate destination (admins land on the dashboard).
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("Email and password are required"));
        }
        let response = self
            .http
            .post(self.endpoints.login())
            .json(&LoginRequest { email: email.to_string(), password: password.to_string() })
            .send()
            .await?;
        let body: LoginResponse = self.expect_json(response).await?;
        self.session.set(body.token);
        let destination = match body.user.role {
            Role::Admin => Destination::AdminDashboard,
            Role::User => Destination::Home,
        };
        debug!(role = ?body.user.role, "login succeeded");
        Ok(LoginOutcome { user: body.user, destination })
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn signup(&self, draft: &SignupDraft) -> ClientResult<Confirmation> {
        draft.validate()?;
        let response = self
            .http
            .post(self.endpoints.signup())
            .json(&SignupRequest {
                name: draft.name.trim().to_string(),
                email: draft.email.trim().to_string(),
                password: draft.password.clone(),
            })
            .send()
            .await?;
        self.expect_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn current_user(&self) -> ClientResult<User> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(self.endpoints.current_user())
            .bearer_auth(token)
            .send()
            .await?;
        self.expect_json(response).await
    }

    /// List projects matching a filter, optionally pinned to one status
    /// (browse screens show approved, the admin queue shows pending).
    /// Works with or without a session; the token is attached when held.
    #[tracing::instrument(skip(self, filter))]
    pub async fn list_projects(
        &self,
        filter: &Filter,
        status: Option<ProjectStatus>,
    ) -> ClientResult<Vec<Project>> {
        let mut query = filter.query_pairs();
        if let Some(status) = status {
            let label = match status {
                ProjectStatus::Pending => "pending",
                ProjectStatus::Approved => "approved",
                ProjectStatus::Rejected => "rejected",
            };
            query.push(("status", label.to_string()));
        }
        let mut request = self.http.get(self.endpoints.projects()).query(&query);
        if let Some(token) = self.session.get() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        self.expect_json(response).await
    }

    /// Fetch one project; the payload carries its comment thread.
    #[tracing::instrument(skip(self))]
    pub async fn get_project(&self, id: &str) -> ClientResult<Project> {
        let mut request = self.http.get(self.endpoints.project(id));
        if let Some(token) = self.session.get() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        self.expect_json(response).await
    }

    /// Submit a validated draft as one multipart payload. Local validation
    /// runs first; an invalid draft never reaches the network.
    #[tracing::instrument(skip(self, draft), fields(files = draft.files().len()))]
    pub async fn create_project(&self, draft: ProjectDraft) -> ClientResult<Project> {
        draft.validate()?;
        let token = self.bearer()?;
        let form = draft.into_form()?;
        let response = self
            .http
            .post(self.endpoints.projects())
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        self.expect_json(response).await
    }

    #[tracing::instrument(skip(self, fields))]
    pub async fn update_project(&self, id: &str, fields: &UpdateProject) -> ClientResult<Project> {
        let token = self.bearer()?;
        let response = self
            .http
            .put(self.endpoints.project(id))
            .bearer_auth(token)
            .json(fields)
            .send()
            .await?;
        self.expect_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
    ) -> ClientResult<Project> {
        let token = self.bearer()?;
        let response = self
            .http
            .patch(self.endpoints.project_status(id))
            .bearer_auth(token)
            .json(&UpdateStatusRequest { status })
            .send()
            .await?;
        self.expect_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_project(&self, id: &str) -> ClientResult<Confirmation> {
        let token = self.bearer()?;
        let response = self
            .http
            .delete(self.endpoints.project(id))
            .bearer_auth(token)
            .send()
            .await?;
        self.expect_json(response).await
    }

    #[tracing::instrument(skip(self, content))]
    pub async fn add_comment(&self, project_id: &str, content: &str) -> ClientResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::validation("Comment cannot be empty"));
        }
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.endpoints.project_comments(project_id))
            .bearer_auth(token)
            .json(&NewComment { content: content.to_string() })
            .send()
            .await?;
        let body: CommentResponse = self.expect_json(response).await?;
        Ok(body.comment)
    }

    #[tracing::instrument(skip(self))]
    pub async fn project_stats(&self) -> ClientResult<ProjectStats> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(self.endpoints.project_stats())
            .bearer_auth(token)
            .send()
            .await?;
        self.expect_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(Endpoints::new("http://localhost:1"), SessionStore::new())
    }

    #[tokio::test]
    async fn auth_operations_fail_locally_without_token() {
        // Port 1 is unreachable; reaching the network would error with
        // Transport, not Unauthorized.
        let c = client();
        assert!(matches!(c.current_user().await, Err(ClientError::Unauthorized)));
        assert!(matches!(c.project_stats().await, Err(ClientError::Unauthorized)));
        assert!(matches!(
            c.update_project_status("p1", ProjectStatus::Approved).await,
            Err(ClientError::Unauthorized)
        ));
        assert!(matches!(c.delete_project("p1").await, Err(ClientError::Unauthorized)));
        assert!(matches!(c.add_comment("p1", "hi").await, Err(ClientError::Unauthorized)));
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_network() {
        let c = client();
        c.session().set("tok");
        let draft = ProjectDraft::new(); // everything missing
        assert!(matches!(c.create_project(draft).await, Err(ClientError::Validation(_))));
    }

    #[tokio::test]
    async fn empty_comment_rejected_before_token_check() {
        let c = client();
        assert!(matches!(c.add_comment("p1", "   ").await, Err(ClientError::Validation(_))));
    }
}
