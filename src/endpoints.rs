/// Pure mapping from logical operation to a fully-qualified request URL.
/// No state beyond the configured base; the only failure mode is
/// misconfiguration of the base URL itself.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// Base URL from `SHOWCASE_API_URL`, falling back to the local dev
    /// backend.
    pub fn from_env() -> Self {
        Self::new(std::env::var("SHOWCASE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn health(&self) -> String {
        format!("{}/api/health", self.base)
    }

    pub fn login(&self) -> String {
        format!("{}/api/auth/login", self.base)
    }

    pub fn signup(&self) -> String {
        format!("{}/api/auth/signup", self.base)
    }

    pub fn current_user(&self) -> String {
        format!("{}/api/auth/me", self.base)
    }

    pub fn projects(&self) -> String {
        format!("{}/api/projects", self.base)
    }

    pub fn project(&self, id: &str) -> String {
        format!("{}/api/projects/{}", self.base, urlencoding::encode(id))
    }

    pub fn project_status(&self, id: &str) -> String {
        format!("{}/status", self.project(id))
    }

    pub fn project_comments(&self, id: &str) -> String {
        format!("{}/comments", self.project(id))
    }

    pub fn project_stats(&self) -> String {
        format!("{}/api/projects/stats", self.base)
    }
}
