use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Backend-assigned identifiers are opaque strings.
pub type Id = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Canonical project contract. The wire format is camelCase; snake_case
/// spellings are accepted on input via aliases (historical drift between
/// backend handlers, normalized here at the boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(alias = "academic_year")]
    pub academic_year: String,
    pub category: String,
    pub status: ProjectStatus,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ProjectFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "video_url")]
    pub video_url: Option<String>,
}

impl Project {
    /// Display name for the submitting student; some historical records
    /// carry no author object at all.
    pub fn author_name(&self) -> &str {
        self.author.as_ref().map(|a| a.name.as_str()).unwrap_or("Unknown Author")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    #[serde(alias = "project_id")]
    pub project_id: Id,
    pub content: String,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    pub user: CommentAuthor,
}

/// Client-side query-shaping state; translated to query-string parameters
/// before each list fetch. Nothing is persisted beyond the current view.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub academic_year: Vec<String>,
}

impl Filter {
    /// Query pairs as the backend expects them. Only the first category and
    /// first academic year are sent (single-valued server parameters).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref() {
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
        }
        if let Some(category) = self.categories.first() {
            pairs.push(("category", category.clone()));
        }
        if let Some(year) = self.academic_year.first() {
            pairs.push(("academicYear", year.clone()));
        }
        pairs
    }
}

// ---------------- wire envelopes -----------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusRequest {
    pub status: ProjectStatus,
}

/// Fields editable after submission; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub content: String,
}

// Creating a comment returns the created entity wrapped in an envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    #[serde(default)]
    pub recent: Vec<Project>,
}
