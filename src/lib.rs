pub mod client;
pub mod draft;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod moderation;
pub mod screens;
pub mod session;
pub mod sync;

// Re-export commonly used items for tests / external users
pub use client::{ApiClient, Destination, LoginOutcome};
pub use draft::{ProjectDraft, SignupDraft};
pub use endpoints::Endpoints;
pub use error::{ClientError, ClientResult};
pub use session::SessionStore;
pub use sync::{SyncState, ViewState};
