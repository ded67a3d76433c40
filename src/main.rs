use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use showcase_client::models::Filter;
use showcase_client::{ApiClient, Destination, Endpoints, SessionStore, ViewState};
use showcase_client::screens::ProjectBrowser;

/// Smoke tool: log in against a running backend, print stats and the first
/// page of approved projects. Environment: SHOWCASE_API_URL (optional),
/// SHOWCASE_EMAIL, SHOWCASE_PASSWORD.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env automatically only in debug builds to reduce manual setup
    // overhead; deployments set the environment externally.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let email = require_env("SHOWCASE_EMAIL")?;
    let password = require_env("SHOWCASE_PASSWORD")?;

    let endpoints = Endpoints::from_env();
    info!("API base: {}", endpoints.base());
    let client = ApiClient::new(endpoints, SessionStore::new());

    client
        .health()
        .await
        .context("backend is not responding; is the server running?")?;

    let outcome = client.login(&email, &password).await.context("login failed")?;
    info!("logged in as {} ({:?})", outcome.user.name, outcome.user.role);

    if outcome.destination == Destination::AdminDashboard {
        let stats = client.project_stats().await.context("stats fetch failed")?;
        println!(
            "projects: {} total, {} pending, {} approved",
            stats.total, stats.pending, stats.approved
        );
    }

    let browser = ProjectBrowser::new(client.clone());
    browser.apply_filter(Filter::default()).await.context("project list fetch failed")?;
    match browser.view() {
        ViewState::Ready(projects) => {
            println!("{} approved projects", projects.len());
            for p in &projects {
                println!("  [{}] {} — {}", p.category, p.title, p.author_name());
            }
        }
        other => println!("project list unavailable: {other:?}"),
    }

    client.logout();
    Ok(())
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}
