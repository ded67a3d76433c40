use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use showcase_client::models::Filter;
use showcase_client::screens::ProjectBrowser;
use showcase_client::{ApiClient, Endpoints, SessionStore, ViewState};

fn project_json(id: &str, title: &str, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "demo",
        "tags": [],
        "academicYear": "2024",
        "category": category,
        "status": "approved",
        "createdAt": "2024-05-01T09:30:00Z"
    })
}

fn filter_for(category: &str) -> Filter {
    Filter { categories: vec![category.into()], ..Default::default() }
}

/// Regression test for the stale-response race: filter A's response
/// arrives after filter B's, but the displayed list must reflect B.
#[tokio::test]
async fn late_response_for_superseded_filter_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("category", "A"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([project_json("p1", "From A", "A")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("category", "B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project_json("p2", "From B", "B")
        ])))
        .mount(&server)
        .await;

    let client = ApiClient::new(Endpoints::new(server.uri()), SessionStore::new());
    let browser = ProjectBrowser::new(client);

    let slow_a = browser.apply_filter(filter_for("A"));
    let fast_b = async {
        // Issue B while A is still in flight.
        tokio::time::sleep(Duration::from_millis(50)).await;
        browser.apply_filter(filter_for("B")).await
    };
    let (a_applied, b_applied) = tokio::join!(slow_a, fast_b);
    assert_eq!(a_applied.unwrap(), false, "A was superseded and must be discarded");
    assert_eq!(b_applied.unwrap(), true);

    match browser.view() {
        ViewState::Ready(projects) => {
            assert_eq!(projects.len(), 1);
            assert_eq!(projects[0].title, "From B");
        }
        other => panic!("unexpected view: {other:?}"),
    }
    assert_eq!(browser.filter().categories, ["B"]);
}

#[tokio::test]
async fn response_after_leaving_the_screen_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([project_json("p1", "Late", "web")]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(Endpoints::new(server.uri()), SessionStore::new());
    let browser = ProjectBrowser::new(client);

    let fetch = browser.apply_filter(Filter::default());
    let navigate_away = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        browser.leave();
    };
    let (applied, ()) = tokio::join!(fetch, navigate_away);
    assert_eq!(applied.unwrap(), false);
    assert_eq!(browser.view(), ViewState::Empty);
}

#[tokio::test]
async fn refresh_failure_keeps_previous_results_on_screen() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("category", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project_json("p1", "Keep me", "web")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("category", "broken"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(Endpoints::new(server.uri()), SessionStore::new());
    let browser = ProjectBrowser::new(client);

    browser.apply_filter(filter_for("web")).await.unwrap();
    assert!(browser.apply_filter(filter_for("broken")).await.is_err());

    // Prior content stays visible; the user can retry from it.
    match browser.view() {
        ViewState::Ready(projects) => assert_eq!(projects[0].title, "Keep me"),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[tokio::test]
async fn first_fetch_failure_shows_an_explicit_error_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(Endpoints::new(server.uri()), SessionStore::new());
    let browser = ProjectBrowser::new(client);
    assert!(browser.apply_filter(Filter::default()).await.is_err());
    assert!(matches!(browser.view(), ViewState::Failed(_)));
}
