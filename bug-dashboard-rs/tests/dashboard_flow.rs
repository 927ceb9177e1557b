//! End-to-end dashboard flows against a mock bug service

use bug_dashboard::loader::{demo_bugs, DEMO_NOTICE};
use bug_dashboard::{
    load_bugs, submit_report, BugForm, DashboardState, DataSource, FormField, LoadPolicy,
    SortDirection, SortField, SubmitError, ViewParameters,
};
use bug_sdk::{BugServiceClient, BugServiceConfig, Priority};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(uri: String) -> BugServiceClient {
    BugServiceClient::new_with_config(BugServiceConfig {
        base_url: uri,
        timeout_seconds: 5,
        user_agent: None,
    })
    .expect("Failed to build bug service client")
}

fn report_form() -> BugForm {
    BugForm::new()
        .with(FormField::Title, "Payment page freezes")
        .with(FormField::Description, "The pay button spins forever after card entry")
        .with(FormField::Module, "Payment")
        .with(FormField::Frequency, "Always")
        .with(FormField::UserType, "End User")
}

#[tokio::test]
async fn test_load_filter_sort_and_submit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bugs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bugs": [
                { "id": 1, "title": "Login button not responding", "description": "iOS Safari",
                  "module": "Authentication", "frequency": "Often", "user_type": "End User",
                  "priority": "high" },
                { "id": "b-2", "title": "Database timeout", "description": "Peak hours",
                  "module": "Database", "frequency": "Sometimes", "user_type": "Developer",
                  "priority": "critical", "confidence": 0.93 },
                { "id": 3, "title": "Sidebar alignment", "description": null,
                  "module": "Frontend", "frequency": "Always", "user_type": "End User" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!({ "priority": "critical", "confidence": 0.88 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(server.uri());

    let outcome = load_bugs(&client, LoadPolicy::Strict).await.unwrap();
    assert!(outcome.notice.is_none());
    let mut state = DashboardState::from_outcome(outcome);
    assert_eq!(state.source(), DataSource::Live);

    state.set_params(ViewParameters::new().sorted_by(SortField::Priority, SortDirection::Descending));
    let view = state.view();
    let titles: Vec<&str> = view.rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Database timeout", "Login button not responding", "Sidebar alignment"]);
    assert_eq!(view.stats.total, 3);
    assert_eq!(view.stats.unranked(), 1);

    state.set_search("login");
    assert_eq!(state.view().shown(), 1);

    let submitted = submit_report(&client, &report_form()).await.unwrap();
    assert!(submitted.is_critical());
    state.append(submitted.record);

    state.set_params(ViewParameters::new().with_priority(Some(Priority::Critical)));
    let view = state.view();
    assert_eq!(view.stats.total, 4);
    assert_eq!(view.stats.critical, 2);
    assert_eq!(view.shown(), 2);
}

#[tokio::test]
async fn test_invalid_form_never_reaches_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "priority": "low" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(server.uri());
    let form = report_form().with(FormField::Title, "");

    let err = submit_report(&client, &form).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));
}

#[tokio::test]
async fn test_demo_fallback_only_when_unreachable() {
    let unreachable = client_for("http://127.0.0.1:1".to_string());
    let outcome = load_bugs(&unreachable, LoadPolicy::DemoOnUnreachable).await.unwrap();
    assert_eq!(outcome.source, DataSource::Demo);
    assert_eq!(outcome.notice, Some(DEMO_NOTICE));
    assert_eq!(outcome.bugs, demo_bugs());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bugs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "Database unavailable" })))
        .mount(&server)
        .await;

    let failing = client_for(server.uri());
    let err = load_bugs(&failing, LoadPolicy::DemoOnUnreachable).await.unwrap_err();
    assert!(err.is_http_status());
    assert_eq!(err.message(), "Database unavailable");
}
