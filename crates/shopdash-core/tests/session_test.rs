#![allow(clippy::unwrap_used)]
// Session restore / sign-in behaviour against a mock API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopdash_core::{
    CoreError, Credential, CredentialStore, DashboardConfig, MemoryCredentialStore, Session,
    SessionState,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> DashboardConfig {
    DashboardConfig {
        api_url: Url::parse(&server.uri()).unwrap(),
        ..DashboardConfig::default()
    }
}

fn session_with(server: &MockServer, store: Arc<MemoryCredentialStore>) -> Session {
    let client = config_for(server).build_client().unwrap();
    Session::new(client, store)
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "Jhon",
        "email": "john@mail.com",
        "role": "customer",
        "avatar": "https://img.example/a.png"
    })
}

async fn mount_profile(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(server)
        .await;
}

// ── Restore ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_restore_without_credential_issues_no_requests() {
    let server = MockServer::start().await;
    let session = session_with(&server, Arc::new(MemoryCredentialStore::new()));

    assert_eq!(session.state(), SessionState::Unknown);
    let state = session.restore().await;

    assert_eq!(state, SessionState::Anonymous);
    assert!(session.user().is_none());
    assert!(!session.context().is_authenticated());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_restore_with_valid_credential_sets_user_and_context() {
    let server = MockServer::start().await;
    mount_profile(&server, "tok-valid").await;

    let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
        "tok-valid",
    )));
    let session = session_with(&server, store);

    let state = session.restore().await;
    let user = state.user().unwrap();
    assert_eq!(user.name, "Jhon");
    assert!(session.is_authenticated());
    assert_eq!(
        session.context().credential().map(Credential::expose),
        Some("tok-valid")
    );
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn test_restore_with_rejected_credential_clears_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthorized",
            "statusCode": 401
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
        "tok-expired",
    )));
    let session = session_with(&server, Arc::clone(&store));

    let state = session.restore().await;

    assert_eq!(state, SessionState::Anonymous);
    assert!(session.user().is_none());
    assert!(!session.context().is_authenticated());
    assert!(store.load().unwrap().is_none());
    assert!(session.last_error().unwrap().is_auth());
}

#[tokio::test]
async fn test_restore_with_server_error_keeps_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
        "tok-keep",
    )));
    let session = session_with(&server, Arc::clone(&store));

    let state = session.restore().await;

    assert_eq!(state, SessionState::Anonymous);
    assert_eq!(store.load().unwrap().unwrap().expose(), "tok-keep");
    assert!(matches!(
        session.last_error().as_deref(),
        Some(CoreError::Api {
            status: Some(503),
            ..
        })
    ));
}

// ── Ensure ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_concurrent_ensure_issues_one_profile_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
        "tok-shared",
    )));
    let session = session_with(&server, store);

    let (a, b, c) = tokio::join!(session.ensure(), session.ensure(), session.ensure());

    for state in [a, b, c] {
        assert_eq!(state.user().unwrap().name, "Jhon");
    }

    // Already authenticated: no further request.
    session.ensure().await;
}

#[tokio::test]
async fn test_ensure_after_anonymous_restore_retries() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    let session = session_with(&server, Arc::clone(&store));

    assert_eq!(session.ensure().await, SessionState::Anonymous);

    // A credential appears (e.g. another process signed in).
    mount_profile(&server, "tok-late").await;
    store.save(&Credential::new("tok-late")).unwrap();

    assert!(session.ensure().await.user().is_some());
}

// ── Sign in / out ───────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_in_persists_token_and_loads_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "john@mail.com", "password": "changeme" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "access_token": "tok-new",
            "refresh_token": "ref-new"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_profile(&server, "tok-new").await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = session_with(&server, Arc::clone(&store));
    let mut states = session.subscribe();

    let user = session.sign_in("john@mail.com", "changeme").await.unwrap();

    assert_eq!(user.email, "john@mail.com");
    assert_eq!(store.load().unwrap().unwrap().expose(), "tok-new");
    assert!(matches!(
        states.latest(),
        SessionState::Authenticated(_)
    ));
    assert!(states.changed().await.is_some());
}

#[tokio::test]
async fn test_sign_in_with_bad_password_stays_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthorized",
            "statusCode": 401
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = session_with(&server, Arc::clone(&store));

    let err = session.sign_in("john@mail.com", "wrong").await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_sign_in_with_failed_profile_persists_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "access_token": "tok-orphan"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = session_with(&server, Arc::clone(&store));

    assert!(session.sign_in("john@mail.com", "changeme").await.is_err());
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(!session.context().is_authenticated());
    assert!(store.load().unwrap().is_none());

    // A later restore has nothing to retry.
    assert_eq!(session.restore().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_sign_out_clears_everything() {
    let server = MockServer::start().await;
    mount_profile(&server, "tok-valid").await;

    let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
        "tok-valid",
    )));
    let session = session_with(&server, Arc::clone(&store));
    session.restore().await;
    assert!(session.is_authenticated());

    session.sign_out().await.unwrap();

    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(!session.context().is_authenticated());
    assert!(store.load().unwrap().is_none());
}
