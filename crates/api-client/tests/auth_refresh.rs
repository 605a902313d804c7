use futures::future::join_all;
use menu_api_client::credentials::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use menu_api_client::{
    ApiError, ClientConfig, CredentialStore, MemoryStore, MenuClient, RefreshError, SessionListener,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

struct Harness {
    client: MenuClient,
    store: Arc<MemoryStore>,
    logouts: Arc<AtomicUsize>,
}

fn harness(server: &MockServer, access: Option<&str>, refresh: Option<&str>) -> Harness {
    let config = ClientConfig::default()
        .with_base_url(format!("{}/api", server.uri()))
        .unwrap();
    harness_with(config, access, refresh)
}

fn harness_with(config: ClientConfig, access: Option<&str>, refresh: Option<&str>) -> Harness {
    let store = Arc::new(MemoryStore::with_tokens(access, refresh));
    let logouts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&logouts);
    let listener: Arc<dyn SessionListener> = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let client = MenuClient::with_config(config)
        .unwrap()
        .with_store(Arc::clone(&store) as Arc<dyn CredentialStore>)
        .with_session_listener(listener);

    Harness {
        client,
        store,
        logouts,
    }
}

fn products_body() -> serde_json::Value {
    json!([
        {"_id": "p1", "name": "Latte", "price": 25000, "category": "Coffee"},
        {"_id": "p2", "name": "Cheeseburger", "price": 45000, "category": "Burger"}
    ])
}

async fn mount_products(server: &MockServer, token: &str, status: u16, times: u64) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(products_body())
    } else {
        ResponseTemplate::new(status).set_body_string("Unauthorized")
    };
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(template)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bearer_and_request_id_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("authorization", "Bearer A1"))
        .and(header("accept", "application/json"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let products = h.client.products().list().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].display_name(), "Latte");
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"items": [{"_id": "c1", "name": "Coffee"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, None, None);
    let categories = h.client.categories().list().await.unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Coffee");
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 401, 5).await;
    mount_products(&server, "A2", 200, 5).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "A2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let products = h.client.products();
    let results = join_all((0..5).map(|_| products.list())).await;

    for result in results {
        assert_eq!(result.unwrap().len(), 2);
    }
    assert_eq!(h.client.refresh_coordinator().started(), 1);
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A2"));
    assert_eq!(h.store.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
    assert_eq!(h.logouts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rotated_refresh_token_is_stored() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 401, 1).await;
    mount_products(&server, "A2", 200, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A2", "refreshToken": "R2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    h.client.products().list().await.unwrap();

    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A2"));
    assert_eq!(h.store.get(REFRESH_TOKEN_KEY).as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_second_401_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(401).set_body_string("still no"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let err = h.client.products().list().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!err.is_refresh_failure());
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A2"));
    assert_eq!(h.logouts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_refresh_token_logs_out() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 401, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), None);
    h.store.set(USER_KEY, r#"{"name":"Ayu"}"#).unwrap();

    let err = h.client.products().list().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(h.store.is_empty());
    assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
    assert!(!h.client.refresh_coordinator().is_pending());
}

#[tokio::test]
async fn test_rejected_refresh_fails_all_waiters_and_logs_out() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 401, 3).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string("refresh expired")
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let products = h.client.products();
    let results = join_all((0..3).map(|_| products.list())).await;

    for result in results {
        match result {
            Err(ApiError::RefreshFailed(RefreshError::Rejected { status, message })) => {
                assert_eq!(status, 401);
                assert_eq!(message, "refresh expired");
            }
            other => panic!("expected refresh failure, got {other:?}"),
        }
    }
    assert!(h.store.is_empty());
    assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_without_access_token_is_failure() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 401, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refreshToken": "R2"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let err = h.client.products().list().await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::RefreshFailed(RefreshError::MissingAccessToken)
    ));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_pending_marker_cleared_after_refresh() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 401, 1).await;
    mount_products(&server, "A2", 401, 2).await;
    mount_products(&server, "A3", 200, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A2", "refreshToken": "R2"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({"refreshToken": "R2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A3"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let coordinator = Arc::clone(h.client.refresh_coordinator());

    // First logical request: A1 -> refresh -> A2 -> second 401 surfaces
    let first = h.client.products().list().await.unwrap_err();
    assert!(first.is_unauthorized());

    for _ in 0..50 {
        if !coordinator.is_pending() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!coordinator.is_pending());

    // A later expiry starts a fresh refresh
    let products = h.client.products().list().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(coordinator.started(), 2);
    assert_eq!(h.store.get(REFRESH_TOKEN_KEY).as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_server_error_passes_through() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 500, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let err = h.client.products().list().await.unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
}

#[tokio::test]
async fn test_categories_failure_yields_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = harness(&server, None, None);
    assert!(h.client.categories().list_or_empty().await.is_empty());
}

#[tokio::test]
async fn test_network_failure_is_not_retried() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}/api"))
        .unwrap();
    let h = harness_with(config, Some("A1"), Some("R1"));

    let err = h.client.products().list().await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(h.client.refresh_coordinator().started(), 0);
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(products_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_base_url(format!("{}/api", server.uri()))
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let h = harness_with(config, Some("A1"), Some("R1"));

    let err = h.client.products().list().await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_millis(200)));
    assert!(err.is_network());
}

#[tokio::test]
async fn test_auth_refresh_endpoint_is_not_intercepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A9"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let response = h.client.auth().refresh("R1").await.unwrap();

    assert_eq!(response.access_token.as_deref(), Some("A9"));
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
}

#[tokio::test]
async fn test_slow_refresh_times_out_and_logs_out() {
    let server = MockServer::start().await;
    mount_products(&server, "A1", 401, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "A2"}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_base_url(format!("{}/api", server.uri()))
        .unwrap()
        .with_refresh_timeout(Duration::from_millis(200));
    let h = harness_with(config, Some("A1"), Some("R1"));

    let err = h.client.products().list().await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::RefreshFailed(RefreshError::Timeout(d)) if d == Duration::from_millis(200)
    ));
    assert!(h.store.is_empty());
    assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_post_replays_body_after_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(header("authorization", "Bearer A1"))
        .and(body_json(json!({"qty": 2})))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(header("authorization", "Bearer A2"))
        .and(body_json(json!({"qty": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let response: serde_json::Value = h.client.post("orders", &json!({"qty": 2})).await.unwrap();

    assert_eq!(response, json!({"ok": true}));
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A2"));
    assert_eq!(h.logouts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_odd_product_records_do_not_blank_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Latte"}, null, 5])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("A1"), Some("R1"));
    let products = h.client.products().list().await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(products[0].display_name(), "Latte");
    assert_eq!(products[2].display_name(), "Untitled");
}
