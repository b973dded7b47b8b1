mod common;

use axum::Extension;
use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use linkchop::api::middleware::OwnerId;
use linkchop::domain::repositories::LinkRepository;
use linkchop::infrastructure::cache::CacheService;
use linkchop::routes::app_router;
use linkchop::utils::code_generator::is_generated_code;
use serde_json::json;
use std::net::SocketAddr;

#[tokio::test]
async fn test_shorten_generates_code() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/a/long/path" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();
    assert!(is_generated_code(code));
    assert_eq!(json["short_url"], format!("{}/{code}", common::BASE_URL));
    assert!(json["expires_at"].is_string());

    let stored = app.links.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(stored.long_url, "https://example.com/a/long/path");
    assert_eq!(stored.owner_id, "anonymous");
}

#[tokio::test]
async fn test_shorten_warms_cache() {
    let app = common::create_test_app();

    let json = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/warm" }))
        .await
        .json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();

    let cached = app.cache.get_link(code).await.unwrap().unwrap();
    assert_eq!(cached.long_url, "https://example.com/warm");
    assert!(app.cache.link_ttl(code).await.unwrap().is_some());
}

#[tokio::test]
async fn test_shorten_with_alias_and_context() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({
            "long_url": "https://example.com/sale",
            "alias": "spring-sale",
            "context": "newsletter"
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "spring-sale");
    assert_eq!(json["short_url"], "http://sho.rt/spring-sale");

    let stored = app.links.find_by_code("spring-sale").await.unwrap().unwrap();
    assert_eq!(stored.context.as_deref(), Some("newsletter"));
}

#[tokio::test]
async fn test_shorten_alias_taken() {
    let app = common::create_test_app();
    let body = json!({ "long_url": "https://example.com", "alias": "taken-one" });

    app.server.post("/api/shorten").json(&body).await.assert_status_ok();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://other.example.com", "alias": "taken-one" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "alias_taken");
    assert_eq!(json["error"]["details"]["alias"], "taken-one");

    let stored = app.links.find_by_code("taken-one").await.unwrap().unwrap();
    assert_eq!(stored.long_url, "https://example.com");
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": "not-a-url" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "validation_error"
    );
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_shorten_empty_url() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": "" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_shorten_accepts_very_long_url() {
    let app = common::create_test_app();
    let long_url = format!("https://example.com/{}", "a".repeat(2100));

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": long_url }))
        .await;

    response.assert_status_ok();
    let code = response.json::<serde_json::Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string();
    let stored = app.links.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(stored.long_url, long_url);
}

#[tokio::test]
async fn test_shorten_trims_padded_alias_and_context() {
    let app = common::create_test_app();
    let alias = "a".repeat(50);

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({
            "long_url": "https://example.com",
            "alias": format!("  {alias}  "),
            "context": format!(" {} ", "x".repeat(200))
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["short_code"], alias);

    let stored = app.links.find_by_code(&alias).await.unwrap().unwrap();
    assert_eq!(stored.context.map(|c| c.len()), Some(200));
}

#[tokio::test]
async fn test_shorten_reserved_alias() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com", "alias": "Health" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.links.is_empty());
}

#[tokio::test]
async fn test_shorten_context_too_long() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com", "context": "x".repeat(201) }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_shorten_records_owner_from_extension() {
    let app = common::create_test_app();
    let peer: SocketAddr = common::PEER_ADDR.parse().unwrap();
    let router = app_router(app.state.clone())
        .layer(Extension(OwnerId::new("user-42")))
        .layer(MockConnectInfo(peer));
    let server = TestServer::new(router).unwrap();

    let json = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/mine" }))
        .await
        .json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();

    let stored = app.links.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(stored.owner_id, "user-42");
}
