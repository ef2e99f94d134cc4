//! Integration tests for cache-first feed loading against a mock endpoint.
//!
//! Each test gets its own mock server and database, so the request counts
//! asserted by `expect` are per test.

use fclite::app::build_http_client;
use fclite::feed::{
    now_millis, FeedCache, FeedError, FeedLoader, LoadSource, CACHE_KEY, CACHE_TIME_KEY,
};
use fclite::storage::Database;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"{
    "statistical_data": {
        "friends_num": 12,
        "active_num": 7,
        "article_num": 3,
        "last_updated_time": "2026-10-17 08:00:00"
    },
    "article_data": [
        {"title": "Rust async", "link": "https://alice.example.com/async", "author": "Alice",
         "avatar": "https://alice.example.com/me.png", "created": "2026-10-16T09:00:00"},
        {"title": "On caching", "link": "https://bob.example.com/cache", "author": "Bob",
         "created": "2026-10-15T12:30:00"},
        {"title": "Terminal UIs", "link": "https://alice.example.com/tui", "author": "Alice",
         "avatar": "", "created": "2026-10-14T18:45:00"}
    ]
}"#;

fn loader(server: &MockServer, db: Database) -> FeedLoader {
    let timeout = Duration::from_secs(5);
    FeedLoader::new(
        build_http_client().unwrap(),
        FeedCache::new(db),
        format!("{}/", server.uri()),
        timeout,
    )
}

async fn mount_feed(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/all.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn temp_db_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fclite_loader_test_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("cache.db")
}

// ============================================================================
// Cache-first loading
// ============================================================================

#[tokio::test]
async fn test_first_load_fetches_then_second_hits_cache() {
    let server = MockServer::start().await;
    mount_feed(&server, 1).await;
    let db = Database::open(":memory:").await.unwrap();
    let loader = loader(&server, db);

    let first = loader.load().await.unwrap();
    assert_eq!(first.source, LoadSource::Network);
    assert_eq!(first.payload.article_data.len(), 3);

    let second = loader.load().await.unwrap();
    assert_eq!(second.source, LoadSource::Cache);
    assert_eq!(second.payload, first.payload);
}

#[tokio::test]
async fn test_cache_survives_reopening_the_database() {
    let server = MockServer::start().await;
    mount_feed(&server, 1).await;
    let db_path = temp_db_path("reopen");
    let db_path = db_path.to_str().unwrap();

    {
        let db = Database::open(db_path).await.unwrap();
        let loaded = loader(&server, db).load().await.unwrap();
        assert_eq!(loaded.source, LoadSource::Network);
    }

    let db = Database::open(db_path).await.unwrap();
    let loaded = loader(&server, db).load().await.unwrap();
    assert_eq!(loaded.source, LoadSource::Cache);
    assert_eq!(loaded.payload.statistical_data.friends_num, 12);
}

#[tokio::test]
async fn test_corrupt_cache_falls_back_to_network() {
    let server = MockServer::start().await;
    mount_feed(&server, 1).await;
    let db = Database::open(":memory:").await.unwrap();
    let now = now_millis().to_string();
    db.set_slots(&[(CACHE_KEY, "{not json"), (CACHE_TIME_KEY, now.as_str())])
        .await
        .unwrap();

    let loaded = loader(&server, db.clone()).load().await.unwrap();
    assert_eq!(loaded.source, LoadSource::Network);

    // The network result replaced the corrupt entry.
    let cached = FeedCache::new(db).read().await.unwrap();
    assert_eq!(cached, loaded.payload);
}

#[tokio::test]
async fn test_stale_cache_triggers_fetch() {
    let server = MockServer::start().await;
    mount_feed(&server, 1).await;
    let db = Database::open(":memory:").await.unwrap();
    let cache = FeedCache::new(db.clone());

    let payload = fclite::feed::FeedPayload::from_json(FEED.as_bytes()).unwrap();
    let an_hour_ago = now_millis() - 60 * 60 * 1000;
    cache.write_at(&payload, an_hour_ago).await.unwrap();

    let loaded = loader(&server, db).load().await.unwrap();
    assert_eq!(loaded.source, LoadSource::Network);
}

#[tokio::test]
async fn test_refresh_bypasses_fresh_cache() {
    let server = MockServer::start().await;
    mount_feed(&server, 2).await;
    let db = Database::open(":memory:").await.unwrap();
    let loader = loader(&server, db);

    loader.load().await.unwrap();
    let refreshed = loader.refresh().await.unwrap();
    assert_eq!(refreshed.source, LoadSource::Network);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_slow_response_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FEED)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let db = Database::open(":memory:").await.unwrap();
    let loader = FeedLoader::new(
        build_http_client().unwrap(),
        FeedCache::new(db),
        format!("{}/", server.uri()),
        Duration::from_millis(150),
    );

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, FeedError::Timeout), "got {:?}", err);
}

#[tokio::test]
async fn test_server_error_is_reported_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    let db = Database::open(":memory:").await.unwrap();

    let err = loader(&server, db.clone()).load().await.unwrap_err();
    assert!(matches!(err, FeedError::HttpStatus(503)));
    assert!(err.to_string().starts_with("Feed unavailable"));
    assert!(FeedCache::new(db).read().await.is_none());
}

#[tokio::test]
async fn test_failure_leaves_existing_cache_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let db = Database::open(":memory:").await.unwrap();
    let cache = FeedCache::new(db.clone());
    let payload = fclite::feed::FeedPayload::from_json(FEED.as_bytes()).unwrap();
    cache.write(&payload).await.unwrap();

    let err = loader(&server, db).refresh().await.unwrap_err();
    assert!(matches!(err, FeedError::Parse(_)));
    assert_eq!(cache.read().await, Some(payload));
}
