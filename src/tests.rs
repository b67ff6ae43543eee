//! Integration tests for the tribute backend.

use axum::body::Body;
use axum::http::Request;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{Config, StorageKind};
use crate::db::{init_database, IdScheme};
use crate::storage::{StorageSlot, TRIBUTES_KEY};
use crate::{build_state, create_router};

const TEST_PSK: &str = "test-api-key";

fn test_config(temp_dir: &TempDir, psk: Option<String>, storage: StorageKind, seed: bool) -> Config {
    Config {
        api_psk: psk,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        storage,
        db_path: temp_dir.path().join("test.sqlite"),
        index_path: temp_dir.path().join("index"),
        id_scheme: IdScheme::Timestamp,
        seed,
    }
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::build(Some(TEST_PSK.to_string()), StorageKind::Memory, false).await
    }

    async fn seeded() -> Self {
        Self::build(Some(TEST_PSK.to_string()), StorageKind::Memory, true).await
    }

    async fn build(psk: Option<String>, storage: StorageKind, seed: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::start(temp_dir, psk, storage, seed).await
    }

    /// Server over a sqlite slot that already holds `stored` as its tributes.
    async fn with_stored_tributes(stored: Value) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init database");
        StorageSlot::sqlite(pool.clone())
            .write(TRIBUTES_KEY, &stored.to_string())
            .await
            .expect("Failed to write slot");
        pool.close().await;

        Self::start(temp_dir, Some(TEST_PSK.to_string()), StorageKind::Sqlite, true).await
    }

    async fn start(temp_dir: TempDir, psk: Option<String>, storage: StorageKind, seed: bool) -> Self {
        let config = test_config(&temp_dir, psk.clone(), storage, seed);
        let state = build_state(config).await.expect("Failed to build state");
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn post_as(&self, path: &str, user: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .header("x-user-id", user)
            .json(&body)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        (resp.status(), resp.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Request without API key
    let resp = Client::new()
        .get(fixture.url("/api/tributes"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_and_bearer_psk() {
    let fixture = TestFixture::new().await;
    let client = Client::new();

    let wrong = client
        .get(fixture.url("/api/tributes"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);

    let bearer = client
        .get(fixture.url("/api/tributes"))
        .header("Authorization", "Bearer test-api-key")
        .send()
        .await
        .unwrap();
    assert_eq!(bearer.status(), 200);
}

#[tokio::test]
async fn test_no_psk_configured_allows_requests() {
    let fixture = TestFixture::build(None, StorageKind::Memory, false).await;

    let (status, body) = fixture.get("/api/tributes").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_seed_collection_served_when_empty() {
    let fixture = TestFixture::seeded().await;

    let (status, body) = fixture.get("/api/tributes").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Jane Doe", "John Smith"]);
}

#[tokio::test]
async fn test_tribute_crud() {
    let fixture = TestFixture::new().await;

    // Create tribute
    let (status, created) = fixture
        .post_as(
            "/api/tributes",
            "user-1",
            json!({
                "name": "Jane Doe",
                "birthDate": "1950-01-01",
                "bio": "A kind and loving person.",
                "tags": ["mother"]
            }),
        )
        .await;

    assert_eq!(status, 200);
    let tribute_id = created["id"].as_str().unwrap().to_string();
    assert!(tribute_id.parse::<i64>().is_ok());
    assert!(created["createdAt"].is_string());
    assert_eq!(created["createdBy"], "user-1");
    assert_eq!(created["name"], "Jane Doe");

    // Get tribute
    let (status, fetched) = fixture.get(&format!("/api/tributes/{}", tribute_id)).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["birthDate"], "1950-01-01");

    // Partial update keeps other fields and the owner
    let (status, updated) = fixture
        .put(
            &format!("/api/tributes/{}", tribute_id),
            json!({ "deathDate": "2024-05-12", "id": "hijacked" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["id"], tribute_id.as_str());
    assert_eq!(updated["name"], "Jane Doe");
    assert_eq!(updated["deathDate"], "2024-05-12");
    assert_eq!(updated["bio"], "A kind and loving person.");
    assert_eq!(updated["createdBy"], "user-1");

    // List tributes
    let (status, list) = fixture.get("/api/tributes").await;
    assert_eq!(status, 200);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Delete tribute
    let (status, deleted) = fixture.delete(&format!("/api/tributes/{}", tribute_id)).await;
    assert_eq!(status, 200);
    assert_eq!(deleted, json!({ "success": true }));

    // Verify deleted
    let (status, _) = fixture.get(&format!("/api/tributes/{}", tribute_id)).await;
    assert_eq!(status, 404);

    // Deleting again still succeeds
    let (status, _) = fixture.delete(&format!("/api/tributes/{}", tribute_id)).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_create_adds_exactly_one_record() {
    let fixture = TestFixture::seeded().await;
    let (_, before) = fixture.get("/api/tributes").await;
    let before = before.as_array().unwrap().clone();

    let (_, created) = fixture
        .post_as(
            "/api/tributes",
            "user-7",
            json!({ "name": "Jane Doe", "birthDate": "1950-01-01" }),
        )
        .await;

    let (_, after) = fixture.get("/api/tributes").await;
    let after = after.as_array().unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert!(before.iter().all(|t| t["id"] != created["id"]));
    assert_eq!(created["createdBy"], "user-7");
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_as("/api/tributes", "user-1", json!({ "name": "   " }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Name is required.");

    let (status, _) = fixture
        .post_as(
            "/api/tributes",
            "user-1",
            json!({ "name": "Jane", "birthDate": "2000-01-01", "deathDate": "1999-01-01" }),
        )
        .await;
    assert_eq!(status, 400);

    let (_, created) = fixture
        .post_as("/api/tributes", "user-1", json!({ "name": "Jane" }))
        .await;
    let (status, _) = fixture
        .put(
            &format!("/api/tributes/{}", created["id"].as_str().unwrap()),
            json!({ "name": "" }),
        )
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/tributes/non-existent-id").await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].is_string());

    let (status, _) = fixture
        .put("/api/tributes/non-existent-id", json!({ "name": "X" }))
        .await;
    assert_eq!(status, 404);

    let (status, _) = fixture
        .post_as(
            "/api/tributes/non-existent-id/rsvp",
            "guest",
            json!({ "name": "Alice", "attending": true }),
        )
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_rsvp_flow() {
    let fixture = TestFixture::new().await;

    let (_, created) = fixture
        .post_as(
            "/api/tributes",
            "owner",
            json!({
                "name": "John Smith",
                "funeralDetails": { "rsvpEnabled": true, "location": "Chapel" }
            }),
        )
        .await;
    let rsvp_path = format!("/api/tributes/{}/rsvp", created["id"].as_str().unwrap());

    let (status, first) = fixture
        .post_as(&rsvp_path, "guest", json!({ "name": "Alice", "attending": true }))
        .await;
    assert_eq!(status, 200);
    let first_timestamp = first["funeralDetails"]["rsvpList"][0]["timestamp"]
        .as_str()
        .unwrap()
        .to_string();

    fixture
        .post_as(&rsvp_path, "guest", json!({ "name": "Bob" }))
        .await;
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    let (_, last) = fixture
        .post_as(&rsvp_path, "guest", json!({ "name": "  Alice ", "attending": false }))
        .await;

    let list = last["funeralDetails"]["rsvpList"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Alice");
    assert_eq!(list[0]["attending"], false);
    assert!(list[0]["timestamp"].as_str().unwrap() > first_timestamp.as_str());
    assert_eq!(list[1]["name"], "Bob");
    assert_eq!(list[1]["attending"], true);
    assert_eq!(last["funeralDetails"]["location"], "Chapel");

    let (status, body) = fixture
        .post_as(&rsvp_path, "guest", json!({ "name": " " }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Please enter your name before submitting.");
}

#[tokio::test]
async fn test_rsvp_rejected_when_disabled() {
    let fixture = TestFixture::seeded().await;

    let (status, body) = fixture
        .post_as("/api/tributes/1/rsvp", "guest", json!({ "name": "Alice" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "RSVPs are not enabled for this tribute.");
}

#[tokio::test]
async fn test_user_tributes_listing() {
    let fixture = TestFixture::seeded().await;

    fixture
        .post_as("/api/tributes", "mock-user-1", json!({ "name": "Ada" }))
        .await;

    let (status, body) = fixture.get("/api/users/mock-user-1/tributes").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Jane Doe", "Ada"]);
}

#[tokio::test]
async fn test_search_endpoint() {
    let fixture = TestFixture::seeded().await;

    fixture
        .post_as(
            "/api/tributes",
            "user-1",
            json!({ "name": "Margaret Holloway", "obituaryText": "Beloved piano teacher." }),
        )
        .await;

    let (status, body) = fixture.get("/api/tributes/search?q=piano").await;
    assert_eq!(status, 200);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["tribute"]["name"], "Margaret Holloway");
    assert_eq!(body["limit"], 20);

    let (_, body) = fixture.get("/api/tributes/search?q=smith").await;
    assert_eq!(body["results"][0]["tribute"]["id"], "2");

    fixture.delete("/api/tributes/2").await;
    let (_, body) = fixture.get("/api/tributes/search?q=smith").await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_vendor_listing_crud() {
    let fixture = TestFixture::new().await;

    let (status, created) = fixture
        .post_as(
            "/api/vendor/listings",
            "vendor-1",
            json!({
                "title": "Sunrise Funeral Home",
                "category": "Funeral Home",
                "location": "Springfield"
            }),
        )
        .await;
    assert_eq!(status, 200);
    let listing_path = format!("/api/vendor/listings/{}", created["id"].as_str().unwrap());
    assert_eq!(created["active"], true);
    assert_eq!(created["createdBy"], "vendor-1");

    let (status, body) = fixture
        .post_as(
            "/api/vendor/listings",
            "vendor-1",
            json!({ "title": "Bakery", "category": "Bread", "location": "Town" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Select a category.");

    let (status, updated) = fixture.put(&listing_path, json!({ "active": false })).await;
    assert_eq!(status, 200);
    assert_eq!(updated["active"], false);
    assert_eq!(updated["title"], "Sunrise Funeral Home");

    let (status, _) = fixture.put(&listing_path, json!({ "title": "" })).await;
    assert_eq!(status, 400);

    let (_, list) = fixture.get("/api/vendor/listings").await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = fixture.delete(&listing_path).await;
    assert_eq!(status, 200);
    let (status, _) = fixture.get(&listing_path).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_sqlite_storage_persists_collection() {
    let fixture = TestFixture::build(None, StorageKind::Sqlite, true).await;

    let (status, created) = fixture
        .post_as("/api/tributes", "user-1", json!({ "name": "Ada" }))
        .await;
    assert_eq!(status, 200);

    let (_, list) = fixture.get("/api/tributes").await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[2]["id"], created["id"]);
}

#[tokio::test]
async fn test_put_null_clears_optional_fields() {
    let fixture = TestFixture::seeded().await;

    let (status, updated) = fixture
        .put(
            "/api/tributes/1",
            json!({ "bio": null, "photoUrl": null, "funeralDetails": null }),
        )
        .await;
    assert_eq!(status, 200);
    assert!(updated.get("bio").is_none());

    let (_, stored) = fixture.get("/api/tributes/1").await;
    assert!(stored.get("bio").is_none());
    assert!(stored.get("photoUrl").is_none());
    assert!(stored.get("funeralDetails").is_none());
    assert_eq!(stored["name"], "Jane Doe");
    assert_eq!(stored["createdBy"], "mock-user-1");

    let (_, body) = fixture.get("/api/tributes/search?q=loving").await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_create_owner_follows_acting_user() {
    let fixture = TestFixture::new().await;

    let (status, created) = fixture
        .post_as(
            "/api/tributes",
            "user-1",
            json!({ "name": "Ada", "createdBy": "someone-else" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(created["createdBy"], "user-1");
}

#[tokio::test]
async fn test_stored_nulls_do_not_hide_collection() {
    let fixture = TestFixture::with_stored_tributes(json!([
        { "id": "a", "name": "Ada", "tags": ["poet"] },
        { "id": "b", "name": "Bea", "tags": null, "funeralDetails": { "rsvpEnabled": null } },
        { "name": "Missing id" }
    ]))
    .await;

    let (_, list) = fixture.get("/api/tributes").await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);

    // A write after reading keeps every decodable stored record
    fixture
        .post_as("/api/tributes", "user-1", json!({ "name": "New" }))
        .await;
    let (status, ada) = fixture.get("/api/tributes/a").await;
    assert_eq!(status, 200);
    assert_eq!(ada["tags"], json!(["poet"]));

    let (_, list) = fixture.get("/api/tributes").await;
    assert_eq!(list.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_pagination_reports_total() {
    let fixture = TestFixture::new().await;
    for name in ["Rose Abel", "Rose Baker", "Rose Carter"] {
        fixture
            .post_as("/api/tributes", "user-1", json!({ "name": name }))
            .await;
    }

    let (status, body) = fixture.get("/api/tributes/search?q=rose&limit=2&offset=1").await;
    assert_eq!(status, 200);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 3);
    assert_eq!(body["offset"], 1);

    let (status, body) = fixture.get("/api/tributes/search?q=rose&limit=500").await;
    assert_eq!(status, 200);
    assert_eq!(body["limit"], 100);
}

#[tokio::test]
async fn test_search_zero_limit_and_huge_offset() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir, None, StorageKind::Memory, true);
    let app = create_router(build_state(config).await.unwrap());

    let huge_offset = format!("/api/tributes/search?q=jane&offset={}", usize::MAX);
    for uri in ["/api/tributes/search?q=jane&limit=0", huge_offset.as_str()] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["results"], json!([]));
        assert_eq!(body["total"], 1);
    }
}
