//! Integration tests for the HTTP API
//! Drives the router in-process with tower's `oneshot`

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use countries::api::{create_router, AppState};
use countries::store::CountryStore;
use countries::{Country, LookupMode};

/// Test fixture holding a router over a fresh seeded store
struct ApiTestFixture {
    router: Router,
}

impl ApiTestFixture {
    fn new() -> Self {
        Self::with_lookup(LookupMode::Position)
    }

    fn with_lookup(lookup: LookupMode) -> Self {
        Self::with_store(CountryStore::with_seed(), lookup)
    }

    fn with_store(store: CountryStore, lookup: LookupMode) -> Self {
        let state = AppState::new(store, lookup);
        Self {
            router: create_router(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body should be JSON")
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post_raw(&self, body: &str) -> (StatusCode, Value) {
        let request = Request::post("/countries")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post(&self, body: Value) -> (StatusCode, Value) {
        self.post_raw(&body.to_string()).await
    }
}

fn seed_json() -> Value {
    json!([
        {"id": 1, "name": "Thailand", "capital": "Bangkok", "area": 513120},
        {"id": 2, "name": "Australia", "capital": "Canberra", "area": 7617930},
        {"id": 3, "name": "Egypt", "capital": "Cairo", "area": 1010408}
    ])
}

// ============================================================================
// List
// ============================================================================

mod list_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_on_startup_returns_seed() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.get("/countries").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, seed_json());
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let fixture = ApiTestFixture::new();

        let (_, first) = fixture.get("/countries").await;
        let (_, second) = fixture.get("/countries").await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_after_creates_keeps_insertion_order() {
        let fixture = ApiTestFixture::new();

        for (i, name) in ["Germany", "Chile", "Japan"].iter().enumerate() {
            let (status, body) = fixture
                .post(json!({"name": name, "capital": "X", "area": i}))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["id"], json!(4 + i));
        }

        let (_, body) = fixture.get("/countries").await;
        let countries: Vec<Country> = serde_json::from_value(body).unwrap();
        assert_eq!(countries.len(), 6);

        let names: Vec<_> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Thailand", "Australia", "Egypt", "Germany", "Chile", "Japan"]
        );
    }
}

// ============================================================================
// Get
// ============================================================================

mod get_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_first_position() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.get("/countries/1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, seed_json()[0]);
    }

    #[tokio::test]
    async fn test_get_created_country() {
        let fixture = ApiTestFixture::new();
        fixture
            .post(json!({"name": "Germany", "capital": "Berlin", "area": 357022}))
            .await;

        let (status, body) = fixture.get("/countries/4").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Germany");
    }

    #[tokio::test]
    async fn test_get_out_of_range_is_not_found() {
        let fixture = ApiTestFixture::new();

        for uri in ["/countries/999", "/countries/0", "/countries/-1", "/countries/4"] {
            let (status, body) = fixture.get(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{} should be 404", uri);
            assert!(body["error"].is_string(), "{} should have an error body", uri);
        }
    }

    #[tokio::test]
    async fn test_get_non_integer_is_bad_request() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.get("/countries/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_position_lookup_ignores_ids() {
        let store = CountryStore::new(vec![
            Country::new(20, "A", "a", 1),
            Country::new(10, "B", "b", 2),
        ]);
        let fixture = ApiTestFixture::with_store(store, LookupMode::Position);

        let (_, body) = fixture.get("/countries/1").await;
        assert_eq!(body["id"], 20);

        let (status, _) = fixture.get("/countries/10").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_id_lookup_mode() {
        let store = CountryStore::new(vec![
            Country::new(20, "A", "a", 1),
            Country::new(10, "B", "b", 2),
        ]);
        let fixture = ApiTestFixture::with_store(store, LookupMode::Id);

        let (status, body) = fixture.get("/countries/10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "B");

        let (status, _) = fixture.get("/countries/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = fixture.get("/countries/-5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// Create
// ============================================================================

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_germany() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .post(json!({"name": "Germany", "capital": "Berlin", "area": 357022}))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"id": 4, "name": "Germany", "capital": "Berlin", "area": 357022})
        );
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_id() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .post(json!({"id": 1, "name": "Germany", "capital": "Berlin", "area": 357022}))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 4);

        let (_, first) = fixture.get("/countries/1").await;
        assert_eq!(first["name"], "Thailand");
    }

    #[tokio::test]
    async fn test_create_coerces_numeric_string() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .post(json!({"name": "Germany", "capital": "Berlin", "area": "357022"}))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["area"], 357022);
    }

    #[tokio::test]
    async fn test_create_missing_field_is_unprocessable() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .post(json!({"name": "Germany", "area": 357022}))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("capital"));

        let (_, list) = fixture.get("/countries").await;
        assert_eq!(list.as_array().unwrap().len(), 3, "Rejected create must not append");
    }

    #[tokio::test]
    async fn test_create_wrong_type_is_unprocessable() {
        let fixture = ApiTestFixture::new();

        let (status, _) = fixture
            .post(json!({"name": "Germany", "capital": "Berlin", "area": "huge"}))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = fixture
            .post(json!({"name": 5, "capital": "Berlin", "area": 1}))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_malformed_json_is_bad_request() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.post_raw("{\"name\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_without_content_type() {
        let fixture = ApiTestFixture::new();

        let request = Request::post("/countries")
            .body(Body::from(r#"{"name":"a","capital":"b","area":1}"#))
            .unwrap();
        let (status, body) = fixture.send(request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].is_string());
    }
}

// ============================================================================
// Misc
// ============================================================================

mod misc_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["countries"], 3);
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.get("/api/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/countries"].is_object());
        assert!(body["paths"]["/countries/{position}"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.get("/cities").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }
}
