use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use catalog_api::{
    config::AppConfig,
    db::{self, DbConfig},
    events::{self, EventSender},
    AppState,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Test harness around the full router, backed by an in-memory SQLite
/// database. A single pooled connection keeps every query on the same
/// in-memory instance.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: Arc<AppState>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cfg = AppConfig::new(
            db_config.url.clone(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = Arc::new(AppState::new(Arc::new(pool), cfg, event_sender));
        let router = catalog_api::app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router and return the raw response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request, assert the status, and parse the JSON body.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Value {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();
        assert_eq!(
            status,
            expected,
            "unexpected status for {} (body: {})",
            uri,
            String::from_utf8_lossy(&bytes)
        );
        if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not valid json")
        }
    }

    pub async fn get(&self, uri: &str) -> Value {
        self.request_json(Method::GET, uri, None, StatusCode::OK)
            .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Value {
        self.request_json(Method::POST, uri, Some(body), StatusCode::CREATED)
            .await
    }
}

/// Seed the standard two-section fixture used by most tests.
///
/// Returns ids keyed by what the tests need:
/// sections "interior"/"lighting", brand "lamis", categories, a collection
/// and a type sharing the slug "premium" inside interior/mirrors.
#[allow(dead_code)]
pub struct Fixture {
    pub interior_id: i64,
    pub lighting_id: i64,
    pub brand_id: i64,
    pub mirrors_id: i64,
    pub lamps_id: i64,
    pub premium_collection_id: i64,
    pub premium_type_id: i64,
}

pub async fn seed_taxonomy(app: &TestApp) -> Fixture {
    let interior = app
        .post(
            "/api/v1/sections",
            serde_json::json!({"name": "Interior"}),
        )
        .await;
    let lighting = app
        .post(
            "/api/v1/sections",
            serde_json::json!({"name": "Lighting"}),
        )
        .await;
    let brand = app
        .post("/api/v1/brands", serde_json::json!({"name": "Lamis"}))
        .await;

    let interior_id = interior["id"].as_i64().unwrap();
    let lighting_id = lighting["id"].as_i64().unwrap();
    let brand_id = brand["id"].as_i64().unwrap();

    let mirrors = app
        .post(
            "/api/v1/categories",
            serde_json::json!({
                "section_id": interior_id,
                "brand_id": brand_id,
                "name": "Mirrors"
            }),
        )
        .await;
    let lamps = app
        .post(
            "/api/v1/categories",
            serde_json::json!({
                "section_id": lighting_id,
                "brand_id": brand_id,
                "name": "Lamps"
            }),
        )
        .await;
    let mirrors_id = mirrors["id"].as_i64().unwrap();
    let lamps_id = lamps["id"].as_i64().unwrap();

    let premium_collection = app
        .post(
            "/api/v1/collections",
            serde_json::json!({
                "brand_id": brand_id,
                "category_id": mirrors_id,
                "name": "Premium"
            }),
        )
        .await;
    let premium_type = app
        .post(
            "/api/v1/types",
            serde_json::json!({
                "category_id": mirrors_id,
                "name": "Premium"
            }),
        )
        .await;

    Fixture {
        interior_id,
        lighting_id,
        brand_id,
        mirrors_id,
        lamps_id,
        premium_collection_id: premium_collection["id"].as_i64().unwrap(),
        premium_type_id: premium_type["id"].as_i64().unwrap(),
    }
}

/// Create a product under the fixture's interior/mirrors branch.
pub async fn seed_product(app: &TestApp, fixture: &Fixture, name: &str, extra: Value) -> Value {
    let mut body = serde_json::json!({
        "name": name,
        "price": "129.90",
        "section_id": fixture.interior_id,
        "brand_id": fixture.brand_id,
        "category_id": fixture.mirrors_id,
    });
    if let (Some(base), Some(overlay)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in overlay {
            base.insert(k.clone(), v.clone());
        }
    }
    app.post("/api/v1/products", body).await
}
