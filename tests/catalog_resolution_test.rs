mod common;

use axum::http::{Method, StatusCode};
use common::{seed_product, seed_taxonomy, TestApp};
use serde_json::json;

#[tokio::test]
async fn health_endpoint_reports_database_up() {
    let app = TestApp::new().await;

    let body = app.get("/health").await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn section_page_lists_categories() {
    let app = TestApp::new().await;
    seed_taxonomy(&app).await;

    let body = app.get("/api/v1/catalog/interior").await;
    assert_eq!(body["section"]["slug"], "interior");
    let names: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mirrors"]);
}

#[tokio::test]
async fn same_named_categories_are_deduplicated_per_section() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    // A second brand carrying its own "Mirrors" row under Interior.
    let other_brand = app
        .post("/api/v1/brands", json!({"name": "Nordim"}))
        .await;
    app.post(
        "/api/v1/categories",
        json!({
            "section_id": fixture.interior_id,
            "brand_id": other_brand["id"],
            "name": "Mirrors"
        }),
    )
    .await;

    let body = app.get("/api/v1/catalog/interior").await;
    let mirrors: Vec<_> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["name"] == "Mirrors")
        .collect();
    assert_eq!(mirrors.len(), 1, "navigation must collapse same-named rows");
}

#[tokio::test]
async fn category_page_unions_children_across_brands() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    let other_brand = app
        .post("/api/v1/brands", json!({"name": "Nordim"}))
        .await;
    let other_mirrors = app
        .post(
            "/api/v1/categories",
            json!({
                "section_id": fixture.interior_id,
                "brand_id": other_brand["id"],
                "name": "Mirrors"
            }),
        )
        .await;
    app.post(
        "/api/v1/collections",
        json!({
            "brand_id": other_brand["id"],
            "category_id": other_mirrors["id"],
            "name": "Nordic Line"
        }),
    )
    .await;

    let body = app.get("/api/v1/catalog/interior/mirrors").await;
    let collections: Vec<&str> = body["collections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(collections.contains(&"Premium"));
    assert!(collections.contains(&"Nordic Line"));
}

#[tokio::test]
async fn empty_category_is_distinct_from_missing_category() {
    let app = TestApp::new().await;
    seed_taxonomy(&app).await;

    // "lamps" exists under Lighting but has no collections or types.
    let empty = app
        .request_json(
            Method::GET,
            "/api/v1/catalog/lighting/lamps",
            None,
            StatusCode::NOT_FOUND,
        )
        .await;
    assert_eq!(empty["code"], "empty_taxonomy");

    let missing = app
        .request_json(
            Method::GET,
            "/api/v1/catalog/lighting/chandeliers",
            None,
            StatusCode::NOT_FOUND,
        )
        .await;
    assert_eq!(missing["code"], "not_found");
}

#[tokio::test]
async fn collection_wins_over_type_on_slug_collision() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    let in_collection = seed_product(
        &app,
        &fixture,
        "Venice Mirror",
        json!({"collection_id": fixture.premium_collection_id}),
    )
    .await;
    let in_type = seed_product(
        &app,
        &fixture,
        "Milan Mirror",
        json!({"type_id": fixture.premium_type_id}),
    )
    .await;

    let body = app.get("/api/v1/catalog/interior/mirrors/premium").await;
    assert!(body["collection"].is_object());
    assert!(body["type"].is_null());

    let ids: Vec<i64> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&in_collection["id"].as_i64().unwrap()));
    assert!(
        !ids.contains(&in_type["id"].as_i64().unwrap()),
        "type products must not leak into the collection page"
    );
}

#[tokio::test]
async fn type_resolves_when_no_collection_matches() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    let led_type = app
        .post(
            "/api/v1/types",
            json!({"category_id": fixture.mirrors_id, "name": "LED"}),
        )
        .await;
    let product = seed_product(
        &app,
        &fixture,
        "Halo Mirror",
        json!({"type_id": led_type["id"]}),
    )
    .await;

    let body = app.get("/api/v1/catalog/interior/mirrors/led").await;
    assert!(body["collection"].is_null());
    assert_eq!(body["type"]["slug"], "led");
    assert_eq!(
        body["products"][0]["id"].as_i64(),
        product["id"].as_i64()
    );
}

#[tokio::test]
async fn unknown_item_slug_is_not_found() {
    let app = TestApp::new().await;
    seed_taxonomy(&app).await;

    let body = app
        .request_json(
            Method::GET,
            "/api/v1/catalog/interior/mirrors/baroque",
            None,
            StatusCode::NOT_FOUND,
        )
        .await;
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn browse_returns_full_tree() {
    let app = TestApp::new().await;
    seed_taxonomy(&app).await;

    let body = app.get("/api/v1/catalog/browse").await;
    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);

    let interior = sections
        .iter()
        .find(|s| s["section"]["slug"] == "interior")
        .expect("interior section in tree");
    assert_eq!(interior["categories"][0]["category"]["name"], "Mirrors");

    // Lamps has no collections or types yet, so Lighting contributes an
    // empty category list rather than a dead navigation entry.
    let lighting = sections
        .iter()
        .find(|s| s["section"]["slug"] == "lighting")
        .expect("lighting section in tree");
    assert_eq!(lighting["categories"].as_array().unwrap().len(), 0);
}
