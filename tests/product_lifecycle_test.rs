mod common;

use axum::http::{Method, StatusCode};
use common::{seed_product, seed_taxonomy, TestApp};
use serde_json::json;

#[tokio::test]
async fn product_slugs_disambiguate_with_numeric_suffixes() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    let first = seed_product(&app, &fixture, "Classic Tap", json!({})).await;
    let second = seed_product(&app, &fixture, "Classic Tap", json!({})).await;
    let third = seed_product(&app, &fixture, "Classic Tap", json!({})).await;

    assert_eq!(first["slug"], "classic-tap");
    assert_eq!(second["slug"], "classic-tap-1");
    assert_eq!(third["slug"], "classic-tap-2");
}

#[tokio::test]
async fn cyrillic_names_transliterate_into_slugs() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    let product = seed_product(&app, &fixture, "Зеркало Классика", json!({})).await;
    assert_eq!(product["slug"], "zerkalo-klassika");
}

#[tokio::test]
async fn create_rejects_mismatched_taxonomy() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    // Mirrors belongs to Interior, not Lighting.
    let body = app
        .request_json(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Wrong Section",
                "price": "10.00",
                "section_id": fixture.lighting_id,
                "brand_id": fixture.brand_id,
                "category_id": fixture.mirrors_id,
            })),
            StatusCode::BAD_REQUEST,
        )
        .await;
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn create_rejects_missing_parent() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Orphan",
                "price": "10.00",
                "section_id": fixture.interior_id,
                "brand_id": fixture.brand_id,
                "category_id": 9999,
            })),
            StatusCode::NOT_FOUND,
        )
        .await;
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn detail_includes_color_and_singleton_variation_group() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    let color = app
        .post(
            "/api/v1/colors",
            json!({"name": "Matte Black", "hex_value": "#1a1a1a"}),
        )
        .await;
    let product = seed_product(
        &app,
        &fixture,
        "Venice Mirror",
        json!({"color_id": color["id"]}),
    )
    .await;

    let detail = app
        .get(&format!("/api/v1/products/{}", product["id"]))
        .await;
    assert_eq!(detail["product"]["name"], "Venice Mirror");
    assert_eq!(detail["color"]["name"], "Matte Black");
    // No group token yet, so the group is just the product itself.
    assert_eq!(detail["color_variations"].as_array().unwrap().len(), 1);
    assert_eq!(
        detail["color_variations"][0]["id"].as_i64(),
        product["id"].as_i64()
    );
}

#[tokio::test]
async fn list_filters_are_conjunctive() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    seed_product(&app, &fixture, "Plain Mirror", json!({})).await;
    seed_product(&app, &fixture, "Sale Mirror", json!({"is_on_sale": true})).await;
    seed_product(
        &app,
        &fixture,
        "New Sale Mirror",
        json!({"is_on_sale": true, "is_new": true}),
    )
    .await;

    let body = app
        .get(&format!(
            "/api/v1/products?category_id={}&is_on_sale=true&is_new=true",
            fixture.mirrors_id
        ))
        .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["New Sale Mirror"]);
}

#[tokio::test]
async fn update_changes_flags_without_touching_the_slug() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;
    let product = seed_product(&app, &fixture, "Venice Mirror", json!({})).await;

    let updated = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/products/{}", product["id"]),
            Some(json!({"name": "Venice Mirror II", "is_new": true})),
            StatusCode::OK,
        )
        .await;
    assert_eq!(updated["name"], "Venice Mirror II");
    assert_eq!(updated["is_new"], true);
    assert_eq!(updated["slug"], "venice-mirror");
}

#[tokio::test]
async fn update_rejects_collection_from_another_category() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;
    let product = seed_product(&app, &fixture, "Venice Mirror", json!({})).await;

    // A collection rooted in Lamps cannot be attached to a Mirrors product.
    let lamps_collection = app
        .post(
            "/api/v1/collections",
            json!({
                "brand_id": fixture.brand_id,
                "category_id": fixture.lamps_id,
                "name": "Nordic Light"
            }),
        )
        .await;
    let body = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/products/{}", product["id"]),
            Some(json!({"collection_id": lamps_collection["id"]})),
            StatusCode::BAD_REQUEST,
        )
        .await;
    assert_eq!(body["code"], "validation_error");

    // The matching collection from the product's own category is accepted.
    let updated = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/products/{}", product["id"]),
            Some(json!({"collection_id": fixture.premium_collection_id})),
            StatusCode::OK,
        )
        .await;
    assert_eq!(
        updated["collection_id"].as_i64(),
        Some(fixture.premium_collection_id)
    );
}

#[tokio::test]
async fn update_with_unknown_collection_is_not_found() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;
    let product = seed_product(&app, &fixture, "Venice Mirror", json!({})).await;

    let body = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/products/{}", product["id"]),
            Some(json!({"collection_id": 424242})),
            StatusCode::NOT_FOUND,
        )
        .await;
    assert_eq!(body["code"], "not_found");

    // Nothing was applied.
    let detail = app
        .get(&format!("/api/v1/products/{}", product["id"]))
        .await;
    assert!(detail["product"]["collection_id"].is_null());
}

#[tokio::test]
async fn price_range_bounds_the_listing() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    seed_product(&app, &fixture, "Budget Mirror", json!({"price": "49.00"})).await;
    seed_product(&app, &fixture, "Mid Mirror", json!({"price": "129.90"})).await;
    seed_product(&app, &fixture, "Grand Mirror", json!({"price": "420.00"})).await;

    let body = app
        .get("/api/v1/products?min_price=50&max_price=200")
        .await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mid Mirror"]);

    // Bounds are inclusive.
    let body = app.get("/api/v1/products?min_price=129.90").await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mid Mirror", "Grand Mirror"]);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;
    let product = seed_product(&app, &fixture, "Venice Mirror", json!({})).await;
    let uri = format!("/api/v1/products/{}", product["id"]);

    app.request_json(Method::DELETE, &uri, None, StatusCode::NO_CONTENT)
        .await;
    let body = app
        .request_json(Method::GET, &uri, None, StatusCode::NOT_FOUND)
        .await;
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn duplicate_section_slug_conflicts() {
    let app = TestApp::new().await;
    seed_taxonomy(&app).await;

    let body = app
        .request_json(
            Method::POST,
            "/api/v1/sections",
            Some(json!({"name": "Interior"})),
            StatusCode::CONFLICT,
        )
        .await;
    assert_eq!(body["code"], "duplicate_slug");
}
