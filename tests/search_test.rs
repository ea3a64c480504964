mod common;

use common::{seed_product, seed_taxonomy, TestApp};
use serde_json::json;

#[tokio::test]
async fn blank_query_is_a_normal_response_with_a_message() {
    let app = TestApp::new().await;

    let body = app.get("/api/v1/search").await;
    assert_eq!(body["total"], 0);
    assert_eq!(
        body["message"],
        "Please provide a search query using ?q=your_query"
    );
}

#[tokio::test]
async fn one_character_query_is_rejected_softly() {
    let app = TestApp::new().await;

    let body = app.get("/api/v1/search?q=o").await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["message"], "Search query must be at least 2 characters");
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn collections_rank_before_products_of_the_same_name() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    app.post(
        "/api/v1/collections",
        json!({
            "brand_id": fixture.brand_id,
            "category_id": fixture.mirrors_id,
            "name": "Omega"
        }),
    )
    .await;
    seed_product(&app, &fixture, "Omega", json!({})).await;

    let body = app.get("/api/v1/search?q=Omega").await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(results[0]["type"], "collection");
    assert_eq!(results[1]["type"], "product");
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;
    seed_product(&app, &fixture, "Venice Mirror", json!({})).await;

    let body = app.get("/api/v1/search?q=VENICE").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["name"], "Venice Mirror");
}

#[tokio::test]
async fn exact_match_outranks_prefix_and_substring() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    seed_product(&app, &fixture, "Tap Classic", json!({})).await;
    seed_product(&app, &fixture, "Tap", json!({})).await;
    seed_product(&app, &fixture, "Golden Tap", json!({})).await;

    let body = app.get("/api/v1/search?q=tap").await;
    let names: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Tap", "Tap Classic", "Golden Tap"]);
}

#[tokio::test]
async fn description_only_match_ranks_last() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    seed_product(
        &app,
        &fixture,
        "Wall Panel",
        json!({"description": "Finished in brushed bronze"}),
    )
    .await;
    seed_product(&app, &fixture, "Bronze Handle", json!({})).await;

    let body = app.get("/api/v1/search?q=bronze").await;
    let names: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bronze Handle", "Wall Panel"]);
}

#[tokio::test]
async fn product_breadcrumb_walks_the_taxonomy() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;
    seed_product(
        &app,
        &fixture,
        "Venice Mirror",
        json!({"collection_id": fixture.premium_collection_id}),
    )
    .await;

    let body = app.get("/api/v1/search?q=venice").await;
    assert_eq!(
        body["results"][0]["breadcrumb"],
        "Interior > Mirrors > Premium > Venice Mirror"
    );
}

#[tokio::test]
async fn brand_results_use_the_brands_breadcrumb_root() {
    let app = TestApp::new().await;
    seed_taxonomy(&app).await;

    let body = app.get("/api/v1/search?q=lamis").await;
    assert_eq!(body["results"][0]["type"], "brand");
    assert_eq!(body["results"][0]["breadcrumb"], "Brands > Lamis");
}

#[tokio::test]
async fn like_wildcards_in_the_query_are_literal() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;
    seed_product(&app, &fixture, "Venice Mirror", json!({})).await;

    // "%e" would match everything if the percent sign went through raw.
    let body = app.get("/api/v1/search?q=%25e").await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn per_kind_results_are_capped_at_ten() {
    let app = TestApp::new().await;
    let fixture = seed_taxonomy(&app).await;

    for i in 0..12 {
        seed_product(&app, &fixture, &format!("Orbit Lamp {}", i), json!({})).await;
    }

    let body = app.get("/api/v1/search?q=orbit").await;
    assert_eq!(body["results"].as_array().unwrap().len(), 10);
}
