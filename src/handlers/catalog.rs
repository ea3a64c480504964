use crate::{errors::ApiError, handlers::common::success_response, AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

/// Full navigation tree for the storefront menu.
#[utoipa::path(
    get,
    path = "/api/v1/catalog/browse",
    responses(
        (status = 200, description = "Sections with their categories")
    )
)]
pub async fn browse(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let tree = state.services.hierarchy.build_catalog_tree().await?;
    Ok(success_response(tree))
}

/// Section page: the section plus its categories, deduplicated by name.
#[utoipa::path(
    get,
    path = "/api/v1/catalog/{section}",
    params(("section" = String, Path, description = "Section slug")),
    responses(
        (status = 200, description = "Section listing"),
        (status = 404, description = "Unknown section slug")
    )
)]
pub async fn section_page(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.services.hierarchy.section_listing(&section).await?;
    Ok(success_response(listing))
}

/// Category page: collections and types across every brand carrying this
/// category slug. A valid but childless category is a 404 with code
/// `empty_taxonomy`, distinct from `not_found`.
#[utoipa::path(
    get,
    path = "/api/v1/catalog/{section}/{category}",
    params(
        ("section" = String, Path, description = "Section slug"),
        ("category" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category listing"),
        (status = 404, description = "Unknown slug, or category with no children")
    )
)]
pub async fn category_page(
    State(state): State<Arc<AppState>>,
    Path((section, category)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .services
        .hierarchy
        .category_listing(&section, &category)
        .await?;
    Ok(success_response(listing))
}

/// Item page: the third URL segment names a Collection or a Type.
/// Collections win on slug collision.
#[utoipa::path(
    get,
    path = "/api/v1/catalog/{section}/{category}/{item}",
    params(
        ("section" = String, Path, description = "Section slug"),
        ("category" = String, Path, description = "Category slug"),
        ("item" = String, Path, description = "Collection or type slug")
    ),
    responses(
        (status = 200, description = "Resolved item with its products"),
        (status = 404, description = "No collection or type matches the slug")
    )
)]
pub async fn item_page(
    State(state): State<Arc<AppState>>,
    Path((section, category, item)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let resolved = state
        .services
        .hierarchy
        .resolve_item(&section, &category, &item)
        .await?;
    Ok(success_response(resolved))
}
