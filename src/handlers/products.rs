use crate::{
    errors::ApiError,
    handlers::common::{created_response, no_content_response, success_response, validate_input},
    services::{
        gallery::SetImageInput,
        products::{CreateProductInput, ProductFilter, UpdateProductInput},
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Product ids to relabel under one color-variation token.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct GroupVariationsRequest {
    #[validate(length(min = 1, message = "At least one product id is required"))]
    pub product_ids: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupVariationsResponse {
    pub color_group: String,
    pub product_ids: Vec<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses((status = 200, description = "Products matching the filter axes"))
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state.services.products.list_products(filter).await?;
    Ok(success_response(products))
}

/// Product detail: the product, resolved imagery, and its color-variation
/// group (always including the product itself).
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product detail"),
        (status = 404, description = "Unknown product id")
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.services.products.get_product_detail(id).await?;
    Ok(success_response(detail))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid input or mismatched taxonomy"),
        (status = 404, description = "Referenced taxonomy row does not exist")
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let product = state.services.products.create_product(input).await?;
    Ok(created_response(product))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductInput,
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Unknown product id")
    )
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let product = state.services.products.update_product(id, input).await?;
    Ok(success_response(product))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Unknown product id")
    )
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.products.delete_product(id).await?;
    Ok(no_content_response())
}

/// Relabel the given products under a fresh variation token. Any prior
/// token on any of them is overwritten.
#[utoipa::path(
    post,
    path = "/api/v1/products/variations/group",
    request_body = GroupVariationsRequest,
    responses(
        (status = 200, description = "Products grouped", body = GroupVariationsResponse),
        (status = 404, description = "One of the ids does not exist")
    )
)]
pub async fn group_variations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GroupVariationsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&request)?;
    let color_group = state
        .services
        .variations
        .group_together(&request.product_ids)
        .await?;
    Ok(success_response(GroupVariationsResponse {
        color_group,
        product_ids: request.product_ids,
    }))
}

/// Sibling variations of a product. The product itself is excluded;
/// an ungrouped product yields an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/variations",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Sibling products sharing the variation token"),
        (status = 404, description = "Unknown product id")
    )
)]
pub async fn list_variations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let siblings = state.services.variations.get_variations(id).await?;
    Ok(success_response(siblings))
}

#[utoipa::path(
    post,
    path = "/api/v1/products/variations/ungroup",
    request_body = GroupVariationsRequest,
    responses(
        (status = 204, description = "Tokens cleared"),
        (status = 404, description = "One of the ids does not exist")
    )
)]
pub async fn ungroup_variations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GroupVariationsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .variations
        .ungroup(&request.product_ids)
        .await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/images",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Gallery ordered by (sort_order, id)"),
        (status = 404, description = "Unknown product id")
    )
)]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let images = state.services.gallery.get_gallery(id).await?;
    Ok(success_response(images))
}

/// Attach an image. Assigning `main` or `hover` demotes the previous
/// holder of that role to `gallery`.
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/images",
    params(("id" = i32, Path, description = "Product id")),
    request_body = SetImageInput,
    responses(
        (status = 201, description = "Image attached"),
        (status = 404, description = "Unknown product id")
    )
)]
pub async fn add_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<SetImageInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let image = state.services.gallery.set_image(id, input).await?;
    Ok(created_response(image))
}
