use crate::{
    errors::ApiError,
    handlers::common::{created_response, no_content_response, success_response, validate_input},
    services::taxonomy::{
        CreateBrandInput, CreateCategoryInput, CreateCollectionInput, CreateColorInput,
        CreateSectionInput, CreateTypeInput,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

// Thin admin surface over the taxonomy service. Write access is expected
// to be gated upstream (reverse proxy / gateway).

// ---- Sections ----

#[utoipa::path(
    post,
    path = "/api/v1/sections",
    request_body = CreateSectionInput,
    responses(
        (status = 201, description = "Section created"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_section(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateSectionInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let section = state.services.taxonomy.create_section(input).await?;
    Ok(created_response(section))
}

#[utoipa::path(
    get,
    path = "/api/v1/sections",
    responses((status = 200, description = "All sections, ordered by name"))
)]
pub async fn list_sections(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.taxonomy.list_sections().await?,
    ))
}

pub async fn get_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.taxonomy.get_section(id).await?,
    ))
}

pub async fn delete_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.taxonomy.delete_section(id).await?;
    Ok(no_content_response())
}

// ---- Brands ----

#[utoipa::path(
    post,
    path = "/api/v1/brands",
    request_body = CreateBrandInput,
    responses(
        (status = 201, description = "Brand created"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_brand(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateBrandInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let brand = state.services.taxonomy.create_brand(input).await?;
    Ok(created_response(brand))
}

#[utoipa::path(
    get,
    path = "/api/v1/brands",
    responses((status = 200, description = "All brands, ordered by name"))
)]
pub async fn list_brands(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.taxonomy.list_brands().await?))
}

pub async fn get_brand(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.taxonomy.get_brand(id).await?))
}

pub async fn delete_brand(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.taxonomy.delete_brand(id).await?;
    Ok(no_content_response())
}

// ---- Categories ----

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryInput,
    responses(
        (status = 201, description = "Category created"),
        (status = 404, description = "Parent section or brand missing"),
        (status = 409, description = "Slug already taken within this section and brand")
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let category = state.services.taxonomy.create_category(input).await?;
    Ok(created_response(category))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.taxonomy.list_categories().await?,
    ))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.taxonomy.get_category(id).await?,
    ))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.taxonomy.delete_category(id).await?;
    Ok(no_content_response())
}

// ---- Collections ----

#[utoipa::path(
    post,
    path = "/api/v1/collections",
    request_body = CreateCollectionInput,
    responses(
        (status = 201, description = "Collection created"),
        (status = 404, description = "Parent brand or category missing"),
        (status = 409, description = "Slug already taken within this brand and category")
    )
)]
pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateCollectionInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let collection = state.services.taxonomy.create_collection(input).await?;
    Ok(created_response(collection))
}

pub async fn list_collections(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.taxonomy.list_collections().await?,
    ))
}

pub async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.taxonomy.get_collection(id).await?,
    ))
}

pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.taxonomy.delete_collection(id).await?;
    Ok(no_content_response())
}

// ---- Types ----

#[utoipa::path(
    post,
    path = "/api/v1/types",
    request_body = CreateTypeInput,
    responses(
        (status = 201, description = "Type created"),
        (status = 404, description = "Parent category missing"),
        (status = 409, description = "Slug already taken within this category")
    )
)]
pub async fn create_type(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let ty = state.services.taxonomy.create_type(input).await?;
    Ok(created_response(ty))
}

pub async fn list_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.taxonomy.list_types().await?))
}

pub async fn get_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.taxonomy.get_type(id).await?))
}

pub async fn delete_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.taxonomy.delete_type(id).await?;
    Ok(no_content_response())
}

// ---- Colors ----

#[utoipa::path(
    post,
    path = "/api/v1/colors",
    request_body = CreateColorInput,
    responses(
        (status = 201, description = "Color created"),
        (status = 400, description = "Neither hex value nor texture image given")
    )
)]
pub async fn create_color(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateColorInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&input)?;
    let color = state.services.taxonomy.create_color(input).await?;
    Ok(created_response(color))
}

pub async fn list_colors(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.taxonomy.list_colors().await?))
}

pub async fn get_color(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.taxonomy.get_color(id).await?))
}

pub async fn delete_color(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.taxonomy.delete_color(id).await?;
    Ok(no_content_response())
}
