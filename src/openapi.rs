use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        description = r#"
# Multi-brand Retail Catalog API

Taxonomy-driven catalog core for a multi-brand storefront.

- **Browse**: slug-path navigation over Section > Category > Collection/Type
- **Search**: unified ranked search across collections, products, categories and brands
- **Variations**: color-variation grouping of products via an opaque token
- **Galleries**: per-product image galleries with exclusive main/hover roles

Error bodies carry a machine-readable `code`; in particular `not_found`
and `empty_taxonomy` both arrive as HTTP 404 but mean different things.
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Catalog", description = "Slug-path browsing"),
        (name = "Search", description = "Unified catalog search"),
        (name = "Products", description = "Product CRUD, variations, galleries"),
        (name = "Taxonomy", description = "Reference-entity administration"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Browsing
        crate::handlers::catalog::browse,
        crate::handlers::catalog::section_page,
        crate::handlers::catalog::category_page,
        crate::handlers::catalog::item_page,

        // Search
        crate::handlers::search::search,

        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::list_variations,
        crate::handlers::products::group_variations,
        crate::handlers::products::ungroup_variations,
        crate::handlers::products::list_images,
        crate::handlers::products::add_image,

        // Taxonomy administration
        crate::handlers::taxonomy::create_section,
        crate::handlers::taxonomy::list_sections,
        crate::handlers::taxonomy::create_brand,
        crate::handlers::taxonomy::list_brands,
        crate::handlers::taxonomy::create_category,
        crate::handlers::taxonomy::create_collection,
        crate::handlers::taxonomy::create_type,
        crate::handlers::taxonomy::create_color,

        // Health
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            // Search types
            crate::services::search::SearchResponse,
            crate::services::search::SearchResultItem,
            crate::services::search::SearchResultKind,

            // Product types
            crate::services::products::CreateProductInput,
            crate::services::products::UpdateProductInput,
            crate::services::gallery::SetImageInput,
            crate::entities::product_image::ImageRole,
            crate::handlers::products::GroupVariationsRequest,
            crate::handlers::products::GroupVariationsResponse,

            // Taxonomy inputs
            crate::services::taxonomy::CreateSectionInput,
            crate::services::taxonomy::CreateBrandInput,
            crate::services::taxonomy::CreateCategoryInput,
            crate::services::taxonomy::CreateCollectionInput,
            crate::services::taxonomy::CreateTypeInput,
            crate::services::taxonomy::CreateColorInput,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/search"));
        assert!(doc.paths.paths.contains_key("/api/v1/catalog/browse"));
    }
}
