//! HTTP layer: thin axum handlers over the catalog services.

pub mod catalog;
pub mod common;
pub mod health;
pub mod products;
pub mod search;
pub mod taxonomy;

use crate::{
    events::EventSender,
    services::{
        GalleryService, HierarchyService, ProductService, SearchService, TaxonomyService,
        VariationService,
    },
    AppState,
};
use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// All catalog services, constructed once at startup and shared by
/// every handler through `AppState`.
#[derive(Clone)]
pub struct AppServices {
    pub taxonomy: Arc<TaxonomyService>,
    pub products: Arc<ProductService>,
    pub hierarchy: Arc<HierarchyService>,
    pub search: Arc<SearchService>,
    pub variations: Arc<VariationService>,
    pub gallery: Arc<GalleryService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self {
            taxonomy: Arc::new(TaxonomyService::new(db.clone(), event_sender.clone())),
            products: Arc::new(ProductService::new(db.clone(), event_sender.clone())),
            hierarchy: Arc::new(HierarchyService::new(db.clone())),
            search: Arc::new(SearchService::new(db.clone())),
            variations: Arc::new(VariationService::new(db.clone(), event_sender.clone())),
            gallery: Arc::new(GalleryService::new(db, event_sender)),
        }
    }
}

/// Everything under `/api/v1`.
pub fn api_router() -> Router<Arc<AppState>> {
    let catalog_routes = Router::new()
        .route("/catalog/browse", get(catalog::browse))
        .route("/catalog/:section", get(catalog::section_page))
        .route("/catalog/:section/:category", get(catalog::category_page))
        .route(
            "/catalog/:section/:category/:item",
            get(catalog::item_page),
        );

    // "variations" is a static segment, registered alongside the `/:id`
    // capture; the router prefers static matches so it never parses as
    // a product id.
    let product_routes = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/variations/group",
            post(products::group_variations),
        )
        .route(
            "/products/variations/ungroup",
            post(products::ungroup_variations),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/:id/variations",
            get(products::list_variations),
        )
        .route(
            "/products/:id/images",
            get(products::list_images).post(products::add_image),
        );

    let taxonomy_routes = Router::new()
        .route(
            "/sections",
            get(taxonomy::list_sections).post(taxonomy::create_section),
        )
        .route(
            "/sections/:id",
            get(taxonomy::get_section).delete(taxonomy::delete_section),
        )
        .route(
            "/brands",
            get(taxonomy::list_brands).post(taxonomy::create_brand),
        )
        .route(
            "/brands/:id",
            get(taxonomy::get_brand).delete(taxonomy::delete_brand),
        )
        .route(
            "/categories",
            get(taxonomy::list_categories).post(taxonomy::create_category),
        )
        .route(
            "/categories/:id",
            get(taxonomy::get_category).delete(taxonomy::delete_category),
        )
        .route(
            "/collections",
            get(taxonomy::list_collections).post(taxonomy::create_collection),
        )
        .route(
            "/collections/:id",
            get(taxonomy::get_collection).delete(taxonomy::delete_collection),
        )
        .route(
            "/types",
            get(taxonomy::list_types).post(taxonomy::create_type),
        )
        .route(
            "/types/:id",
            get(taxonomy::get_type).delete(taxonomy::delete_type),
        )
        .route(
            "/colors",
            get(taxonomy::list_colors).post(taxonomy::create_color),
        )
        .route(
            "/colors/:id",
            get(taxonomy::get_color).delete(taxonomy::delete_color),
        );

    Router::new()
        .merge(catalog_routes)
        .route("/search", get(search::search))
        .merge(product_routes)
        .merge(taxonomy_routes)
}
