//! Catalog services: taxonomy writes, slug-path resolution, unified search,
//! color-variation grouping, and product image galleries.

pub mod gallery;
pub mod hierarchy;
pub mod products;
pub mod search;
pub mod taxonomy;
pub mod variations;

pub use gallery::GalleryService;
pub use hierarchy::HierarchyService;
pub use products::ProductService;
pub use search::SearchService;
pub use taxonomy::TaxonomyService;
pub use variations::VariationService;
