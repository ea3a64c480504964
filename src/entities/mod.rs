//! Sea-ORM entities for the catalog taxonomy.
//!
//! Ownership runs Section → (Brand ×) Category → {Collection, Type} →
//! Product → ProductImage. Scoped slug uniqueness lives in the migrator's
//! composite indexes; the entities document it per-column where global.

pub mod brand;
pub mod category;
pub mod collection;
pub mod color;
pub mod product;
pub mod product_image;
pub mod product_type;
pub mod section;

pub use brand::Entity as Brand;
pub use category::Entity as Category;
pub use collection::Entity as Collection;
pub use color::Entity as Color;
pub use product::Entity as Product;
pub use product_image::Entity as ProductImage;
pub use product_type::Entity as ProductType;
pub use section::Entity as Section;
