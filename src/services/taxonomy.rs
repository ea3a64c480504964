use crate::{
    entities::{brand, category, collection, color, product_type, section},
    errors::ServiceError,
    events::{Event, EventSender},
    slug::slugify,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Administrative writes and reads for the taxonomy reference entities.
///
/// Every entity here derives its slug from its name and fails with
/// `DuplicateSlug` on a scoped collision; Product is the only entity with
/// automatic disambiguation, and it lives in `ProductService`.
#[derive(Clone)]
pub struct TaxonomyService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl TaxonomyService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    fn slug_for(name: &str) -> Result<String, ServiceError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Name '{}' does not produce a usable slug",
                name
            )));
        }
        Ok(slug)
    }

    // ---- Sections ----

    #[instrument(skip(self))]
    pub async fn create_section(
        &self,
        input: CreateSectionInput,
    ) -> Result<section::Model, ServiceError> {
        input.validate()?;
        let slug = Self::slug_for(&input.name)?;

        let existing = section::Entity::find()
            .filter(section::Column::Slug.eq(&slug))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateSlug(format!(
                "Section slug '{}' already exists",
                slug
            )));
        }

        let model = section::ActiveModel {
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::SectionCreated(model.id))
            .await;
        info!("Created section {} ({})", model.id, model.slug);
        Ok(model)
    }

    pub async fn list_sections(&self) -> Result<Vec<section::Model>, ServiceError> {
        section::Entity::find()
            .order_by_asc(section::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get_section(&self, id: i32) -> Result<section::Model, ServiceError> {
        section::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Section {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn delete_section(&self, id: i32) -> Result<(), ServiceError> {
        let model = self.get_section(id).await?;
        model.delete(&*self.db).await?;
        info!("Deleted section {}", id);
        Ok(())
    }

    // ---- Brands ----

    #[instrument(skip(self))]
    pub async fn create_brand(
        &self,
        input: CreateBrandInput,
    ) -> Result<brand::Model, ServiceError> {
        input.validate()?;
        let slug = Self::slug_for(&input.name)?;

        let existing = brand::Entity::find()
            .filter(brand::Column::Slug.eq(&slug))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateSlug(format!(
                "Brand slug '{}' already exists",
                slug
            )));
        }

        let model = brand::ActiveModel {
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            image_url: Set(input.image_url),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::BrandCreated(model.id))
            .await;
        info!("Created brand {} ({})", model.id, model.slug);
        Ok(model)
    }

    pub async fn list_brands(&self) -> Result<Vec<brand::Model>, ServiceError> {
        brand::Entity::find()
            .order_by_asc(brand::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get_brand(&self, id: i32) -> Result<brand::Model, ServiceError> {
        brand::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Brand {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn delete_brand(&self, id: i32) -> Result<(), ServiceError> {
        let model = self.get_brand(id).await?;
        model.delete(&*self.db).await?;
        info!("Deleted brand {}", id);
        Ok(())
    }

    // ---- Categories ----

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;
        let slug = Self::slug_for(&input.name)?;

        // Parent references must resolve before the uniqueness probe.
        self.get_section(input.section_id).await?;
        self.get_brand(input.brand_id).await?;

        let existing = category::Entity::find()
            .filter(category::Column::SectionId.eq(input.section_id))
            .filter(category::Column::BrandId.eq(input.brand_id))
            .filter(category::Column::Slug.eq(&slug))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateSlug(format!(
                "Category slug '{}' already exists for this section and brand",
                slug
            )));
        }

        let model = category::ActiveModel {
            section_id: Set(input.section_id),
            brand_id: Set(input.brand_id),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::CategoryCreated(model.id))
            .await;
        info!("Created category {} ({})", model.id, model.slug);
        Ok(model)
    }

    pub async fn list_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get_category(&self, id: i32) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        let model = self.get_category(id).await?;
        model.delete(&*self.db).await?;
        info!("Deleted category {}", id);
        Ok(())
    }

    // ---- Collections ----

    #[instrument(skip(self))]
    pub async fn create_collection(
        &self,
        input: CreateCollectionInput,
    ) -> Result<collection::Model, ServiceError> {
        input.validate()?;
        let slug = Self::slug_for(&input.name)?;

        self.get_brand(input.brand_id).await?;
        self.get_category(input.category_id).await?;

        let existing = collection::Entity::find()
            .filter(collection::Column::BrandId.eq(input.brand_id))
            .filter(collection::Column::CategoryId.eq(input.category_id))
            .filter(collection::Column::Slug.eq(&slug))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateSlug(format!(
                "Collection slug '{}' already exists for this brand and category",
                slug
            )));
        }

        let model = collection::ActiveModel {
            brand_id: Set(input.brand_id),
            category_id: Set(input.category_id),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            image_url: Set(input.image_url),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::CollectionCreated(model.id))
            .await;
        info!("Created collection {} ({})", model.id, model.slug);
        Ok(model)
    }

    pub async fn list_collections(&self) -> Result<Vec<collection::Model>, ServiceError> {
        collection::Entity::find()
            .order_by_asc(collection::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get_collection(&self, id: i32) -> Result<collection::Model, ServiceError> {
        collection::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Collection {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn delete_collection(&self, id: i32) -> Result<(), ServiceError> {
        let model = self.get_collection(id).await?;
        // Products referencing this collection are detached, not deleted
        // (SET NULL in the schema).
        model.delete(&*self.db).await?;
        info!("Deleted collection {}", id);
        Ok(())
    }

    // ---- Types ----

    #[instrument(skip(self))]
    pub async fn create_type(
        &self,
        input: CreateTypeInput,
    ) -> Result<product_type::Model, ServiceError> {
        input.validate()?;
        let slug = Self::slug_for(&input.name)?;

        self.get_category(input.category_id).await?;

        let existing = product_type::Entity::find()
            .filter(product_type::Column::CategoryId.eq(input.category_id))
            .filter(product_type::Column::Slug.eq(&slug))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateSlug(format!(
                "Type slug '{}' already exists for this category",
                slug
            )));
        }

        let model = product_type::ActiveModel {
            category_id: Set(input.category_id),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::TypeCreated(model.id))
            .await;
        info!("Created type {} ({})", model.id, model.slug);
        Ok(model)
    }

    pub async fn list_types(&self) -> Result<Vec<product_type::Model>, ServiceError> {
        product_type::Entity::find()
            .order_by_asc(product_type::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get_type(&self, id: i32) -> Result<product_type::Model, ServiceError> {
        product_type::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Type {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn delete_type(&self, id: i32) -> Result<(), ServiceError> {
        let model = self.get_type(id).await?;
        model.delete(&*self.db).await?;
        info!("Deleted type {}", id);
        Ok(())
    }

    // ---- Colors ----

    #[instrument(skip(self))]
    pub async fn create_color(
        &self,
        input: CreateColorInput,
    ) -> Result<color::Model, ServiceError> {
        input.validate()?;

        // Either a flat hex value or a texture image, never both required.
        if input.hex_value.is_none() && input.texture_image_url.is_none() {
            return Err(ServiceError::ValidationError(
                "Color requires a hex value or a texture image".to_string(),
            ));
        }

        let model = color::ActiveModel {
            name: Set(input.name),
            hex_value: Set(input.hex_value),
            texture_image_url: Set(input.texture_image_url),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::ColorCreated(model.id))
            .await;
        info!("Created color {}", model.id);
        Ok(model)
    }

    pub async fn list_colors(&self) -> Result<Vec<color::Model>, ServiceError> {
        color::Entity::find()
            .order_by_asc(color::Column::Name)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get_color(&self, id: i32) -> Result<color::Model, ServiceError> {
        color::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Color {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn delete_color(&self, id: i32) -> Result<(), ServiceError> {
        let model = self.get_color(id).await?;
        model.delete(&*self.db).await?;
        info!("Deleted color {}", id);
        Ok(())
    }
}

// Input DTOs

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateSectionInput {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateBrandInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCategoryInput {
    pub section_id: i32,
    pub brand_id: i32,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCollectionInput {
    pub brand_id: i32,
    pub category_id: i32,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateTypeInput {
    pub category_id: i32,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateColorInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub hex_value: Option<String>,
    pub texture_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_for_rejects_symbol_only_names() {
        let err = TaxonomyService::slug_for("***").unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn slug_for_transliterates() {
        assert_eq!(TaxonomyService::slug_for("Зеркала").unwrap(), "zerkala");
        assert_eq!(
            TaxonomyService::slug_for("Bath furniture").unwrap(),
            "bath-furniture"
        );
    }

    #[test]
    fn color_input_shape() {
        let input = CreateColorInput {
            name: "Matte walnut".to_string(),
            hex_value: None,
            texture_image_url: Some("https://cdn.example.com/walnut.jpg".to_string()),
        };
        assert!(input.validate().is_ok());
        assert!(input.hex_value.is_none());
    }
}
