use crate::{
    entities::{brand, category, collection, color, product, product_image, product_type, section},
    entities::product_image::ImageRole,
    errors::ServiceError,
    events::{Event, EventSender},
    services::gallery::resolve_image_url,
    services::variations::VariationService,
    slug::{slugify, with_suffix},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Product CRUD plus the assembled detail view.
///
/// Products are the only entity whose slug is auto-disambiguated: a name
/// collision appends `-1`, `-2`, ... instead of failing, because the
/// storefront routinely carries same-named products across brands.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    variations: VariationService,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub price: Decimal,
    pub section_id: i32,
    pub brand_id: i32,
    pub category_id: i32,
    pub collection_id: Option<i32>,
    pub type_id: Option<i32>,
    pub color_id: Option<i32>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_on_sale: bool,
}

/// Partial update; `None` leaves the field untouched. The slug is fixed at
/// creation and never changes on rename, so stored URLs stay valid.
#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub collection_id: Option<Option<i32>>,
    pub type_id: Option<Option<i32>>,
    pub color_id: Option<Option<i32>>,
    pub is_new: Option<bool>,
    pub is_on_sale: Option<bool>,
}

/// Filter axes for product listings. Every axis is conjunctive.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub section_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub type_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_new: Option<bool>,
    pub is_on_sale: Option<bool>,
}

/// The full product page payload: the product, its resolved imagery, and
/// its color-variation siblings (always including the product itself).
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: product::Model,
    pub color: Option<color::Model>,
    pub main_image_url: Option<String>,
    pub hover_image_url: Option<String>,
    pub images: Vec<product_image::Model>,
    pub color_variations: Vec<product::Model>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        let variations = VariationService::new(db.clone(), event_sender.clone());
        Self {
            db,
            event_sender,
            variations,
        }
    }

    pub async fn get_product(&self, id: i32) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    /// Checks that the referenced taxonomy rows exist and agree with each
    /// other: the category must belong to the given section and brand, and
    /// any collection or type must belong to that category.
    async fn verify_taxonomy(&self, input: &CreateProductInput) -> Result<(), ServiceError> {
        section::Entity::find_by_id(input.section_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Section {} not found", input.section_id))
            })?;
        brand::Entity::find_by_id(input.brand_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Brand {} not found", input.brand_id)))?;

        let cat = category::Entity::find_by_id(input.category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Category {} not found", input.category_id))
            })?;
        if cat.section_id != input.section_id || cat.brand_id != input.brand_id {
            return Err(ServiceError::ValidationError(format!(
                "Category {} does not belong to section {} / brand {}",
                cat.id, input.section_id, input.brand_id
            )));
        }

        if let Some(collection_id) = input.collection_id {
            let coll = collection::Entity::find_by_id(collection_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Collection {} not found", collection_id))
                })?;
            if coll.category_id != input.category_id {
                return Err(ServiceError::ValidationError(format!(
                    "Collection {} does not belong to category {}",
                    collection_id, input.category_id
                )));
            }
        }
        if let Some(type_id) = input.type_id {
            let ty = product_type::Entity::find_by_id(type_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Type {} not found", type_id)))?;
            if ty.category_id != input.category_id {
                return Err(ServiceError::ValidationError(format!(
                    "Type {} does not belong to category {}",
                    type_id, input.category_id
                )));
            }
        }
        if let Some(color_id) = input.color_id {
            color::Entity::find_by_id(color_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Color {} not found", color_id)))?;
        }
        Ok(())
    }

    /// Same coherence rules as `verify_taxonomy`, applied to the references
    /// an update may rewire. The category itself is fixed after creation, so
    /// a new collection or type must belong to the product's category.
    async fn verify_update_refs(
        &self,
        category_id: i32,
        input: &UpdateProductInput,
    ) -> Result<(), ServiceError> {
        if let Some(Some(collection_id)) = input.collection_id {
            let coll = collection::Entity::find_by_id(collection_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Collection {} not found", collection_id))
                })?;
            if coll.category_id != category_id {
                return Err(ServiceError::ValidationError(format!(
                    "Collection {} does not belong to category {}",
                    collection_id, category_id
                )));
            }
        }
        if let Some(Some(type_id)) = input.type_id {
            let ty = product_type::Entity::find_by_id(type_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Type {} not found", type_id)))?;
            if ty.category_id != category_id {
                return Err(ServiceError::ValidationError(format!(
                    "Type {} does not belong to category {}",
                    type_id, category_id
                )));
            }
        }
        if let Some(Some(color_id)) = input.color_id {
            color::Entity::find_by_id(color_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Color {} not found", color_id)))?;
        }
        Ok(())
    }

    /// First free slug derived from the name: the plain slug, then
    /// `{slug}-1`, `{slug}-2`, and so on.
    async fn next_free_slug(&self, name: &str) -> Result<String, ServiceError> {
        let base = slugify(name);
        if base.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Name '{}' does not produce a usable slug",
                name
            )));
        }

        let mut candidate = base.clone();
        let mut counter = 0u32;
        while product::Entity::find()
            .filter(product::Column::Slug.eq(&candidate))
            .one(&*self.db)
            .await?
            .is_some()
        {
            counter += 1;
            candidate = with_suffix(&base, counter);
        }
        Ok(candidate)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        self.verify_taxonomy(&input).await?;
        let slug = self.next_free_slug(&input.name).await?;

        let model = product::ActiveModel {
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            price: Set(input.price),
            section_id: Set(input.section_id),
            brand_id: Set(input.brand_id),
            category_id: Set(input.category_id),
            collection_id: Set(input.collection_id),
            type_id: Set(input.type_id),
            color_id: Set(input.color_id),
            is_new: Set(input.is_new),
            is_on_sale: Set(input.is_on_sale),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::ProductCreated(model.id))
            .await;
        info!("Created product {} ({})", model.id, model.slug);
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: i32,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_product(id).await?;
        self.verify_update_refs(existing.category_id, &input).await?;

        let mut active: product::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(collection_id) = input.collection_id {
            active.collection_id = Set(collection_id);
        }
        if let Some(type_id) = input.type_id {
            active.type_id = Set(type_id);
        }
        if let Some(color_id) = input.color_id {
            active.color_id = Set(color_id);
        }
        if let Some(is_new) = input.is_new {
            active.is_new = Set(is_new);
        }
        if let Some(is_on_sale) = input.is_on_sale {
            active.is_on_sale = Set(is_on_sale);
        }

        let model = active.update(&*self.db).await?;
        self.event_sender
            .send_or_log(Event::ProductUpdated(model.id))
            .await;
        info!("Updated product {}", model.id);
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        let model = self.get_product(id).await?;
        model.delete(&*self.db).await?;
        self.event_sender
            .send_or_log(Event::ProductDeleted(id))
            .await;
        info!("Deleted product {}", id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let mut query = product::Entity::find();
        if let Some(section_id) = filter.section_id {
            query = query.filter(product::Column::SectionId.eq(section_id));
        }
        if let Some(brand_id) = filter.brand_id {
            query = query.filter(product::Column::BrandId.eq(brand_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(collection_id) = filter.collection_id {
            query = query.filter(product::Column::CollectionId.eq(collection_id));
        }
        if let Some(type_id) = filter.type_id {
            query = query.filter(product::Column::TypeId.eq(type_id));
        }
        if let Some(min_price) = filter.min_price {
            query = query.filter(product::Column::Price.gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(product::Column::Price.lte(max_price));
        }
        if let Some(is_new) = filter.is_new {
            query = query.filter(product::Column::IsNew.eq(is_new));
        }
        if let Some(is_on_sale) = filter.is_on_sale {
            query = query.filter(product::Column::IsOnSale.eq(is_on_sale));
        }
        query
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// The product page payload. `color_variations` is the whole group
    /// including the product itself, so the swatch strip can mark the
    /// current selection; a product without a group token yields the
    /// singleton list.
    #[instrument(skip(self))]
    pub async fn get_product_detail(&self, id: i32) -> Result<ProductDetail, ServiceError> {
        let subject = self.get_product(id).await?;

        let color = match subject.color_id {
            Some(color_id) => color::Entity::find_by_id(color_id).one(&*self.db).await?,
            None => None,
        };

        let images = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(subject.id))
            .order_by_asc(product_image::Column::SortOrder)
            .order_by_asc(product_image::Column::Id)
            .all(&*self.db)
            .await?;

        let main_row = images.iter().find(|img| img.role == ImageRole::Main);
        let hover_row = images.iter().find(|img| img.role == ImageRole::Hover);
        let main_image_url = resolve_image_url(main_row, subject.main_image_url.as_deref());
        let hover_image_url = resolve_image_url(hover_row, subject.hover_image_url.as_deref());

        let color_variations = self.variations.get_all_in_group(&subject).await?;

        Ok(ProductDetail {
            product: subject,
            color,
            main_image_url,
            hover_image_url,
            images,
            color_variations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn create_input_parses_decimal_price() {
        let input: CreateProductInput = serde_json::from_str(
            r#"{
                "name": "Classic Tap",
                "price": "129.90",
                "section_id": 1,
                "brand_id": 1,
                "category_id": 1
            }"#,
        )
        .unwrap();
        assert_eq!(input.price, dec!(129.90));
        assert!(!input.is_new);
    }

    #[test]
    fn update_input_defaults_touch_nothing() {
        let input = UpdateProductInput::default();
        assert!(input.name.is_none());
        assert!(input.collection_id.is_none());
        assert!(input.is_on_sale.is_none());
    }

    #[test]
    fn filter_deserializes_from_sparse_query() {
        let filter: ProductFilter =
            serde_json::from_str(r#"{"section_id": 3, "is_new": true}"#).unwrap();
        assert_eq!(filter.section_id, Some(3));
        assert_eq!(filter.is_new, Some(true));
        assert!(filter.brand_id.is_none());
        assert!(filter.min_price.is_none());
        assert!(filter.max_price.is_none());
    }
}
