use crate::{
    entities::{product, product_image, product_image::ImageRole},
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Product image galleries with exclusive main/hover roles.
///
/// Assigning `main` or `hover` demotes the previous holder to `gallery`
/// inside the same transaction as the insert, so the zero-or-one quota
/// holds at every commit point.
#[derive(Clone)]
pub struct GalleryService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct SetImageInput {
    #[validate(length(min = 1, max = 500))]
    pub url: String,
    pub role: ImageRole,
    #[serde(default)]
    pub sort_order: i32,
    pub alt_text: Option<String>,
}

impl GalleryService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    async fn get_product(&self, product_id: i32) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    /// Insert an image, demoting any existing holder of an exclusive role.
    #[instrument(skip(self, input))]
    pub async fn set_image(
        &self,
        product_id: i32,
        input: SetImageInput,
    ) -> Result<product_image::Model, ServiceError> {
        input.validate()?;
        self.get_product(product_id).await?;

        let txn = self.db.begin().await?;

        if input.role.is_exclusive() {
            // Demote-then-write: the displaced image becomes a plain
            // gallery image rather than being deleted.
            product_image::Entity::update_many()
                .col_expr(
                    product_image::Column::Role,
                    Expr::value(ImageRole::Gallery),
                )
                .filter(product_image::Column::ProductId.eq(product_id))
                .filter(product_image::Column::Role.eq(input.role))
                .exec(&txn)
                .await?;
        }

        let image = product_image::ActiveModel {
            product_id: Set(product_id),
            url: Set(input.url),
            role: Set(input.role),
            sort_order: Set(input.sort_order),
            alt_text: Set(input.alt_text),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ImageRoleAssigned {
                product_id,
                image_id: image.id,
                role: image.role.as_str().to_string(),
            })
            .await;
        info!(
            "Set {} image {} on product {}",
            image.role.as_str(),
            image.id,
            product_id
        );
        Ok(image)
    }

    /// All images of a product, ordered (sort_order, id).
    #[instrument(skip(self))]
    pub async fn get_gallery(
        &self,
        product_id: i32,
    ) -> Result<Vec<product_image::Model>, ServiceError> {
        self.get_product(product_id).await?;
        product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .order_by_asc(product_image::Column::SortOrder)
            .order_by_asc(product_image::Column::Id)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

}

/// Two-tier lookup: prefer the gallery row, fall back to the legacy
/// single-URL field. The legacy field is read-only once the gallery path
/// is populated.
pub fn resolve_image_url(
    row: Option<&product_image::Model>,
    legacy_url: Option<&str>,
) -> Option<String> {
    row.map(|img| img.url.clone())
        .or_else(|| legacy_url.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn image(id: i32, url: &str, role: ImageRole) -> product_image::Model {
        product_image::Model {
            id,
            product_id: 1,
            url: url.to_string(),
            role,
            sort_order: 0,
            alt_text: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn gallery_row_beats_legacy_field() {
        let row = image(1, "https://cdn.example.com/new.jpg", ImageRole::Main);
        let resolved = resolve_image_url(Some(&row), Some("https://cdn.example.com/old.jpg"));
        assert_eq!(resolved.as_deref(), Some("https://cdn.example.com/new.jpg"));
    }

    #[test]
    fn legacy_field_fills_in_when_no_gallery_row() {
        let resolved = resolve_image_url(None, Some("https://cdn.example.com/old.jpg"));
        assert_eq!(resolved.as_deref(), Some("https://cdn.example.com/old.jpg"));
    }

    #[test]
    fn neither_tier_present() {
        assert_eq!(resolve_image_url(None, None), None);
    }
}
