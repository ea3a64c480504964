use crate::{
    entities::product,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Color-variation grouping over products.
///
/// The group is a bare correlation token, no entity represents it. Two
/// products sharing a non-null `color_group` are variations of one physical
/// item; a null token means no variations.
#[derive(Clone)]
pub struct VariationService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl VariationService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    async fn get_product(&self, product_id: i32) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    /// Sibling variations of a product, excluding the product itself.
    /// Empty when the product has no group token.
    #[instrument(skip(self))]
    pub async fn get_variations(
        &self,
        product_id: i32,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let subject = self.get_product(product_id).await?;

        let Some(token) = subject.color_group else {
            return Ok(Vec::new());
        };

        product::Entity::find()
            .filter(product::Column::ColorGroup.eq(token))
            .filter(product::Column::Id.ne(subject.id))
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// The whole variation group including the product itself; the singleton
    /// list when the product carries no group token. Feeds the swatch strip
    /// on the product page, which marks the current selection.
    #[instrument(skip_all, fields(product_id = subject.id))]
    pub async fn get_all_in_group(
        &self,
        subject: &product::Model,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let Some(ref token) = subject.color_group else {
            return Ok(vec![subject.clone()]);
        };

        product::Entity::find()
            .filter(product::Column::ColorGroup.eq(token.clone()))
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Relabel every given product under a fresh opaque token and return it.
    ///
    /// This is a destructive merge: prior group membership of each product
    /// is overwritten, not unioned. Applied as one transaction so a partial
    /// group is never observed. Cross-category grouping is allowed; curated
    /// cross-finish sets rely on it.
    #[instrument(skip(self))]
    pub async fn group_together(&self, product_ids: &[i32]) -> Result<String, ServiceError> {
        if product_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one product id is required for grouping".to_string(),
            ));
        }

        let products = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids.to_vec()))
            .all(&*self.db)
            .await?;

        let found: HashSet<i32> = products.iter().map(|p| p.id).collect();
        if let Some(missing) = product_ids.iter().find(|id| !found.contains(*id)) {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                missing
            )));
        }

        let categories: HashSet<i32> = products.iter().map(|p| p.category_id).collect();
        if categories.len() > 1 {
            debug!(
                ?product_ids,
                "variation group spans multiple categories"
            );
        }

        let token = Uuid::new_v4().to_string();

        let txn = self.db.begin().await?;
        product::Entity::update_many()
            .col_expr(product::Column::ColorGroup, Expr::value(token.clone()))
            .col_expr(product::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(product::Column::Id.is_in(product_ids.to_vec()))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::VariationsGrouped {
                color_group: token.clone(),
                product_ids: product_ids.to_vec(),
            })
            .await;
        info!("Grouped {} products under a new color group", product_ids.len());
        Ok(token)
    }

    /// Clear the group token on each given product.
    #[instrument(skip(self))]
    pub async fn ungroup(&self, product_ids: &[i32]) -> Result<(), ServiceError> {
        if product_ids.is_empty() {
            return Ok(());
        }

        let found = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids.to_vec()))
            .all(&*self.db)
            .await?;
        let found_ids: HashSet<i32> = found.iter().map(|p| p.id).collect();
        if let Some(missing) = product_ids.iter().find(|id| !found_ids.contains(*id)) {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                missing
            )));
        }

        let txn = self.db.begin().await?;
        product::Entity::update_many()
            .col_expr(
                product::Column::ColorGroup,
                Expr::value(Option::<String>::None),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(product::Column::Id.is_in(product_ids.to_vec()))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::VariationsUngrouped {
                product_ids: product_ids.to_vec(),
            })
            .await;
        info!("Ungrouped {} products", product_ids.len());
        Ok(())
    }
}
