use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The leaf catalog entity.
///
/// `color_group` is a bare correlation token, not a foreign key: two
/// products sharing a non-null value are color variations of one physical
/// item. `main_image_url` / `hover_image_url` are legacy single-URL fields,
/// read-only once the gallery path is populated (see the gallery service's
/// two-tier lookup).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Globally unique; auto-disambiguated with a numeric suffix on collision.
    #[sea_orm(unique)]
    pub slug: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    pub price: Decimal,

    pub section_id: i32,

    pub brand_id: i32,

    pub category_id: i32,

    pub collection_id: Option<i32>,

    pub type_id: Option<i32>,

    pub color_id: Option<i32>,

    /// Opaque variation-group token shared by sibling color variations.
    pub color_group: Option<String>,

    /// Legacy single-URL main image (pre-gallery rows only).
    pub main_image_url: Option<String>,

    /// Legacy single-URL hover image (pre-gallery rows only).
    pub hover_image_url: Option<String>,

    pub is_new: bool,

    pub is_on_sale: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "Column::CollectionId",
        to = "super::collection::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Collection,
    #[sea_orm(
        belongs_to = "super::product_type::Entity",
        from = "Column::TypeId",
        to = "super::product_type::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Type,
    #[sea_orm(
        belongs_to = "super::color::Entity",
        from = "Column::ColorId",
        to = "super::color::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Color,
    #[sea_orm(has_many = "super::product_image::Entity")]
    Images,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::product_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Type.def()
    }
}

impl Related<super::color::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Color.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.is_new {
                active_model.is_new = Set(false);
            }
            if let ActiveValue::NotSet = active_model.is_on_sale {
                active_model.is_on_sale = Set(false);
            }
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(Utc::now());
            }
        }

        active_model.updated_at = Set(Some(Utc::now()));

        // The auto-increment id is unset on insert, so the conversion only
        // succeeds on updates; inserts are validated at the service boundary.
        if let Ok(model) = Model::try_from(active_model.clone()) {
            if let Err(err) = model.validate() {
                return Err(DbErr::Custom(format!("Validation error: {}", err)));
            }
        }

        Ok(active_model)
    }
}
