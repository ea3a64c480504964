use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gallery image role. `Main` and `Hover` are exclusive per product (at most
/// one row each); `Gallery` is unlimited, ordered by (sort_order, id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    #[sea_orm(string_value = "main")]
    Main,
    #[sea_orm(string_value = "hover")]
    Hover,
    #[sea_orm(string_value = "gallery")]
    Gallery,
}

impl ImageRole {
    /// Whether the role is subject to the zero-or-one-per-product quota.
    pub fn is_exclusive(self) -> bool {
        matches!(self, ImageRole::Main | ImageRole::Hover)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageRole::Main => "main",
            ImageRole::Hover => "hover",
            ImageRole::Gallery => "gallery",
        }
    }
}

/// One image in a product's gallery.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub product_id: i32,

    pub url: String,

    pub role: ImageRole,

    pub sort_order: i32,

    pub alt_text: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
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
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(Utc::now());
            }
        }
        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_roles() {
        assert!(ImageRole::Main.is_exclusive());
        assert!(ImageRole::Hover.is_exclusive());
        assert!(!ImageRole::Gallery.is_exclusive());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&ImageRole::Hover).expect("serialize role");
        assert_eq!(json, "\"hover\"");
    }
}
