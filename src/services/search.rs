use crate::{
    entities::{brand, category, collection, product, section},
    errors::ServiceError,
};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{Condition, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Per-kind result cap.
const MAX_RESULTS_PER_KIND: usize = 10;
/// Queries shorter than this return a well-formed empty response.
const MIN_QUERY_LEN: usize = 2;

/// Unified ranked search across products, collections, categories and brands.
///
/// Matching is a case-insensitive substring probe on name and description;
/// ranking happens in Rust on the fetched candidates. Kinds are merged in a
/// fixed order (collections first, as the most useful navigation hits)
/// and never re-sorted across kinds.
#[derive(Clone)]
pub struct SearchService {
    db: Arc<DatabaseConnection>,
}

/// Entity kind of a search hit. Serialized under the wire name `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultKind {
    Collection,
    Product,
    Category,
    Brand,
}

/// One search hit, with a breadcrumb and the full set of filter-navigation
/// ids so a client can jump straight into a filtered catalog view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResultItem {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SearchResultKind,
    pub breadcrumb: String,
    pub section_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub type_id: Option<i32>,
    pub slug: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    fn empty(message: &str) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            message: Some(message.to_string()),
        }
    }
}

/// Priority rank of a match: 1 exact name, 2 name prefix, 3 name substring,
/// 4 description-only. Case-insensitive throughout.
pub fn match_priority(name: &str, query: &str) -> u8 {
    let name = name.to_lowercase();
    let query = query.to_lowercase();
    if name == query {
        1
    } else if name.starts_with(&query) {
        2
    } else if name.contains(&query) {
        3
    } else {
        4
    }
}

/// Sort by (priority, name), then cap. Items are (priority, name-key, item).
fn rank_and_cap(mut ranked: Vec<(u8, String, SearchResultItem)>) -> Vec<SearchResultItem> {
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    ranked
        .into_iter()
        .take(MAX_RESULTS_PER_KIND)
        .map(|(_, _, item)| item)
        .collect()
}

impl SearchService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Run the unified search. Empty and sub-minimum queries yield empty
    /// responses distinguished by message text, not errors.
    #[instrument(skip(self))]
    pub async fn search(&self, raw_query: &str) -> Result<SearchResponse, ServiceError> {
        let query = raw_query.trim();

        if query.is_empty() {
            return Ok(SearchResponse::empty(
                "Please provide a search query using ?q=your_query",
            ));
        }
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(SearchResponse::empty(
                "Search query must be at least 2 characters",
            ));
        }

        // Name maps for breadcrumb synthesis; the taxonomy is small.
        let sections: HashMap<i32, String> = section::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let brands: HashMap<i32, String> = brand::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();
        let categories: HashMap<i32, category::Model> = category::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let collection_names: HashMap<i32, String> = collection::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut results = Vec::new();
        results.extend(self.search_collections(query, &sections, &brands, &categories).await?);
        results.extend(
            self.search_products(query, &sections, &categories, &collection_names)
                .await?,
        );
        results.extend(self.search_categories(query, &sections, &brands).await?);
        results.extend(self.search_brands(query).await?);

        Ok(SearchResponse {
            total: results.len(),
            results,
            message: None,
        })
    }

    async fn search_collections(
        &self,
        query: &str,
        sections: &HashMap<i32, String>,
        brands: &HashMap<i32, String>,
        categories: &HashMap<i32, category::Model>,
    ) -> Result<Vec<SearchResultItem>, ServiceError> {
        let rows = collection::Entity::find()
            .filter(contains_filter(
                (collection::Entity, collection::Column::Name),
                (collection::Entity, collection::Column::Description),
                query,
            ))
            .all(&*self.db)
            .await?;

        let ranked = rows
            .into_iter()
            .map(|row| {
                let section_id = categories.get(&row.category_id).map(|c| c.section_id);
                let section_name = section_id
                    .and_then(|id| sections.get(&id))
                    .map(String::as_str)
                    .unwrap_or("?");
                let brand_name = brands
                    .get(&row.brand_id)
                    .map(String::as_str)
                    .unwrap_or("?");
                let breadcrumb = format!("{} > {} > {}", section_name, brand_name, row.name);

                (
                    match_priority(&row.name, query),
                    row.name.to_lowercase(),
                    SearchResultItem {
                        id: row.id,
                        name: row.name,
                        kind: SearchResultKind::Collection,
                        breadcrumb,
                        section_id,
                        brand_id: Some(row.brand_id),
                        category_id: Some(row.category_id),
                        collection_id: Some(row.id),
                        type_id: None,
                        slug: row.slug,
                        image: row.image_url,
                    },
                )
            })
            .collect();

        Ok(rank_and_cap(ranked))
    }

    async fn search_products(
        &self,
        query: &str,
        sections: &HashMap<i32, String>,
        categories: &HashMap<i32, category::Model>,
        collection_names: &HashMap<i32, String>,
    ) -> Result<Vec<SearchResultItem>, ServiceError> {
        let rows = product::Entity::find()
            .filter(contains_filter(
                (product::Entity, product::Column::Name),
                (product::Entity, product::Column::Description),
                query,
            ))
            .all(&*self.db)
            .await?;

        let ranked = rows
            .into_iter()
            .map(|row| {
                let section_name = sections
                    .get(&row.section_id)
                    .map(String::as_str)
                    .unwrap_or("?");
                let category_name = categories
                    .get(&row.category_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("?");
                let breadcrumb = match row.collection_id.and_then(|id| collection_names.get(&id)) {
                    Some(coll) => format!(
                        "{} > {} > {} > {}",
                        section_name, category_name, coll, row.name
                    ),
                    None => format!("{} > {} > {}", section_name, category_name, row.name),
                };

                (
                    match_priority(&row.name, query),
                    row.name.to_lowercase(),
                    SearchResultItem {
                        id: row.id,
                        name: row.name,
                        kind: SearchResultKind::Product,
                        breadcrumb,
                        section_id: Some(row.section_id),
                        brand_id: Some(row.brand_id),
                        category_id: Some(row.category_id),
                        collection_id: row.collection_id,
                        type_id: row.type_id,
                        slug: row.slug,
                        image: row.main_image_url,
                    },
                )
            })
            .collect();

        Ok(rank_and_cap(ranked))
    }

    async fn search_categories(
        &self,
        query: &str,
        sections: &HashMap<i32, String>,
        brands: &HashMap<i32, String>,
    ) -> Result<Vec<SearchResultItem>, ServiceError> {
        let rows = category::Entity::find()
            .filter(contains_filter(
                (category::Entity, category::Column::Name),
                (category::Entity, category::Column::Description),
                query,
            ))
            .all(&*self.db)
            .await?;

        let ranked = rows
            .into_iter()
            .map(|row| {
                let section_name = sections
                    .get(&row.section_id)
                    .map(String::as_str)
                    .unwrap_or("?");
                let brand_name = brands
                    .get(&row.brand_id)
                    .map(String::as_str)
                    .unwrap_or("?");
                let breadcrumb = format!("{} > {} > {}", section_name, brand_name, row.name);

                (
                    match_priority(&row.name, query),
                    row.name.to_lowercase(),
                    SearchResultItem {
                        id: row.id,
                        name: row.name,
                        kind: SearchResultKind::Category,
                        breadcrumb,
                        section_id: Some(row.section_id),
                        brand_id: Some(row.brand_id),
                        category_id: Some(row.id),
                        collection_id: None,
                        type_id: None,
                        slug: row.slug,
                        image: None,
                    },
                )
            })
            .collect();

        Ok(rank_and_cap(ranked))
    }

    async fn search_brands(&self, query: &str) -> Result<Vec<SearchResultItem>, ServiceError> {
        let rows = brand::Entity::find()
            .filter(contains_filter(
                (brand::Entity, brand::Column::Name),
                (brand::Entity, brand::Column::Description),
                query,
            ))
            .all(&*self.db)
            .await?;

        let ranked = rows
            .into_iter()
            .map(|row| {
                let breadcrumb = format!("Brands > {}", row.name);
                (
                    match_priority(&row.name, query),
                    row.name.to_lowercase(),
                    SearchResultItem {
                        id: row.id,
                        name: row.name,
                        kind: SearchResultKind::Brand,
                        breadcrumb,
                        section_id: None,
                        brand_id: Some(row.id),
                        category_id: None,
                        collection_id: None,
                        type_id: None,
                        slug: row.slug,
                        image: row.image_url,
                    },
                )
            })
            .collect();

        Ok(rank_and_cap(ranked))
    }
}

/// Case-insensitive substring condition on (name OR description), built as
/// `lower(col) LIKE %q%` so sqlite and postgres behave identically.
fn contains_filter<N, D>(name_col: N, description_col: D, query: &str) -> Condition
where
    N: sea_orm::sea_query::IntoColumnRef,
    D: sea_orm::sea_query::IntoColumnRef,
{
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    // Explicit ESCAPE: sqlite has no default escape character for LIKE.
    Condition::any()
        .add(
            Expr::expr(Func::lower(Expr::col(name_col)))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
        .add(
            Expr::expr(Func::lower(Expr::col(description_col)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
}

/// Escape LIKE wildcards in user input.
fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ranks_exact_prefix_contains_description() {
        assert_eq!(match_priority("Omega", "omega"), 1);
        assert_eq!(match_priority("Omega Deluxe", "omega"), 2);
        assert_eq!(match_priority("Grand Omega", "omega"), 3);
        // Name misses entirely; the row matched via description.
        assert_eq!(match_priority("Harmony", "omega"), 4);
    }

    #[test]
    fn priority_is_case_insensitive() {
        assert_eq!(match_priority("OMEGA", "Omega"), 1);
        assert_eq!(match_priority("omega deluxe", "OMEGA"), 2);
    }

    #[test]
    fn rank_and_cap_orders_by_priority_then_name() {
        let item = |id: i32, name: &str| SearchResultItem {
            id,
            name: name.to_string(),
            kind: SearchResultKind::Product,
            breadcrumb: String::new(),
            section_id: None,
            brand_id: None,
            category_id: None,
            collection_id: None,
            type_id: None,
            slug: String::new(),
            image: None,
        };

        let ranked = vec![
            (3, "zeta".to_string(), item(1, "Zeta")),
            (1, "omega".to_string(), item(2, "Omega")),
            (2, "omega deluxe".to_string(), item(3, "Omega Deluxe")),
            (2, "omega basic".to_string(), item(4, "Omega Basic")),
        ];

        let sorted = rank_and_cap(ranked);
        let ids: Vec<i32> = sorted.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }

    #[test]
    fn rank_and_cap_limits_to_ten() {
        let ranked: Vec<(u8, String, SearchResultItem)> = (0..25)
            .map(|i| {
                (
                    3,
                    format!("name-{:02}", i),
                    SearchResultItem {
                        id: i,
                        name: format!("name-{:02}", i),
                        kind: SearchResultKind::Brand,
                        breadcrumb: String::new(),
                        section_id: None,
                        brand_id: None,
                        category_id: None,
                        collection_id: None,
                        type_id: None,
                        slug: String::new(),
                        image: None,
                    },
                )
            })
            .collect();

        assert_eq!(rank_and_cap(ranked).len(), MAX_RESULTS_PER_KIND);
    }

    #[test]
    fn like_escaping() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
    }

    #[test]
    fn kind_serializes_as_type_field() {
        let item = SearchResultItem {
            id: 1,
            name: "Omega".to_string(),
            kind: SearchResultKind::Collection,
            breadcrumb: "Bath > Lamis > Omega".to_string(),
            section_id: Some(1),
            brand_id: Some(2),
            category_id: Some(3),
            collection_id: Some(1),
            type_id: None,
            slug: "omega".to_string(),
            image: None,
        };

        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["type"], "collection");
        assert_eq!(json["breadcrumb"], "Bath > Lamis > Omega");
    }
}
