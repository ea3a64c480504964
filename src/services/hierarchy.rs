use crate::{
    entities::{category, collection, product, product_type, section},
    errors::ServiceError,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Resolves slug paths of the form `/{section}/{category}[/{item}]` and
/// builds the full navigation tree.
///
/// A category slug is unique per (section, brand), so one URL segment may
/// match several category rows, the same logical category across brands.
/// Resolution gathers children across all matched rows and reports the
/// lowest-id row as the display category.
#[derive(Clone)]
pub struct HierarchyService {
    db: Arc<DatabaseConnection>,
}

/// Two-segment resolution: a category page listing its collections and types.
#[derive(Debug, Serialize)]
pub struct CategoryListing {
    pub section: section::Model,
    pub category: category::Model,
    pub collections: Vec<collection::Model>,
    pub types: Vec<product_type::Model>,
}

/// Three-segment resolution: exactly one of `collection` / `product_type`
/// is set, plus the products filtered to it.
#[derive(Debug, Serialize)]
pub struct ResolvedItem {
    pub section: section::Model,
    pub category: category::Model,
    pub collection: Option<collection::Model>,
    #[serde(rename = "type")]
    pub product_type: Option<product_type::Model>,
    pub products: Vec<product::Model>,
}

/// One section's worth of navigation: section page payload.
#[derive(Debug, Serialize)]
pub struct SectionListing {
    pub section: section::Model,
    pub categories: Vec<category::Model>,
}

#[derive(Debug, Serialize)]
pub struct CatalogTree {
    pub sections: Vec<SectionNode>,
}

#[derive(Debug, Serialize)]
pub struct SectionNode {
    pub section: section::Model,
    pub categories: Vec<CategoryNode>,
}

#[derive(Debug, Serialize)]
pub struct CategoryNode {
    pub category: category::Model,
    pub collections: Vec<collection::Model>,
    pub types: Vec<product_type::Model>,
}

impl HierarchyService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_section(&self, section_slug: &str) -> Result<section::Model, ServiceError> {
        section::Entity::find()
            .filter(section::Column::Slug.eq(section_slug))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Section '{}' not found", section_slug)))
    }

    /// All category rows matching (section, slug), lowest id first.
    async fn find_categories(
        &self,
        section_id: i32,
        category_slug: &str,
    ) -> Result<Vec<category::Model>, ServiceError> {
        let categories = category::Entity::find()
            .filter(category::Column::SectionId.eq(section_id))
            .filter(category::Column::Slug.eq(category_slug))
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await?;

        if categories.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "Category '{}' not found under this section",
                category_slug
            )));
        }
        Ok(categories)
    }

    /// Section page: the section plus its categories, same-named rows
    /// collapsed to one entry for navigation.
    #[instrument(skip(self))]
    pub async fn section_listing(&self, section_slug: &str) -> Result<SectionListing, ServiceError> {
        let section = self.find_section(section_slug).await?;

        let categories = category::Entity::find()
            .filter(category::Column::SectionId.eq(section.id))
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(SectionListing {
            section,
            categories: dedupe_by_name(categories),
        })
    }

    /// Category page: collections and types across every brand's row of
    /// this category. `EmptyTaxonomy` (not `NotFound`) when the category
    /// exists but has no children.
    #[instrument(skip(self))]
    pub async fn category_listing(
        &self,
        section_slug: &str,
        category_slug: &str,
    ) -> Result<CategoryListing, ServiceError> {
        let section = self.find_section(section_slug).await?;
        let categories = self.find_categories(section.id, category_slug).await?;
        let category_ids: Vec<i32> = categories.iter().map(|c| c.id).collect();

        let collections = collection::Entity::find()
            .filter(collection::Column::CategoryId.is_in(category_ids.clone()))
            .order_by_asc(collection::Column::Name)
            .all(&*self.db)
            .await?;

        let types = product_type::Entity::find()
            .filter(product_type::Column::CategoryId.is_in(category_ids))
            .order_by_asc(product_type::Column::Name)
            .all(&*self.db)
            .await?;

        if collections.is_empty() && types.is_empty() {
            return Err(ServiceError::EmptyTaxonomy(format!(
                "Category '{}' has no collections or types under this section",
                category_slug
            )));
        }

        // find_categories guarantees at least one row.
        let category = categories
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InternalError("category set became empty".into()))?;
        Ok(CategoryListing {
            section,
            category,
            collections,
            types,
        })
    }

    /// Item page: the third segment denotes a Collection or a Type.
    ///
    /// Collections take priority over Types on slug collision, a deliberate
    /// tie-break. Products are filtered to exactly one of
    /// the two axes, never both.
    #[instrument(skip(self))]
    pub async fn resolve_item(
        &self,
        section_slug: &str,
        category_slug: &str,
        item_slug: &str,
    ) -> Result<ResolvedItem, ServiceError> {
        let section = self.find_section(section_slug).await?;
        let categories = self.find_categories(section.id, category_slug).await?;
        let category_ids: Vec<i32> = categories.iter().map(|c| c.id).collect();
        let category_by_id: HashMap<i32, category::Model> =
            categories.into_iter().map(|c| (c.id, c)).collect();

        if let Some(found) = collection::Entity::find()
            .filter(collection::Column::CategoryId.is_in(category_ids.clone()))
            .filter(collection::Column::Slug.eq(item_slug))
            .order_by_asc(collection::Column::Id)
            .one(&*self.db)
            .await?
        {
            let products = product::Entity::find()
                .filter(product::Column::SectionId.eq(section.id))
                .filter(product::Column::CategoryId.eq(found.category_id))
                .filter(product::Column::CollectionId.eq(found.id))
                .order_by_asc(product::Column::Name)
                .all(&*self.db)
                .await?;

            let category = category_by_id
                .get(&found.category_id)
                .cloned()
                .ok_or_else(|| {
                    ServiceError::InternalError("Collection references an unmatched category".into())
                })?;

            return Ok(ResolvedItem {
                section,
                category,
                collection: Some(found),
                product_type: None,
                products,
            });
        }

        if let Some(found) = product_type::Entity::find()
            .filter(product_type::Column::CategoryId.is_in(category_ids))
            .filter(product_type::Column::Slug.eq(item_slug))
            .order_by_asc(product_type::Column::Id)
            .one(&*self.db)
            .await?
        {
            let products = product::Entity::find()
                .filter(product::Column::SectionId.eq(section.id))
                .filter(product::Column::CategoryId.eq(found.category_id))
                .filter(product::Column::TypeId.eq(found.id))
                .order_by_asc(product::Column::Name)
                .all(&*self.db)
                .await?;

            let category = category_by_id
                .get(&found.category_id)
                .cloned()
                .ok_or_else(|| {
                    ServiceError::InternalError("Type references an unmatched category".into())
                })?;

            return Ok(ResolvedItem {
                section,
                category,
                collection: None,
                product_type: Some(found),
                products,
            });
        }

        Err(ServiceError::NotFound(format!(
            "No collection or type '{}' under this section and category",
            item_slug
        )))
    }

    /// Full navigation tree for menus and sitemaps.
    ///
    /// Per section: the distinct set of category ids referenced by any
    /// collection or type within it (set union), each with its collections
    /// and types attached. Same-named category rows merge into one node;
    /// the rows stay distinct per brand in storage.
    #[instrument(skip(self))]
    pub async fn build_catalog_tree(&self) -> Result<CatalogTree, ServiceError> {
        let sections = section::Entity::find()
            .order_by_asc(section::Column::Name)
            .all(&*self.db)
            .await?;
        let categories = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await?;
        let collections = collection::Entity::find()
            .order_by_asc(collection::Column::Name)
            .all(&*self.db)
            .await?;
        let types = product_type::Entity::find()
            .order_by_asc(product_type::Column::Name)
            .all(&*self.db)
            .await?;

        let mut collections_by_category: HashMap<i32, Vec<collection::Model>> = HashMap::new();
        for c in collections {
            collections_by_category.entry(c.category_id).or_default().push(c);
        }
        let mut types_by_category: HashMap<i32, Vec<product_type::Model>> = HashMap::new();
        for t in types {
            types_by_category.entry(t.category_id).or_default().push(t);
        }

        let mut section_nodes = Vec::with_capacity(sections.len());
        for sec in sections {
            // Union of categories referenced by any collection or type.
            let referenced: Vec<&category::Model> = categories
                .iter()
                .filter(|c| c.section_id == sec.id)
                .filter(|c| {
                    collections_by_category.contains_key(&c.id)
                        || types_by_category.contains_key(&c.id)
                })
                .collect();

            // Merge same-named rows (one per brand) into a single node.
            let mut nodes: Vec<CategoryNode> = Vec::new();
            let mut index_by_name: HashMap<String, usize> = HashMap::new();
            for cat in referenced {
                let colls = collections_by_category
                    .get(&cat.id)
                    .cloned()
                    .unwrap_or_default();
                let tys = types_by_category.get(&cat.id).cloned().unwrap_or_default();

                match index_by_name.get(&cat.name) {
                    Some(&i) => {
                        nodes[i].collections.extend(colls);
                        nodes[i].types.extend(tys);
                    }
                    None => {
                        index_by_name.insert(cat.name.clone(), nodes.len());
                        nodes.push(CategoryNode {
                            category: cat.clone(),
                            collections: colls,
                            types: tys,
                        });
                    }
                }
            }

            section_nodes.push(SectionNode {
                section: sec,
                categories: nodes,
            });
        }

        Ok(CatalogTree {
            sections: section_nodes,
        })
    }
}

/// Collapse same-named rows to the first occurrence. The input must already
/// be ordered (name, id) so the lowest-id row represents each name.
pub fn dedupe_by_name(categories: Vec<category::Model>) -> Vec<category::Model> {
    let mut seen = std::collections::HashSet::new();
    categories
        .into_iter()
        .filter(|c| seen.insert(c.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cat(id: i32, brand_id: i32, name: &str) -> category::Model {
        category::Model {
            id,
            section_id: 1,
            brand_id,
            name: name.to_string(),
            slug: crate::slug::slugify(name),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn dedupe_keeps_first_row_per_name() {
        let rows = vec![cat(1, 1, "Mirrors"), cat(4, 2, "Mirrors"), cat(2, 1, "Taps")];
        let deduped = dedupe_by_name(rows);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, 1);
        assert_eq!(deduped[0].name, "Mirrors");
        assert_eq!(deduped[1].name, "Taps");
    }

    #[test]
    fn dedupe_is_noop_for_distinct_names() {
        let rows = vec![cat(1, 1, "Mirrors"), cat(2, 1, "Taps")];
        assert_eq!(dedupe_by_name(rows).len(), 2);
    }
}
