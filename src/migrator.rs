//! In-crate migrations defining the catalog schema.
//!
//! Slug uniqueness is scoped to the nearest governing parent: global for
//! sections, brands and products; (section, brand) for categories;
//! (brand, category) for collections; category for types. Deletion follows
//! the ownership direction: category deletion cascades through types and
//! products, collection deletion merely detaches its products.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_sections_table::Migration),
            Box::new(m20240101_000002_create_brands_table::Migration),
            Box::new(m20240101_000003_create_categories_table::Migration),
            Box::new(m20240101_000004_create_collections_table::Migration),
            Box::new(m20240101_000005_create_types_table::Migration),
            Box::new(m20240101_000006_create_colors_table::Migration),
            Box::new(m20240101_000007_create_products_table::Migration),
            Box::new(m20240101_000008_create_product_images_table::Migration),
        ]
    }
}

mod m20240101_000001_create_sections_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_sections_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Sections::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Sections::Name).string().not_null())
                        .col(
                            ColumnDef::new(Sections::Slug)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Sections::Description).text())
                        .col(
                            ColumnDef::new(Sections::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sections::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Sections {
        Table,
        Id,
        Name,
        Slug,
        Description,
        CreatedAt,
    }
}

mod m20240101_000002_create_brands_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_brands_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Brands::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Brands::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Brands::Name).string().not_null())
                        .col(
                            ColumnDef::new(Brands::Slug)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Brands::Description).text())
                        .col(ColumnDef::new(Brands::ImageUrl).string())
                        .col(
                            ColumnDef::new(Brands::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Brands::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Brands {
        Table,
        Id,
        Name,
        Slug,
        Description,
        ImageUrl,
        CreatedAt,
    }
}

mod m20240101_000003_create_categories_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Categories::SectionId).integer().not_null())
                        .col(ColumnDef::new(Categories::BrandId).integer().not_null())
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::Slug).string().not_null())
                        .col(ColumnDef::new(Categories::Description).text())
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_section")
                                .from(Categories::Table, Categories::SectionId)
                                .to(Sections::Table, Sections::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_brand")
                                .from(Categories::Table, Categories::BrandId)
                                .to(Brands::Table, Brands::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Slug unique within (section, brand).
            manager
                .create_index(
                    Index::create()
                        .name("uq_categories_section_brand_slug")
                        .table(Categories::Table)
                        .col(Categories::SectionId)
                        .col(Categories::BrandId)
                        .col(Categories::Slug)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Categories {
        Table,
        Id,
        SectionId,
        BrandId,
        Name,
        Slug,
        Description,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Sections {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Brands {
        Table,
        Id,
    }
}

mod m20240101_000004_create_collections_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_collections_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Collections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Collections::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Collections::BrandId).integer().not_null())
                        .col(ColumnDef::new(Collections::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Collections::Name).string().not_null())
                        .col(ColumnDef::new(Collections::Slug).string().not_null())
                        .col(ColumnDef::new(Collections::Description).text())
                        .col(ColumnDef::new(Collections::ImageUrl).string())
                        .col(
                            ColumnDef::new(Collections::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_collections_brand")
                                .from(Collections::Table, Collections::BrandId)
                                .to(Brands::Table, Brands::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_collections_category")
                                .from(Collections::Table, Collections::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Slug unique within (brand, category). A Type under the same
            // category may legitimately carry the same slug string.
            manager
                .create_index(
                    Index::create()
                        .name("uq_collections_brand_category_slug")
                        .table(Collections::Table)
                        .col(Collections::BrandId)
                        .col(Collections::CategoryId)
                        .col(Collections::Slug)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Collections::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Collections {
        Table,
        Id,
        BrandId,
        CategoryId,
        Name,
        Slug,
        Description,
        ImageUrl,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Brands {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Categories {
        Table,
        Id,
    }
}

mod m20240101_000005_create_types_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Types::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Types::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Types::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Types::Name).string().not_null())
                        .col(ColumnDef::new(Types::Slug).string().not_null())
                        .col(ColumnDef::new(Types::Description).text())
                        .col(
                            ColumnDef::new(Types::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_types_category")
                                .from(Types::Table, Types::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_types_category_slug")
                        .table(Types::Table)
                        .col(Types::CategoryId)
                        .col(Types::Slug)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Types::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Types {
        Table,
        Id,
        CategoryId,
        Name,
        Slug,
        Description,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Categories {
        Table,
        Id,
    }
}

mod m20240101_000006_create_colors_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_colors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Colors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Colors::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Colors::Name).string().not_null())
                        .col(ColumnDef::new(Colors::HexValue).string())
                        .col(ColumnDef::new(Colors::TextureImageUrl).string())
                        .col(
                            ColumnDef::new(Colors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Colors::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Colors {
        Table,
        Id,
        Name,
        HexValue,
        TextureImageUrl,
        CreatedAt,
    }
}

mod m20240101_000007_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(
                            ColumnDef::new(Products::Slug)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Products::Description).text())
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::SectionId).integer().not_null())
                        .col(ColumnDef::new(Products::BrandId).integer().not_null())
                        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Products::CollectionId).integer())
                        .col(ColumnDef::new(Products::TypeId).integer())
                        .col(ColumnDef::new(Products::ColorId).integer())
                        .col(ColumnDef::new(Products::ColorGroup).string())
                        .col(ColumnDef::new(Products::MainImageUrl).string())
                        .col(ColumnDef::new(Products::HoverImageUrl).string())
                        .col(
                            ColumnDef::new(Products::IsNew)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::IsOnSale)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_section")
                                .from(Products::Table, Products::SectionId)
                                .to(Sections::Table, Sections::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_brand")
                                .from(Products::Table, Products::BrandId)
                                .to(Brands::Table, Brands::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_collection")
                                .from(Products::Table, Products::CollectionId)
                                .to(Collections::Table, Collections::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_type")
                                .from(Products::Table, Products::TypeId)
                                .to(Types::Table, Types::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_color")
                                .from(Products::Table, Products::ColorId)
                                .to(Colors::Table, Colors::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_products_taxonomy")
                        .table(Products::Table)
                        .col(Products::SectionId)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await?;

            // Sibling-variation lookups scan by token.
            manager
                .create_index(
                    Index::create()
                        .name("idx_products_color_group")
                        .table(Products::Table)
                        .col(Products::ColorGroup)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Products {
        Table,
        Id,
        Name,
        Slug,
        Description,
        Price,
        SectionId,
        BrandId,
        CategoryId,
        CollectionId,
        TypeId,
        ColorId,
        ColorGroup,
        MainImageUrl,
        HoverImageUrl,
        IsNew,
        IsOnSale,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Sections {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Brands {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Categories {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Collections {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Types {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Colors {
        Table,
        Id,
    }
}

mod m20240101_000008_create_product_images_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_product_images_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductImages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductImages::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ProductImages::ProductId).integer().not_null())
                        .col(ColumnDef::new(ProductImages::Url).string().not_null())
                        .col(
                            ColumnDef::new(ProductImages::Role)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductImages::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ProductImages::AltText).string())
                        .col(
                            ColumnDef::new(ProductImages::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_images_product")
                                .from(ProductImages::Table, ProductImages::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_product_images_product_role")
                        .table(ProductImages::Table)
                        .col(ProductImages::ProductId)
                        .col(ProductImages::Role)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductImages::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum ProductImages {
        Table,
        Id,
        ProductId,
        Url,
        Role,
        SortOrder,
        AltText,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Products {
        Table,
        Id,
    }
}
