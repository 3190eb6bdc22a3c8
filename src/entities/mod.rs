pub mod category;
pub mod customer;
pub mod product;
pub mod product_image;
pub mod product_inventory;
pub mod product_review;
pub mod product_tag;
pub mod tag;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityName};
use tracing::info;

/// Idempotent DDL for the catalog. Hand-written because the category tree needs
/// the `ltree` extension and a GiST index, neither of which the entity-derived
/// schema can express.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        "CREATE EXTENSION IF NOT EXISTS ltree".to_string(),
        format!(
            "CREATE TABLE IF NOT EXISTS {category} (
                id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                name varchar(50) NOT NULL,
                deactivated boolean NOT NULL DEFAULT false,
                hierarchy ltree NOT NULL
            )",
            category = category::Entity.table_name(),
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS ix_categories_hierarchy ON {category} USING gist (hierarchy)",
            category = category::Entity.table_name(),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {tag} (
                id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                name varchar(50) NOT NULL UNIQUE,
                group_id uuid REFERENCES {tag} (id) ON DELETE SET NULL
            )",
            tag = tag::Entity.table_name(),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {product} (
                id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                name varchar(50) NOT NULL,
                description text,
                is_active boolean NOT NULL DEFAULT true,
                made_in varchar(50),
                created_at timestamptz NOT NULL DEFAULT CURRENT_TIMESTAMP,
                category_id uuid NOT NULL REFERENCES {category} (id) ON DELETE CASCADE
            )",
            product = product::Entity.table_name(),
            category = category::Entity.table_name(),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {product_tag} (
                product_id uuid REFERENCES {product} (id) ON DELETE CASCADE,
                tag_id uuid REFERENCES {tag} (id) ON DELETE CASCADE,
                PRIMARY KEY (product_id, tag_id)
            )",
            product_tag = product_tag::Entity.table_name(),
            product = product::Entity.table_name(),
            tag = tag::Entity.table_name(),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {inventory} (
                id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                quantity integer NOT NULL DEFAULT 0,
                unit_price numeric(7, 3) NOT NULL,
                discount double precision,
                meta jsonb,
                product_id uuid NOT NULL REFERENCES {product} (id) ON DELETE CASCADE
            )",
            inventory = product_inventory::Entity.table_name(),
            product = product::Entity.table_name(),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {image} (
                id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                image varchar(100) NOT NULL,
                product_id uuid NOT NULL REFERENCES {product} (id) ON DELETE CASCADE
            )",
            image = product_image::Entity.table_name(),
            product = product::Entity.table_name(),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {customer} (
                id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                email varchar(50) NOT NULL UNIQUE,
                fullname varchar(100) NOT NULL
            )",
            customer = customer::Entity.table_name(),
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {review} (
                id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                comment text,
                rating double precision NOT NULL DEFAULT 0,
                created_at timestamptz NOT NULL DEFAULT CURRENT_TIMESTAMP,
                product_id uuid NOT NULL REFERENCES {product} (id) ON DELETE CASCADE,
                customer_id uuid NOT NULL REFERENCES {customer} (id) ON DELETE CASCADE
            )",
            review = product_review::Entity.table_name(),
            product = product::Entity.table_name(),
            customer = customer::Entity.table_name(),
        ),
    ];

    for statement in statements {
        db.execute_unprepared(&statement).await?;
    }
    info!("Catalog schema is in place");

    Ok(())
}
