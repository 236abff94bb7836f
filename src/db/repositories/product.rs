use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tracing::info;

use crate::catalog::ProductSeed;
use crate::entities::products;

/// Repository for the read-only product catalog.
pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All products, in storage order.
    pub async fn list(&self) -> Result<Vec<products::Model>> {
        products::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list products")
    }

    /// Batch lookup for order-history enrichment.
    pub async fn get_many(&self, ids: &[String]) -> Result<Vec<products::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        products::Entity::find()
            .filter(products::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.conn)
            .await
            .context("Failed to query products by id")
    }

    pub async fn count(&self) -> Result<u64> {
        products::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count products")
    }

    /// Insert seed rows, skipping ids that already exist.
    /// Returns the number of products actually inserted.
    pub async fn seed(&self, seeds: &[ProductSeed]) -> Result<u64> {
        let mut inserted = 0;

        for product in seeds {
            let active = products::ActiveModel {
                id: Set(product.id.clone()),
                name: Set(product.name.clone()),
                category: Set(product.category.clone()),
                price: Set(product.price),
                description: Set(product.description.clone()),
                image: Set(product.image.clone()),
            };

            inserted += products::Entity::insert(active)
                .on_conflict(
                    OnConflict::column(products::Column::Id)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await
                .with_context(|| format!("Failed to seed product {}", product.id))?;
        }

        if inserted > 0 {
            info!("Seeded {} catalog products", inserted);
        }

        Ok(inserted)
    }

    /// Remove every product. Used by forced re-seeding.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = products::Entity::delete_many()
            .exec(&self.conn)
            .await
            .context("Failed to delete products")?;

        Ok(result.rows_affected)
    }
}
