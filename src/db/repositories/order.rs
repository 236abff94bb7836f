use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::cart::Cart;
use crate::entities::{cart_items, order_items, orders};

/// A snapshotted order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: String,
    pub qty: i32,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<OrderLine>,
    pub total: f64,
    pub created_at: String,
}

pub struct OrderRepository {
    conn: DatabaseConnection,
}

impl OrderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Snapshot the cart into a new order and clear the cart.
    ///
    /// Both writes run in one transaction, so a crash mid-checkout can no
    /// longer leave an order behind with a still-full cart.
    pub async fn create_from_cart(&self, user_id: i32, cart: &Cart, total: f64) -> Result<i32> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open checkout transaction")?;

        let order = orders::ActiveModel {
            user_id: Set(user_id),
            total: Set(total),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = orders::Entity::insert(order)
            .exec(&txn)
            .await
            .context("Failed to insert order")?;
        let order_id = res.last_insert_id;

        for line in &cart.items {
            let item = order_items::ActiveModel {
                order_id: Set(order_id),
                product_id: Set(line.product_id.clone()),
                qty: Set(line.qty),
                ..Default::default()
            };

            order_items::Entity::insert(item)
                .exec(&txn)
                .await
                .context("Failed to insert order line")?;
        }

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await
            .context("Failed to clear cart after checkout")?;

        txn.commit()
            .await
            .context("Failed to commit checkout transaction")?;

        Ok(order_id)
    }

    /// All orders for a user, newest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Order>> {
        let rows = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list orders")?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let items = order_items::Entity::find()
                .filter(order_items::Column::OrderId.eq(row.id))
                .order_by_asc(order_items::Column::Id)
                .all(&self.conn)
                .await
                .context("Failed to load order lines")?;

            result.push(Order {
                id: row.id,
                user_id: row.user_id,
                items: items
                    .into_iter()
                    .map(|i| OrderLine {
                        product_id: i.product_id,
                        qty: i.qty,
                    })
                    .collect(),
                total: row.total,
                created_at: row.created_at,
            });
        }

        Ok(result)
    }
}
