use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::{cart_items, carts};

/// A cart line: opaque product id plus quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: String,
    pub qty: i32,
}

/// A user's cart with its lines in insertion order.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<CartLine>,
    pub created_at: String,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct CartRepository {
    conn: DatabaseConnection,
}

impl CartRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fetch the user's cart, creating an empty one on first access.
    ///
    /// `carts.user_id` is unique, so two concurrent first accesses cannot
    /// leave two carts behind: the losing insert hits the conflict clause
    /// and the winner's row is re-read.
    pub async fn get_or_create(&self, user_id: i32) -> Result<Cart> {
        if let Some(cart) = self.find_by_user(user_id).await? {
            return self.load(cart).await;
        }

        let active = carts::ActiveModel {
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        carts::Entity::insert(active)
            .on_conflict(
                OnConflict::column(carts::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert cart")?;

        let cart = self
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Cart missing after insert for user {user_id}"))?;

        self.load(cart).await
    }

    /// Add `qty` of a product, accumulating into an existing line.
    ///
    /// The increment is a single upsert statement
    /// (`ON CONFLICT (cart_id, product_id) DO UPDATE qty = qty + ?`), so
    /// concurrent adds for the same product accumulate instead of racing a
    /// read-modify-write of the whole item list.
    pub async fn add_item(&self, user_id: i32, product_id: &str, qty: i32) -> Result<Cart> {
        let cart = self.get_or_create(user_id).await?;

        let active = cart_items::ActiveModel {
            cart_id: Set(cart.id),
            product_id: Set(product_id.to_string()),
            qty: Set(qty),
            ..Default::default()
        };

        cart_items::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([cart_items::Column::CartId, cart_items::Column::ProductId])
                    .value(
                        cart_items::Column::Qty,
                        Expr::col(cart_items::Column::Qty).add(qty),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to upsert cart line")?;

        self.get_or_create(user_id).await
    }

    /// Drop the line matching `product_id`. Removing a product that is not
    /// in the cart is a no-op success.
    pub async fn remove_item(&self, user_id: i32, product_id: &str) -> Result<Cart> {
        let cart = self.get_or_create(user_id).await?;

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete cart line")?;

        self.get_or_create(user_id).await
    }

    /// Empty the cart. The cart row itself is kept.
    pub async fn clear(&self, user_id: i32) -> Result<()> {
        let Some(cart) = self.find_by_user(user_id).await? else {
            return Ok(());
        };

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&self.conn)
            .await
            .context("Failed to clear cart")?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Option<carts::Model>> {
        carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query cart by user")
    }

    async fn load(&self, cart: carts::Model) -> Result<Cart> {
        let items = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .order_by_asc(cart_items::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load cart lines")?;

        Ok(Cart {
            id: cart.id,
            user_id: cart.user_id,
            items: items
                .into_iter()
                .map(|i| CartLine {
                    product_id: i.product_id,
                    qty: i.qty,
                })
                .collect(),
            created_at: cart.created_at,
        })
    }
}
