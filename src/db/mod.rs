use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::cart::{Cart, CartLine};
pub use repositories::order::{Order, OrderLine};
pub use repositories::session::Session;
pub use repositories::user::User;

use crate::catalog;
use crate::config::{Config, SecurityConfig};
use crate::entities::products;

/// Shared persistence handle. Opened once at startup, cloned into the app
/// state, closed when the process exits.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn cart_repo(&self) -> repositories::cart::CartRepository {
        repositories::cart::CartRepository::new(self.conn.clone())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn order_repo(&self) -> repositories::order::OrderRepository {
        repositories::order::OrderRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, security)
            .await
    }

    pub async fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo().exists(username, email).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_login(username, email, password).await
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    pub async fn create_session(&self, user_id: i32, ttl_hours: i64) -> Result<String> {
        self.session_repo().create(user_id, ttl_hours).await
    }

    pub async fn find_valid_session(&self, token: &str) -> Result<Option<Session>> {
        self.session_repo().find_valid(token).await
    }

    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        self.session_repo().delete(token).await
    }

    pub async fn delete_expired_sessions(&self) -> Result<u64> {
        self.session_repo().delete_expired().await
    }

    // ========================================================================
    // Carts
    // ========================================================================

    pub async fn get_or_create_cart(&self, user_id: i32) -> Result<Cart> {
        self.cart_repo().get_or_create(user_id).await
    }

    pub async fn add_cart_item(&self, user_id: i32, product_id: &str, qty: i32) -> Result<Cart> {
        self.cart_repo().add_item(user_id, product_id, qty).await
    }

    pub async fn remove_cart_item(&self, user_id: i32, product_id: &str) -> Result<Cart> {
        self.cart_repo().remove_item(user_id, product_id).await
    }

    pub async fn clear_cart(&self, user_id: i32) -> Result<()> {
        self.cart_repo().clear(user_id).await
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub async fn list_products(&self) -> Result<Vec<products::Model>> {
        self.product_repo().list().await
    }

    pub async fn get_products_by_ids(&self, ids: &[String]) -> Result<Vec<products::Model>> {
        self.product_repo().get_many(ids).await
    }

    /// Seed the catalog on startup if it is empty: config `[[catalog]]`
    /// entries when present, the built-in default set otherwise.
    pub async fn initialize_catalog(&self, config: &Config) -> Result<()> {
        let repo = self.product_repo();
        if repo.count().await? > 0 {
            return Ok(());
        }

        let seeds = if config.catalog.is_empty() {
            catalog::default_products()
        } else {
            config.catalog.clone()
        };
        repo.seed(&seeds).await?;

        Ok(())
    }

    /// CLI seeding. With `force`, existing products are dropped first;
    /// otherwise already-present ids are skipped.
    pub async fn seed_catalog(&self, config: &Config, force: bool) -> Result<u64> {
        let repo = self.product_repo();
        if force {
            repo.delete_all().await?;
        }

        let seeds = if config.catalog.is_empty() {
            catalog::default_products()
        } else {
            config.catalog.clone()
        };
        repo.seed(&seeds).await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    pub async fn create_order(&self, user_id: i32, cart: &Cart, total: f64) -> Result<i32> {
        self.order_repo().create_from_cart(user_id, cart, total).await
    }

    pub async fn list_orders(&self, user_id: i32) -> Result<Vec<Order>> {
        self.order_repo().list_for_user(user_id).await
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Delete every row from every table, keeping the schema. Counterpart of
    /// the original deployment's database reset script.
    pub async fn reset(&self) -> Result<()> {
        use crate::entities::prelude::*;

        OrderItems::delete_many().exec(&self.conn).await?;
        Orders::delete_many().exec(&self.conn).await?;
        CartItems::delete_many().exec(&self.conn).await?;
        Carts::delete_many().exec(&self.conn).await?;
        Sessions::delete_many().exec(&self.conn).await?;
        Users::delete_many().exec(&self.conn).await?;
        Products::delete_many().exec(&self.conn).await?;

        info!("All store tables cleared");
        Ok(())
    }
}
