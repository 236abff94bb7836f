use sea_orm::entity::prelude::*;

/// One line per `(cart_id, product_id)`; the migration adds the composite
/// unique index backing the per-line upsert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub cart_id: i32,

    /// Client-visible product id. Stored as opaque text, never validated
    /// against the catalog.
    pub product_id: String,

    pub qty: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
