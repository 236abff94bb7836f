use serde::Serialize;

use crate::db::{Cart, CartLine};
use crate::entities::products;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

impl From<products::Model> for ProductDto {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            price: model.price,
            description: model.description,
            image: model.image,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub product_id: String,
    pub qty: i32,
}

impl From<CartLine> for CartLineDto {
    fn from(line: CartLine) -> Self {
        Self {
            product_id: line.product_id,
            qty: line.qty,
        }
    }
}

/// The cart document as rendered to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<CartLineDto>,
    pub created_at: String,
}

impl From<Cart> for CartDto {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            items: cart.items.into_iter().map(CartLineDto::from).collect(),
            created_at: cart.created_at,
        }
    }
}

/// `{success, cart}` envelope returned by every cart mutation.
#[derive(Debug, Serialize)]
pub struct CartMutationResponse {
    pub success: bool,
    pub cart: CartDto,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
}

/// An order line, enriched with catalog metadata when the product id still
/// resolves. Unresolvable lines keep only the stored fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDto {
    pub product_id: String,
    pub qty: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<OrderLineDto>,
    pub total: f64,
    pub created_at: String,
}
