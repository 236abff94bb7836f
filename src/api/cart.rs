use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, AppState, CartDto, CartMutationResponse, StatusResponse};
use crate::api::validation::{validate_cart_add, validate_product_id};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: Option<String>,
    pub qty: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub product_id: Option<String>,
}

/// GET /api/cart
/// The user's cart, created empty on first access.
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CartDto>, ApiError> {
    let cart = state
        .store()
        .get_or_create_cart(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load cart: {e}")))?;

    Ok(Json(cart.into()))
}

/// POST /api/cart/add
/// Add quantity to an existing line or append a new one.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<CartMutationResponse>, ApiError> {
    let (product_id, qty) = validate_cart_add(payload.product_id.as_deref(), payload.qty)?;

    let cart = state
        .store()
        .add_cart_item(user.id, &product_id, qty)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to add cart line: {e}")))?;

    Ok(Json(CartMutationResponse {
        success: true,
        cart: cart.into(),
    }))
}

/// POST /api/cart/remove
/// Drop the line for a product. Unknown products are a no-op success.
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<RemoveItemRequest>,
) -> Result<Json<CartMutationResponse>, ApiError> {
    let product_id = validate_product_id(payload.product_id.as_deref())?;

    let cart = state
        .store()
        .remove_cart_item(user.id, &product_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to remove cart line: {e}")))?;

    Ok(Json(CartMutationResponse {
        success: true,
        cart: cart.into(),
    }))
}

/// POST /api/cart/clear
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .store()
        .clear_cart(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear cart: {e}")))?;

    Ok(Json(StatusResponse { success: true }))
}
