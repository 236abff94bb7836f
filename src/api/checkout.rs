use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::auth::CurrentUser;
use super::{ApiError, AppState};
use crate::db::CartLine;

/// Pricing is supplied by the caller, keyed by product id. This mirrors the
/// documented contract; it is also its known trust-boundary defect — the
/// server never cross-checks the asserted prices against the catalog.
#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub pricing: Option<HashMap<String, f64>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: i32,
    pub total: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Missing pricing information")]
    MissingPricing,

    #[error("Missing price for product {0}")]
    MissingPrice(String),
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

/// Price the cart: Σ price × qty, left to right in line order. Every line
/// must be present in the pricing map.
pub fn compute_total(
    items: &[CartLine],
    pricing: &HashMap<String, f64>,
) -> Result<f64, CheckoutError> {
    let mut total = 0.0;

    for item in items {
        let price = pricing
            .get(&item.product_id)
            .ok_or_else(|| CheckoutError::MissingPrice(item.product_id.clone()))?;

        total += price * f64::from(item.qty);
    }

    Ok(total)
}

/// POST /api/checkout
/// Snapshot the cart into an order and clear it, in one transaction.
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let cart = state
        .store()
        .get_or_create_cart(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load cart: {e}")))?;

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart.into());
    }

    let Some(pricing) = payload.pricing else {
        return Err(CheckoutError::MissingPricing.into());
    };

    let total = compute_total(&cart.items, &pricing)?;

    let order_id = state
        .store()
        .create_order(user.id, &cart, total)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create order: {e}")))?;

    tracing::info!(order_id, total, "Checkout completed for user {}", user.id);

    Ok(Json(CheckoutResponse {
        success: true,
        order_id,
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, qty: i32) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            qty,
        }
    }

    #[test]
    fn test_compute_total_sums_in_line_order() {
        let items = vec![line("a", 2), line("b", 1)];
        let pricing = HashMap::from([("a".to_string(), 10.0), ("b".to_string(), 5.0)]);

        assert_eq!(compute_total(&items, &pricing).unwrap(), 25.0);
    }

    #[test]
    fn test_compute_total_names_unpriced_product() {
        let items = vec![line("a", 2), line("b", 1)];
        let pricing = HashMap::from([("a".to_string(), 10.0)]);

        assert_eq!(
            compute_total(&items, &pricing),
            Err(CheckoutError::MissingPrice("b".to_string()))
        );
    }

    #[test]
    fn test_compute_total_empty_cart_is_zero() {
        // The handler rejects empty carts before pricing; the sum itself
        // is still well defined.
        assert_eq!(compute_total(&[], &HashMap::new()).unwrap(), 0.0);
    }

    #[test]
    fn test_checkout_error_messages() {
        assert_eq!(CheckoutError::EmptyCart.to_string(), "Cart is empty");
        assert_eq!(
            CheckoutError::MissingPricing.to_string(),
            "Missing pricing information"
        );
        assert_eq!(
            CheckoutError::MissingPrice("wh-100".to_string()).to_string(),
            "Missing price for product wh-100"
        );
    }
}
