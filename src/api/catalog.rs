use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, ProductDto};

/// GET /api/products
/// The whole catalog, unfiltered, in storage order.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let products = state
        .store()
        .list_products()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list products: {e}")))?;

    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}
