use axum::{Extension, Json, extract::State};
use std::collections::HashMap;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, AppState, OrderDto, OrderLineDto};
use crate::entities::products;

/// GET /api/orders
/// The caller's orders, newest first. Each line is enriched with product
/// metadata when its id still resolves; enrichment is best-effort and a
/// failed lookup returns the stored line as-is.
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let orders = state
        .store()
        .list_orders(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list orders: {e}")))?;

    let mut ids: Vec<String> = orders
        .iter()
        .flat_map(|o| o.items.iter().map(|i| i.product_id.clone()))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let by_id: HashMap<String, products::Model> =
        match state.store().get_products_by_ids(&ids).await {
            Ok(products) => products.into_iter().map(|p| (p.id.clone(), p)).collect(),
            Err(e) => {
                tracing::warn!("Order enrichment lookup failed: {e}");
                HashMap::new()
            }
        };

    let enriched = orders
        .into_iter()
        .map(|order| OrderDto {
            id: order.id,
            user_id: order.user_id,
            items: order
                .items
                .into_iter()
                .map(|item| {
                    let product = by_id.get(&item.product_id);
                    OrderLineDto {
                        product_id: item.product_id,
                        qty: item.qty,
                        name: product.map(|p| p.name.clone()),
                        price: product.map(|p| p.price),
                        image: product.map(|p| p.image.clone()),
                    }
                })
                .collect(),
            total: order.total,
            created_at: order.created_at,
        })
        .collect();

    Ok(Json(enriched))
}
