use serde_json::json;

use crate::{
    api::{ApiClient, Paged},
    error::{AppError, AppResult},
    models::{Order, OrderStats, OrderStatus, PaymentStatus},
    normalize::{RawOrder, RawOrderStats},
    routes::params::OrderQuery,
};

pub async fn list_orders(client: &ApiClient, query: &OrderQuery) -> AppResult<Paged<Order>> {
    let paged = client
        .get_paged::<RawOrder, _>("admin/orders", query)
        .await?
        .map(Order::from);
    Ok(paged)
}

/// Latest orders, newest first, for the dashboard table.
pub async fn recent_orders(client: &ApiClient, limit: u64) -> AppResult<Vec<Order>> {
    let query = OrderQuery {
        limit: Some(limit),
        page: Some(1),
        ..OrderQuery::default()
    };
    let mut orders = list_orders(client, &query).await?.items;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders.truncate(limit as usize);
    Ok(orders)
}

pub async fn order_stats(client: &ApiClient) -> AppResult<OrderStats> {
    let raw: RawOrderStats = client.get("orders/stats").await?;
    Ok(raw.into())
}

pub async fn get_order(client: &ApiClient, id: &str) -> AppResult<Order> {
    let raw: RawOrder = client.get(&format!("admin/orders/{id}")).await?;
    Ok(raw.into())
}

/// Moves an order along its lifecycle. Transitions the lifecycle forbids are
/// rejected here without a round trip.
pub async fn update_order_status(
    client: &ApiClient,
    id: &str,
    next: OrderStatus,
) -> AppResult<Order> {
    let current = get_order(client, id).await?;
    if !current.status.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "cannot move order from {} to {}",
            current.status, next
        )));
    }

    let raw: RawOrder = client
        .patch(
            &format!("admin/orders/{id}/status"),
            &json!({ "status": next }),
        )
        .await?;
    tracing::info!(order_id = %id, from = %current.status, to = %next, "order status updated");
    Ok(raw.into())
}

pub async fn update_payment_status(
    client: &ApiClient,
    id: &str,
    status: PaymentStatus,
) -> AppResult<Order> {
    let raw: RawOrder = client
        .patch(
            &format!("admin/orders/{id}/payment-status"),
            &json!({ "paymentStatus": status }),
        )
        .await?;
    tracing::info!(order_id = %id, payment_status = status.as_str(), "payment status updated");
    Ok(raw.into())
}
