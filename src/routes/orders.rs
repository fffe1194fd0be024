use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};

use crate::{
    dto::orders::{OrderList, UpdateOrderStatusRequest, UpdatePaymentStatusRequest},
    error::AppResult,
    middleware::auth::AdminToken,
    models::{Order, OrderStats},
    response::{ApiResponse, Meta},
    routes::params::OrderQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/stats", get(order_stats))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/orders/{id}/payment-status", patch(update_payment_status))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderQuery),
    responses(
        (status = 200, description = "Get all orders (admin only)", body = ApiResponse<OrderList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    token: AdminToken,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let client = state.admin_client(&token);
    let paged = order_service::list_orders(&client, &query).await?;
    let count = paged.items.len() as u64;
    let meta = Meta::new(
        paged.page.or(query.page).unwrap_or(1) as i64,
        paged.limit.or(query.limit).unwrap_or(count) as i64,
        paged.total.unwrap_or(count) as i64,
    );
    Ok(Json(ApiResponse::success(
        "Orders",
        OrderList { items: paged.items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/stats",
    responses(
        (status = 200, description = "Order counters", body = ApiResponse<OrderStats>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn order_stats(
    State(state): State<AppState>,
    token: AdminToken,
) -> AppResult<Json<ApiResponse<OrderStats>>> {
    let client = state.admin_client(&token);
    let stats = order_service::order_stats(&client).await?;
    Ok(Json(ApiResponse::success("Order stats", stats, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Get any order with items (admin only)", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let client = state.admin_client(&token);
    let order = order_service::get_order(&client, &id).await?;
    Ok(Json(ApiResponse::success("Order found", order, None)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order moved to the new status", body = ApiResponse<Order>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let client = state.admin_client(&token);
    let order = order_service::update_order_status(&client, &id, payload.status).await?;
    Ok(Json(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/payment-status",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status updated", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let client = state.admin_client(&token);
    let order = order_service::update_payment_status(&client, &id, payload.payment_status).await?;
    Ok(Json(ApiResponse::success(
        "Payment updated",
        order,
        Some(Meta::empty()),
    )))
}
