use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dashboard::{DashboardSnapshot, fetch_snapshot},
    error::{AppError, AppResult},
    middleware::auth::AdminToken,
    models::{CustomerAnalytics, SalesPoint, TopProduct},
    response::ApiResponse,
    routes::params::AnalyticsQuery,
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/analytics/{report}", get(get_report))
}

/// Chart dataset for one analytics report.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AnalyticsReport {
    Series(Vec<SalesPoint>),
    TopProducts(Vec<TopProduct>),
    Customers(CustomerAnalytics),
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Latest dashboard snapshot", body = ApiResponse<DashboardSnapshot>),
        (status = 401, description = "Backend rejected the caller's token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    token: AdminToken,
) -> AppResult<Json<ApiResponse<DashboardSnapshot>>> {
    let client = state.admin_client(&token);
    let latest = state.dashboard.borrow().clone();
    // Nothing polled yet (or no service token): read through with the caller's token.
    let snapshot = if latest.fetched_at.is_some() {
        // The polled snapshot was fetched with the service token; the backend
        // still has to accept the caller's token before it is handed out.
        let stats = analytics_service::dashboard(&client).await?;
        DashboardSnapshot {
            stats,
            ..DashboardSnapshot::clone(&latest)
        }
    } else {
        fetch_snapshot(&client).await
    };
    Ok(Json(ApiResponse::success("Dashboard", snapshot, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/{report}",
    params(
        ("report" = String, Path, description = "One of sales, revenue, products, customers"),
        AnalyticsQuery
    ),
    responses(
        (status = 200, description = "Chart dataset", body = ApiResponse<AnalyticsReport>),
        (status = 404, description = "Unknown report"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_report(
    State(state): State<AppState>,
    token: AdminToken,
    Path(report): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<ApiResponse<AnalyticsReport>>> {
    let client = state.admin_client(&token);
    let period = query.period.unwrap_or_default();
    let data = match report.as_str() {
        "sales" => AnalyticsReport::Series(analytics_service::sales(&client, period).await?),
        "revenue" => AnalyticsReport::Series(analytics_service::revenue(&client, period).await?),
        "products" => {
            let limit = query.limit.unwrap_or(10).clamp(1, 50);
            AnalyticsReport::TopProducts(analytics_service::top_products(&client, limit).await?)
        }
        "customers" => AnalyticsReport::Customers(analytics_service::customers(&client).await?),
        _ => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success("Analytics", data, None)))
}
