mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::Multipart,
    http::{HeaderMap, Request, StatusCode, header},
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use common::spawn_backend;
use laptop_store_admin::{
    api::ApiClient,
    config::AppConfig,
    dashboard::{DashboardPoller, DashboardSnapshot, fetch_snapshot},
    dto::products::AdminProductPage,
    response::ApiResponse,
    routes::create_app,
    state::AppState,
    upload::{ImageFile, UploadState, upload_all},
};

const TOKEN: &str = "admin-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

fn app_for(base_url: &str) -> anyhow::Result<Router> {
    let (_tx, rx) = watch::channel(Arc::new(DashboardSnapshot::default()));
    let state = AppState::new(AppConfig::for_base_url(base_url), rx)?;
    Ok(create_app(state))
}

async fn json_body(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn raw_products() -> Value {
    let products: Vec<Value> = (1..=25)
        .map(|i| {
            let brand = if i % 2 == 1 { "Dell" } else { "HP" };
            json!({
                "_id": format!("p{i}"),
                "name": format!("{brand} Laptop {i}"),
                "price": 1000 + i,
                "stock": i,
                "brand": brand,
                "category": "c1",
                "status": "active"
            })
        })
        .collect();
    json!({
        "success": true,
        "data": {
            "products": products,
            "pagination": { "page": 1, "limit": 100, "total": 25, "totalPages": 1 }
        }
    })
}

#[tokio::test]
async fn admin_product_table_filters_and_pages_backend_data() -> anyhow::Result<()> {
    let backend = Router::new()
        .route(
            "/api/admin/products",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(raw_products()).into_response()
            }),
        )
        .route(
            "/api/categories",
            get(|| async {
                Json(json!({ "success": true, "data": [{ "_id": "c1", "name": "Business" }] }))
            }),
        );
    // No brand endpoint: the dropdown is derived from the products.
    let base_url = spawn_backend(backend).await?;

    let response = app_for(&base_url)?
        .oneshot(
            Request::builder()
                .uri("/api/admin/products?brand=Dell&page=2")
                .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: ApiResponse<AdminProductPage> = serde_json::from_value(json_body(response).await?)?;
    let meta = body.meta.expect("meta");
    assert_eq!(meta.page, Some(2));
    assert_eq!(meta.total, Some(13));
    assert_eq!(meta.total_pages, Some(2));

    let page = body.data.expect("page");
    let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p21", "p23", "p25"]);
    assert!(page.items.iter().all(|p| p.category.name == "Business"));

    let brands: Vec<&str> = page.brands.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(brands, ["Dell", "HP"]);
    assert_eq!(page.brands[0].product_count, Some(13));
    Ok(())
}

#[tokio::test]
async fn backend_rejection_of_the_token_is_passed_through() -> anyhow::Result<()> {
    let backend = Router::new().route(
        "/api/admin/products",
        get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "jwt expired" }))) }),
    );
    let base_url = spawn_backend(backend).await?;

    let response = app_for(&base_url)?
        .oneshot(
            Request::builder()
                .uri("/api/admin/products")
                .header(header::AUTHORIZATION, "Bearer stale")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn invalid_product_draft_is_rejected_with_every_field() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let backend = Router::new().route(
        "/api/admin/products",
        post(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Json(json!({})) }
        }),
    );
    let base_url = spawn_backend(backend).await?;

    let response = app_for(&base_url)?
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/products")
                .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "name": "XPS", "price": 0 }).to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await?;
    let fields = body["data"]["fields"].as_object().expect("field errors");
    for field in ["description", "shortDescription", "price", "category", "brand"] {
        assert!(fields.contains_key(field), "missing {field}");
    }
    assert!(!fields.contains_key("name"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn delivered_order_cannot_go_back_to_pending() -> anyhow::Result<()> {
    let patches = Arc::new(AtomicUsize::new(0));
    let seen = patches.clone();
    let backend = Router::new()
        .route(
            "/api/admin/orders/o1",
            get(|| async { Json(json!({ "data": { "_id": "o1", "status": "delivered" } })) }),
        )
        .route(
            "/api/admin/orders/o1/status",
            patch(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                async { Json(json!({ "data": { "_id": "o1", "status": "pending" } })) }
            }),
        );
    let base_url = spawn_backend(backend).await?;

    let response = app_for(&base_url)?
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/admin/orders/o1/status")
                .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": "pending" }).to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(patches.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn dashboard_survives_a_failing_read() -> anyhow::Result<()> {
    let backend = Router::new()
        .route(
            "/api/analytics/dashboard",
            get(|| async { Json(json!({ "success": true, "data": { "totalRevenue": 5000, "totalOrders": 12 } })) }),
        )
        .route(
            "/api/admin/orders",
            get(|| async {
                Json(json!({ "success": true, "data": { "orders": [
                    { "_id": "o1", "totalAmount": 999, "status": "pending" }
                ]}}))
            }),
        )
        .route(
            "/api/analytics/products",
            get(|| async { Json(json!([{ "productId": "p1", "name": "XPS", "totalSold": 7 }])) }),
        )
        .route(
            "/api/analytics/sales",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let base_url = spawn_backend(backend).await?;
    let client = ApiClient::authenticated(&AppConfig::for_base_url(base_url), TOKEN)?;

    let snapshot = fetch_snapshot(&client).await;
    assert_eq!(snapshot.stats.total_revenue, 5000.0);
    assert_eq!(snapshot.stats.total_orders, 12);
    assert_eq!(snapshot.recent_orders.len(), 1);
    assert_eq!(snapshot.top_products[0].sold, 7);
    assert!(snapshot.sales.is_empty());
    assert_eq!(snapshot.degraded, vec!["sales".to_string()]);
    assert!(snapshot.fetched_at.is_some());
    Ok(())
}

#[tokio::test]
async fn failed_upload_falls_back_to_local_preview() -> anyhow::Result<()> {
    let backend = Router::new().route(
        "/api/upload/image",
        post(|mut multipart: Multipart| async move {
            while let Ok(Some(field)) = multipart.next_field().await {
                if field.file_name() == Some("broken.png") {
                    return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "disk full" })));
                }
            }
            (
                StatusCode::OK,
                Json(json!({ "success": true, "data": { "imageUrl": "https://cdn.example.com/ok.png" } })),
            )
        }),
    );
    let base_url = spawn_backend(backend).await?;
    let client = ApiClient::authenticated(&AppConfig::for_base_url(base_url), TOKEN)?;

    let uploads = upload_all(
        &client,
        vec![
            ImageFile::new("ok.png", "image/png", vec![1, 2, 3]),
            ImageFile::new("broken.png", "image/png", vec![4, 5, 6]),
        ],
    )
    .await;

    assert_eq!(uploads.len(), 2);
    assert_eq!(
        uploads[0].state(),
        &UploadState::Committed { url: "https://cdn.example.com/ok.png".into() }
    );
    assert_eq!(uploads[1].resolved_url(), Some("data:image/png;base64,BAUG"));
    assert!(matches!(uploads[1].state(), UploadState::Fallback { .. }));

    let uploaded = uploads[1].to_uploaded().expect("fallback still resolves");
    assert!(!uploaded.hosted);
    assert_eq!(uploaded.file_name, "broken.png");
    Ok(())
}

#[tokio::test]
async fn poller_publishes_then_stops_on_shutdown() -> anyhow::Result<()> {
    // Every read 404s, so the snapshot is all defaults but still published.
    let base_url = spawn_backend(Router::new()).await?;
    let client = ApiClient::authenticated(&AppConfig::for_base_url(base_url), TOKEN)?;

    let poller = DashboardPoller::spawn(
        client,
        Duration::from_secs(3600),
        CancellationToken::new(),
    );
    let mut updates = poller.subscribe();
    tokio::time::timeout(Duration::from_secs(5), updates.changed()).await??;

    let latest = poller.latest();
    assert!(latest.fetched_at.is_some());
    assert_eq!(latest.degraded.len(), 4);

    let token = poller.token().clone();
    poller.shutdown().await;
    assert!(token.is_cancelled());
    Ok(())
}

fn polled_snapshot() -> DashboardSnapshot {
    DashboardSnapshot {
        recent_orders: vec![laptop_store_admin::models::Order {
            id: "o-cached".into(),
            total_amount: 4200.0,
            ..Default::default()
        }],
        fetched_at: Some(chrono::Utc::now()),
        ..DashboardSnapshot::default()
    }
}

#[tokio::test]
async fn polled_dashboard_is_only_served_to_tokens_the_backend_accepts() -> anyhow::Result<()> {
    let backend = Router::new().route(
        "/api/analytics/dashboard",
        get(|headers: HeaderMap| async move {
            if !authorized(&headers) {
                return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid token" })))
                    .into_response();
            }
            Json(json!({ "success": true, "data": { "totalRevenue": 10 } })).into_response()
        }),
    );
    let base_url = spawn_backend(backend).await?;

    let (_tx, rx) = watch::channel(Arc::new(polled_snapshot()));
    let app = create_app(AppState::new(AppConfig::for_base_url(base_url), rx)?);

    let rejected = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/dashboard")
                .header(header::AUTHORIZATION, "Bearer x")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(rejected).await?;
    assert!(!body.to_string().contains("o-cached"));

    let accepted = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/dashboard")
                .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(accepted.status(), StatusCode::OK);
    let body: ApiResponse<DashboardSnapshot> = serde_json::from_value(json_body(accepted).await?)?;
    let snapshot = body.data.expect("snapshot");
    assert_eq!(snapshot.recent_orders[0].id, "o-cached");
    assert_eq!(snapshot.stats.total_revenue, 10.0);
    Ok(())
}

#[tokio::test]
async fn brand_list_is_deduplicated_regardless_of_backend_order() -> anyhow::Result<()> {
    let backend = Router::new().route(
        "/api/products/brands",
        get(|| async {
            Json(json!({ "success": true, "data": ["Lenovo", "Dell", "Lenovo", { "name": "Dell" }, "Asus", ""] }))
        }),
    );
    let base_url = spawn_backend(backend).await?;
    let client = ApiClient::public(&AppConfig::for_base_url(base_url))?;

    let brands = laptop_store_admin::services::product_service::list_brands(&client).await?;
    let names: Vec<&str> = brands.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Asus", "Dell", "Lenovo"]);
    Ok(())
}
