use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};

use crate::{
    catalog::ProductListState,
    dto::{
        inventory::InventoryAdjustRequest,
        products::{
            AdminProductPage, BulkIdsRequest, BulkStatusRequest, ProductList,
            UpdateProductStatusRequest,
        },
    },
    error::AppResult,
    form::ProductDraft,
    middleware::auth::AdminToken,
    models::{Brand, Product, StoreSettings},
    normalize::resolve_categories,
    response::{ApiResponse, Meta},
    routes::{
        dashboard, orders,
        params::{AdminProductQuery, LowStockQuery},
        uploads,
    },
    services::{category_service, inventory_service, product_service, settings_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_admin_products).post(create_product))
        .route("/products/bulk-delete", post(bulk_delete))
        .route("/products/bulk-status", patch(bulk_status))
        .route(
            "/products/{id}",
            get(get_admin_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/products/{id}/status", patch(update_product_status))
        .route("/inventory", get(list_inventory))
        .route("/inventory/low-stock", get(list_low_stock))
        .route("/inventory/{id}", patch(adjust_inventory))
        .route("/settings", get(get_settings).put(update_settings))
        .merge(orders::router())
        .merge(dashboard::router())
        .merge(uploads::router())
}

/// Brand dropdown source: the backend list when it has one, otherwise the
/// distinct brands found on the products themselves.
fn brand_options(brands: Vec<Brand>, products: &[Product]) -> Vec<Brand> {
    if !brands.is_empty() {
        return brands;
    }
    let mut names: Vec<&str> = products
        .iter()
        .map(|p| p.brand.as_str())
        .filter(|b| !b.is_empty())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .map(|name| Brand {
            id: None,
            name: name.to_string(),
            product_count: Some(products.iter().filter(|p| p.brand == name).count() as u64),
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(AdminProductQuery),
    responses(
        (status = 200, description = "Filtered, paginated admin product table", body = ApiResponse<AdminProductPage>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_admin_products(
    State(state): State<AppState>,
    token: AdminToken,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Json<ApiResponse<AdminProductPage>>> {
    let client = state.admin_client(&token);
    let (products, categories, brands) = tokio::join!(
        product_service::list_admin_products(&client),
        category_service::list_categories(&client),
        product_service::list_brands(&client),
    );

    let mut products = products?;
    let categories = categories.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "category options unavailable");
        Vec::new()
    });
    let brands = brands.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "brand options unavailable");
        Vec::new()
    });
    resolve_categories(&mut products, &categories);
    let brands = brand_options(brands, &products);

    let mut list = ProductListState::new(products, state.config.admin_page_size);
    list.set_filter(query.filter());
    list.set_page(query.page.unwrap_or(1));
    let page = list.current_page();

    let meta = Meta::new(
        page.page as i64,
        page.page_size as i64,
        page.total_items as i64,
    );
    let data = AdminProductPage {
        items: page.items,
        categories,
        brands,
    };
    Ok(Json(ApiResponse::success("Products", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with the edit form seeded from it", body = ApiResponse<ProductDraft>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_admin_product(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDraft>>> {
    let client = state.admin_client(&token);
    let product = product_service::get_product(&client, &id).await?;
    Ok(Json(ApiResponse::success(
        "Product",
        ProductDraft::from_product(&product),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductDraft,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 422, description = "Every failing field of the draft"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    token: AdminToken,
    Json(draft): Json<ProductDraft>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let payload = draft.try_into_payload()?;
    let client = state.admin_client(&token);
    let product = product_service::create_product(&client, &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product created",
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ProductDraft,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 422, description = "Every failing field of the draft"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let payload = draft.try_into_payload()?;
    let client = state.admin_client(&token);
    let product = product_service::update_product(&client, &id, &payload).await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/status",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProductStatusRequest,
    responses(
        (status = 200, description = "Product with its new status", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product_status(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductStatusRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let client = state.admin_client(&token);
    let product = product_service::update_status(&client, &id, payload.status).await?;
    Ok(Json(ApiResponse::success(
        "Status updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let client = state.admin_client(&token);
    product_service::delete_product(&client, &id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/bulk-delete",
    request_body = BulkIdsRequest,
    responses(
        (status = 200, description = "Deleted products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn bulk_delete(
    State(state): State<AppState>,
    token: AdminToken,
    Json(payload): Json<BulkIdsRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let client = state.admin_client(&token);
    product_service::bulk_delete(&client, &payload.ids).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "count": payload.ids.len() }),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/bulk-status",
    request_body = BulkStatusRequest,
    responses(
        (status = 200, description = "Updated product statuses"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn bulk_status(
    State(state): State<AppState>,
    token: AdminToken,
    Json(payload): Json<BulkStatusRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let client = state.admin_client(&token);
    product_service::bulk_update_status(&client, &payload.ids, payload.status).await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        serde_json::json!({ "count": payload.ids.len(), "status": payload.status }),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/inventory",
    responses(
        (status = 200, description = "Stock levels", body = ApiResponse<ProductList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    token: AdminToken,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let client = state.admin_client(&token);
    let items = inventory_service::list_inventory(&client).await?;
    Ok(Json(ApiResponse::success(
        "Inventory",
        ProductList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/inventory/low-stock",
    params(LowStockQuery),
    responses(
        (status = 200, description = "List low stock products", body = ApiResponse<ProductList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    token: AdminToken,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let client = state.admin_client(&token);
    let threshold = query.threshold.unwrap_or(5);
    let items = inventory_service::low_stock(&client, threshold).await?;
    let meta = Meta::new(1, items.len() as i64, items.len() as i64);
    Ok(Json(ApiResponse::success(
        "Low stock",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/inventory/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = InventoryAdjustRequest,
    responses(
        (status = 200, description = "Adjust inventory", body = ApiResponse<Product>),
        (status = 400, description = "Invalid adjustment"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
    Json(payload): Json<InventoryAdjustRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let client = state.admin_client(&token);
    let product = inventory_service::adjust_stock(&client, &id, payload.delta).await?;
    Ok(Json(ApiResponse::success(
        "Inventory updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Store settings", body = ApiResponse<StoreSettings>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    token: AdminToken,
) -> AppResult<Json<ApiResponse<StoreSettings>>> {
    let client = state.admin_client(&token);
    let settings = settings_service::get_settings(&client).await?;
    Ok(Json(ApiResponse::success("Settings", settings, None)))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = StoreSettings,
    responses(
        (status = 200, description = "Updated store settings", body = ApiResponse<StoreSettings>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    token: AdminToken,
    Json(settings): Json<StoreSettings>,
) -> AppResult<Json<ApiResponse<StoreSettings>>> {
    let client = state.admin_client(&token);
    let settings = settings_service::update_settings(&client, &settings).await?;
    Ok(Json(ApiResponse::success("Settings updated", settings, None)))
}
