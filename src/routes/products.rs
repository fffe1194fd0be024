use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    dto::products::ProductList,
    error::AppResult,
    models::{Brand, Product},
    response::{ApiResponse, Meta},
    routes::params::CatalogQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/brands", get(list_brands))
        .route("/featured", get(list_featured))
        .route("/{id}", get(get_product))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedQuery {
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(CatalogQuery),
    responses(
        (status = 200, description = "List catalog products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let query = query.normalize();
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(12);

    let paged = product_service::list_products(&state.public, query).await?;
    let total = paged.total.unwrap_or(paged.items.len() as u64);
    let meta = Meta::new(
        paged.page.unwrap_or(page) as i64,
        paged.limit.unwrap_or(limit) as i64,
        total as i64,
    );
    let data = ProductList { items: paged.items };
    Ok(Json(ApiResponse::success("Products", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/products/brands",
    responses(
        (status = 200, description = "Brands available in the catalog", body = ApiResponse<Vec<Brand>>)
    ),
    tag = "Products"
)]
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Brand>>>> {
    let brands = product_service::list_brands(&state.public).await?;
    Ok(Json(ApiResponse::success("Brands", brands, None)))
}

#[utoipa::path(
    get,
    path = "/api/products/featured",
    params(FeaturedQuery),
    responses(
        (status = 200, description = "Featured products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_featured(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let limit = query.limit.unwrap_or(8).clamp(1, 50);
    let items = product_service::list_featured(&state.public, limit).await?;
    Ok(Json(ApiResponse::success(
        "Featured products",
        ProductList { items },
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::get_product(&state.public, &id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}
