use serde_json::{Value, json};

use crate::{
    api::{ApiClient, Paged},
    dto::products::{BulkIdsRequest, BulkStatusRequest, ProductPayload},
    error::AppResult,
    models::{Brand, Product, ProductStatus},
    normalize::{RawProduct, RawRef},
    routes::params::CatalogQuery,
};

/// Page size used when pulling the whole admin collection.
const ADMIN_FETCH_LIMIT: u64 = 100;
/// Upper bound on pages pulled for the admin collection.
const ADMIN_MAX_PAGES: u64 = 50;

pub async fn list_products(client: &ApiClient, query: CatalogQuery) -> AppResult<Paged<Product>> {
    let query = query.normalize();
    let paged = client
        .get_paged::<RawProduct, _>("products", &query)
        .await?
        .map(Product::from);
    Ok(paged)
}

pub async fn get_product(client: &ApiClient, id: &str) -> AppResult<Product> {
    let raw: RawProduct = client.get(&format!("products/{id}")).await?;
    Ok(raw.into())
}

pub async fn list_brands(client: &ApiClient) -> AppResult<Vec<Brand>> {
    let raw: Vec<RawRef> = client.get_list("products/brands").await?;
    let mut brands: Vec<Brand> = raw
        .into_iter()
        .map(Brand::from)
        .filter(|b| !b.name.is_empty())
        .collect();
    brands.sort_by(|a, b| a.name.cmp(&b.name));
    brands.dedup_by(|a, b| a.name == b.name);
    Ok(brands)
}

pub async fn list_featured(client: &ApiClient, limit: u64) -> AppResult<Vec<Product>> {
    let raw: Vec<RawProduct> = client
        .get_paged("products/featured", &[("limit", limit)])
        .await?
        .items;
    Ok(raw.into_iter().map(Product::from).collect())
}

/// Pulls every product the admin can see, following backend pagination.
pub async fn list_admin_products(client: &ApiClient) -> AppResult<Vec<Product>> {
    let mut products = Vec::new();
    let mut page = 1_u64;
    loop {
        let paged: Paged<RawProduct> = client
            .get_paged(
                "admin/products",
                &[("page", page), ("limit", ADMIN_FETCH_LIMIT)],
            )
            .await?;
        let fetched = paged.items.len() as u64;
        products.extend(paged.items.into_iter().map(Product::from));

        let more = match paged.total_pages {
            Some(total_pages) => page < total_pages,
            None => paged.total.is_some_and(|total| (products.len() as u64) < total) && fetched > 0,
        };
        if !more || page >= ADMIN_MAX_PAGES {
            break;
        }
        page += 1;
    }
    tracing::debug!(count = products.len(), "loaded admin products");
    Ok(products)
}

pub async fn create_product(client: &ApiClient, payload: &ProductPayload) -> AppResult<Product> {
    let raw: RawProduct = client.post("admin/products", payload).await?;
    let product = Product::from(raw);
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    Ok(product)
}

pub async fn update_product(
    client: &ApiClient,
    id: &str,
    payload: &ProductPayload,
) -> AppResult<Product> {
    let raw: RawProduct = client.put(&format!("admin/products/{id}"), payload).await?;
    tracing::info!(product_id = %id, "product updated");
    Ok(raw.into())
}

pub async fn update_status(
    client: &ApiClient,
    id: &str,
    status: ProductStatus,
) -> AppResult<Product> {
    let raw: RawProduct = client
        .patch(
            &format!("admin/products/{id}/status"),
            &json!({ "status": status }),
        )
        .await?;
    tracing::info!(product_id = %id, status = %status, "product status updated");
    Ok(raw.into())
}

pub async fn delete_product(client: &ApiClient, id: &str) -> AppResult<()> {
    client.delete(&format!("admin/products/{id}")).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(())
}

pub async fn bulk_delete(client: &ApiClient, ids: &[String]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let body = BulkIdsRequest { ids: ids.to_vec() };
    let _: Value = client.post("admin/products/bulk-delete", &body).await?;
    tracing::info!(count = ids.len(), "products bulk deleted");
    Ok(())
}

pub async fn bulk_update_status(
    client: &ApiClient,
    ids: &[String],
    status: ProductStatus,
) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let body = BulkStatusRequest {
        ids: ids.to_vec(),
        status,
    };
    let _: Value = client.patch("admin/products/bulk-status", &body).await?;
    tracing::info!(count = ids.len(), status = %status, "products bulk status updated");
    Ok(())
}
