use crate::{
    api::ApiClient,
    dto::inventory::InventoryAdjustRequest,
    error::{AppError, AppResult},
    models::Product,
    normalize::RawProduct,
};

pub async fn list_inventory(client: &ApiClient) -> AppResult<Vec<Product>> {
    let raw: Vec<RawProduct> = client.get_list("admin/inventory").await?;
    Ok(raw.into_iter().map(Product::from).collect())
}

/// Products at or below `threshold` units, lowest stock first.
pub async fn low_stock(client: &ApiClient, threshold: i64) -> AppResult<Vec<Product>> {
    let raw: Vec<RawProduct> = client
        .get_paged("admin/inventory/low-stock", &[("threshold", threshold)])
        .await?
        .items;
    let mut products: Vec<Product> = raw
        .into_iter()
        .map(Product::from)
        .filter(|p| p.stock_quantity <= threshold)
        .collect();
    products.sort_by_key(|p| p.stock_quantity);
    Ok(products)
}

pub async fn adjust_stock(client: &ApiClient, id: &str, delta: i64) -> AppResult<Product> {
    if delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }
    let raw: RawProduct = client
        .patch(
            &format!("admin/inventory/{id}"),
            &InventoryAdjustRequest { delta },
        )
        .await?;
    let product = Product::from(raw);
    tracing::info!(product_id = %id, delta, stock = product.stock_quantity, "inventory adjusted");
    Ok(product)
}
