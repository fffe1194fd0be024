#![allow(dead_code)]

use axum::Router;
use laptop_store_admin::models::{CategoryRef, Product, ProductStatus};

/// Serves `backend` on an ephemeral port and returns its base URL.
pub async fn spawn_backend(backend: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, backend).await;
    });
    Ok(format!("http://{addr}/api"))
}

pub fn product(id: usize, brand: &str, category: &str) -> Product {
    Product {
        id: format!("p{id}"),
        name: format!("{brand} Laptop {id}"),
        price: 999.0 + id as f64,
        brand: brand.to_string(),
        category: CategoryRef::named(category),
        stock_quantity: 10,
        status: ProductStatus::Active,
        ..Product::default()
    }
}
