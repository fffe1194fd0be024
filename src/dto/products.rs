use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Brand, Category, Product, ProductStatus};

/// Body sent to the backend on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub category: String,
    pub brand: String,
    pub stock_quantity: i64,
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub is_new: bool,
    pub is_featured: bool,
    pub is_on_sale: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BulkIdsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateProductStatusRequest {
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BulkStatusRequest {
    pub ids: Vec<String>,
    pub status: ProductStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// One page of the admin product table plus the dropdown sources.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductPage {
    pub items: Vec<Product>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
}
