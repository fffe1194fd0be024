//! Backend wire shapes and their conversion into the canonical models.
//!
//! The backend spells the same thing several ways (`_id`/`id`,
//! `stock`/`stockQuantity`, category as a bare name or as `{_id, name}`,
//! numbers as strings). The `Raw*` types accept all of them and the `From`
//! impls below are the only place that knows about it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::models::{
    Brand, Category, CategoryRef, CustomerAnalytics, CustomerRef, DashboardStats, Order, OrderItem,
    OrderStats, OrderStatus, PaymentStatus, Product, ProductStatus, SalesPoint, ShippingAddress,
    TopProduct,
};

mod lenient {
    use super::*;

    /// Accepts a number or a numeric string.
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_number(&Value::deserialize(deserializer)?))
    }

    /// Accepts a string or a number, as backends disagree on id types.
    pub fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_id(&Value::deserialize(deserializer)?))
    }

    pub fn as_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_id(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn count(value: Option<f64>) -> u64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0).round() as u64
}

fn amount(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn first_id(candidates: [&Option<String>; 2]) -> String {
    candidates
        .into_iter()
        .find_map(|c| c.clone())
        .unwrap_or_default()
}

/// A reference that is either a bare identifier/name or an embedded document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    Text(String),
    Object(Map<String, Value>),
}

impl RawRef {
    fn field(&self, keys: &[&str]) -> Option<String> {
        match self {
            RawRef::Text(_) => None,
            RawRef::Object(map) => keys.iter().find_map(|k| map.get(*k).and_then(lenient::as_id)),
        }
    }

    fn id(&self) -> Option<String> {
        match self {
            RawRef::Text(text) => Some(text.clone()),
            RawRef::Object(_) => self.field(&["_id", "id"]),
        }
    }

    fn name(&self) -> Option<String> {
        match self {
            RawRef::Text(text) => Some(text.clone()),
            RawRef::Object(_) => self.field(&["name", "title"]),
        }
    }
}

impl From<RawRef> for CategoryRef {
    fn from(raw: RawRef) -> Self {
        match raw {
            RawRef::Text(name) => CategoryRef::named(name),
            object => CategoryRef {
                id: object.field(&["_id", "id"]),
                name: object.name().unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Url(String),
    Object { url: String },
}

impl RawImage {
    fn into_url(self) -> String {
        match self {
            RawImage::Url(url) | RawImage::Object { url } => url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProduct {
    #[serde(deserialize_with = "lenient::id")]
    id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "lenient::id")]
    mongo_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    price: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    original_price: Option<f64>,
    images: Option<Vec<RawImage>>,
    image: Option<String>,
    category: Option<RawRef>,
    brand: Option<RawRef>,
    #[serde(deserialize_with = "lenient::number")]
    stock: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    stock_quantity: Option<f64>,
    status: Option<String>,
    is_new: Option<bool>,
    is_hot: Option<bool>,
    is_featured: Option<bool>,
    is_sale: Option<bool>,
    is_on_sale: Option<bool>,
    #[serde(deserialize_with = "lenient::number")]
    rating: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    average_rating: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    review_count: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    num_reviews: Option<f64>,
    specifications: Option<Map<String, Value>>,
    created_at: Option<String>,
}

fn specifications(map: Option<Map<String, Value>>) -> BTreeMap<String, String> {
    map.unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect()
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let mut images: Vec<String> = raw
            .images
            .unwrap_or_default()
            .into_iter()
            .map(RawImage::into_url)
            .filter(|url| !url.is_empty())
            .collect();
        if images.is_empty() {
            images.extend(raw.image.filter(|url| !url.is_empty()));
        }

        let status = match raw.status.as_deref() {
            Some(value) => ProductStatus::parse(value).unwrap_or_else(|| {
                tracing::warn!(status = %value, "unknown product status, treating as active");
                ProductStatus::Active
            }),
            None => ProductStatus::Active,
        };

        Product {
            id: first_id([&raw.id, &raw.mongo_id]),
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            short_description: raw.short_description.unwrap_or_default(),
            price: amount(raw.price),
            original_price: raw.original_price.filter(|p| p.is_finite() && *p > 0.0),
            images,
            category: raw.category.map(CategoryRef::from).unwrap_or_default(),
            brand: raw.brand.and_then(|b| b.name()).unwrap_or_default(),
            stock_quantity: raw
                .stock_quantity
                .or(raw.stock)
                .map(|q| q.round() as i64)
                .unwrap_or(0),
            status,
            is_new: raw.is_new.unwrap_or(false),
            is_hot: raw.is_hot.or(raw.is_featured).unwrap_or(false),
            is_sale: raw.is_sale.or(raw.is_on_sale).unwrap_or(false),
            rating: amount(raw.rating.or(raw.average_rating)),
            review_count: count(raw.review_count.or(raw.num_reviews)),
            specifications: specifications(raw.specifications),
            created_at: parse_timestamp(raw.created_at.as_deref()),
        }
    }
}

/// Fills in category ids and names that only one side of the data knows.
///
/// A bare category string may be either an id or a display name; objects may
/// carry an id without a name. Both are resolved against the category list.
pub fn resolve_categories(products: &mut [Product], categories: &[Category]) {
    let flat = flatten_categories(categories);
    for product in products.iter_mut() {
        let reference = &mut product.category;
        let found = match &reference.id {
            Some(id) => flat.iter().find(|c| &c.id == id),
            None => flat
                .iter()
                .find(|c| c.id == reference.name)
                .or_else(|| flat.iter().find(|c| c.name == reference.name)),
        };
        if let Some(category) = found {
            reference.id = Some(category.id.clone());
            reference.name = category.name.clone();
        }
    }
}

/// Depth-first flattening of a category tree.
pub fn flatten_categories(categories: &[Category]) -> Vec<&Category> {
    let mut out = Vec::new();
    let mut stack: Vec<&Category> = categories.iter().rev().collect();
    while let Some(category) = stack.pop() {
        out.push(category);
        stack.extend(category.children.iter().rev());
    }
    out
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCategory {
    #[serde(deserialize_with = "lenient::id")]
    id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "lenient::id")]
    mongo_id: Option<String>,
    name: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    parent: Option<RawRef>,
    #[serde(deserialize_with = "lenient::id")]
    parent_id: Option<String>,
    children: Vec<RawCategory>,
    #[serde(deserialize_with = "lenient::number")]
    product_count: Option<f64>,
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        Category {
            id: first_id([&raw.id, &raw.mongo_id]),
            name: raw.name.unwrap_or_default(),
            slug: raw.slug,
            description: raw.description,
            parent_id: raw.parent_id.or_else(|| raw.parent.and_then(|p| p.id())),
            children: raw.children.into_iter().map(Category::from).collect(),
            product_count: raw.product_count.map(|c| count(Some(c))),
        }
    }
}

impl From<RawRef> for Brand {
    fn from(raw: RawRef) -> Self {
        match &raw {
            RawRef::Text(name) => Brand {
                id: None,
                name: name.clone(),
                product_count: None,
            },
            RawRef::Object(map) => Brand {
                id: raw.field(&["_id", "id"]),
                name: raw.name().unwrap_or_default(),
                product_count: map
                    .get("productCount")
                    .or_else(|| map.get("count"))
                    .and_then(lenient::as_number)
                    .map(|c| count(Some(c))),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOrderItem {
    product: Option<RawRef>,
    name: Option<String>,
    image: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    price: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    quantity: Option<f64>,
}

impl From<RawOrderItem> for OrderItem {
    fn from(raw: RawOrderItem) -> Self {
        let product = raw.product.as_ref();
        let product_image = product.and_then(|p| match p {
            RawRef::Object(map) => map
                .get("images")
                .and_then(Value::as_array)
                .and_then(|images| images.first())
                .and_then(|first| match first {
                    Value::String(url) => Some(url.clone()),
                    Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                }),
            RawRef::Text(_) => None,
        });
        let product_price = product.and_then(|p| match p {
            RawRef::Object(map) => map.get("price").and_then(lenient::as_number),
            RawRef::Text(_) => None,
        });

        OrderItem {
            product_id: product.and_then(RawRef::id),
            name: raw
                .name
                .or_else(|| product.and_then(|p| p.field(&["name"])))
                .unwrap_or_default(),
            image: raw.image.or(product_image),
            price: amount(raw.price.or(product_price)),
            quantity: count(raw.quantity).min(u64::from(u32::MAX)) as u32,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOrder {
    #[serde(deserialize_with = "lenient::id")]
    id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "lenient::id")]
    mongo_id: Option<String>,
    order_number: Option<String>,
    user: Option<RawRef>,
    customer: Option<RawRef>,
    items: Option<Vec<RawOrderItem>>,
    order_items: Option<Vec<RawOrderItem>>,
    shipping_address: Option<ShippingAddress>,
    payment_method: Option<String>,
    payment_status: Option<String>,
    status: Option<String>,
    order_status: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    total_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_price: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total: Option<f64>,
    created_at: Option<String>,
}

impl From<RawOrder> for Order {
    fn from(raw: RawOrder) -> Self {
        let customer = raw.customer.or(raw.user).map(|c| match &c {
            RawRef::Text(id) => CustomerRef {
                id: Some(id.clone()),
                ..CustomerRef::default()
            },
            RawRef::Object(_) => CustomerRef {
                id: c.id(),
                name: c.field(&["name", "fullName"]),
                email: c.field(&["email"]),
            },
        });

        let items: Vec<OrderItem> = raw
            .items
            .or(raw.order_items)
            .unwrap_or_default()
            .into_iter()
            .map(OrderItem::from)
            .collect();

        let status_text = raw.status.or(raw.order_status);
        let status = match status_text.as_deref() {
            Some(text) => OrderStatus::parse(text).unwrap_or_else(|| {
                tracing::warn!(status = %text, "unknown order status, treating as pending");
                OrderStatus::Pending
            }),
            None => OrderStatus::Pending,
        };
        let payment_status = raw
            .payment_status
            .as_deref()
            .and_then(PaymentStatus::parse)
            .unwrap_or_default();

        let total_amount = match raw.total_amount.or(raw.total_price).or(raw.total) {
            Some(total) => amount(Some(total)),
            None => items.iter().map(OrderItem::line_total).sum(),
        };

        Order {
            id: first_id([&raw.id, &raw.mongo_id]),
            order_number: raw.order_number,
            customer: customer.unwrap_or_default(),
            items,
            shipping_address: raw.shipping_address,
            payment_method: raw.payment_method.unwrap_or_default(),
            payment_status,
            status,
            total_amount,
            created_at: parse_timestamp(raw.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOrderStats {
    #[serde(deserialize_with = "lenient::number")]
    total_orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pending_orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    completed_orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    delivered_orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    cancelled_orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_revenue: Option<f64>,
}

impl From<RawOrderStats> for OrderStats {
    fn from(raw: RawOrderStats) -> Self {
        OrderStats {
            total_orders: count(raw.total_orders),
            pending_orders: count(raw.pending_orders),
            completed_orders: count(raw.completed_orders.or(raw.delivered_orders)),
            cancelled_orders: count(raw.cancelled_orders),
            total_revenue: amount(raw.total_revenue),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDashboardStats {
    #[serde(deserialize_with = "lenient::number")]
    total_revenue: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_products: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_customers: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_users: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pending_orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    low_stock_products: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    revenue_growth: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    orders_growth: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    customers_growth: Option<f64>,
}

fn growth(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl From<RawDashboardStats> for DashboardStats {
    fn from(raw: RawDashboardStats) -> Self {
        DashboardStats {
            total_revenue: amount(raw.total_revenue),
            total_orders: count(raw.total_orders),
            total_products: count(raw.total_products),
            total_customers: count(raw.total_customers.or(raw.total_users)),
            pending_orders: count(raw.pending_orders),
            low_stock_products: count(raw.low_stock_products),
            revenue_growth: growth(raw.revenue_growth),
            orders_growth: growth(raw.orders_growth),
            customers_growth: growth(raw.customers_growth),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSalesPoint {
    label: Option<String>,
    date: Option<String>,
    period: Option<String>,
    month: Option<Value>,
    #[serde(rename = "_id")]
    mongo_id: Option<Value>,
    #[serde(deserialize_with = "lenient::number")]
    revenue: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    sales: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    orders: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    count: Option<f64>,
}

impl From<RawSalesPoint> for SalesPoint {
    fn from(raw: RawSalesPoint) -> Self {
        let label = raw
            .label
            .or(raw.date)
            .or(raw.period)
            .or_else(|| raw.month.as_ref().and_then(lenient::as_id))
            .or_else(|| raw.mongo_id.as_ref().and_then(lenient::as_id))
            .unwrap_or_default();
        SalesPoint {
            label,
            revenue: amount(raw.revenue.or(raw.sales).or(raw.total)),
            orders: count(raw.orders.or(raw.count)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTopProduct {
    #[serde(deserialize_with = "lenient::id")]
    id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "lenient::id")]
    mongo_id: Option<String>,
    #[serde(deserialize_with = "lenient::id")]
    product_id: Option<String>,
    name: Option<String>,
    image: Option<String>,
    images: Option<Vec<RawImage>>,
    #[serde(deserialize_with = "lenient::number")]
    sold: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_sold: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    quantity: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    revenue: Option<f64>,
}

impl From<RawTopProduct> for TopProduct {
    fn from(raw: RawTopProduct) -> Self {
        let image = raw.image.or_else(|| {
            raw.images
                .and_then(|images| images.into_iter().next())
                .map(RawImage::into_url)
        });
        TopProduct {
            id: raw
                .product_id
                .or(raw.id)
                .or(raw.mongo_id)
                .unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            image,
            sold: count(raw.sold.or(raw.total_sold).or(raw.quantity)),
            revenue: amount(raw.revenue),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCustomerAnalytics {
    #[serde(deserialize_with = "lenient::number")]
    total_customers: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    new_customers: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    returning_customers: Option<f64>,
}

impl From<RawCustomerAnalytics> for CustomerAnalytics {
    fn from(raw: RawCustomerAnalytics) -> Self {
        CustomerAnalytics {
            total_customers: count(raw.total_customers),
            new_customers: count(raw.new_customers),
            returning_customers: count(raw.returning_customers),
        }
    }
}
