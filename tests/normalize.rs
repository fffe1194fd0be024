use laptop_store_admin::{
    api::{unwrap_list, unwrap_paged},
    models::{Category, CategoryRef, DashboardStats, Order, OrderStatus, PaymentStatus, Product, ProductStatus},
    normalize::{RawCategory, RawDashboardStats, RawOrder, RawProduct, resolve_categories},
};
use serde_json::json;

fn product(value: serde_json::Value) -> Product {
    Product::from(serde_json::from_value::<RawProduct>(value).expect("raw product"))
}

#[test]
fn mongo_style_product_is_normalized() {
    let p = product(json!({
        "_id": "65f0",
        "name": "ROG Zephyrus",
        "price": "2199.99",
        "stock": 3,
        "category": { "_id": "cat-gaming", "name": "Gaming" },
        "brand": { "_id": "b1", "name": "Asus" },
        "images": [{ "url": "https://cdn.example.com/rog.jpg" }],
        "isFeatured": true,
        "averageRating": 4.5,
        "numReviews": 12,
        "status": "out_of_stock",
        "specifications": { "ram": "32GB", "weight": 1.6, "gpu": null }
    }));

    assert_eq!(p.id, "65f0");
    assert_eq!(p.price, 2199.99);
    assert_eq!(p.stock_quantity, 3);
    assert_eq!(
        p.category,
        CategoryRef { id: Some("cat-gaming".into()), name: "Gaming".into() }
    );
    assert_eq!(p.brand, "Asus");
    assert_eq!(p.images, vec!["https://cdn.example.com/rog.jpg".to_string()]);
    assert!(p.is_hot);
    assert_eq!(p.rating, 4.5);
    assert_eq!(p.review_count, 12);
    assert_eq!(p.status, ProductStatus::OutOfStock);
    assert_eq!(p.specifications.get("weight").map(String::as_str), Some("1.6"));
    assert!(!p.specifications.contains_key("gpu"));
}

#[test]
fn plain_product_prefers_canonical_fields() {
    let p = product(json!({
        "id": 42,
        "name": "XPS 13",
        "price": 1299,
        "stock": 1,
        "stockQuantity": 8,
        "category": "Ultrabook",
        "brand": "Dell",
        "image": "https://cdn.example.com/xps.jpg",
        "status": "discontinued"
    }));

    assert_eq!(p.id, "42");
    assert_eq!(p.stock_quantity, 8);
    assert_eq!(p.category, CategoryRef::named("Ultrabook"));
    assert_eq!(p.images.len(), 1);
    // Unknown statuses fall back to active.
    assert_eq!(p.status, ProductStatus::Active);
}

#[test]
fn categories_resolve_by_id_or_name_through_the_tree() {
    let categories: Vec<Category> = unwrap_list::<RawCategory>(json!({
        "success": true,
        "data": [
            { "_id": "c1", "name": "Laptops", "children": [
                { "_id": "c2", "name": "Gaming", "parent": "c1" }
            ]}
        ]
    }))
    .expect("category list")
    .into_iter()
    .map(Category::from)
    .collect();
    assert_eq!(categories[0].children[0].parent_id.as_deref(), Some("c1"));

    let mut products = vec![
        product(json!({ "_id": "p1", "category": "c2" })),
        product(json!({ "_id": "p2", "category": "Gaming" })),
        product(json!({ "_id": "p3", "category": { "_id": "c1" } })),
        product(json!({ "_id": "p4", "category": "Tablets" })),
    ];
    resolve_categories(&mut products, &categories);

    let refs: Vec<(Option<&str>, &str)> = products
        .iter()
        .map(|p| (p.category.id.as_deref(), p.category.name.as_str()))
        .collect();
    assert_eq!(
        refs,
        vec![
            (Some("c2"), "Gaming"),
            (Some("c2"), "Gaming"),
            (Some("c1"), "Laptops"),
            (None, "Tablets"),
        ]
    );
}

#[test]
fn order_total_falls_back_to_line_items() {
    let order = Order::from(
        serde_json::from_value::<RawOrder>(json!({
            "_id": "o1",
            "user": { "_id": "u1", "name": "Ana", "email": "ana@example.com" },
            "orderItems": [
                { "product": { "_id": "p1", "name": "XPS 13", "price": 1000 }, "quantity": 2 },
                { "name": "Mouse", "price": "25.5", "quantity": 1 }
            ],
            "orderStatus": "Canceled",
            "paymentStatus": "completed"
        }))
        .expect("raw order"),
    );

    assert_eq!(order.id, "o1");
    assert_eq!(order.customer.email.as_deref(), Some("ana@example.com"));
    assert_eq!(order.items[0].product_id.as_deref(), Some("p1"));
    assert_eq!(order.items[0].name, "XPS 13");
    assert_eq!(order.total_amount, 2025.5);
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[test]
fn dashboard_stats_default_missing_figures_to_zero() {
    let stats = DashboardStats::from(
        serde_json::from_value::<RawDashboardStats>(json!({
            "totalRevenue": "15000.5",
            "totalUsers": 40,
            "totalOrders": -3,
            "revenueGrowth": -12.5
        }))
        .expect("raw stats"),
    );

    assert_eq!(stats.total_revenue, 15000.5);
    assert_eq!(stats.total_customers, 40);
    assert_eq!(stats.total_orders, 0);
    assert_eq!(stats.total_products, 0);
    assert_eq!(stats.revenue_growth, -12.5);
}

#[test]
fn paged_envelopes_carry_pagination() {
    let paged = unwrap_paged::<RawProduct>(json!({
        "success": true,
        "data": {
            "products": [{ "_id": "a" }, { "_id": "b" }],
            "pagination": { "page": 2, "limit": 2, "total": 9, "pages": 5 }
        }
    }))
    .expect("paged products");

    assert_eq!(paged.items.len(), 2);
    assert_eq!(paged.page, Some(2));
    assert_eq!(paged.total, Some(9));
    assert_eq!(paged.total_pages, Some(5));
}
