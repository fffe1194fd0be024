use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dashboard::DashboardSnapshot,
    dto::{
        inventory::InventoryAdjustRequest,
        orders::{OrderList, UpdateOrderStatusRequest, UpdatePaymentStatusRequest},
        products::{
            AdminProductPage, BulkIdsRequest, BulkStatusRequest, ProductList, ProductPayload,
            UpdateProductStatusRequest,
        },
        uploads::{UploadBatch, UploadedImage},
    },
    form::ProductDraft,
    models::{
        Brand, Category, CategoryRef, CustomerAnalytics, CustomerRef, DashboardStats, Order,
        OrderItem, OrderStats, OrderStatus, PaymentStatus, Product, ProductStatus, SalesPoint,
        ShippingAddress, StoreSettings, TopProduct,
    },
    response::{ApiResponse, Meta},
    routes::{admin, categories, dashboard, health, orders, params, products, uploads},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::list_brands,
        products::list_featured,
        products::get_product,
        categories::list_categories,
        categories::category_tree,
        categories::get_category,
        admin::list_admin_products,
        admin::get_admin_product,
        admin::create_product,
        admin::update_product,
        admin::update_product_status,
        admin::delete_product,
        admin::bulk_delete,
        admin::bulk_status,
        admin::list_inventory,
        admin::list_low_stock,
        admin::adjust_inventory,
        admin::get_settings,
        admin::update_settings,
        orders::list_orders,
        orders::order_stats,
        orders::get_order,
        orders::update_order_status,
        orders::update_payment_status,
        dashboard::get_dashboard,
        dashboard::get_report,
        uploads::upload_images
    ),
    components(
        schemas(
            Product,
            ProductStatus,
            CategoryRef,
            Category,
            Brand,
            Order,
            OrderItem,
            OrderStatus,
            PaymentStatus,
            OrderStats,
            CustomerRef,
            ShippingAddress,
            DashboardStats,
            SalesPoint,
            TopProduct,
            CustomerAnalytics,
            StoreSettings,
            DashboardSnapshot,
            ProductDraft,
            ProductPayload,
            ProductList,
            AdminProductPage,
            BulkIdsRequest,
            BulkStatusRequest,
            UpdateProductStatusRequest,
            InventoryAdjustRequest,
            UpdateOrderStatusRequest,
            UpdatePaymentStatusRequest,
            OrderList,
            UploadBatch,
            UploadedImage,
            dashboard::AnalyticsReport,
            params::CatalogQuery,
            params::ProductSortBy,
            params::AnalyticsPeriod,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<AdminProductPage>,
            ApiResponse<OrderList>,
            ApiResponse<DashboardSnapshot>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Public catalog endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Admin", description = "Admin console endpoints"),
        (name = "Dashboard", description = "Dashboard and analytics endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
