pub mod analytics_service;
pub mod category_service;
pub mod format;
pub mod inventory_service;
pub mod order_service;
pub mod product_service;
pub mod settings_service;
pub mod upload_service;
