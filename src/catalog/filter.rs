use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

/// Criteria for the admin product table. Empty strings are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductFilter {
    pub search: String,
    pub category: String,
    pub brand: String,
    pub status: String,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.category.is_empty()
            && self.brand.is_empty()
            && self.status.is_empty()
    }

    /// Search is a case-insensitive substring match over name, brand and
    /// category name. Category, brand and status must match exactly.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && exact(&self.category, &product.category.name)
            && exact(&self.brand, &product.brand)
            && exact(&self.status, product.status.as_str())
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [
            product.name.as_str(),
            product.brand.as_str(),
            product.category.name.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn exact(wanted: &str, actual: &str) -> bool {
    wanted.is_empty() || wanted == actual
}

/// Products satisfying every active criterion, in their original order.
pub fn filter_products<'a>(products: &'a [Product], filter: &ProductFilter) -> Vec<&'a Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}
