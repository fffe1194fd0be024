//! Product create/edit form: draft state, validation and payload mapping.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::products::ProductPayload,
    error::{AppError, AppResult},
    models::{Product, ProductStatus},
};

pub const SHORT_DESCRIPTION_MAX_CHARS: usize = 150;

/// Field name → message. Every failing rule is reported, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.errors.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category: String,
    pub brand: String,
    pub stock_quantity: i64,
    pub status: ProductStatus,
    pub images: Option<Vec<String>>,
    pub specifications: BTreeMap<String, String>,
    pub is_new: bool,
    pub is_hot: bool,
    pub is_sale: bool,
}

impl ProductDraft {
    /// Seeds the edit form from an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            short_description: product.short_description.clone(),
            price: product.price,
            original_price: product.original_price,
            category: product
                .category
                .id
                .clone()
                .unwrap_or_else(|| product.category.name.clone()),
            brand: product.brand.clone(),
            stock_quantity: product.stock_quantity,
            status: product.status,
            images: Some(product.images.clone()),
            specifications: product.specifications.clone(),
            is_new: product.is_new,
            is_hot: product.is_hot,
            is_sale: product.is_sale,
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.add("name", "Product name is required");
        }
        if self.description.trim().is_empty() {
            errors.add("description", "Description is required");
        }
        if self.short_description.trim().is_empty() {
            errors.add("shortDescription", "Short description is required");
        } else if self.short_description.chars().count() > SHORT_DESCRIPTION_MAX_CHARS {
            errors.add(
                "shortDescription",
                format!("Short description must be at most {SHORT_DESCRIPTION_MAX_CHARS} characters"),
            );
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            errors.add("price", "Price must be greater than 0");
        }
        if self.category.trim().is_empty() {
            errors.add("category", "Category is required");
        }
        if self.brand.trim().is_empty() {
            errors.add("brand", "Brand is required");
        }
        if self.stock_quantity < 0 {
            errors.add("stockQuantity", "Stock quantity cannot be negative");
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    pub fn into_payload(self) -> ProductPayload {
        ProductPayload {
            name: self.name.trim().to_string(),
            description: self.description,
            short_description: self.short_description,
            price: self.price,
            original_price: self.original_price.filter(|p| *p > 0.0),
            category: self.category.trim().to_string(),
            brand: self.brand.trim().to_string(),
            stock_quantity: self.stock_quantity,
            status: self.status,
            images: self.images.unwrap_or_default(),
            specifications: self.specifications,
            is_new: self.is_new,
            is_featured: self.is_hot,
            is_on_sale: self.is_sale,
        }
    }

    /// Validates and, only if clean, builds the payload.
    pub fn try_into_payload(self) -> AppResult<ProductPayload> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(self.into_payload())
    }
}

/// A product form dialog: open while editing, closed once a submit lands.
#[derive(Debug, Clone)]
pub struct ProductForm {
    draft: ProductDraft,
    editing_id: Option<String>,
    errors: ValidationErrors,
    open: bool,
}

impl ProductForm {
    pub fn create() -> Self {
        Self {
            draft: ProductDraft::default(),
            editing_id: None,
            errors: ValidationErrors::default(),
            open: true,
        }
    }

    pub fn edit(product: &Product) -> Self {
        Self {
            draft: ProductDraft::from_product(product),
            editing_id: Some(product.id.clone()),
            errors: ValidationErrors::default(),
            open: true,
        }
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Validates, hands the payload to `on_submit`, and closes the form only
    /// when `on_submit` succeeds. On failure the form stays open with the
    /// draft intact.
    pub async fn submit<T, F, Fut>(&mut self, on_submit: F) -> AppResult<T>
    where
        F: FnOnce(ProductPayload) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        self.errors = self.draft.validate();
        if !self.errors.is_empty() {
            return Err(AppError::Validation(self.errors.clone()));
        }

        let payload = self.draft.clone().into_payload();
        let saved = on_submit(payload).await?;
        self.open = false;
        Ok(saved)
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
