use crate::models::Product;

use super::{ProductFilter, filter::filter_products, pagination::{Page, clamp_page, paginate}};

/// State behind the admin product table: the fetched collection, the active
/// filter and the current page.
///
/// The collection is only ever replaced wholesale after a reload; mutations
/// are never applied locally ahead of the backend.
#[derive(Debug, Clone)]
pub struct ProductListState {
    products: Vec<Product>,
    filter: ProductFilter,
    page: usize,
    page_size: usize,
}

impl ProductListState {
    pub fn new(products: Vec<Product>, page_size: usize) -> Self {
        Self {
            products,
            filter: ProductFilter::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// A new filter always starts back at page 1.
    pub fn set_filter(&mut self, filter: ProductFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.filtered().len(), self.page_size);
    }

    /// Swaps in a freshly loaded collection, keeping the page in range.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.page = clamp_page(self.page, self.filtered().len(), self.page_size);
    }

    pub fn filtered(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.filter)
    }

    pub fn current_page(&self) -> Page<Product> {
        let filtered: Vec<Product> = self.filtered().into_iter().cloned().collect();
        paginate(&filtered, self.page, self.page_size)
    }
}
