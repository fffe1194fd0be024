//! Client-side filtering and paging of an already fetched product list.

mod filter;
mod list_state;
mod pagination;

pub use filter::{ProductFilter, filter_products};
pub use list_state::ProductListState;
pub use pagination::{DEFAULT_PAGE_SIZE, Page, clamp_page, paginate, total_pages};
