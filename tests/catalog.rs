mod common;

use common::product;
use laptop_store_admin::catalog::{
    ProductFilter, ProductListState, clamp_page, filter_products, paginate, total_pages,
};
use laptop_store_admin::models::ProductStatus;

/// 13 Dell laptops interleaved with 12 from other brands.
fn store() -> Vec<laptop_store_admin::models::Product> {
    (1..=25)
        .map(|i| {
            if i % 2 == 1 {
                product(i, "Dell", "Business")
            } else if i % 4 == 0 {
                product(i, "Lenovo", "Gaming")
            } else {
                product(i, "HP", "Business")
            }
        })
        .collect()
}

#[test]
fn brand_filter_pages_through_matches_only() {
    let mut list = ProductListState::new(store(), 10);
    list.set_filter(ProductFilter {
        brand: "Dell".into(),
        ..ProductFilter::default()
    });

    assert_eq!(list.filtered().len(), 13);

    let first = list.current_page();
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 10);
    assert!(first.has_next());
    assert!(!first.has_previous());

    list.set_page(2);
    let second = list.current_page();
    assert_eq!(second.page, 2);
    assert_eq!(second.items.len(), 3);
    assert!(!second.has_next());

    // There is no page 3; the request clamps to the last page.
    list.set_page(3);
    assert_eq!(list.page(), 2);
}

#[test]
fn filtering_keeps_source_order_and_subset() {
    let products = store();
    let filter = ProductFilter {
        search: "laptop 1".into(),
        brand: "Dell".into(),
        ..ProductFilter::default()
    };

    let matched = filter_products(&products, &filter);
    let ids: Vec<&str> = matched.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p11", "p13", "p15", "p17", "p19"]);
    assert!(matched.iter().all(|p| products.contains(p)));
}

#[test]
fn empty_filter_matches_everything() {
    let products = store();
    let filter = ProductFilter::default();
    assert!(filter.is_empty());
    assert_eq!(filter_products(&products, &filter).len(), products.len());
}

#[test]
fn search_is_case_insensitive_across_name_brand_and_category() {
    let products = store();
    let by_category = ProductFilter {
        search: "gAmInG".into(),
        ..ProductFilter::default()
    };
    assert_eq!(filter_products(&products, &by_category).len(), 6);

    let by_brand = ProductFilter {
        search: "lenovo".into(),
        ..ProductFilter::default()
    };
    assert_eq!(filter_products(&products, &by_brand).len(), 6);
}

#[test]
fn status_filter_is_exact() {
    let mut products = store();
    products[0].status = ProductStatus::OutOfStock;
    products[1].status = ProductStatus::Inactive;

    let filter = ProductFilter {
        status: "out_of_stock".into(),
        ..ProductFilter::default()
    };
    let matched = filter_products(&products, &filter);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "p1");
}

#[test]
fn changing_the_filter_returns_to_first_page() {
    let mut list = ProductListState::new(store(), 10);
    list.set_page(3);
    assert_eq!(list.page(), 3);

    list.set_filter(ProductFilter {
        category: "Business".into(),
        ..ProductFilter::default()
    });
    assert_eq!(list.page(), 1);

    // Re-applying the same filter leaves the page alone.
    list.set_page(2);
    list.set_filter(ProductFilter {
        category: "Business".into(),
        ..ProductFilter::default()
    });
    assert_eq!(list.page(), 2);
}

#[test]
fn shrinking_the_product_set_clamps_the_page() {
    let mut list = ProductListState::new(store(), 10);
    list.set_page(3);
    list.replace_products(store().into_iter().take(12).collect());
    assert_eq!(list.page(), 2);
}

#[test]
fn pagination_helpers() {
    assert_eq!(total_pages(0, 10), 0);
    assert_eq!(total_pages(10, 10), 1);
    assert_eq!(total_pages(11, 10), 2);
    assert_eq!(total_pages(5, 0), 0);

    assert_eq!(clamp_page(0, 25, 10), 1);
    assert_eq!(clamp_page(9, 25, 10), 3);
    assert_eq!(clamp_page(4, 0, 10), 1);

    let items: Vec<u32> = (1..=25).collect();
    let last = paginate(&items, 3, 10);
    assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
    assert_eq!(last.total_items, 25);

    let beyond = paginate(&items, 4, 10);
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_pages, 3);
}

#[test]
fn concatenated_pages_rebuild_the_list_exactly_once() {
    for count in [0_usize, 1, 10, 11, 25] {
        let items: Vec<usize> = (0..count).collect();
        let pages = total_pages(count, 10);

        let mut rebuilt = Vec::new();
        for page in 1..=pages {
            let slice = paginate(&items, page, 10);
            assert!(!slice.items.is_empty(), "page {page} of {count} is empty");
            assert!(slice.items.len() <= 10);
            rebuilt.extend(slice.items);
        }
        assert_eq!(rebuilt, items, "count {count}");
    }
}

#[test]
fn search_term_is_used_as_given_on_both_paths() {
    use laptop_store_admin::routes::params::AdminProductQuery;
    use laptop_store_admin::search::{FilterValues, SearchQuery};

    let from_widget = SearchQuery {
        search: " Laptop 1".into(),
        filters: FilterValues::default(),
    }
    .to_product_filter();
    let from_route = AdminProductQuery {
        search: Some(" Laptop 1".into()),
        ..AdminProductQuery::default()
    }
    .filter();
    assert_eq!(from_widget, from_route);

    let products = store();
    let matched = filter_products(&products, &from_route);
    // "p1" and "p10".."p19" contain " Laptop 1".
    assert_eq!(matched.len(), 11);
}
