use super::*;
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::domain::{ProductId, VendorSlug};

fn product(id: usize, name: &str, price: f64, age_days: i64) -> Product {
    Product {
        id: ProductId::new(format!("p{id}")),
        name: name.to_string(),
        price,
        image: format!("/p{id}.jpg"),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() - Duration::days(age_days),
        vendor_slug: VendorSlug::new("acme"),
        description: None,
    }
}

fn priced_catalog(prices: &[f64]) -> Vec<Product> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| product(i, &format!("item {i}"), *price, i as i64))
        .collect()
}

fn params(search: &str, sort: SortOption, page: u32, limit: u32) -> QueryParams {
    QueryParams {
        search: search.to_string(),
        sort,
        page,
        limit,
    }
}

fn ids(result: &PaginatedResult<Product>) -> Vec<&str> {
    result.data.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn second_page_holds_remainder_in_ascending_price() {
    let catalog = priced_catalog(&[5.0, 3.0, 9.0, 1.0, 7.0, 2.0, 8.0, 4.0, 6.0, 10.0]);
    let result = query_products(&catalog, &params("", SortOption::PriceAsc, 2, 8));
    let prices: Vec<f64> = result.data.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![9.0, 10.0]);
    assert_eq!(result.total, 10);
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.page, 2);
}

#[test]
fn search_is_case_insensitive_substring_in_catalog_order() {
    let catalog = vec![
        product(1, "Shoe A", 10.0, 0),
        product(2, "Sandals", 20.0, 0),
        product(3, "Running Shoe", 30.0, 0),
    ];
    let filtered = filter_by_name(&catalog, "shoe");
    let names: Vec<_> = filtered.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Shoe A", "Running Shoe"]);

    let result = query_products(&catalog, &params("  SHOE ", SortOption::Recent, 1, 8));
    assert_eq!(result.total, 2);
}

#[test]
fn blank_search_keeps_everything() {
    let catalog = priced_catalog(&[1.0, 2.0, 3.0]);
    assert_eq!(filter_by_name(&catalog, "   ").len(), 3);
}

#[test]
fn recent_sorts_newest_first() {
    let catalog = vec![
        product(1, "old", 1.0, 30),
        product(2, "new", 1.0, 1),
        product(3, "middle", 1.0, 10),
    ];
    let result = query_products(&catalog, &params("", SortOption::Recent, 1, 8));
    assert_eq!(ids(&result), vec!["p2", "p3", "p1"]);
}

#[test]
fn equal_keys_keep_catalog_order() {
    let catalog = vec![
        product(1, "a", 5.0, 0),
        product(2, "b", 5.0, 0),
        product(3, "c", 1.0, 0),
        product(4, "d", 5.0, 0),
    ];
    let asc = query_products(&catalog, &params("", SortOption::PriceAsc, 1, 8));
    assert_eq!(ids(&asc), vec!["p3", "p1", "p2", "p4"]);
    let desc = query_products(&catalog, &params("", SortOption::PriceDesc, 1, 8));
    assert_eq!(ids(&desc), vec!["p1", "p2", "p4", "p3"]);
    let recent = query_products(&catalog, &params("", SortOption::Recent, 1, 8));
    assert_eq!(ids(&recent), vec!["p1", "p2", "p3", "p4"]);
}

#[test]
fn signed_zero_prices_tie_in_catalog_order() {
    let catalog = priced_catalog(&[0.0, -0.0, 2.0, 0.0]);
    let asc = query_products(&catalog, &params("", SortOption::PriceAsc, 1, 8));
    assert_eq!(ids(&asc), vec!["p0", "p1", "p3", "p2"]);
    let desc = query_products(&catalog, &params("", SortOption::PriceDesc, 1, 8));
    assert_eq!(ids(&desc), vec!["p2", "p0", "p1", "p3"]);
}

#[test]
fn page_past_the_end_is_empty_but_keeps_totals() {
    let catalog = priced_catalog(&[1.0; 10]);
    let result = query_products(&catalog, &params("", SortOption::Recent, 2 + 5, 8));
    assert!(result.data.is_empty());
    assert_eq!(result.total, 10);
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.page, 7);
}

#[test]
fn empty_match_has_zero_pages() {
    let catalog = priced_catalog(&[1.0, 2.0]);
    let result = query_products(&catalog, &params("nothing", SortOption::Recent, 1, 8));
    assert_eq!(result.total, 0);
    assert_eq!(result.total_pages, 0);
    assert!(result.data.is_empty());
}

#[test]
fn engine_does_not_reorder_the_catalog() {
    let catalog = priced_catalog(&[3.0, 1.0, 2.0]);
    let before = catalog.clone();
    let _ = query_products(&catalog, &params("", SortOption::PriceAsc, 1, 8));
    assert_eq!(catalog, before);
}

fn arb_catalog() -> impl Strategy<Value = Vec<Product>> {
    let names = prop::sample::select(vec![
        "Shoe", "running shoe", "Sandal", "Hat", "SHOELACE", "bag", "Tote Bag",
    ]);
    prop::collection::vec((names, 0u32..500, 0i64..60), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, cents, age))| product(i, name, f64::from(cents) / 4.0, age))
            .collect()
    })
}

fn arb_params() -> impl Strategy<Value = QueryParams> {
    let search = prop::sample::select(vec!["", "shoe", "BAG", " hat ", "zzz"]);
    let sort = prop::sample::select(SortOption::ALL.to_vec());
    (search, sort, 1u32..8, 1u32..12).prop_map(|(search, sort, page, limit)| {
        params(search, sort, page, limit)
    })
}

proptest! {
    #[test]
    fn total_pages_is_ceiling_of_filtered_count(catalog in arb_catalog(), q in arb_params()) {
        let filtered = filter_by_name(&catalog, &q.search).len();
        let result = query_products(&catalog, &q);
        prop_assert_eq!(result.total, filtered);
        prop_assert_eq!(result.total_pages, filtered.div_ceil(q.limit as usize));
        prop_assert_eq!(result.total_pages == 0, filtered == 0);
    }

    #[test]
    fn page_never_exceeds_limit(catalog in arb_catalog(), q in arb_params()) {
        let result = query_products(&catalog, &q);
        prop_assert!(result.data.len() <= q.limit as usize);
    }

    #[test]
    fn repeated_queries_are_identical(catalog in arb_catalog(), q in arb_params()) {
        prop_assert_eq!(query_products(&catalog, &q), query_products(&catalog, &q));
    }

    #[test]
    fn pages_are_ordered_by_sort_key(catalog in arb_catalog(), q in arb_params()) {
        let result = query_products(&catalog, &q);
        for pair in result.data.windows(2) {
            match q.sort {
                SortOption::PriceAsc => prop_assert!(pair[0].price <= pair[1].price),
                SortOption::PriceDesc => prop_assert!(pair[0].price >= pair[1].price),
                SortOption::Recent => prop_assert!(pair[0].created_at >= pair[1].created_at),
            }
        }
    }

    #[test]
    fn every_result_matches_search(catalog in arb_catalog(), q in arb_params()) {
        let needle = q.search.trim().to_lowercase();
        let result = query_products(&catalog, &q);
        for product in &result.data {
            prop_assert!(product.name.to_lowercase().contains(&needle));
        }
    }

    #[test]
    fn pages_past_the_end_are_empty(catalog in arb_catalog(), q in arb_params()) {
        let first = query_products(&catalog, &q);
        let beyond = q.with_page(first.total_pages as u32 + 5);
        let result = query_products(&catalog, &beyond);
        prop_assert!(result.data.is_empty());
        prop_assert_eq!(result.total, first.total);
        prop_assert_eq!(result.total_pages, first.total_pages);
    }
}
