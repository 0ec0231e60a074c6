//! Pure query pipeline: filter, sort, paginate.
//!
//! Callers validate `page >= 1` and `limit >= 1` before calling in; the
//! engine never reads or mutates shared state.

use std::cmp::Ordering;

use shared::{
    domain::Product,
    protocol::{PaginatedResult, QueryParams, SortOption},
};

pub fn query_products(catalog: &[Product], params: &QueryParams) -> PaginatedResult<Product> {
    let mut matches = filter_by_name(catalog, &params.search);
    sort_products(&mut matches, params.sort);
    paginate(&matches, params.page, params.limit)
}

/// Case-insensitive substring match on the product name. Blank searches keep
/// every product.
pub fn filter_by_name<'a>(catalog: &'a [Product], search: &str) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return catalog.iter().collect();
    }
    catalog
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort: products with equal keys keep their catalog order.
pub fn sort_products(products: &mut [&Product], sort: SortOption) {
    products.sort_by(|a, b| compare(a, b, sort));
}

fn compare(a: &Product, b: &Product, sort: SortOption) -> Ordering {
    match sort {
        SortOption::PriceAsc => cmp_price(a.price, b.price),
        SortOption::PriceDesc => cmp_price(b.price, a.price),
        SortOption::Recent => b.created_at.cmp(&a.created_at),
    }
}

/// Prices are finite. `-0.0` and `0.0` compare equal.
fn cmp_price(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// No clamping: a page past the end yields empty `data` while `total` and
/// `total_pages` still describe the whole filtered set.
pub fn paginate(products: &[&Product], page: u32, limit: u32) -> PaginatedResult<Product> {
    let total = products.len();
    let page_size = limit as usize;
    let total_pages = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);

    let data = products
        .iter()
        .skip(start)
        .take(page_size)
        .map(|product| (*product).clone())
        .collect();

    PaginatedResult {
        data,
        total,
        page,
        limit,
        total_pages,
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
