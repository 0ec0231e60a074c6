use std::sync::Arc;

use catalog::CatalogSource;
use shared::{
    domain::{Product, Vendor},
    error::ApiError,
    protocol::{PaginatedResult, QueryParams},
};
use tracing::debug;

pub mod engine;

pub use engine::query_products;

#[derive(Clone)]
pub struct ApiContext {
    pub catalog: Arc<dyn CatalogSource>,
}

impl ApiContext {
    pub fn new(catalog: impl CatalogSource + 'static) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

pub fn products_route() -> &'static str {
    "/products/:vendor_slug"
}

pub async fn list_vendors(ctx: &ApiContext) -> Vec<Vendor> {
    ctx.catalog.vendors().await
}

pub async fn get_vendor(ctx: &ApiContext, vendor_slug: &str) -> Result<Vendor, ApiError> {
    ctx.catalog
        .vendor_by_slug(vendor_slug)
        .await
        .ok_or_else(|| vendor_not_found(vendor_slug))
}

/// Runs the query pipeline over one vendor's catalog. `params` must already
/// be normalized.
pub async fn list_products(
    ctx: &ApiContext,
    vendor_slug: &str,
    params: &QueryParams,
) -> Result<PaginatedResult<Product>, ApiError> {
    get_vendor(ctx, vendor_slug).await?;
    let products = ctx.catalog.products_by_vendor_slug(vendor_slug).await;
    let result = query_products(&products, params);
    debug!(
        vendor_slug,
        search = %params.search,
        sort = %params.sort,
        page = params.page,
        total = result.total,
        "products queried"
    );
    Ok(result)
}

pub async fn get_product(ctx: &ApiContext, product_id: &str) -> Result<Product, ApiError> {
    ctx.catalog
        .product_by_id(product_id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("product '{product_id}' not found")))
}

fn vendor_not_found(vendor_slug: &str) -> ApiError {
    ApiError::not_found(format!("vendor '{vendor_slug}' not found"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
