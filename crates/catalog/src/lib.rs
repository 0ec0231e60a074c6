use std::{collections::HashSet, fs, path::Path, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use shared::domain::{Product, ProductId, Vendor, VendorSlug};
use thiserror::Error;
use tracing::info;

const DEMO_CATALOG_JSON: &str = include_str!("../data/demo_catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id '{0}'")]
    DuplicateProductId(ProductId),
    #[error("duplicate vendor slug '{0}'")]
    DuplicateVendorSlug(VendorSlug),
    #[error("product '{product_id}' references unknown vendor '{vendor_slug}'")]
    UnknownVendor {
        product_id: ProductId,
        vendor_slug: VendorSlug,
    },
    #[error("product '{0}' has a negative or non-finite price")]
    InvalidPrice(ProductId),
}

/// Read access to vendor catalogs. Implementations may be backed by memory,
/// a file or a remote service.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn vendors(&self) -> Vec<Vendor>;
    async fn vendor_by_slug(&self, slug: &str) -> Option<Vendor>;
    async fn products_by_vendor_slug(&self, slug: &str) -> Vec<Product>;
    async fn product_by_id(&self, id: &str) -> Option<Product>;
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    vendors: Vec<Vendor>,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug)]
struct CatalogData {
    vendors: Vec<Vendor>,
    products: Vec<Product>,
}

/// Immutable in-memory catalog. Cloning is cheap and shares the same data.
#[derive(Debug, Clone)]
pub struct Catalog {
    data: Arc<CatalogData>,
}

impl Catalog {
    pub fn new(vendors: Vec<Vendor>, products: Vec<Product>) -> Result<Self, CatalogError> {
        validate(&vendors, &products)?;
        Ok(Self {
            data: Arc::new(CatalogData { vendors, products }),
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::new(document.vendors, document.products)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            vendors = catalog.data.vendors.len(),
            products = catalog.data.products.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn demo() -> Result<Self, CatalogError> {
        Self::from_json_str(DEMO_CATALOG_JSON)
    }

    pub fn vendor_list(&self) -> &[Vendor] {
        &self.data.vendors
    }

    pub fn find_vendor(&self, slug: &str) -> Option<&Vendor> {
        self.data.vendors.iter().find(|v| v.slug.as_str() == slug)
    }

    /// Products of one vendor, in catalog order.
    pub fn products_for(&self, slug: &str) -> Vec<Product> {
        self.data
            .products
            .iter()
            .filter(|p| p.vendor_slug.as_str() == slug)
            .cloned()
            .collect()
    }

    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.data.products.iter().find(|p| p.id.as_str() == id)
    }

    pub fn product_count(&self) -> usize {
        self.data.products.len()
    }
}

#[async_trait]
impl CatalogSource for Catalog {
    async fn vendors(&self) -> Vec<Vendor> {
        self.data.vendors.clone()
    }

    async fn vendor_by_slug(&self, slug: &str) -> Option<Vendor> {
        self.find_vendor(slug).cloned()
    }

    async fn products_by_vendor_slug(&self, slug: &str) -> Vec<Product> {
        self.products_for(slug)
    }

    async fn product_by_id(&self, id: &str) -> Option<Product> {
        self.find_product(id).cloned()
    }
}

fn validate(vendors: &[Vendor], products: &[Product]) -> Result<(), CatalogError> {
    let mut slugs = HashSet::with_capacity(vendors.len());
    for vendor in vendors {
        if !slugs.insert(vendor.slug.as_str()) {
            return Err(CatalogError::DuplicateVendorSlug(vendor.slug.clone()));
        }
    }

    let mut ids = HashSet::with_capacity(products.len());
    for product in products {
        if !ids.insert(product.id.as_str()) {
            return Err(CatalogError::DuplicateProductId(product.id.clone()));
        }
        if !slugs.contains(product.vendor_slug.as_str()) {
            return Err(CatalogError::UnknownVendor {
                product_id: product.id.clone(),
                vendor_slug: product.vendor_slug.clone(),
            });
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(CatalogError::InvalidPrice(product.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
