//! External product catalog client.
//!
//! One blocking GET against a DummyJSON-style listing (`{"products": [...]}`),
//! capped by `?limit=`. No retries. Callers that only want enrichment data use
//! [`load_catalog`], which turns every failure into an empty mapping.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::ProductInfo;
use crate::settings::Settings;

pub type Catalog = HashMap<i64, ProductInfo>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("unexpected response: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct ProductPage {
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

pub struct CatalogClient {
    http: reqwest::blocking::Client,
    url: String,
    limit: u32,
}

impl CatalogClient {
    pub fn new(url: &str, limit: u32, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("salesreport/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.to_string(),
            limit,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(
            &settings.catalog_url,
            settings.catalog_limit,
            Duration::from_secs(settings.catalog_timeout_secs),
        )
    }

    pub fn fetch_products(&self) -> Result<Vec<ProductInfo>, FetchError> {
        let resp = self
            .http
            .get(&self.url)
            .query(&[("limit", self.limit)])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        let mut page = parse_product_page(&body)?;
        page.truncate(self.limit as usize);
        Ok(page)
    }
}

/// Decode a listing page. Entries that fail to decode, such as a missing or
/// null id, are skipped.
fn parse_product_page(body: &str) -> Result<Vec<ProductInfo>, FetchError> {
    let page: ProductPage =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    let total = page.products.len();
    let products: Vec<ProductInfo> = page
        .products
        .into_iter()
        .filter_map(|raw| serde_json::from_value(raw).ok())
        .collect();
    if products.len() < total {
        debug!(skipped = total - products.len(), "skipped malformed catalog entries");
    }
    Ok(products)
}

/// Index products by id. A later duplicate id replaces an earlier one.
pub fn create_product_mapping(products: &[ProductInfo]) -> Catalog {
    products.iter().map(|p| (p.id, p.clone())).collect()
}

/// Fetch and index the catalog, falling back to an empty one on any failure.
pub fn load_catalog(settings: &Settings) -> Catalog {
    let fetched = CatalogClient::from_settings(settings).and_then(|c| c.fetch_products());
    match fetched {
        Ok(products) => {
            info!(count = products.len(), "fetched product catalog");
            create_product_mapping(&products)
        }
        Err(e) => {
            warn!(error = %e, "catalog unavailable, continuing without enrichment");
            Catalog::new()
        }
    }
}
