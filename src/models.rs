use serde::{Deserialize, Serialize};

pub const TRANSACTION_PREFIX: &str = "T";
pub const PRODUCT_PREFIX: &str = "P";
pub const CUSTOMER_PREFIX: &str = "C";

/// One parsed sales line. Not yet known to satisfy the business rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub customer_id: String,
    pub region: String,
}

impl Transaction {
    /// Line value, `quantity * unit_price`. Computed on demand, never stored.
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    /// Numeric catalog key embedded in the product id (`P101` -> 101).
    pub fn catalog_key(&self) -> Option<i64> {
        self.product_id
            .strip_prefix(PRODUCT_PREFIX)?
            .trim()
            .parse()
            .ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<f64>,
    pub api_match: bool,
}

/// Product record from the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[cfg(test)]
pub(crate) fn sample(
    id: &str,
    date: &str,
    product: &str,
    quantity: i64,
    unit_price: f64,
    customer: &str,
    region: &str,
) -> Transaction {
    Transaction {
        transaction_id: id.to_string(),
        date: date.to_string(),
        product_id: "P101".to_string(),
        product_name: product.to_string(),
        quantity,
        unit_price,
        customer_id: customer.to_string(),
        region: region.to_string(),
    }
}
