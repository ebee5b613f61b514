use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Transaction, CUSTOMER_PREFIX, PRODUCT_PREFIX, TRANSACTION_PREFIX};

/// Business-rule violation that excludes a record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    #[error("quantity must be positive")]
    NonPositiveQuantity,
    #[error("unit price must be positive")]
    NonPositivePrice,
    #[error("transaction id must start with 'T'")]
    TransactionIdPrefix,
    #[error("product id must start with 'P'")]
    ProductIdPrefix,
    #[error("customer id must start with 'C'")]
    CustomerIdPrefix,
    #[error("region is empty")]
    EmptyRegion,
}

impl Invalid {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity => "quantity",
            Self::NonPositivePrice => "unit_price",
            Self::TransactionIdPrefix => "transaction_id",
            Self::ProductIdPrefix => "product_id",
            Self::CustomerIdPrefix => "customer_id",
            Self::EmptyRegion => "region",
        }
    }
}

/// Optional user filters, applied after validity in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

/// Regions and amount range over every valid record, before filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observed {
    pub regions: BTreeSet<String>,
    pub amount_range: Option<(f64, f64)>,
}

pub struct Validation {
    pub valid: Vec<Transaction>,
    pub invalid_count: usize,
    pub summary: Summary,
    pub rejected: BTreeMap<&'static str, usize>,
}

/// Returns the line amount for a record that passes every rule.
pub fn check(tx: &Transaction) -> Result<f64, Invalid> {
    if tx.quantity <= 0 {
        return Err(Invalid::NonPositiveQuantity);
    }
    if tx.unit_price <= 0.0 {
        return Err(Invalid::NonPositivePrice);
    }
    if !tx.transaction_id.starts_with(TRANSACTION_PREFIX) {
        return Err(Invalid::TransactionIdPrefix);
    }
    if !tx.product_id.starts_with(PRODUCT_PREFIX) {
        return Err(Invalid::ProductIdPrefix);
    }
    if !tx.customer_id.starts_with(CUSTOMER_PREFIX) {
        return Err(Invalid::CustomerIdPrefix);
    }
    if tx.region.is_empty() {
        return Err(Invalid::EmptyRegion);
    }
    Ok(tx.amount())
}

fn observed_from<'a>(passed: impl IntoIterator<Item = (&'a Transaction, f64)>) -> Observed {
    passed
        .into_iter()
        .fold(Observed::default(), |mut seen, (tx, amount)| {
            seen.regions.insert(tx.region.clone());
            seen.amount_range = Some(match seen.amount_range {
                Some((lo, hi)) => (lo.min(amount), hi.max(amount)),
                None => (amount, amount),
            });
            seen
        })
}

pub fn observe(records: &[Transaction]) -> Observed {
    observed_from(
        records
            .iter()
            .filter_map(|tx| check(tx).ok().map(|amount| (tx, amount))),
    )
}

pub fn validate_and_filter(records: &[Transaction], filters: &Filters) -> Validation {
    let mut rejected = BTreeMap::new();
    let mut passed: Vec<(&Transaction, f64)> = Vec::with_capacity(records.len());

    for tx in records {
        match check(tx) {
            Ok(amount) => passed.push((tx, amount)),
            Err(reason) => {
                debug!(id = %tx.transaction_id, %reason, "invalid record");
                *rejected.entry(reason.kind()).or_insert(0) += 1;
            }
        }
    }
    let invalid_count = records.len() - passed.len();

    let observed = observed_from(passed.iter().copied());
    info!(regions = ?observed.regions, "available regions");
    if let Some((lo, hi)) = observed.amount_range {
        info!(min = lo, max = hi, "transaction amount range");
    }

    let mut filtered_by_region = 0;
    if let Some(region) = filters.region.as_deref().filter(|r| !r.is_empty()) {
        let before = passed.len();
        passed.retain(|(tx, _)| tx.region == region);
        filtered_by_region = before - passed.len();
    }

    let mut filtered_by_amount = 0;
    if let Some(min) = filters.min_amount {
        let before = passed.len();
        passed.retain(|(_, amount)| *amount >= min);
        filtered_by_amount += before - passed.len();
    }
    if let Some(max) = filters.max_amount {
        let before = passed.len();
        passed.retain(|(_, amount)| *amount <= max);
        filtered_by_amount += before - passed.len();
    }

    let valid: Vec<Transaction> = passed.into_iter().map(|(tx, _)| tx.clone()).collect();
    let summary = Summary {
        total_input: records.len(),
        invalid: invalid_count,
        filtered_by_region,
        filtered_by_amount,
        final_count: valid.len(),
    };

    Validation {
        valid,
        invalid_count,
        summary,
        rejected,
    }
}
