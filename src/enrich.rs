use std::path::Path;

use tracing::info;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{EnrichedTransaction, Transaction};

pub const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

pub fn enrich_one(tx: &Transaction, catalog: &Catalog) -> EnrichedTransaction {
    match tx.catalog_key().and_then(|key| catalog.get(&key)) {
        Some(product) => EnrichedTransaction {
            transaction: tx.clone(),
            api_category: product.category.clone(),
            api_brand: product.brand.clone(),
            api_rating: product.rating,
            api_match: true,
        },
        None => EnrichedTransaction {
            transaction: tx.clone(),
            api_category: None,
            api_brand: None,
            api_rating: None,
            api_match: false,
        },
    }
}

pub fn enrich(txs: &[Transaction], catalog: &Catalog) -> Vec<EnrichedTransaction> {
    let enriched: Vec<EnrichedTransaction> =
        txs.iter().map(|tx| enrich_one(tx, catalog)).collect();
    let matched = enriched.iter().filter(|e| e.api_match).count();
    info!(matched, total = enriched.len(), "enriched transactions");
    enriched
}

/// Write the pipe-delimited enrichment dump, replacing any existing file.
pub fn write_enriched(path: &Path, rows: &[EnrichedTransaction]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Never)
        .from_path(path)?;
    writer.write_record(ENRICHED_HEADER)?;
    for row in rows {
        let tx = &row.transaction;
        writer.write_record([
            tx.transaction_id.clone(),
            tx.date.clone(),
            tx.product_id.clone(),
            tx.product_name.clone(),
            tx.quantity.to_string(),
            tx.unit_price.to_string(),
            tx.customer_id.clone(),
            tx.region.clone(),
            row.api_category.clone().unwrap_or_default(),
            row.api_brand.clone().unwrap_or_default(),
            row.api_rating.map(|r| r.to_string()).unwrap_or_default(),
            row.api_match.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_product_mapping;
    use crate::models::{sample, ProductInfo};

    fn catalog(ids: std::ops::RangeInclusive<i64>) -> Catalog {
        let products: Vec<ProductInfo> = ids
            .map(|id| ProductInfo {
                id,
                title: Some(format!("Item {id}")),
                category: Some("laptops".to_string()),
                brand: Some("Acme".to_string()),
                price: Some(10.0),
                rating: Some(4.5),
            })
            .collect();
        create_product_mapping(&products)
    }

    fn with_product(product_id: &str) -> Transaction {
        let mut tx = sample("T001", "2024-01-05", "Widget", 1, 10.0, "C010", "North");
        tx.product_id = product_id.to_string();
        tx
    }

    #[test]
    fn test_match_copies_metadata() {
        let e = enrich_one(&with_product("P3"), &catalog(1..=10));
        assert!(e.api_match);
        assert_eq!(e.api_category.as_deref(), Some("laptops"));
        assert_eq!(e.api_brand.as_deref(), Some("Acme"));
        assert_eq!(e.api_rating, Some(4.5));
    }

    #[test]
    fn test_unknown_id_is_not_matched() {
        let e = enrich_one(&with_product("P999"), &catalog(1..=10));
        assert!(!e.api_match);
        assert_eq!(e.api_category, None);
        assert_eq!(e.api_brand, None);
        assert_eq!(e.api_rating, None);
    }

    #[test]
    fn test_unparsable_id_is_not_matched() {
        let e = enrich_one(&with_product("Pabc"), &catalog(1..=10));
        assert!(!e.api_match);
    }

    #[test]
    fn test_enrich_is_total_and_empty_catalog_degrades() {
        let txs = vec![with_product("P1"), with_product("P2"), with_product("P50")];
        let enriched = enrich(&txs, &Catalog::new());
        assert_eq!(enriched.len(), txs.len());
        assert!(enriched.iter().all(|e| !e.api_match));
        assert_eq!(enriched[1].transaction, txs[1]);
    }

    #[test]
    fn test_write_enriched_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("enriched.txt");
        let rows = enrich(&[with_product("P2"), with_product("P999")], &catalog(1..=10));
        write_enriched(&path, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], ENRICHED_HEADER.join("|"));
        assert_eq!(lines[1], "T001|2024-01-05|P2|Widget|1|10|C010|North|laptops|Acme|4.5|true");
        assert_eq!(lines[2], "T001|2024-01-05|P999|Widget|1|10|C010|North||||false");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_enriched_keeps_quotes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enriched.txt");
        let mut tx = with_product("P999");
        tx.product_name = "Monitor 27\" HD".to_string();
        write_enriched(&path, &enrich(&[tx], &Catalog::new())).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().nth(1),
            Some("T001|2024-01-05|P999|Monitor 27\" HD|1|10|C010|North||||false")
        );
    }
}
