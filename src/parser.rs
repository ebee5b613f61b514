use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::models::Transaction;

pub const FIELD_SEPARATOR: char = '|';

/// Why a raw line did not become a `Transaction`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseRejection {
    #[error("expected 8 fields, found {0}")]
    FieldCount(usize),
    #[error("quantity is not an integer: {0:?}")]
    Quantity(String),
    #[error("unit price is not a number: {0:?}")]
    UnitPrice(String),
}

impl ParseRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FieldCount(_) => "field_count",
            Self::Quantity(_) => "quantity",
            Self::UnitPrice(_) => "unit_price",
        }
    }
}

pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub rejected: BTreeMap<&'static str, usize>,
}

impl ParseOutcome {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

fn clean_product_name(raw: &str) -> String {
    raw.replace(',', "")
}

fn parse_unit_price(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub fn parse_line(line: &str) -> Result<Transaction, ParseRejection> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let [tid, date, pid, pname, qty, price, cid, region] = fields[..] else {
        return Err(ParseRejection::FieldCount(fields.len()));
    };

    let quantity: i64 = qty
        .trim()
        .parse()
        .map_err(|_| ParseRejection::Quantity(qty.to_string()))?;
    let unit_price =
        parse_unit_price(price).ok_or_else(|| ParseRejection::UnitPrice(price.to_string()))?;

    Ok(Transaction {
        transaction_id: tid.to_string(),
        date: date.to_string(),
        product_id: pid.to_string(),
        product_name: clean_product_name(pname),
        quantity,
        unit_price,
        customer_id: cid.to_string(),
        region: region.to_string(),
    })
}

/// Parse every line, tallying the ones that were dropped.
pub fn parse(raw_lines: &[String]) -> ParseOutcome {
    let mut transactions = Vec::with_capacity(raw_lines.len());
    let mut rejected = BTreeMap::new();

    for line in raw_lines {
        match parse_line(line) {
            Ok(tx) => transactions.push(tx),
            Err(reason) => {
                debug!(%reason, "dropping line");
                *rejected.entry(reason.kind()).or_insert(0) += 1;
            }
        }
    }

    ParseOutcome {
        transactions,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_line_example() {
        let tx = parse_line("T001|2024-01-05|P003|Widget|4|250.50|C010|North").unwrap();
        assert_eq!(tx.transaction_id, "T001");
        assert_eq!(tx.date, "2024-01-05");
        assert_eq!(tx.product_id, "P003");
        assert_eq!(tx.quantity, 4);
        assert_eq!(tx.unit_price, 250.50);
        assert_eq!(tx.customer_id, "C010");
        assert_eq!(tx.region, "North");
        assert!((tx.amount() - 1002.00).abs() < 1e-9);
    }

    #[test]
    fn test_seven_fields_is_discarded() {
        let err = parse_line("T001|2024-01-05|P003|Widget|4|250.50|C010").unwrap_err();
        assert_eq!(err, ParseRejection::FieldCount(7));
    }

    #[test]
    fn test_nine_fields_is_discarded() {
        let err = parse_line("T001|2024-01-05|P003|Widget|4|250.50|C010|North|x").unwrap_err();
        assert_eq!(err, ParseRejection::FieldCount(9));
    }

    #[test]
    fn test_thousands_separators_stripped() {
        let tx = parse_line("T002|2024-01-06|P004|Laptop, Pro|2|1,250.00|C011|East").unwrap();
        assert_eq!(tx.unit_price, 1250.0);
        assert_eq!(tx.product_name, "Laptop Pro");
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        assert!(matches!(
            parse_line("T003|2024-01-06|P004|Mouse|two|10.00|C011|East"),
            Err(ParseRejection::Quantity(_))
        ));
        assert!(matches!(
            parse_line("T003|2024-01-06|P004|Mouse|2|ten|C011|East"),
            Err(ParseRejection::UnitPrice(_))
        ));
        assert!(matches!(
            parse_line("T003|2024-01-06|P004|Mouse|2|NaN|C011|East"),
            Err(ParseRejection::UnitPrice(_))
        ));
    }

    #[test]
    fn test_non_positive_values_still_parse() {
        let tx = parse_line("T004|2024-01-06|P004|Mouse|-3|0|C011|").unwrap();
        assert_eq!(tx.quantity, -3);
        assert_eq!(tx.unit_price, 0.0);
        assert!(tx.region.is_empty());
    }

    #[test]
    fn test_parse_tallies_rejections() {
        let outcome = parse(&lines(&[
            "T001|2024-01-05|P003|Widget|4|250.50|C010|North",
            "T002|2024-01-05|P003|Widget|4|250.50|C010",
            "T003|2024-01-05|P003|Widget|x|250.50|C010|North",
            "T004|2024-01-05|P003|Widget|1|y|C010|North",
            "T005|2024-01-05|P003|Widget",
        ]));
        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.rejected_total(), 4);
        assert_eq!(outcome.rejected["field_count"], 2);
        assert_eq!(outcome.rejected["quantity"], 1);
        assert_eq!(outcome.rejected["unit_price"], 1);
    }

    #[test]
    fn test_parse_preserves_order() {
        let txs = parse(&lines(&[
            "T002|2024-01-06|P004|B|1|1|C1|X",
            "T001|2024-01-05|P003|A|1|1|C1|X",
        ]))
        .transactions;
        let ids: Vec<_> = txs.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["T002", "T001"]);
    }
}
