use std::collections::BTreeSet;

use chrono::{Local, NaiveDateTime};
use comfy_table::{Cell, Table};

use crate::analytics::{
    customer_analysis, daily_trend, low_performing_products, peak_day, region_breakdown,
    top_products, total_revenue, RegionStats,
};
use crate::fmt::{money, pct};
use crate::models::{EnrichedTransaction, Transaction};

const WIDTH: usize = 72;
const TOP_N: usize = 5;
const LOW_QUANTITY_THRESHOLD: i64 = 10;

fn banner(lines: &[String]) -> String {
    let rule = "=".repeat(WIDTH);
    let centered: Vec<String> = lines.iter().map(|l| format!("{l:^WIDTH$}")).collect();
    format!("{rule}\n{}\n{rule}", centered.join("\n"))
}

fn date_range(txs: &[Transaction]) -> String {
    let min = txs.iter().map(|t| t.date.as_str()).min();
    let max = txs.iter().map(|t| t.date.as_str()).max();
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo} to {hi}"),
        _ => "N/A".to_string(),
    }
}

pub fn format_summary(valid: &[Transaction]) -> String {
    let revenue = total_revenue(valid);
    let count = valid.len();
    let avg = if count > 0 { revenue / count as f64 } else { 0.0 };

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total Revenue"), Cell::new(money(revenue))]);
    table.add_row(vec![Cell::new("Total Transactions"), Cell::new(count)]);
    table.add_row(vec![Cell::new("Average Order Value"), Cell::new(money(avg))]);
    table.add_row(vec![Cell::new("Date Range"), Cell::new(date_range(valid))]);
    format!("OVERALL SUMMARY\n{table}")
}

pub fn format_regions(regions: &[RegionStats]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Region", "Sales", "% of Total", "Transactions"]);
    for r in regions {
        table.add_row(vec![
            Cell::new(&r.region),
            Cell::new(money(r.total)),
            Cell::new(pct(r.percentage)),
            Cell::new(r.count),
        ]);
    }
    format!("REGION-WISE PERFORMANCE\n{table}")
}

pub fn format_top_products(valid: &[Transaction]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Product Name", "Quantity", "Revenue"]);
    for (i, p) in top_products(valid, TOP_N).iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&p.name),
            Cell::new(p.quantity),
            Cell::new(money(p.revenue)),
        ]);
    }
    format!("TOP {TOP_N} PRODUCTS\n{table}")
}

pub fn format_top_customers(valid: &[Transaction]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Customer ID", "Total Spent", "Order Count"]);
    for (i, c) in customer_analysis(valid).iter().take(TOP_N).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&c.customer_id),
            Cell::new(money(c.total_spent)),
            Cell::new(c.purchase_count),
        ]);
    }
    format!("TOP {TOP_N} CUSTOMERS\n{table}")
}

pub fn format_daily(valid: &[Transaction]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Revenue", "Transactions", "Unique Customers"]);
    for d in daily_trend(valid) {
        table.add_row(vec![
            Cell::new(&d.date),
            Cell::new(money(d.revenue)),
            Cell::new(d.transaction_count),
            Cell::new(d.unique_customers),
        ]);
    }
    format!("DAILY SALES TREND\n{table}")
}

pub fn format_performance(valid: &[Transaction], regions: &[RegionStats]) -> String {
    let best = match peak_day(valid) {
        Some(day) => format!(
            "Best Selling Day: {} ({}, {} transactions)",
            day.date,
            money(day.revenue),
            day.transaction_count
        ),
        None => "Best Selling Day: N/A".to_string(),
    };

    let low = low_performing_products(valid, LOW_QUANTITY_THRESHOLD);
    let low_text = if low.is_empty() {
        "  None".to_string()
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Product Name", "Quantity", "Revenue"]);
        for p in &low {
            table.add_row(vec![
                Cell::new(&p.name),
                Cell::new(p.quantity),
                Cell::new(money(p.revenue)),
            ]);
        }
        table.to_string()
    };

    let mut averages = Table::new();
    averages.set_header(vec!["Region", "Avg Transaction"]);
    for r in regions {
        averages.add_row(vec![Cell::new(&r.region), Cell::new(money(r.average()))]);
    }

    format!(
        "PRODUCT PERFORMANCE ANALYSIS\n{best}\n\n\
         Low Performing Products (quantity < {LOW_QUANTITY_THRESHOLD}):\n{low_text}\n\n\
         Average Transaction Value per Region:\n{averages}"
    )
}

pub fn format_enrichment(enriched: &[EnrichedTransaction]) -> String {
    let total = enriched.len();
    let matched = enriched.iter().filter(|e| e.api_match).count();
    let rate = if total > 0 { matched as f64 / total as f64 * 100.0 } else { 0.0 };
    let failed: BTreeSet<&str> = enriched
        .iter()
        .filter(|e| !e.api_match)
        .map(|e| e.transaction.product_name.as_str())
        .collect();

    let failed_text = if failed.is_empty() {
        "  None".to_string()
    } else {
        failed
            .iter()
            .map(|name| format!("  - {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "API ENRICHMENT SUMMARY\n\
         Total Products Enriched: {matched} of {total}\n\
         Success Rate: {}\n\
         Products Not Enriched:\n{failed_text}",
        pct(rate)
    )
}

pub fn render(valid: &[Transaction], enriched: &[EnrichedTransaction]) -> String {
    render_at(valid, enriched, Local::now().naive_local())
}

pub fn render_at(
    valid: &[Transaction],
    enriched: &[EnrichedTransaction],
    generated: NaiveDateTime,
) -> String {
    let regions = region_breakdown(valid);
    let sections = [
        banner(&[
            "SALES ANALYTICS REPORT".to_string(),
            format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")),
            format!("Records Processed: {}", valid.len()),
        ]),
        format_summary(valid),
        format_regions(&regions),
        format_top_products(valid),
        format_top_customers(valid),
        format_daily(valid),
        format_performance(valid, &regions),
        format_enrichment(enriched),
    ];
    format!("{}\n\n", sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich_one;
    use crate::catalog::Catalog;
    use crate::models::{sample, ProductInfo};

    fn generated() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 12, 18)
            .unwrap()
            .and_hms_opt(14, 30, 22)
            .unwrap()
    }

    fn dataset() -> Vec<Transaction> {
        vec![
            sample("T001", "2024-01-05", "Laptop", 2, 1500.0, "C010", "North"),
            sample("T002", "2024-01-05", "Mouse", 3, 25.0, "C011", "South"),
            sample("T003", "2024-01-06", "Laptop", 1, 1500.0, "C012", "North"),
        ]
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(
            101,
            ProductInfo {
                id: 101,
                title: Some("Laptop".to_string()),
                category: Some("laptops".to_string()),
                brand: Some("Apple".to_string()),
                price: Some(1999.0),
                rating: Some(4.7),
            },
        );
        catalog
    }

    fn enriched(txs: &[Transaction]) -> Vec<EnrichedTransaction> {
        let catalog = catalog();
        txs.iter()
            .map(|tx| {
                let mut tx = tx.clone();
                if tx.product_name == "Mouse" {
                    tx.product_id = "P555".to_string();
                }
                enrich_one(&tx, &catalog)
            })
            .collect()
    }

    #[test]
    fn test_sections_in_order() {
        let txs = dataset();
        let text = render_at(&txs, &enriched(&txs), generated());
        let labels = [
            "SALES ANALYTICS REPORT",
            "OVERALL SUMMARY",
            "REGION-WISE PERFORMANCE",
            "TOP 5 PRODUCTS",
            "TOP 5 CUSTOMERS",
            "DAILY SALES TREND",
            "PRODUCT PERFORMANCE ANALYSIS",
            "API ENRICHMENT SUMMARY",
        ];
        let positions: Vec<usize> = labels.iter().map(|l| text.find(l).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_summary_values() {
        let txs = dataset();
        let text = render_at(&txs, &enriched(&txs), generated());
        assert!(text.contains("Generated: 2024-12-18 14:30:22"));
        assert!(text.contains("Records Processed: 3"));
        assert!(text.contains("$4,575.00"));
        assert!(text.contains("$1,525.00"));
        assert!(text.contains("2024-01-05 to 2024-01-06"));
        assert!(text.contains("98.36%"));
        assert!(text.contains("Best Selling Day: 2024-01-05 ($3,075.00, 2 transactions)"));
    }

    #[test]
    fn test_enrichment_summary() {
        let txs = dataset();
        let text = render_at(&txs, &enriched(&txs), generated());
        assert!(text.contains("2 of 3"));
        assert!(text.contains("66.67%"));
        assert!(text.contains("  - Mouse"));
        assert!(!text.contains("  - Laptop"));
    }

    #[test]
    fn test_empty_input_renders() {
        let text = render_at(&[], &[], generated());
        assert!(text.contains("Records Processed: 0"));
        assert!(text.contains("Date Range"));
        assert!(text.contains("N/A"));
        assert!(text.contains("0.00%"));
        assert!(text.contains("Best Selling Day: N/A"));
        assert!(text.contains("Low Performing Products (quantity < 10):\n  None"));
        assert!(text.contains("Products Not Enriched:\n  None"));
    }

    #[test]
    fn test_sections_are_tables() {
        let txs = dataset();
        let regions = region_breakdown(&txs);
        let text = format_regions(&regions);
        assert_eq!(text.lines().next(), Some("REGION-WISE PERFORMANCE"));
        let header = text.lines().find(|l| l.contains("Region")).unwrap();
        assert!(header.contains("Sales"));
        assert!(header.contains("% of Total"));
        let north = text.lines().find(|l| l.contains("North")).unwrap();
        assert!(north.contains("$4,500.00"));
        assert!(north.contains("98.36%"));
    }

    #[test]
    fn test_low_performers_listed_in_table() {
        let txs = dataset();
        let text = format_performance(&txs, &region_breakdown(&txs));
        let mouse = text.lines().find(|l| l.contains("Mouse")).unwrap();
        assert!(mouse.contains('3'));
        assert!(mouse.contains("$75.00"));
        assert!(text.contains("Average Transaction Value per Region:"));
        assert!(text.contains("$2,250.00"));
    }
}
