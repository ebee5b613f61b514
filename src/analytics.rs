//! Aggregate views over a validated, filtered transaction set.
//!
//! Every view is a pure function of the slice it is given. Groups are kept in
//! first-seen input order and all rankings use stable sorts, so when two groups
//! tie the one seen first in the input comes first.

use std::collections::{BTreeSet, HashMap};

use crate::models::Transaction;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionStats {
    pub region: String,
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
}

impl RegionStats {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub name: String,
    /// Total units sold, saturating at `i64::MAX`.
    pub quantity: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStats {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    pub avg_order_value: f64,
    /// Distinct product names, sorted.
    pub products_bought: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsResult {
    pub total_revenue: f64,
    pub regions: Vec<RegionStats>,
    pub top_products: Vec<ProductStats>,
    pub low_performers: Vec<ProductStats>,
    pub customers: Vec<CustomerStats>,
    pub daily: Vec<DailyStats>,
    pub peak_day: Option<DailyStats>,
}

pub fn analyze(txs: &[Transaction], top_n: usize, low_threshold: i64) -> AnalyticsResult {
    AnalyticsResult {
        total_revenue: total_revenue(txs),
        regions: region_breakdown(txs),
        top_products: top_products(txs, top_n),
        low_performers: low_performing_products(txs, low_threshold),
        customers: customer_analysis(txs),
        daily: daily_trend(txs),
        peak_day: peak_day(txs),
    }
}

/// Fold each transaction into the accumulator for its key. Keys come back in
/// the order they were first seen.
fn rollup<'a, A, K, F>(txs: &'a [Transaction], key: K, fold: F) -> Vec<(&'a str, A)>
where
    A: Default,
    K: Fn(&'a Transaction) -> &'a str,
    F: Fn(A, &'a Transaction) -> A,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, A)> = Vec::new();
    for tx in txs {
        let k = key(tx);
        let slot = *index.entry(k).or_insert_with(|| {
            groups.push((k, A::default()));
            groups.len() - 1
        });
        let acc = std::mem::take(&mut groups[slot].1);
        groups[slot].1 = fold(acc, tx);
    }
    groups
}

pub fn total_revenue(txs: &[Transaction]) -> f64 {
    txs.iter().map(Transaction::amount).sum()
}

pub fn region_breakdown(txs: &[Transaction]) -> Vec<RegionStats> {
    let total = total_revenue(txs);
    let mut regions: Vec<RegionStats> = rollup(
        txs,
        |tx| tx.region.as_str(),
        |(sum, count): (f64, usize), tx| (sum + tx.amount(), count + 1),
    )
    .into_iter()
    .map(|(region, (sum, count))| RegionStats {
        region: region.to_string(),
        total: sum,
        count,
        percentage: if total != 0.0 { sum / total * 100.0 } else { 0.0 },
    })
    .collect();
    regions.sort_by(|a, b| b.total.total_cmp(&a.total));
    regions
}

fn product_rollup(txs: &[Transaction]) -> Vec<ProductStats> {
    rollup(
        txs,
        |tx| tx.product_name.as_str(),
        |(qty, revenue): (i64, f64), tx| (qty.saturating_add(tx.quantity), revenue + tx.amount()),
    )
    .into_iter()
    .map(|(name, (quantity, revenue))| ProductStats {
        name: name.to_string(),
        quantity,
        revenue,
    })
    .collect()
}

pub fn top_products(txs: &[Transaction], n: usize) -> Vec<ProductStats> {
    let mut products = product_rollup(txs);
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(n);
    products
}

/// Products whose total quantity is strictly below `threshold`, fewest first.
pub fn low_performing_products(txs: &[Transaction], threshold: i64) -> Vec<ProductStats> {
    let mut products: Vec<ProductStats> = product_rollup(txs)
        .into_iter()
        .filter(|p| p.quantity < threshold)
        .collect();
    products.sort_by_key(|p| p.quantity);
    products
}

#[derive(Default)]
struct CustomerAcc<'a> {
    spent: f64,
    count: usize,
    products: BTreeSet<&'a str>,
}

pub fn customer_analysis(txs: &[Transaction]) -> Vec<CustomerStats> {
    let mut customers: Vec<CustomerStats> = rollup::<CustomerAcc, _, _>(
        txs,
        |tx| tx.customer_id.as_str(),
        |mut acc, tx| {
            acc.spent += tx.amount();
            acc.count += 1;
            acc.products.insert(tx.product_name.as_str());
            acc
        },
    )
    .into_iter()
    .map(|(customer, acc)| CustomerStats {
        customer_id: customer.to_string(),
        total_spent: acc.spent,
        purchase_count: acc.count,
        // count >= 1: a customer only exists once a transaction names it
        avg_order_value: acc.spent / acc.count as f64,
        products_bought: acc.products.into_iter().map(str::to_string).collect(),
    })
    .collect();
    customers.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    customers
}

#[derive(Default)]
struct DayAcc<'a> {
    revenue: f64,
    count: usize,
    customers: BTreeSet<&'a str>,
}

/// One entry per date, ordered by the date string.
pub fn daily_trend(txs: &[Transaction]) -> Vec<DailyStats> {
    let mut days: Vec<DailyStats> = rollup::<DayAcc, _, _>(
        txs,
        |tx| tx.date.as_str(),
        |mut acc, tx| {
            acc.revenue += tx.amount();
            acc.count += 1;
            acc.customers.insert(tx.customer_id.as_str());
            acc
        },
    )
    .into_iter()
    .map(|(date, acc)| DailyStats {
        date: date.to_string(),
        revenue: acc.revenue,
        transaction_count: acc.count,
        unique_customers: acc.customers.len(),
    })
    .collect();
    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

/// Highest-revenue day; the earliest date wins a tie.
pub fn peak_day(txs: &[Transaction]) -> Option<DailyStats> {
    daily_trend(txs)
        .into_iter()
        .reduce(|best, day| if day.revenue > best.revenue { day } else { best })
}
