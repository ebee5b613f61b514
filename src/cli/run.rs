use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use dialoguer::{Confirm, Input};

use crate::analytics::analyze;
use crate::catalog::{load_catalog, Catalog};
use crate::cli::{print_observed, print_validation, FilterArgs};
use crate::enrich::{enrich, write_enriched};
use crate::error::Result;
use crate::fmt::money;
use crate::parser::parse;
use crate::reader::read_lines;
use crate::report::render;
use crate::settings::load_settings;
use crate::validator::{observe, validate_and_filter, Filters};

pub struct RunOptions {
    pub filters: FilterArgs,
    pub interactive: bool,
    pub offline: bool,
    pub output_dir: Option<String>,
}

fn step(n: usize, msg: &str) {
    println!("{} {msg}", format!("[{n}/7]").cyan());
}

fn prompt_number(prompt: &str) -> Option<f64> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.replace(',', "").parse() {
        Ok(v) => Some(v),
        Err(_) => {
            println!("{}", format!("Ignoring '{raw}': not a number").yellow());
            None
        }
    }
}

fn prompt_filters() -> Filters {
    let apply = Confirm::new()
        .with_prompt("Apply filters?")
        .default(false)
        .interact()
        .unwrap_or(false);
    if !apply {
        return Filters::default();
    }

    let region: String = Input::new()
        .with_prompt("Region (Enter for all)")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();
    Filters {
        region: Some(region.trim().to_string()).filter(|r| !r.is_empty()),
        min_amount: prompt_number("Minimum amount (Enter to skip)"),
        max_amount: prompt_number("Maximum amount (Enter to skip)"),
    }
}

fn append_report(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

pub fn run(input: &str, opts: RunOptions) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = opts.output_dir {
        settings.output_dir = dir;
    }

    step(1, "Reading sales data...");
    let lines = read_lines(Path::new(input))?;
    println!("  {} raw lines", lines.len());

    step(2, "Parsing transactions...");
    let parsed = parse(&lines);
    println!(
        "  {} parsed, {} malformed",
        parsed.transactions.len(),
        parsed.rejected_total()
    );

    step(3, "Validating and filtering...");
    print_observed(&observe(&parsed.transactions));
    let filters = if opts.interactive {
        prompt_filters()
    } else {
        opts.filters.into()
    };
    let validation = validate_and_filter(&parsed.transactions, &filters);
    print_validation(&parsed, &validation);
    println!("  {} invalid records removed", validation.invalid_count);
    let valid = validation.valid;

    step(4, "Analyzing sales...");
    let analytics = analyze(&valid, settings.top_n, settings.low_quantity_threshold);
    println!("  Total revenue: {}", money(analytics.total_revenue));
    if let Some(peak) = &analytics.peak_day {
        println!("  Peak day: {} ({})", peak.date, money(peak.revenue));
    }
    if let Some(top) = analytics.top_products.first() {
        println!("  Top product: {} ({} units)", top.name, top.quantity);
    }
    if let Some(best) = analytics.customers.first() {
        println!(
            "  Top customer: {} ({} over {} orders, avg {}, {} distinct products)",
            best.customer_id,
            money(best.total_spent),
            best.purchase_count,
            money(best.avg_order_value),
            best.products_bought.len()
        );
    }
    println!(
        "  {} regions, {} trading days, {} low-performing products",
        analytics.regions.len(),
        analytics.daily.len(),
        analytics.low_performers.len()
    );

    step(5, "Fetching product catalog...");
    let catalog = if opts.offline {
        println!("  {}", "Skipped (offline)".yellow());
        Catalog::new()
    } else {
        let catalog = load_catalog(&settings);
        if catalog.is_empty() {
            println!("  {}", "API Status: Failed to fetch products".red());
        } else {
            println!("  {}", format!("API Status: {} products", catalog.len()).green());
        }
        catalog
    };

    step(6, "Enriching transactions...");
    let enriched = enrich(&valid, &catalog);
    let matched = enriched.iter().filter(|e| e.api_match).count();
    println!("  {matched}/{} matched", enriched.len());
    let enriched_path: PathBuf = settings.enriched_path();
    write_enriched(&enriched_path, &enriched)?;

    step(7, "Generating report...");
    let report_path = settings.report_path();
    append_report(&report_path, &render(&valid, &enriched))?;

    println!("{}", "Done.".green());
    println!("  Enriched data: {}", enriched_path.display());
    println!("  Report:        {}", report_path.display());
    Ok(())
}
