pub mod init;
pub mod products;
pub mod run;
pub mod validate;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::fmt::money;
use crate::parser::ParseOutcome;
use crate::validator::{Filters, Observed, Validation};

#[derive(Parser)]
#[command(name = "salesreport", about = "Clean, analyze and report on pipe-delimited sales logs.")]
pub struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default settings file if none exists.
    Init,
    /// Run the full pipeline and write the enriched data and report files.
    Run {
        /// Pipe-delimited sales file
        input: String,
        #[command(flatten)]
        filters: FilterArgs,
        /// Prompt for filters before processing
        #[arg(long, short = 'i')]
        interactive: bool,
        /// Skip the product catalog fetch
        #[arg(long)]
        offline: bool,
        /// Directory for output files (default from settings)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Parse and validate only, printing the summary.
    Validate {
        /// Pipe-delimited sales file
        input: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List products from the external catalog.
    Products {
        /// Maximum number of products to request
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep only this region (exact match)
    #[arg(long)]
    pub region: Option<String>,
    /// Keep transactions with amount >= this value
    #[arg(long = "min-amount")]
    pub min_amount: Option<f64>,
    /// Keep transactions with amount <= this value
    #[arg(long = "max-amount")]
    pub max_amount: Option<f64>,
}

impl From<FilterArgs> for Filters {
    fn from(args: FilterArgs) -> Self {
        Filters {
            region: args.region,
            min_amount: args.min_amount,
            max_amount: args.max_amount,
        }
    }
}

pub fn print_observed(observed: &Observed) {
    let regions: Vec<&str> = observed.regions.iter().map(String::as_str).collect();
    println!("Available regions: {}", regions.join(", "));
    if let Some((lo, hi)) = observed.amount_range {
        println!("Transaction amount range: {} - {}", money(lo), money(hi));
    }
}

pub fn print_validation(parsed: &ParseOutcome, validation: &Validation) {
    let s = &validation.summary;
    let mut table = Table::new();
    table.set_header(vec!["Stage", "Records"]);
    table.add_row(vec![Cell::new("Malformed lines dropped"), Cell::new(parsed.rejected_total())]);
    table.add_row(vec![Cell::new("Parsed"), Cell::new(s.total_input)]);
    table.add_row(vec![Cell::new("Invalid"), Cell::new(s.invalid)]);
    table.add_row(vec![Cell::new("Filtered by region"), Cell::new(s.filtered_by_region)]);
    table.add_row(vec![Cell::new("Filtered by amount"), Cell::new(s.filtered_by_amount)]);
    table.add_row(vec![Cell::new("Valid".bold()), Cell::new(s.final_count)]);
    println!("Validation Summary\n{table}");
}

pub fn print_rejections(parsed: &ParseOutcome, validation: &Validation) {
    if parsed.rejected.is_empty() && validation.rejected.is_empty() {
        println!("{}", "No records rejected.".green());
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Stage", "Reason", "Count"]);
    for (reason, count) in &parsed.rejected {
        table.add_row(vec![Cell::new("parse"), Cell::new(reason), Cell::new(count)]);
    }
    for (reason, count) in &validation.rejected {
        table.add_row(vec![Cell::new("validate"), Cell::new(reason), Cell::new(count)]);
    }
    println!("Rejected Records\n{table}");
}
