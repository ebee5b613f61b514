use std::path::Path;

use crate::cli::{print_observed, print_rejections, print_validation, FilterArgs};
use crate::error::Result;
use crate::parser::parse;
use crate::reader::read_lines;
use crate::validator::{observe, validate_and_filter};

pub fn run(input: &str, filters: FilterArgs) -> Result<()> {
    let lines = read_lines(Path::new(input))?;
    println!("Raw transaction lines read: {}", lines.len());

    let parsed = parse(&lines);
    print_observed(&observe(&parsed.transactions));

    let validation = validate_and_filter(&parsed.transactions, &filters.into());
    print_validation(&parsed, &validation);
    print_rejections(&parsed, &validation);
    Ok(())
}
