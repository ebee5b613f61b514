use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::catalog::CatalogClient;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::load_settings;

pub fn run(limit: Option<u32>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(limit) = limit {
        settings.catalog_limit = limit;
    }

    let products = match CatalogClient::from_settings(&settings).and_then(|c| c.fetch_products()) {
        Ok(products) => products,
        Err(e) => {
            println!("{}", format!("API Status: Failed to fetch products ({e})").red());
            return Ok(());
        }
    };

    if products.is_empty() {
        println!("No products returned.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Brand", "Price", "Rating"]);
    for p in &products {
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(p.title.as_deref().unwrap_or("")),
            Cell::new(p.category.as_deref().unwrap_or("")),
            Cell::new(p.brand.as_deref().unwrap_or("")),
            Cell::new(p.price.map(money).unwrap_or_default()),
            Cell::new(p.rating.map(|r| format!("{r:.2}")).unwrap_or_default()),
        ]);
    }
    println!("Product Catalog ({})\n{table}", products.len());
    Ok(())
}
