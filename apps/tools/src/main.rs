use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use server_api::query_products;
use shared::protocol::RawQueryParams;

#[derive(Parser, Debug)]
struct Cli {
    /// Catalog JSON file; the built-in demo catalog is used when omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and report what it contains.
    Validate,
    Vendors,
    /// Run one listing query offline and print the JSON the server would return.
    Query {
        vendor: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        limit: Option<String>,
    },
}

fn load(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => {
            Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))
        }
        None => Ok(Catalog::demo()?),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = load(cli.catalog.as_ref())?;

    match cli.command {
        Command::Validate => {
            println!(
                "ok: {} vendors, {} products",
                catalog.vendor_list().len(),
                catalog.product_count()
            );
        }
        Command::Vendors => {
            for vendor in catalog.vendor_list() {
                let count = catalog.products_for(vendor.slug.as_str()).len();
                println!("{:<16} {:<24} {count} products", vendor.slug.as_str(), vendor.name);
            }
        }
        Command::Query {
            vendor,
            search,
            sort,
            page,
            limit,
        } => {
            if catalog.find_vendor(&vendor).is_none() {
                bail!("no such vendor: {vendor}");
            }
            let params = RawQueryParams {
                search,
                sort,
                page,
                limit,
            }
            .normalize();
            let result = query_products(&catalog.products_for(&vendor), &params);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
