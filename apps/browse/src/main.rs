use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    empty_state_message, page_window, result_summary, ControllerConfig, HistoryAddress,
    HttpQueryBoundary, PageLink, ViewController, ViewStatus,
};
use shared::protocol::{SortOption, DEFAULT_LIMIT};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[arg(long)]
    vendor: String,
    /// Initial query string, e.g. `search=shoe&page=2`.
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    page_size: u32,
    #[arg(long, default_value_t = 5_000)]
    timeout_ms: u64,
    /// Abort superseded requests instead of discarding their responses.
    #[arg(long)]
    abort_superseded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Search(String),
    Sort(SortOption),
    Page(u32),
    Next,
    Previous,
    Back,
    Forward,
    Refresh,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let command = match verb {
        "search" | "s" => Command::Search(rest.to_string()),
        "sort" => Command::Sort(SortOption::from_param(rest)),
        "page" | "p" => Command::Page(rest.trim().parse().ok()?),
        "next" | "n" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "back" => Command::Back,
        "forward" => Command::Forward,
        "refresh" | "r" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn print_help() {
    println!("commands:");
    println!("  search <text>            filter by product name (empty clears)");
    println!("  sort recent|price-asc|price-desc");
    println!("  page <n> | next | prev   change page");
    println!("  back | forward           move through address history");
    println!("  refresh                  refetch the current view");
    println!("  quit");
}

fn render(view: &ViewController<HistoryAddress>) {
    let state = view.state();
    println!();
    println!("{}", view.address().href());
    println!(
        "sort: {} | {}",
        state.params.sort.label(),
        result_summary(&state.result, &state.params.search)
    );
    if state.result.data.is_empty() {
        println!("  {}", empty_state_message(&state.params.search));
    }
    for product in &state.result.data {
        println!("  {:<28} {:>9.2}  {}", product.name, product.price, product.id);
    }
    let window: Vec<String> = page_window(state.result.page, state.result.total_pages)
        .into_iter()
        .map(|link| match link {
            PageLink::Page(page) if page == state.result.page => format!("[{page}]"),
            PageLink::Page(page) => page.to_string(),
            PageLink::Gap => "...".to_string(),
        })
        .collect();
    if !window.is_empty() {
        println!("pages: {}", window.join(" "));
    }
    if let Some(error) = &state.last_error {
        println!("(could not refresh: {error}; showing previous results)");
    }
    if state.status == ViewStatus::Pending {
        println!("(loading...)");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let boundary = HttpQueryBoundary::new(args.server_url);
    let Some(vendor) = boundary.fetch_vendor(&args.vendor).await? else {
        let known: Vec<String> = boundary
            .list_vendors()
            .await?
            .into_iter()
            .map(|vendor| vendor.slug.to_string())
            .collect();
        bail!(
            "no such vendor: {} (known vendors: {})",
            args.vendor,
            known.join(", ")
        );
    };
    println!("{}", vendor.name);
    if let Some(description) = &vendor.description {
        println!("{description}");
    }

    let config = ControllerConfig {
        fetch_timeout: Duration::from_millis(args.timeout_ms),
        page_size: args.page_size,
        abort_superseded: args.abort_superseded,
    };
    let address = HistoryAddress::new(format!("/vendors/{}", vendor.slug), &args.query);
    let mut view =
        ViewController::open(vendor.slug.as_str(), Arc::new(boundary), address, config).await?;
    info!(vendor = %vendor.slug, "browsing");
    render(&view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(command) = parse_command(&line) else {
                    println!("unknown command, try `help`");
                    continue;
                };
                let issued = match command {
                    Command::Search(text) => view.set_search(text),
                    Command::Sort(sort) => view.set_sort(sort),
                    Command::Page(page) => view.select_page(page),
                    Command::Next => view.next_page(),
                    Command::Previous => view.previous_page(),
                    Command::Back => {
                        if !view.address_mut().back() {
                            println!("no earlier history entry");
                        }
                        view.sync_from_address()
                    }
                    Command::Forward => {
                        if !view.address_mut().forward() {
                            println!("no later history entry");
                        }
                        view.sync_from_address()
                    }
                    Command::Refresh => Some(view.refresh()),
                    Command::Help => {
                        print_help();
                        None
                    }
                    Command::Quit => break,
                };
                if issued.is_some() {
                    render(&view);
                }
            }
            Some(_) = view.next_completion() => {
                if view.status() == ViewStatus::Idle {
                    render(&view);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
