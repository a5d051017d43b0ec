use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use shelf_core::{CatalogSource, SortKey, ViewState};
use shelf_render::{html, present, text, PageView, Screen};
use shelf_search::{View, ViewDebugInfo, ViewPipeline};
use shelf_store::CatalogStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

mod actions;

use actions::{parse_action, parse_page_size, Action, HELP};

#[derive(Parser, Debug)]
#[command(name = "shelfctl", version, about = "Fetch a product catalog once, then search, sort and page it locally")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    /// Products endpoint (a single GET returning a JSON array)
    #[arg(long = "endpoint", env = "SHELF_ENDPOINT", global = true, default_value = shelf_fetch::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Read the catalog from a saved JSON file instead of the endpoint
    #[arg(long = "file", env = "SHELF_FILE", global = true)]
    file: Option<PathBuf>,

    /// Request timeout for the endpoint
    #[arg(long = "timeout-secs", env = "SHELF_TIMEOUT_SECS", global = true, default_value_t = 15)]
    timeout_secs: u64,

    /// Terminal table width (human output)
    #[arg(long = "width", env = "SHELF_WIDTH", global = true, default_value_t = text::DEFAULT_WIDTH)]
    width: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json, Html }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one page of the catalog
    Show {
        /// Case-insensitive title filter
        #[arg(short = 'q', long = "query", default_value = "")]
        query: String,
        /// none, price-asc, price-desc, name-asc, name-desc
        #[arg(short = 's', long = "sort", default_value = "none", value_parser = SortKey::from_str)]
        sort: SortKey,
        /// Rows per page (10, 20 or 50)
        #[arg(long = "page-size", default_value = "10", value_parser = parse_page_size)]
        page_size: usize,
        /// 1-based page; out-of-range pages are clamped
        #[arg(short = 'p', long = "page", default_value_t = 1)]
        page: usize,
        /// Explain filter stages and counts
        #[arg(long = "explain", action = ArgAction::SetTrue)]
        explain: bool,
    },
    /// Load once, then read view commands from stdin (type `help`)
    Browse,
}

fn init_tracing() {
    let env = std::env::var("SHELF_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn init_metrics() {
    if let Ok(addr) = std::env::var("SHELF_METRICS_ADDR") {
        if let Ok(sock) = addr.parse::<std::net::SocketAddr>() {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            match builder.with_http_listener(sock).install() {
                Ok(_) => info!(addr = %addr, "Prometheus metrics exporter listening"),
                Err(e) => warn!(error = %e, "failed to install metrics exporter"),
            }
        } else {
            warn!(addr = %addr, "invalid SHELF_METRICS_ADDR; expected host:port");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    init_metrics();
    let cli = Cli::parse();
    let output = cli.output;
    let width = cli.width;

    let timeout = Duration::from_secs(cli.timeout_secs.max(1));
    let source = shelf_fetch::select_source(cli.file.as_deref(), &cli.endpoint, timeout).context("building catalog source")?;
    let store = CatalogStore::new();

    match cli.command {
        Commands::Show { query, sort, page_size, page, explain } => {
            info!(source = %source.describe(), query = %query, sort = %sort, page_size, page, "show invoked");
            let catalog = match store.load(source.as_ref()).await {
                Ok(c) => c,
                Err(e) => {
                    error!(error = %e, "catalog load failed");
                    print_failure(output, &e.to_string())?;
                    std::process::exit(1);
                }
            };
            let mut pipeline = ViewPipeline::with_state(catalog, ViewState { query, sort, page_size, current_page: page });
            let dbg = pipeline.explain();
            let view = pipeline.view();
            print_view(output, width, view, explain.then_some(&dbg))?;
        }
        Commands::Browse => browse(output, width, &store, source.as_ref()).await?,
    }

    Ok(())
}

async fn browse(output: Output, width: usize, store: &CatalogStore, source: &dyn CatalogSource) -> Result<()> {
    info!(source = %source.describe(), "browse invoked");
    match output {
        Output::Html => print!("{}", html::render_screen(&Screen::Loading)),
        _ => eprintln!("loading products from {} ...", source.describe()),
    }
    // A failed load still gives a working (empty) view; `reload` can retry.
    let catalog = match store.load(source).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "catalog load failed");
            print_failure(output, &e.to_string())?;
            store.get()
        }
    };
    let mut pipeline = ViewPipeline::new(catalog);
    print_view(output, width, pipeline.view(), None)?;
    if output == Output::Human {
        eprintln!("{}", HELP);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let action = match parse_action(&line) {
            Ok(a) => a,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };
        metrics::counter!("browse_actions_total", 1u64, "action" => action.name());
        let view = match action {
            Action::Quit => break,
            Action::Help => {
                eprintln!("{}", HELP);
                continue;
            }
            Action::Explain => {
                let dbg = pipeline.explain();
                eprintln!("debug: total={} after_filter={} page_rows={}", dbg.total, dbg.after_filter, dbg.page_rows);
                continue;
            }
            Action::Query(q) => pipeline.set_query(q),
            Action::Sort(key) => pipeline.set_sort(key),
            Action::PageSize(n) => match pipeline.set_page_size(n) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("{}", e);
                    continue;
                }
            },
            Action::Page(p) => pipeline.set_page(p),
            Action::Next => {
                let p = pipeline.state().current_page.saturating_add(1);
                pipeline.set_page(p)
            }
            Action::Prev => {
                let p = pipeline.state().current_page.saturating_sub(1);
                pipeline.set_page(p)
            }
            Action::Reload => match store.load(source).await {
                Ok(c) => pipeline.replace_catalog(c),
                Err(e) => {
                    warn!(error = %e, "reload failed; keeping current catalog");
                    print_failure(output, &e.to_string())?;
                    continue;
                }
            },
        };
        print_view(output, width, view, None)?;
    }
    info!("browse session ended");
    Ok(())
}

fn print_view(output: Output, width: usize, view: View<'_>, explain: Option<&ViewDebugInfo>) -> Result<()> {
    let page = present(&view.rows, view.meta);
    match output {
        Output::Human => {
            print!("{}", text::render_table(&page, width));
            if let Some(dbg) = explain {
                eprintln!("debug: total={} after_filter={} page_rows={}", dbg.total, dbg.after_filter, dbg.page_rows);
            }
        }
        Output::Json => match explain {
            Some(dbg) => {
                #[derive(serde::Serialize)]
                struct Explain<'a> { page: &'a PageView, debug: &'a ViewDebugInfo }
                println!("{}", serde_json::to_string_pretty(&Explain { page: &page, debug: dbg })?);
            }
            None => println!("{}", serde_json::to_string_pretty(&page)?),
        },
        Output::Html => print!("{}", html::render_page(&page)),
    }
    Ok(())
}

fn print_failure(output: Output, reason: &str) -> Result<()> {
    match output {
        Output::Human => eprintln!("error: could not load products: {}", reason),
        Output::Json => println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": reason }))?),
        Output::Html => print!("{}", html::render_screen(&Screen::Failed(reason.to_string()))),
    }
    Ok(())
}
