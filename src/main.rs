use anyhow::Context;
use api_client::{HttpQuoteClient, QuoteProvider, StaticQuoteProvider};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Config, QuoteProviderKind, StorageBackend, init_tracing, load_config};
use core_types::{PortfolioView, Transaction, UserId, parse_shares};
use database::{PgLedger, connect, run_migrations};
use executor::{TradeExecutor, TradeReceipt};
use ledger::{InMemoryLedger, Ledger};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use web_server::AppState;

/// The main entry point for the papertrade simulator.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(backend) = cli.storage {
        config.storage.backend = backend;
    }
    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = init_tracing(&config.logging)?;
    check_storage(config.storage.backend, &cli.command)?;

    if let Commands::Migrate = cli.command {
        let pool = connect(
            config.database.url.as_deref(),
            config.database.max_connections,
            config.database.acquire_timeout(),
        )
        .await?;
        run_migrations(&pool).await?;
        tracing::info!("Migrations applied.");
        return Ok(());
    }

    let executor = build_executor(&config).await?;

    match cli.command {
        Commands::Serve(args) => {
            let addr = args.addr.unwrap_or(config.server.addr);
            web_server::run_server(addr, AppState { executor }).await?;
        }
        Commands::OpenAccount(args) => {
            let cash = executor.open_account(UserId(args.user)).await?;
            println!("Opened account {} with {} in cash.", args.user, cash);
        }
        Commands::Buy(args) => {
            let shares = parse_shares(&args.shares)?;
            let receipt = executor.buy(UserId(args.user), &args.symbol, shares).await?;
            print_receipt(&receipt)?;
        }
        Commands::Sell(args) => {
            let shares = parse_shares(&args.shares)?;
            let receipt = executor.sell(UserId(args.user), &args.symbol, shares).await?;
            print_receipt(&receipt)?;
        }
        Commands::Portfolio(args) => {
            let view = executor.portfolio(UserId(args.user)).await?;
            print_portfolio(&view);
        }
        Commands::History(args) => {
            let history = executor.history(UserId(args.user)).await?;
            print_history(&history);
        }
        Commands::Quote { symbol } => {
            let quote = executor.quote(&symbol).await?;
            println!("A share of {} ({}) costs {}.", quote.name, quote.symbol, quote.price);
        }
        Commands::Migrate => {}
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A stock-trading simulator with a cash balance and an append-only trade ledger.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `storage.backend`. `memory` keeps state only for the life of the
    /// process, so it is accepted by `serve` alone.
    #[arg(long, global = true, value_enum)]
    storage: Option<StorageBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON API server.
    Serve(ServeArgs),
    /// Apply the database migrations and exit.
    Migrate,
    /// Open an account with the configured starting cash.
    OpenAccount(UserArgs),
    /// Buy shares at the current quote.
    Buy(TradeArgs),
    /// Sell shares of a previously held symbol at the current quote.
    Sell(TradeArgs),
    /// Show open positions, cash and net worth.
    Portfolio(UserArgs),
    /// List every trade in the order it was committed.
    History(UserArgs),
    /// Look up the current price of a symbol.
    Quote {
        symbol: String,
    },
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.addr`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct UserArgs {
    #[arg(long)]
    user: i64,
}

#[derive(Parser)]
struct TradeArgs {
    #[arg(long)]
    user: i64,

    /// The ticker symbol (e.g., "AAPL").
    symbol: String,

    /// A positive whole number of shares.
    shares: String,
}

// ==============================================================================
// Wiring
// ==============================================================================

/// One-shot commands would start from an empty in-memory ledger every run.
fn check_storage(backend: StorageBackend, command: &Commands) -> anyhow::Result<()> {
    match (backend, command) {
        (StorageBackend::Memory, Commands::Serve(_)) | (StorageBackend::Postgres, _) => Ok(()),
        (StorageBackend::Memory, Commands::Migrate) => {
            anyhow::bail!("`migrate` needs the postgres storage backend")
        }
        (StorageBackend::Memory, _) => anyhow::bail!(
            "in-memory storage does not outlive a single command; use `serve` or the postgres backend"
        ),
    }
}

async fn build_executor(config: &Config) -> anyhow::Result<TradeExecutor> {
    let ledger: Arc<dyn Ledger> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = connect(
                config.database.url.as_deref(),
                config.database.max_connections,
                config.database.acquire_timeout(),
            )
            .await?;
            run_migrations(&pool).await?;
            Arc::new(PgLedger::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; nothing will be persisted.");
            Arc::new(InMemoryLedger::new())
        }
    };

    let quotes: Arc<dyn QuoteProvider> = match config.quotes.provider {
        QuoteProviderKind::Http => Arc::new(HttpQuoteClient::new(&config.quotes)?),
        QuoteProviderKind::Static => Arc::new(StaticQuoteProvider::from_config(&config.quotes)),
    };

    Ok(TradeExecutor::new(
        ledger,
        quotes,
        config.trading.starting_cash,
    ))
}

// ==============================================================================
// Output
// ==============================================================================

fn print_receipt(receipt: &TradeReceipt) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(receipt)?);
    Ok(())
}

fn print_portfolio(view: &PortfolioView) {
    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Name", "Shares", "Price", "Value"]);
    for holding in &view.holdings {
        table.add_row(vec![
            holding.symbol.clone(),
            holding.company_name.clone(),
            holding.net_shares.to_string(),
            holding.current_price.to_string(),
            holding.market_value.to_string(),
        ]);
    }
    println!("{table}");
    println!("Cash:      {}", view.cash_balance);
    println!("Net worth: {}", view.total_net_worth);
}

fn print_history(history: &[Transaction]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Action", "Symbol", "Shares", "Price", "Executed at"]);
    for txn in history {
        table.add_row(vec![
            txn.id.to_string(),
            txn.action.to_string(),
            txn.symbol.clone(),
            txn.shares.to_string(),
            txn.price_per_share.to_string(),
            txn.timestamp.to_rfc3339(),
        ]);
    }
    println!("{table}");
}
