use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use tradelog::import::{ImportDefaults, ImportSession, TargetField};
use tradelog::models::Account;
use tradelog::notify::{NoticeKind, Notifier};
use tradelog::stats;
use tradelog::store::{AccountStore, SqliteStore};

#[derive(Parser)]
#[command(name = "tradelog", about = "Trading journal import and analytics", version)]
struct Cli {
    /// Path to the journal database
    #[arg(long, default_value = "tradelog.db")]
    db: PathBuf,

    /// User whose account collection to operate on
    #[arg(long, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage journal accounts
    Accounts {
        #[command(subcommand)]
        command: AccountsCommand,
    },
    /// Import trades from a CSV export
    Import(ImportArgs),
    /// Show performance statistics for an account
    Stats {
        /// Account id or name
        account: String,
        /// Also print the daily equity curve
        #[arg(long)]
        equity: bool,
    },
}

#[derive(Subcommand)]
enum AccountsCommand {
    /// List all accounts
    List,
    /// Create a new account
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        broker: String,
        /// Starting balance
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
    },
}

#[derive(Args)]
struct ImportArgs {
    /// CSV file to import, or "-" to read pasted text from stdin
    file: PathBuf,

    /// Map a target field to a source column, e.g. --map symbol=Symbol.
    /// Required fields: symbol, date, type, entry, exit, size.
    #[arg(long = "map", value_name = "FIELD=COLUMN")]
    mappings: Vec<String>,

    /// Account ids or names to import into (repeatable)
    #[arg(long = "account")]
    accounts: Vec<String>,

    /// Tick value used when no tickValue column is mapped
    #[arg(long, default_value_t = 5.0)]
    tick_value: f64,

    /// Pip value used when no pipValue column is mapped
    #[arg(long, default_value_t = 10.0)]
    pip_value: f64,

    /// Commission used when no commission column is mapped
    #[arg(long, default_value_t = 0.0)]
    commission: f64,

    /// Validate and preview without writing anything
    #[arg(long)]
    dry_run: bool,
}

/// Prints notifications to the terminal instead of a toast surface.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NoticeKind, message: &str, description: Option<&str>) {
        let line = match description {
            Some(description) => format!("{}: {}", message, description),
            None => message.to_string(),
        };
        match kind {
            NoticeKind::Error => eprintln!("error: {}", line),
            NoticeKind::Success | NoticeKind::Info => println!("{}", line),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let db_path = cli
        .db
        .to_str()
        .context("database path is not valid UTF-8")?;
    let store = SqliteStore::open(db_path)
        .with_context(|| format!("failed to open database at {}", db_path))?;

    match cli.command {
        Command::Accounts { command } => run_accounts(&store, &cli.user, command).await,
        Command::Import(args) => run_import(&store, &cli.user, args).await,
        Command::Stats { account, equity } => run_stats(&store, &cli.user, &account, equity).await,
    }
}

async fn run_accounts(
    store: &SqliteStore,
    user: &str,
    command: AccountsCommand,
) -> Result<()> {
    match command {
        AccountsCommand::List => {
            let accounts = store.fetch_accounts(user).await?;
            if accounts.is_empty() {
                println!("No accounts. Create one with `tradelog accounts create --name <name>`.");
                return Ok(());
            }
            for account in accounts {
                println!(
                    "{}  {}  broker={}  balance={:.2}  trades={}",
                    account.id,
                    account.name,
                    if account.broker.is_empty() { "-" } else { account.broker.as_str() },
                    account.balance,
                    account.trades.len()
                );
            }
            Ok(())
        }
        AccountsCommand::Create { name, broker, balance } => {
            let mut accounts = store.fetch_accounts(user).await?;
            if accounts.iter().any(|a| a.name == name) {
                bail!("an account named {:?} already exists", name);
            }
            let account = Account::new(name, broker, balance);
            println!("Created account {} ({})", account.name, account.id);
            accounts.push(account);
            store.put_accounts(user, &accounts).await?;
            Ok(())
        }
    }
}

async fn run_import(store: &SqliteStore, user: &str, args: ImportArgs) -> Result<()> {
    let text = read_import_text(&args.file)?;

    let mut session = ImportSession::new();
    session.upload(&text)?;

    session.set_defaults(ImportDefaults {
        tick_value: args.tick_value,
        pip_value: args.pip_value,
        commission: args.commission,
    })?;

    for pair in &args.mappings {
        let (field, column) = pair
            .split_once('=')
            .with_context(|| format!("invalid --map {:?}, expected FIELD=COLUMN", pair))?;
        let field = TargetField::from_key(field)
            .with_context(|| format!("unknown target field {:?}", field))?;
        session.map_column(field, column)?;
    }

    session.process()?;

    println!(
        "Processed {} rows: {} valid, {} rejected",
        session.valid_trades().len() + session.row_errors().len(),
        session.valid_trades().len(),
        session.row_errors().len()
    );
    for row_error in session.row_errors() {
        println!("  row {}: {}", row_error.row, row_error.errors.join("; "));
    }

    if args.dry_run {
        for trade in session.valid_trades() {
            println!(
                "  {} {} entry={} exit={} size={} pnl={:.2}",
                trade.symbol,
                trade.direction.as_str(),
                trade.entry,
                trade.exit,
                trade.size,
                trade.pnl
            );
        }
        println!("Dry run, nothing written.");
        return Ok(());
    }

    session.proceed_to_confirm()?;

    let accounts = store.fetch_accounts(user).await?;
    if accounts.is_empty() {
        bail!("no accounts available; create one with `tradelog accounts create`");
    }
    if args.accounts.is_empty() {
        bail!("select at least one target account with --account");
    }

    let mut selected = Vec::new();
    for wanted in &args.accounts {
        let account = accounts
            .iter()
            .find(|a| &a.id == wanted || &a.name == wanted)
            .with_context(|| format!("no account matching {:?}", wanted))?;
        selected.push(account.id.clone());
    }
    session.select_accounts(selected)?;

    session.commit(store, &ConsoleNotifier, user).await?;
    Ok(())
}

async fn run_stats(store: &SqliteStore, user: &str, wanted: &str, equity: bool) -> Result<()> {
    let accounts = store.fetch_accounts(user).await?;
    let account = accounts
        .iter()
        .find(|a| a.id == wanted || a.name == wanted)
        .with_context(|| format!("no account matching {:?}", wanted))?;

    let dashboard = stats::dashboard_stats(&account.trades);
    println!("Account: {} (balance {:.2})", account.name, account.balance);
    println!("Trades:        {}", dashboard.total_trades);
    println!(
        "W/L/BE:        {}/{}/{}",
        dashboard.wins, dashboard.losses, dashboard.breakevens
    );
    println!("Win rate:      {:.1}%", dashboard.win_rate);
    println!("Total P&L:     {:.2}", dashboard.total_pnl);
    println!("Profit factor: {:.2}", dashboard.profit_factor);
    println!("Best/worst:    {:.2} / {:.2}", dashboard.best_trade, dashboard.worst_trade);
    println!("Max drawdown:  {:.2}", dashboard.max_drawdown);
    println!(
        "Streaks:       {} wins, {} losses",
        dashboard.longest_win_streak, dashboard.longest_loss_streak
    );

    if equity {
        println!();
        for point in stats::equity_curve(&account.trades) {
            println!(
                "{}  daily={:+.2}  cumulative={:+.2}  trades={}",
                point.date, point.daily_pnl, point.cumulative_pnl, point.trade_count
            );
        }
    }
    Ok(())
}

fn read_import_text(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read from stdin")?;
        return Ok(text);
    }

    let is_csv = file
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        bail!("{} is not a .csv file", file.display());
    }

    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}
