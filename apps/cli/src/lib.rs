//! # Khata CLI Library
//!
//! Argument parsing, startup and dispatch for the `khata` binary.
//!
//! ## Module Organization
//! ```text
//! khata_cli/
//! ├── lib.rs          ◄─── You are here (clap types, startup, dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── Configuration state (khata.toml + env)
//! ├── commands/       ◄─── One function per subcommand
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Subcommands
//! ```text
//! khata sale add|edit|delete|delete-all|list
//! khata creditor list|show|pay
//! khata payment list
//! khata expense add|delete|list
//! khata report [--type T] [--date D | --from D --to D] --password P
//! khata data clear|export|import
//! khata config show
//! ```
//!
//! Results are printed as JSON on stdout; logs go to stderr.

pub mod commands;
pub mod error;
pub mod state;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use khata_core::{DateRange, ExpenseForm, PaymentMethod, ProductType, SaleForm};
use khata_db::{Database, DbConfig};

use commands::creditor::CreditorRef;
use error::ApiError;
use state::{ConfigState, DbState};

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "khata", version, about = "Sales, expenses and credit book for a small shop")]
pub struct Cli {
    /// Config file (default: khata.toml in the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database file (overrides config and KHATA_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record and manage sales
    #[command(subcommand)]
    Sale(SaleCommand),

    /// Customers who owe money
    #[command(subcommand)]
    Creditor(CreditorCommand),

    /// Payments received from creditors
    #[command(subcommand)]
    Payment(PaymentCommand),

    /// Shop expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Sales, payments and expenses summary (password)
    Report(ReportArgs),

    /// Clear, export or import stored data
    #[command(subcommand)]
    Data(DataCommand),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// Record a sale
    Add(SaleArgs),
    /// Replace the sale at INDEX
    Edit {
        index: usize,
        #[command(flatten)]
        sale: SaleArgs,
    },
    /// Delete the sale at INDEX
    Delete { index: usize },
    /// Delete every sale
    DeleteAll,
    /// List active sales
    List {
        #[arg(long = "type", value_name = "TYPE")]
        product_type: Option<ProductType>,
    },
}

/// Sale fields as typed at the counter.
#[derive(Debug, Clone, Args)]
pub struct SaleArgs {
    /// refill, coil, device, puff or flavourbottle
    #[arg(long = "type", value_name = "TYPE")]
    pub product_type: ProductType,

    #[arg(long)]
    pub item: String,

    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub quantity: String,

    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,

    /// cash, card or online
    #[arg(long, default_value = "cash")]
    pub method: PaymentMethod,

    /// Sell on credit (requires --name and --phone)
    #[arg(long)]
    pub credit: bool,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub phone: String,
}

impl SaleArgs {
    pub fn into_form(self) -> SaleForm {
        if self.credit {
            SaleForm::credit(
                self.product_type,
                self.item,
                self.quantity,
                self.amount,
                self.name,
                self.phone,
            )
        } else {
            SaleForm {
                customer_name: self.name,
                customer_phone: self.phone,
                ..SaleForm::cash(
                    self.product_type,
                    self.item,
                    self.quantity,
                    self.amount,
                    self.method,
                )
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CreditorCommand {
    /// List creditors and the total owed
    List,
    /// Show the creditor with PHONE
    Show { phone: String },
    /// Record a payment
    Pay {
        /// Creditor index from `creditor list`
        #[arg(long, conflicts_with = "phone", required_unless_present = "phone")]
        index: Option<usize>,
        /// Creditor phone number
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// List payments, oldest first
    List {
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// Record an expense
    Add {
        #[arg(long)]
        description: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Defaults to "general"
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Remove the expense at INDEX
    Delete { index: usize },
    /// List expenses
    List {
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[arg(long)]
    pub password: String,

    /// Per-item totals for one product type
    #[arg(long = "type", value_name = "TYPE")]
    pub product_type: Option<ProductType>,

    /// A single day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<NaiveDate>,

    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive; defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl ReportArgs {
    /// The requested range, or `None` for all time.
    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        match (self.date, self.from, self.to) {
            (Some(day), _, _) => Some(DateRange::day(day)),
            (None, Some(from), to) => Some(DateRange::new(from, to.unwrap_or(today))),
            (None, None, Some(to)) => Some(DateRange::new(NaiveDate::MIN, to)),
            (None, None, None) => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DataCommand {
    /// Remove stored data
    Clear {
        #[arg(long)]
        password: String,
        /// Keep the creditor ledger
        #[arg(long)]
        keep_creditors: bool,
    },
    /// Print all collections as one JSON snapshot
    Export,
    /// Replace all collections with a snapshot file
    Import {
        file: PathBuf,
        #[arg(long)]
        password: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

// =============================================================================
// Startup
// =============================================================================

/// Runs one `khata` invocation and returns its JSON output.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Invocation                                        │
/// │                                                                         │
/// │  1. Load Config ──────────────────────────────────────────────────────► │
/// │     • --config file must load; the default location may be missing     │
/// │     • KHATA_* environment variables override the file                   │
/// │                                                                         │
/// │  2. Determine Database Path ──────────────────────────────────────────► │
/// │     • --db, then KHATA_DB_PATH / db_path, then platform data dir        │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • load → operation → save, result serialized to JSON                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<Value, ApiError> {
    let config = match &cli.config {
        Some(path) => ConfigState::load(Some(path.clone()))
            .map_err(|e| ApiError::validation(e.to_string()))?,
        None => ConfigState::load_or_default(None),
    };

    let db_path = database_path(cli.db.clone(), &config)?;
    info!(?db_path, "Database path determined");

    if let Command::Config(ConfigCommand::Show) = cli.command {
        return to_json(commands::config::get_config(&config, db_path));
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let state = DbState::new(db);
    debug!("Database connected and migrations applied");

    let output = dispatch(&state, &config, cli.command).await;
    state.inner().close().await;
    output
}

/// Runs a parsed command against open state.
pub async fn dispatch(db: &DbState, config: &ConfigState, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Sale(cmd) => match cmd {
            SaleCommand::Add(args) => to_json(commands::sale::add_sale(db, args.into_form()).await?),
            SaleCommand::Edit { index, sale } => {
                to_json(commands::sale::edit_sale(db, index, sale.into_form()).await?)
            }
            SaleCommand::Delete { index } => to_json(commands::sale::delete_sale(db, index).await?),
            SaleCommand::DeleteAll => to_json(commands::sale::delete_all_sales(db).await?),
            SaleCommand::List { product_type } => {
                to_json(commands::sale::list_sales(db, product_type).await?)
            }
        },

        Command::Creditor(cmd) => match cmd {
            CreditorCommand::List => to_json(commands::creditor::list_creditors(db, config).await?),
            CreditorCommand::Show { phone } => {
                to_json(commands::creditor::find_creditor(db, config, &phone).await?)
            }
            CreditorCommand::Pay {
                index,
                phone,
                amount,
            } => {
                let target = match (index, phone) {
                    (Some(index), _) => CreditorRef::Index(index),
                    (None, Some(phone)) => CreditorRef::Phone(phone),
                    (None, None) => return Err(ApiError::validation("--index or --phone is required")),
                };
                to_json(commands::creditor::pay_creditor(db, config, target, &amount).await?)
            }
        },

        Command::Payment(PaymentCommand::List { phone }) => {
            to_json(commands::payment::list_payments(db, config, phone.as_deref()).await?)
        }

        Command::Expense(cmd) => match cmd {
            ExpenseCommand::Add {
                description,
                amount,
                category,
            } => {
                let form = ExpenseForm::new(description, amount, category);
                to_json(commands::expense::add_expense(db, form).await?)
            }
            ExpenseCommand::Delete { index } => {
                to_json(commands::expense::delete_expense(db, index).await?)
            }
            ExpenseCommand::List { category } => {
                to_json(commands::expense::list_expenses(db, category.as_deref()).await?)
            }
        },

        Command::Report(args) => {
            let range = args.range(Utc::now().date_naive());
            match args.product_type {
                Some(product_type) => to_json(
                    commands::report::get_item_report(db, config, &args.password, product_type, range)
                        .await?,
                ),
                None => to_json(commands::report::get_report(db, config, &args.password, range).await?),
            }
        }

        Command::Data(cmd) => match cmd {
            DataCommand::Clear {
                password,
                keep_creditors,
            } => to_json(commands::data::clear_data(db, config, &password, keep_creditors).await?),
            DataCommand::Export => to_json(commands::data::export_data(db).await?),
            DataCommand::Import { file, password } => {
                let snapshot = read_snapshot(&file)?;
                to_json(commands::data::import_data(db, config, &password, &snapshot).await?)
            }
        },

        Command::Config(ConfigCommand::Show) => {
            to_json(commands::config::get_config(config, db.inner().path().to_path_buf()))
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=khata=trace` - Show trace for khata crates only
/// - Default: INFO, debug for khata crates
///
/// Logs are written to stderr so stdout stays valid JSON.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,khata=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Default
/// - **macOS**: `~/Library/Application Support/com.khata.pos/khata.db`
/// - **Windows**: `%APPDATA%\khata\pos\data\khata.db`
/// - **Linux**: `~/.local/share/pos/khata.db`
fn database_path(flag: Option<PathBuf>, config: &ConfigState) -> Result<PathBuf, ApiError> {
    if let Some(path) = flag.or_else(|| config.db_path.clone()) {
        return Ok(path);
    }

    let proj_dirs = ProjectDirs::from("com", "khata", "pos")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ApiError::internal(format!("Could not create {}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("khata.db"))
}

fn read_snapshot(path: &Path) -> Result<String, ApiError> {
    std::fs::read_to_string(path)
        .map_err(|e| ApiError::validation(format!("Could not read {}: {}", path.display(), e)))
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}
