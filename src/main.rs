use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use books::config::{config_dir, load_config, Config, CONFIG_TEMPLATE};
use books::display::{format_money, format_percent};
use books::error::{BooksError, Result};
use books::model::{
    BankAccount, Category, Counterparty, Invoice, InvoiceItem, Party, Product, Profile, Table as DbTable,
    Transaction,
};
use books::notify::Notice;
use books::remote::{fetch, RestClient};
use books::report::{
    build_dashboard, build_report, parse_date, DashboardStats, DateRange, FinancialReport,
    GroupTotal,
};

#[derive(Parser)]
#[command(name = "books")]
#[command(version, about = "Small business accounting reports over a hosted database", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.books or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug); BOOKS_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show configuration and connection target
    Status,

    /// Show headline figures, recent transactions and the daily chart
    Dashboard {
        /// Reference day (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,

        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Income/expense report with category and counterparty breakdowns
    Report {
        /// First day of the report (YYYY-MM-DD, default: first of this month)
        #[arg(long)]
        from: Option<String>,

        /// Last day of the report (YYYY-MM-DD, default: today)
        #[arg(long)]
        to: Option<String>,

        /// Number of customers and suppliers to rank (default: report.top_n)
        #[arg(long)]
        top: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the rows of a table
    List {
        /// Table name (customers, suppliers, products, categories, transactions,
        /// invoices, invoice_items, bank_accounts, profiles)
        table: String,

        /// Maximum number of rows to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        Notice::error(e.to_string()).emit();
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "off",
        1 => "books=info",
        _ => "books=debug",
    };
    let filter = EnvFilter::try_from_env("BOOKS_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Dashboard { today, json } => cmd_dashboard(&cfg_dir, today.as_deref(), json),
        Commands::Report {
            from,
            to,
            top,
            json,
        } => cmd_report(&cfg_dir, from.as_deref(), to.as_deref(), top, json),
        Commands::List { table, limit } => cmd_list(&cfg_dir, &table, limit),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(BooksError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    Notice::success(format!("Initialized books config at: {}", cfg_dir.display())).emit();
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your database:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Check the connection:      books status");
    println!();
    println!("Then look at this month's figures:");
    println!("  books dashboard");
    println!("  books report --from <YYYY-MM-DD> --to <YYYY-MM-DD>");

    Ok(())
}

fn connect(config: &Config) -> Result<RestClient> {
    RestClient::from_settings(&config.database)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}…")
}

/// Show configuration and connection target
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let db = &config.database;

    println!("Books Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!(
        "Database URL:     {}",
        db.url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "API key:          {}",
        db.api_key.as_deref().map(mask).unwrap_or_else(|| "(not set)".to_string())
    );
    println!(
        "Access token:     {}",
        if db.access_token.is_some() { "set" } else { "(using API key)" }
    );
    println!("Timeout:          {}s", db.timeout_secs);
    println!("Top-N:            {}", config.report.top_n);
    println!("Currency:         {}", config.display.currency_symbol);

    if db.url.is_none() || db.api_key.is_none() {
        println!();
        Notice::warning("database.url and database.api_key are required for reports").emit();
    }

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct FigureRow {
    #[tabled(rename = "FIGURE")]
    label: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct ChartRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "INCOME")]
    income: String,
    #[tabled(rename = "EXPENSE")]
    expense: String,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ROLE")]
    role: String,
}

#[derive(Tabled)]
struct PartyRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "TAX NO")]
    tax_number: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
}

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "UNIT")]
    unit: String,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "VAT")]
    vat_rate: String,
    #[tabled(rename = "STOCK")]
    stock: i64,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "METHOD")]
    method: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "DUE")]
    due_date: String,
    #[tabled(rename = "CUSTOMER/SUPPLIER")]
    party: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "VAT")]
    vat: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct InvoiceItemRow {
    #[tabled(rename = "INVOICE")]
    invoice_id: String,
    #[tabled(rename = "PRODUCT")]
    product_id: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "UNIT PRICE")]
    unit_price: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct BankAccountRow {
    #[tabled(rename = "BANK")]
    bank_name: String,
    #[tabled(rename = "ACCOUNT")]
    account_number: String,
    #[tabled(rename = "IBAN")]
    iban: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

fn print_totals(title: &str, totals: &[GroupTotal], currency: &str, empty: &str) {
    println!();
    println!("{title}");
    if totals.is_empty() {
        println!("  {empty}");
        return;
    }

    print_table(
        totals
            .iter()
            .enumerate()
            .map(|(idx, t)| TotalRow {
                index: idx + 1,
                name: t.name.clone(),
                total: format_money(t.total, currency),
            })
            .collect(),
    );
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

/// Show the dashboard
fn cmd_dashboard(cfg_dir: &Path, today_arg: Option<&str>, json: bool) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let day = today_arg.map(parse_date).transpose()?.unwrap_or_else(today);
    let client = connect(&config)?;

    let stats = build_dashboard(&client, day, &config.report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_dashboard(&stats, &config);
    Ok(())
}

fn print_dashboard(stats: &DashboardStats, config: &Config) {
    let currency = &config.display.currency_symbol;
    let window = config.report.growth_window_days;

    println!("Dashboard ({})", stats.today);
    print_table(vec![
        FigureRow {
            label: "Customers".to_string(),
            value: format!(
                "{} (+{} in {window} days)",
                stats.total_customers,
                format_percent(stats.customer_growth)
            ),
        },
        FigureRow {
            label: "Total sales".to_string(),
            value: format_money(stats.total_sales, currency),
        },
        FigureRow {
            label: "Pending payments".to_string(),
            value: format!(
                "{} ({} invoices)",
                format_money(stats.pending_payments, currency),
                stats.pending_invoices
            ),
        },
        FigureRow {
            label: "Income this month".to_string(),
            value: format_money(stats.monthly_income, currency),
        },
    ]);

    println!();
    println!("Last {} days", stats.chart.len());
    print_table(
        stats
            .chart
            .iter()
            .map(|p| ChartRow {
                date: p.date.format("%d %b").to_string(),
                income: format_money(p.income, currency),
                expense: format_money(p.expense, currency),
            })
            .collect(),
    );

    println!();
    println!("Recent transactions");
    if stats.recent_transactions.is_empty() {
        println!("  No transactions yet.");
        return;
    }
    print_table(
        stats
            .recent_transactions
            .iter()
            .map(|t| RecentRow {
                date: t.date.to_string(),
                description: or_dash(t.description.as_deref()),
                category: t.category.clone(),
                kind: t.kind.to_string(),
                amount: format_money(t.amount, currency),
            })
            .collect(),
    );
}

/// Build the income/expense report
fn cmd_report(
    cfg_dir: &Path,
    from: Option<&str>,
    to: Option<&str>,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(cfg_dir)?;
    let range = DateRange::from_args(from, to, today())?;

    if let Some(n) = top {
        if n == 0 {
            return Err(BooksError::InvalidTopN);
        }
        config.report.top_n = n;
    }

    let client = connect(&config)?;
    let report = build_report(&client, range, &config.report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, &config.display.currency_symbol);
    Ok(())
}

fn print_report(report: &FinancialReport, currency: &str) {
    println!("Report {} .. {}", report.range.start, report.range.end);
    print_table(vec![
        FigureRow {
            label: "Total income".to_string(),
            value: format_money(report.total_income, currency),
        },
        FigureRow {
            label: "Total expense".to_string(),
            value: format_money(report.total_expense, currency),
        },
        FigureRow {
            label: "Net income".to_string(),
            value: format_money(report.net_income, currency),
        },
    ]);

    print_totals(
        "Income by category",
        &report.income_by_category,
        currency,
        "No income in this period.",
    );
    print_totals(
        "Expense by category",
        &report.expense_by_category,
        currency,
        "No expenses in this period.",
    );
    print_totals(
        "Top customers",
        &report.top_customers,
        currency,
        "No customer invoices in this period.",
    );
    print_totals(
        "Top suppliers",
        &report.top_suppliers,
        currency,
        "No supplier invoices in this period.",
    );
}

/// List the rows of a table
fn cmd_list(cfg_dir: &Path, table_name: &str, limit: Option<usize>) -> Result<()> {
    let table: DbTable = table_name.parse()?;
    let config = load_config(cfg_dir)?;
    let client = connect(&config)?;
    let currency = config.display.currency_symbol.as_str();
    let unknown = config.report.unknown_party_label.as_str();

    let mut query = table.listing_query();
    if let Some(n) = limit {
        query = query.limit(n);
    }

    let shown = match table {
        DbTable::Profiles => {
            let rows: Vec<Profile> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.into_iter()
                    .map(|p| ProfileRow {
                        email: p.email,
                        name: or_dash(p.full_name.as_deref()),
                        role: p.role.to_string(),
                    })
                    .collect(),
            );
            count
        }
        DbTable::Customers | DbTable::Suppliers => {
            let rows: Vec<Party> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.into_iter()
                    .map(|p| PartyRow {
                        email: or_dash(p.email.as_deref()),
                        phone: or_dash(p.phone.as_deref()),
                        tax_number: or_dash(p.tax_number.as_deref()),
                        balance: format_money(p.balance, currency),
                        name: p.name,
                    })
                    .collect(),
            );
            count
        }
        DbTable::Products => {
            let rows: Vec<Product> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.into_iter()
                    .map(|p| ProductRow {
                        name: p.name,
                        unit: p.unit,
                        price: format_money(p.price, currency),
                        vat_rate: format!("%{}", p.vat_rate),
                        stock: p.stock_quantity,
                    })
                    .collect(),
            );
            count
        }
        DbTable::Categories => {
            let rows: Vec<Category> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.into_iter()
                    .map(|c| CategoryRow {
                        kind: c.kind.to_string(),
                        description: or_dash(c.description.as_deref()),
                        name: c.name,
                    })
                    .collect(),
            );
            count
        }
        DbTable::Transactions => {
            let rows: Vec<Transaction> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.iter()
                    .map(|t| TransactionRow {
                        date: t.date.to_string(),
                        kind: t.kind.to_string(),
                        category: t
                            .category_name()
                            .unwrap_or(config.report.recent_uncategorized_label.as_str())
                            .to_string(),
                        method: t.payment_method.to_string(),
                        amount: format_money(t.amount, currency),
                        description: or_dash(t.description.as_deref()),
                    })
                    .collect(),
            );
            count
        }
        DbTable::Invoices => {
            let rows: Vec<Invoice> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.iter()
                    .map(|inv| InvoiceRow {
                        number: inv.invoice_number.clone(),
                        date: inv.date.to_string(),
                        due_date: inv.due_date.to_string(),
                        party: describe_party(inv, unknown),
                        total: format_money(inv.total_amount, currency),
                        vat: format_money(inv.vat_amount, currency),
                        status: inv.status.to_string(),
                    })
                    .collect(),
            );
            count
        }
        DbTable::InvoiceItems => {
            let rows: Vec<InvoiceItem> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.into_iter()
                    .map(|item| InvoiceItemRow {
                        invoice_id: item.invoice_id,
                        product_id: item.product_id,
                        quantity: item.quantity.to_string(),
                        unit_price: format_money(item.unit_price, currency),
                        total: format_money(item.total_amount, currency),
                    })
                    .collect(),
            );
            count
        }
        DbTable::BankAccounts => {
            let rows: Vec<BankAccount> = fetch(&client, &query)?;
            let count = rows.len();
            print_table(
                rows.into_iter()
                    .map(|a| BankAccountRow {
                        bank_name: a.bank_name,
                        account_number: a.account_number,
                        iban: a.iban,
                        balance: format_money(a.balance, currency),
                    })
                    .collect(),
            );
            count
        }
    };

    println!();
    println!("Total: {shown} {table}");
    Ok(())
}

fn describe_party(invoice: &Invoice, unknown: &str) -> String {
    let name = invoice.counterparty_name().unwrap_or(unknown);
    match invoice.counterparty() {
        Some(Counterparty::Customer(_)) => format!("{name} (customer)"),
        Some(Counterparty::Supplier(_)) => format!("{name} (supplier)"),
        None => name.to_string(),
    }
}
