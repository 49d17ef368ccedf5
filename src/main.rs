use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use billing::config::{config_dir, load_config, resolve_output_dir, Config, CONFIG_TEMPLATE};
use billing::dashboard::{ConsoleNotifier, DirectorySaver};
use billing::error::{BillingError, Result};
use billing::invoice::{
    format_amount, pending_count, BillingSummary, Invoice, InvoiceKind, InvoiceView,
};
use billing::{Dashboard, DashboardView, DocumentKind, DownloadOutcome, HttpBillingClient};

type CliDashboard = Dashboard<HttpBillingClient, ConsoleNotifier, DirectorySaver>;

#[derive(Parser)]
#[command(name = "billing")]
#[command(
    version,
    about = "Minimal CLI client for the client billing dashboard",
    long_about = None
)]
struct Cli {
    /// Path to config directory (default: ~/.billing or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Override api.base_url from config.toml
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show the billing summary cards
    Summary,

    /// List invoices
    Invoices {
        /// Only show invoices with this status (paid, pending, overdue, cancelled)
        #[arg(long)]
        status: Option<String>,

        /// Print the invoices as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the details of one invoice
    Show {
        /// Invoice number or id (e.g., INV-2024-002 or 3)
        invoice: String,
    },

    /// Download an invoice PDF or a RESIMPLE receipt
    Download {
        /// Invoice number or id (e.g., INV-2024-002 or 3)
        invoice: String,

        /// Document to fetch (default: receipt for staged payments, PDF otherwise)
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show the summary followed by the invoice table
    Dashboard,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// The invoice PDF
    Standard,
    /// The Boleta RESIMPLE of a staged payment
    Receipt,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Standard => DocumentKind::StandardInvoice,
            KindArg::Receipt => DocumentKind::StagedReceipt,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    if let Commands::Init = cli.command {
        return cmd_init(&cfg_dir);
    }

    let mut config = load_config(&cfg_dir)?;
    if let Some(url) = cli.base_url {
        config.api.base_url = url;
    }
    let mut dashboard = open_dashboard(&cfg_dir, &config);

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Summary => cmd_summary(&dashboard, &config),
        Commands::Invoices { status, json } => {
            cmd_invoices(&dashboard, &config, status.as_deref(), json)
        }
        Commands::Show { invoice } => cmd_show(&mut dashboard, &config, &invoice),
        Commands::Download { invoice, kind } => cmd_download(&dashboard, &invoice, kind),
        Commands::Dashboard => {
            cmd_summary(&dashboard, &config)?;
            println!();
            cmd_invoices(&dashboard, &config, None, false)
        }
    }
}

fn open_dashboard(cfg_dir: &Path, config: &Config) -> CliDashboard {
    let client = HttpBillingClient::from_settings(&config.api);
    let saver = DirectorySaver::new(resolve_output_dir(&config.download.output_dir, cfg_dir));

    let mut dashboard = Dashboard::new(client, ConsoleNotifier, saver)
        .with_filename_prefix(config.download.filename_prefix.clone());
    dashboard.load();
    dashboard
}

/// Initialize config directory with the template config.toml
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(BillingError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized billing config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your billing API:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Check your balance:            billing summary");
    println!("  3. List your invoices:            billing invoices");

    Ok(())
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "NÚMERO")]
    number: String,
    #[tabled(rename = "PROYECTO")]
    project: String,
    #[tabled(rename = "MONTO")]
    amount: String,
    #[tabled(rename = "ESTADO")]
    status: String,
    #[tabled(rename = "VENCIMIENTO")]
    date: String,
    #[tabled(rename = "ACCIÓN")]
    action: String,
}

impl InvoiceRow {
    fn new(invoice: &Invoice, currency_symbol: &str) -> Self {
        let view = InvoiceView::new(invoice);

        let number = match &view.stage_line {
            Some(line) => format!("{}\n{line}", view.number),
            None => view.number,
        };
        let project = match &view.stage_share {
            Some(share) => format!("{}\nPago por Etapa · {share}", view.project),
            None => view.project,
        };

        InvoiceRow {
            number,
            project,
            amount: format!("{currency_symbol}{}", format_amount(view.amount)),
            status: view.badge.label,
            date: format_day(view.date),
            action: view.action.label.to_string(),
        }
    }
}

fn format_day(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

/// Borrow the loaded data; after `load` the dashboard is always ready.
fn ready(dashboard: &CliDashboard) -> (&BillingSummary, &[Invoice], Option<&Invoice>) {
    match dashboard.view() {
        DashboardView::Ready {
            summary,
            invoices,
            selected,
        } => (summary, invoices, selected),
        DashboardView::Placeholder => unreachable!("dashboard is loaded before any command runs"),
    }
}

/// Show the summary cards
fn cmd_summary(dashboard: &CliDashboard, config: &Config) -> Result<()> {
    let (summary, _, _) = ready(dashboard);
    let symbol = &config.display.currency_symbol;

    let next_due = summary
        .next_payment_due
        .map(format_day)
        .unwrap_or_else(|| "N/A".to_string());

    println!("Facturación y Pagos");
    println!("{}", "-".repeat(50));
    println!("Balance Actual:       {symbol}{}", format_amount(summary.current_balance));
    println!("Total Pagado:         {symbol}{}", format_amount(summary.total_paid));
    println!("Pagos Pendientes:     {symbol}{}", format_amount(summary.pending_payments));
    println!("Próximo Vencimiento:  {next_due}");

    Ok(())
}

/// List invoices as a table or JSON
fn cmd_invoices(
    dashboard: &CliDashboard,
    config: &Config,
    status: Option<&str>,
    json: bool,
) -> Result<()> {
    let (_, invoices, _) = ready(dashboard);

    let filtered: Vec<Invoice> = invoices
        .iter()
        .filter(|invoice| status.is_none_or(|s| invoice.status.as_str() == s))
        .cloned()
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    println!("Mis Facturas ({} pendientes)", pending_count(invoices));

    if filtered.is_empty() {
        println!("No invoices to show.");
        return Ok(());
    }

    let rows: Vec<InvoiceRow> = filtered
        .iter()
        .map(|invoice| InvoiceRow::new(invoice, &config.display.currency_symbol))
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show the detail view of one invoice
fn cmd_show(dashboard: &mut CliDashboard, config: &Config, key: &str) -> Result<()> {
    let id = dashboard
        .find(key)
        .map(|invoice| invoice.id)
        .ok_or_else(|| BillingError::InvoiceNotFound(key.to_string()))?;
    dashboard.select(id);

    let (_, _, Some(invoice)) = ready(dashboard) else {
        return Err(BillingError::InvoiceNotFound(key.to_string()));
    };
    let view = InvoiceView::new(invoice);
    let symbol = &config.display.currency_symbol;

    println!("Detalle de Factura");
    println!("{}", "-".repeat(50));

    if let InvoiceKind::StagedPayment {
        stage_name,
        stage_percentage,
    } = &invoice.kind
    {
        println!("Factura de Etapa de Pago");
        println!("  Etapa:       {stage_name}");
        println!("  Porcentaje:  {}%", format_amount(*stage_percentage));
        println!();
    }

    println!("Número de Factura:  {}", view.number);
    println!("Estado:             {}", view.badge);
    println!("Proyecto:           {}", view.project);
    println!("Monto:              {symbol}{}", format_amount(view.amount));
    println!("Fecha de Creación:  {}", format_day(invoice.created_at));
    println!("{:<20}{}", format!("{}:", view.date_label), format_day(view.date));

    if let InvoiceKind::StagedPayment { stage_name, .. } = &invoice.kind {
        println!();
        println!(
            "Esta factura corresponde al pago de la etapa \"{stage_name}\" del proyecto {}",
            invoice.project_name
        );
    }

    println!();
    println!("{}: billing download {}", view.action.title, invoice.invoice_number);

    Ok(())
}

/// Download an invoice document into the configured directory
fn cmd_download(dashboard: &CliDashboard, key: &str, kind: Option<KindArg>) -> Result<()> {
    let invoice = dashboard
        .find(key)
        .ok_or_else(|| BillingError::InvoiceNotFound(key.to_string()))?;

    let outcome = match kind {
        Some(kind) => dashboard.download_document(invoice, kind.into()),
        None => dashboard.download(invoice),
    };

    match outcome {
        DownloadOutcome::Saved(path) => {
            println!("  Saved:  {}", path.display());
            Ok(())
        }
        DownloadOutcome::Failed | DownloadOutcome::Skipped => {
            Err(BillingError::DownloadFailed(invoice.invoice_number.clone()))
        }
    }
}
