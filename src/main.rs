use std::{path::PathBuf, process, time::Duration};

use anyhow::Context;
use clap::Parser;
use invoice_generator_lib::{
    process_transactions, BatchReport, BatchSettings, ClientSettings, HttpTransport,
    InvoiceClient, DEFAULT_CURRENCY, DEFAULT_ENDPOINT, DEFAULT_LOCALE,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generates one PDF invoice per incoming payment of a bank statement.
#[derive(Parser)]
#[command(name = "invoice_generator_bin")]
struct Cli {
    /// Statement CSV with "Date (UTC)", "Description" and "Amount" columns
    csv_path: PathBuf,

    /// Directory the PDFs are written to
    #[arg(long, default_value = "invoices", env = "INVOICE_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Name printed as the issuer of every invoice
    #[arg(long, default_value = "EA2 Consulting", env = "INVOICE_SENDER")]
    sender: String,

    /// Label of the single line item
    #[arg(long, default_value = "Consultative services")]
    item_name: String,

    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,

    /// Invoice generation API
    #[arg(long, default_value = DEFAULT_ENDPOINT, env = "INVOICE_API_URL")]
    endpoint: String,

    /// Sent as Accept-Language
    #[arg(long, default_value = DEFAULT_LOCALE, env = "INVOICE_LOCALE")]
    locale: String,

    #[arg(long, env = "INVOICE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Pause between two submissions, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<BatchReport> {
    let client = InvoiceClient::new(
        HttpTransport::new(),
        ClientSettings {
            endpoint: cli.endpoint,
            locale: cli.locale,
            api_key: cli.api_key,
        },
    );
    let settings = BatchSettings {
        sender: cli.sender,
        item_name: cli.item_name,
        currency: cli.currency,
        output_dir: cli.output_dir,
        pacing: Duration::from_millis(cli.delay_ms),
    };

    process_transactions(&cli.csv_path, &client, &settings)
        .with_context(|| format!("generating invoices from {}", cli.csv_path.display()))
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(report) => {
            println!(
                "generated {} invoice(s), skipped {} transaction(s)",
                report.generated.len(),
                report.skipped
            );
            process::exit(0);
        }
        Err(e) => {
            eprintln!("an error occurred: {:#}", e);
            process::exit(1);
        }
    }
}
