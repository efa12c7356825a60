use std::{fs, path::PathBuf, thread, time::Duration};

use tracing::{debug, info};

use crate::client::{InvoiceClient, Transport};
use crate::error::InvoiceError;
use crate::io::Transaction;
use crate::types::{Invoice, DEFAULT_CURRENCY};

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub sender: String,
    pub item_name: String,
    pub currency: String,
    pub output_dir: PathBuf,
    /// Wait between two submissions. Zero disables pacing.
    pub pacing: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            sender: "EA2 Consulting".to_string(),
            item_name: "Consultative services".to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            output_dir: PathBuf::from("invoices"),
            pacing: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub generated: Vec<PathBuf>,
    pub skipped: usize,
}

fn invoice_for(base: &Invoice, transaction: &Transaction, item_name: &str) -> Invoice {
    let mut invoice = base.clone();
    invoice.to = transaction.description.clone();
    invoice.date = transaction.date;
    invoice.add_item(item_name, 1, transaction.amount.value(), None);
    invoice
}

fn output_path(settings: &BatchSettings, transaction: &Transaction) -> PathBuf {
    settings
        .output_dir
        .join(format!("{}.pdf", transaction.date.format("%Y-%m-%d")))
}

/// Generates one invoice per transaction with a non-negative amount, in input order.
///
/// Outgoing payments are skipped. Files are named after the transaction date, so two
/// transactions on the same day write to the same file and the later one wins. The first
/// failed submission aborts the batch; invoices generated before it stay on disk.
pub fn generate_invoices<T, I>(
    transactions: I,
    client: &InvoiceClient<T>,
    settings: &BatchSettings,
) -> Result<BatchReport, InvoiceError>
where
    T: Transport,
    I: IntoIterator<Item = Transaction>,
{
    fs::create_dir_all(&settings.output_dir)?;

    let mut base = Invoice::new(settings.sender.as_str(), "");
    base.currency = settings.currency.clone();

    let mut report = BatchReport::default();
    for transaction in transactions {
        if transaction.amount.is_negative() {
            debug!(date = %transaction.date, description = %transaction.description, "skipping outgoing transaction");
            report.skipped += 1;
            continue;
        }

        if !report.generated.is_empty() && !settings.pacing.is_zero() {
            thread::sleep(settings.pacing);
        }

        let invoice = invoice_for(&base, &transaction, &settings.item_name);
        let path = output_path(settings, &transaction);
        client.download(&invoice, &path)?;
        info!(to = %invoice.to, path = %path.display(), "invoice generated");
        report.generated.push(path);
    }

    info!(
        generated = report.generated.len(),
        skipped = report.skipped,
        "batch finished"
    );
    Ok(report)
}
