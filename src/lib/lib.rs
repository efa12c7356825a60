mod batch;
mod client;
mod dates;
mod error;
mod io;
mod types;
mod wire;

use std::path::Path;

pub use batch::{generate_invoices, BatchReport, BatchSettings};
pub use client::{
    ClientSettings, HttpTransport, InvoiceClient, SubmitRequest, Transport, TransportResponse,
    DEFAULT_ENDPOINT, DEFAULT_LOCALE,
};
pub use dates::format_invoice_date;
pub use error::InvoiceError;
pub use io::{process_csv, read_transactions, Transaction};
pub use types::{
    CustomField, Invoice, Item, MonetaryAmount, SubtotalFields, TaxDisplay, TemplateParameter,
    DEFAULT_CURRENCY,
};

/// Reads the transaction statement at `csv_path` and generates an invoice for every incoming
/// payment in it.
pub fn process_transactions<T: Transport>(
    csv_path: &Path,
    client: &InvoiceClient<T>,
    settings: &BatchSettings,
) -> Result<BatchReport, InvoiceError> {
    let transactions = process_csv(csv_path)?;

    generate_invoices(transactions, client, settings)
}
