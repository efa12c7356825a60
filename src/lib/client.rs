use std::{fs, path::Path};

use reqwest::header::ACCEPT_LANGUAGE;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::InvoiceError;
use crate::types::Invoice;

pub const DEFAULT_ENDPOINT: &str = "https://invoice-generator.com";
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    /// Sent as `Accept-Language`; controls number and label formatting on the PDF.
    pub locale: String,
    pub api_key: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            api_key: None,
        }
    }
}

pub struct SubmitRequest<'a> {
    pub url: &'a str,
    pub accept_language: &'a str,
    pub api_key: Option<&'a str>,
    pub body: &'a Value,
}

pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs the single POST round trip to the generation service.
pub trait Transport {
    fn post_json(&self, request: &SubmitRequest<'_>) -> Result<TransportResponse, InvoiceError>;
}

/// Blocking HTTP transport with reqwest's default timeouts.
#[derive(Default)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, request: &SubmitRequest<'_>) -> Result<TransportResponse, InvoiceError> {
        let mut builder = self
            .client
            .post(request.url)
            .header(ACCEPT_LANGUAGE, request.accept_language)
            .json(request.body);
        if let Some(key) = request.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(TransportResponse { status, body })
    }
}

pub struct InvoiceClient<T> {
    transport: T,
    settings: ClientSettings,
}

impl<T: Transport> InvoiceClient<T> {
    pub fn new(transport: T, settings: ClientSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits the invoice and returns the rendered PDF bytes.
    pub fn render(&self, invoice: &Invoice) -> Result<Vec<u8>, InvoiceError> {
        let body = invoice.to_json()?;
        let request = SubmitRequest {
            url: &self.settings.endpoint,
            accept_language: &self.settings.locale,
            api_key: self.settings.api_key.as_deref(),
            body: &body,
        };
        debug!(url = request.url, to = %invoice.to, "submitting invoice");

        let response = self.transport.post_json(&request)?;
        if response.status != 200 {
            let message = describe_error_body(&response.body);
            warn!(status = response.status, %message, "invoice generation rejected");
            return Err(InvoiceError::Submission {
                status: response.status,
                message,
            });
        }
        Ok(response.body)
    }

    /// Submits the invoice and writes the PDF to `file_path`, replacing any existing file.
    /// Nothing is written unless the service answers 200.
    pub fn download(&self, invoice: &Invoice, file_path: &Path) -> Result<(), InvoiceError> {
        let pdf = self.render(invoice)?;
        fs::write(file_path, &pdf)?;
        debug!(path = %file_path.display(), bytes = pdf.len(), "invoice written");
        Ok(())
    }
}

fn describe_error_body(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => json.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}
