use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("the parameter {0} is not a valid template parameter")]
    InvalidTemplateParameter(String),
    /// The remote service answered with something other than 200.
    #[error("invoice download request returned the following message: {message} (response code = {status})")]
    Submission { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
