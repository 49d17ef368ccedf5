use std::path::PathBuf;
use thiserror::Error;

/// Failure fetching the summary or the invoice list.
///
/// Never shown to the user as an error: the dashboard swaps in its
/// fallback value and keeps the error around for logging.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure downloading an invoice or receipt document.
///
/// The `Display` text is what the user sees in the error notification.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("El archivo PDF está vacío")]
    EmptyDocument,

    #[error("No se pudo conectar con {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("La factura {0} no tiene Boleta RESIMPLE")]
    ReceiptUnavailable(String),

    #[error("No se pudo guardar el archivo: {0}")]
    Save(#[from] std::io::Error),
}

impl DownloadError {
    /// Message used when the server gave no usable error body.
    pub fn http_status(status: u16) -> Self {
        DownloadError::Http {
            status,
            message: format!("Error HTTP: {status}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Config directory not found at {0}. Run 'billing init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Invoice '{0}' not found. Use 'billing invoices' to see available invoices.")]
    InvoiceNotFound(String),

    #[error("Download of {0} failed")]
    DownloadFailed(String),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillingError>;
