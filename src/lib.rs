pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod invoice;

pub use api::{BillingBackend, DocumentKind, DownloadTarget, HttpBillingClient};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardView, DownloadOutcome, Fallback, FetchState};
pub use error::{BillingError, DownloadError, FetchError, Result};
pub use invoice::{classify, BillingSummary, Invoice, InvoiceKind, InvoiceStatus, StatusBadge};
