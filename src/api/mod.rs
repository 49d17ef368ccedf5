mod http;

pub use http::HttpBillingClient;

use crate::error::{DownloadError, FetchError};
use crate::invoice::{download_action, BillingSummary, Invoice, InvoiceKind};

/// Read access to the billing backend.
///
/// Implemented over HTTP by [`HttpBillingClient`]; tests substitute their own.
pub trait BillingBackend {
    fn fetch_billing_summary(&self) -> Result<BillingSummary, FetchError>;

    fn fetch_invoices(&self) -> Result<Vec<Invoice>, FetchError>;

    /// Fetch the raw document bytes. An empty payload is an error.
    fn download_document(&self, target: &DownloadTarget) -> Result<Vec<u8>, DownloadError>;
}

impl<B: BillingBackend + ?Sized> BillingBackend for &B {
    fn fetch_billing_summary(&self) -> Result<BillingSummary, FetchError> {
        (**self).fetch_billing_summary()
    }

    fn fetch_invoices(&self) -> Result<Vec<Invoice>, FetchError> {
        (**self).fetch_invoices()
    }

    fn download_document(&self, target: &DownloadTarget) -> Result<Vec<u8>, DownloadError> {
        (**self).download_document(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    StandardInvoice,
    /// The "Boleta RESIMPLE" receipt issued for staged payments
    StagedReceipt,
}

/// Where to fetch a document from and what to name it on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Path relative to the API base URL
    pub path: String,
    pub filename: String,
    pub kind: DocumentKind,
}

impl DownloadTarget {
    pub fn resolve(
        invoice: &Invoice,
        kind: DocumentKind,
        prefix: &str,
    ) -> Result<Self, DownloadError> {
        let path = match (&invoice.kind, kind) {
            (InvoiceKind::Traditional, DocumentKind::StandardInvoice) => {
                format!("/invoices/{}/download", invoice.id)
            }
            (InvoiceKind::StagedPayment { .. }, DocumentKind::StandardInvoice) => {
                format!("/stage-invoices/{}/download", invoice.id)
            }
            (InvoiceKind::StagedPayment { .. }, DocumentKind::StagedReceipt) => {
                format!("/stage-invoices/{}/download-resimple", invoice.id)
            }
            (InvoiceKind::Traditional, DocumentKind::StagedReceipt) => {
                return Err(DownloadError::ReceiptUnavailable(
                    invoice.invoice_number.clone(),
                ))
            }
        };

        let filename = match kind {
            DocumentKind::StandardInvoice => format!("{prefix}_{}.pdf", invoice.invoice_number),
            DocumentKind::StagedReceipt => {
                format!("{prefix}_Boleta_RESIMPLE_{}.pdf", invoice.invoice_number)
            }
        };

        Ok(DownloadTarget {
            path,
            filename,
            kind,
        })
    }

    /// Target of the invoice's download button: receipts for staged payments,
    /// the invoice PDF otherwise.
    pub fn for_action(invoice: &Invoice, prefix: &str) -> Result<Self, DownloadError> {
        Self::resolve(invoice, download_action(invoice).kind, prefix)
    }
}
