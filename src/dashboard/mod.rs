mod fallback;
mod host;

pub use fallback::Fallback;
pub use host::{ConsoleNotifier, DirectorySaver, FileSaver, Notification, Notifier, Variant};

use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::thread;

use crate::api::{BillingBackend, DocumentKind, DownloadTarget};
use crate::error::{DownloadError, FetchError};
use crate::invoice::{download_action, BillingSummary, Invoice};

/// Lifecycle of one data source.
#[derive(Debug)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    /// The fetch failed and the fallback value stands in for it
    Degraded { error: FetchError, value: T },
}

impl<T> FetchState<T> {
    fn settle(source: &str, result: Result<T, FetchError>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => FetchState::Success(value),
            Err(error) => {
                warn!("Could not load {source}, showing fallback data: {error}");
                FetchState::Degraded {
                    error,
                    value: fallback(),
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Loading => None,
            FetchState::Success(value) | FetchState::Degraded { value, .. } => Some(value),
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Degraded { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// What the dashboard shows right now.
#[derive(Debug)]
pub enum DashboardView<'a> {
    /// At least one source is still loading
    Placeholder,
    Ready {
        summary: &'a BillingSummary,
        invoices: &'a [Invoice],
        selected: Option<&'a Invoice>,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// Already reported through the notifier
    Failed,
    /// Ignored because the dashboard is still loading
    Skipped,
}

/// Billing dashboard: summary, invoice list, detail selection and downloads.
pub struct Dashboard<B, N, S> {
    backend: B,
    notifier: N,
    saver: S,
    fallback: Fallback,
    filename_prefix: String,
    summary: FetchState<BillingSummary>,
    invoices: FetchState<Vec<Invoice>>,
    selected: Option<Invoice>,
}

impl<B, N, S> Dashboard<B, N, S>
where
    B: BillingBackend + Sync,
    N: Notifier,
    S: FileSaver,
{
    pub fn new(backend: B, notifier: N, saver: S) -> Self {
        Self {
            backend,
            notifier,
            saver,
            fallback: Fallback::default(),
            filename_prefix: "SoftwarePar".to_string(),
            summary: FetchState::Loading,
            invoices: FetchState::Loading,
            selected: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// Fetch the summary and the invoice list concurrently.
    ///
    /// Each source ends up either loaded or degraded to its fallback.
    pub fn load(&mut self) {
        let backend = &self.backend;
        let (summary, invoices) = thread::scope(|scope| {
            let summary = scope.spawn(|| backend.fetch_billing_summary());
            let invoices = backend.fetch_invoices();
            let summary = summary
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (summary, invoices)
        });

        let fallback = &self.fallback;
        self.summary = FetchState::settle("billing summary", summary, || fallback.summary.clone());
        self.invoices = FetchState::settle("invoices", invoices, || fallback.invoices.clone());

        // A selection only survives against live data, never against the fallback
        self.selected = match (&self.selected, &self.invoices) {
            (Some(selected), FetchState::Success(invoices)) => {
                invoices.iter().find(|inv| inv.id == selected.id).cloned()
            }
            _ => None,
        };
    }

    /// Invalidate both sources, close the detail view and load again.
    pub fn refresh(&mut self) {
        self.selected = None;
        self.summary = FetchState::Loading;
        self.invoices = FetchState::Loading;
        self.load();
    }

    pub fn is_loading(&self) -> bool {
        self.summary.is_loading() || self.invoices.is_loading()
    }

    pub fn summary_state(&self) -> &FetchState<BillingSummary> {
        &self.summary
    }

    pub fn invoices_state(&self) -> &FetchState<Vec<Invoice>> {
        &self.invoices
    }

    pub fn invoices(&self) -> &[Invoice] {
        self.invoices.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn view(&self) -> DashboardView<'_> {
        match (self.summary.value(), self.invoices.value()) {
            (Some(summary), Some(invoices)) => DashboardView::Ready {
                summary,
                invoices,
                selected: self.selected.as_ref(),
            },
            _ => DashboardView::Placeholder,
        }
    }

    /// Look an invoice up by its number, or by numeric id.
    pub fn find(&self, key: &str) -> Option<&Invoice> {
        let invoices = self.invoices();
        invoices
            .iter()
            .find(|inv| inv.invoice_number == key)
            .or_else(|| {
                let id: u64 = key.parse().ok()?;
                invoices.iter().find(|inv| inv.id == id)
            })
    }

    /// Open the detail view for an invoice, replacing any previous selection.
    ///
    /// Unknown ids leave the selection untouched.
    pub fn select(&mut self, id: u64) -> Option<&Invoice> {
        let invoice = self.invoices().iter().find(|inv| inv.id == id)?.clone();
        self.selected = Some(invoice);
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Invoice> {
        self.selected.as_ref()
    }

    /// Close the detail view.
    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    /// Run the invoice's download button: the RESIMPLE receipt for staged
    /// payments, the invoice PDF otherwise.
    pub fn download(&self, invoice: &Invoice) -> DownloadOutcome {
        self.download_document(invoice, download_action(invoice).kind)
    }

    /// Download one document and report the result through the notifier.
    ///
    /// Every failure ends here; nothing propagates to the caller.
    pub fn download_document(&self, invoice: &Invoice, kind: DocumentKind) -> DownloadOutcome {
        if self.is_loading() {
            debug!("Ignoring download of {} while loading", invoice.invoice_number);
            return DownloadOutcome::Skipped;
        }

        match self.fetch_and_save(invoice, kind) {
            Ok(path) => {
                info!("Saved {} to {}", invoice.invoice_number, path.display());
                self.notifier.notify(success_notification(invoice, kind));
                DownloadOutcome::Saved(path)
            }
            Err(e) => {
                error!("Error downloading {}: {e}", invoice.invoice_number);
                self.notifier.notify(failure_notification(kind, &e));
                DownloadOutcome::Failed
            }
        }
    }

    fn fetch_and_save(
        &self,
        invoice: &Invoice,
        kind: DocumentKind,
    ) -> Result<PathBuf, DownloadError> {
        let target = DownloadTarget::resolve(invoice, kind, &self.filename_prefix)?;
        debug!("Downloading {} from {}", invoice.invoice_number, target.path);
        let bytes = self.backend.download_document(&target)?;
        Ok(self.saver.save(&target.filename, &bytes)?)
    }
}

fn success_notification(invoice: &Invoice, kind: DocumentKind) -> Notification {
    let number = &invoice.invoice_number;
    let (title, description) = match kind {
        DocumentKind::StandardInvoice => (
            "Factura descargada".to_string(),
            format!("Factura {number} descargada exitosamente"),
        ),
        DocumentKind::StagedReceipt => (
            "Boleta RESIMPLE descargada".to_string(),
            format!("Boleta RESIMPLE para {number} descargada exitosamente"),
        ),
    };

    Notification {
        title,
        description,
        variant: Variant::Default,
    }
}

fn failure_notification(kind: DocumentKind, error: &DownloadError) -> Notification {
    let mut description = error.to_string();
    if description.trim().is_empty() {
        description = match kind {
            DocumentKind::StandardInvoice => "No se pudo descargar la factura",
            DocumentKind::StagedReceipt => "No se pudo descargar la Boleta RESIMPLE",
        }
        .to_string();
    }

    Notification {
        title: "Error al descargar".to_string(),
        description,
        variant: Variant::Destructive,
    }
}
