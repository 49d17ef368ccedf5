use chrono::NaiveDate;

use super::model::{Invoice, InvoiceKind};
use super::status::{InvoiceStatus, StatusBadge};
use crate::api::DocumentKind;

/// The single download button shown for an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub label: &'static str,
    pub title: &'static str,
    pub kind: DocumentKind,
}

/// Uniform display shape for both invoice kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceView {
    pub number: String,
    /// "Etapa: <name>" for staged payments
    pub stage_line: Option<String>,
    pub project: String,
    /// "<pct>% del proyecto" for staged payments
    pub stage_share: Option<String>,
    pub amount: f64,
    pub badge: StatusBadge,
    pub date_label: &'static str,
    pub date: NaiveDate,
    pub action: DownloadAction,
}

impl InvoiceView {
    pub fn new(invoice: &Invoice) -> Self {
        let (stage_line, stage_share) = match &invoice.kind {
            InvoiceKind::StagedPayment {
                stage_name,
                stage_percentage,
            } => (
                Some(format!("Etapa: {stage_name}")),
                Some(format!("{}% del proyecto", format_amount(*stage_percentage))),
            ),
            InvoiceKind::Traditional => (None, None),
        };

        InvoiceView {
            number: invoice.invoice_number.clone(),
            stage_line,
            project: invoice.project_name.clone(),
            stage_share,
            amount: display_amount(invoice),
            badge: invoice.status.badge(),
            date_label: display_date_label(invoice),
            date: display_date(invoice),
            action: download_action(invoice),
        }
    }
}

pub fn display_amount(invoice: &Invoice) -> f64 {
    invoice.amount
}

/// Paid-at date when the invoice is paid, otherwise the due date.
pub fn display_date(invoice: &Invoice) -> NaiveDate {
    invoice.paid_at.unwrap_or(invoice.due_date)
}

pub fn display_date_label(invoice: &Invoice) -> &'static str {
    if invoice.paid_at.is_some() {
        "Fecha de Pago"
    } else {
        "Fecha de Vencimiento"
    }
}

pub fn download_action(invoice: &Invoice) -> DownloadAction {
    match invoice.kind {
        InvoiceKind::StagedPayment { .. } => DownloadAction {
            label: "RESIMPLE",
            title: "Descargar Boleta RESIMPLE",
            kind: DocumentKind::StagedReceipt,
        },
        InvoiceKind::Traditional => DownloadAction {
            label: "PDF",
            title: "Descargar Factura",
            kind: DocumentKind::StandardInvoice,
        },
    }
}

/// Number of invoices still waiting for payment.
pub fn pending_count(invoices: &[Invoice]) -> usize {
    invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Pending)
        .count()
}

/// Group thousands and keep at most three fraction digits: `1250.5` -> `1,250.5`.
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let text = format!("{:.3}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::with_capacity(whole.len() + whole.len() / 3 + frac.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(kind: InvoiceKind, paid_at: Option<NaiveDate>) -> Invoice {
        Invoice {
            id: 1,
            invoice_number: "INV-1".to_string(),
            project_name: "Portal".to_string(),
            amount: 1250.5,
            status: InvoiceStatus::Pending,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            paid_at,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            download_url: None,
            kind,
        }
    }

    fn staged() -> InvoiceKind {
        InvoiceKind::StagedPayment {
            stage_name: "50% de Progreso".to_string(),
            stage_percentage: 25.0,
        }
    }

    #[test]
    fn formats_amounts_like_the_dashboard() {
        assert_eq!(format_amount(1250.5), "1,250.5");
        assert_eq!(format_amount(15750.0), "15,750");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.9999), "1,000");
        assert_eq!(format_amount(1234567.125), "1,234,567.125");
        assert_eq!(format_amount(-2500.0), "-2,500");
    }

    #[test]
    fn parsed_string_amount_keeps_its_value() {
        let parsed: f64 = "1250.50".parse().unwrap();
        let shown = format_amount(parsed);
        assert_eq!(shown.replace(',', "").parse::<f64>().unwrap(), 1250.5);
    }

    #[test]
    fn date_prefers_paid_at() {
        let paid = NaiveDate::from_ymd_opt(2024, 2, 14);
        let inv = invoice(InvoiceKind::Traditional, paid);
        assert_eq!(display_date(&inv), paid.unwrap());
        assert_eq!(display_date_label(&inv), "Fecha de Pago");

        let inv = invoice(InvoiceKind::Traditional, None);
        assert_eq!(display_date(&inv), inv.due_date);
        assert_eq!(display_date_label(&inv), "Fecha de Vencimiento");
    }

    #[test]
    fn action_depends_on_invoice_kind() {
        let action = download_action(&invoice(staged(), None));
        assert_eq!(action.label, "RESIMPLE");
        assert_eq!(action.kind, DocumentKind::StagedReceipt);

        let action = download_action(&invoice(InvoiceKind::Traditional, None));
        assert_eq!(action.label, "PDF");
        assert_eq!(action.kind, DocumentKind::StandardInvoice);
    }

    #[test]
    fn view_carries_stage_lines_only_for_staged_invoices() {
        let view = InvoiceView::new(&invoice(staged(), None));
        assert_eq!(view.stage_line.as_deref(), Some("Etapa: 50% de Progreso"));
        assert_eq!(view.stage_share.as_deref(), Some("25% del proyecto"));
        assert_eq!(view.badge.label, "Pendiente");

        let view = InvoiceView::new(&invoice(InvoiceKind::Traditional, None));
        assert_eq!(view.stage_line, None);
        assert_eq!(view.stage_share, None);
    }

    #[test]
    fn counts_pending_invoices() {
        let mut paid = invoice(InvoiceKind::Traditional, None);
        paid.status = InvoiceStatus::Paid;
        let invoices = vec![paid, invoice(staged(), None), invoice(InvoiceKind::Traditional, None)];
        assert_eq!(pending_count(&invoices), 2);
    }
}
