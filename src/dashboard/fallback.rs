use chrono::NaiveDate;

use crate::invoice::{BillingSummary, Invoice, InvoiceKind, InvoiceStatus};

/// Values shown in place of a source that failed to load.
///
/// The dashboard always renders something; when the backend is unreachable
/// these figures stand in for the real ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
    pub summary: BillingSummary,
    pub invoices: Vec<Invoice>,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            summary: BillingSummary {
                current_balance: 0.0,
                total_paid: 15750.0,
                pending_payments: 2500.0,
                next_payment_due: Some(day(2024, 2, 15)),
            },
            invoices: vec![
                Invoice {
                    id: 1,
                    invoice_number: "INV-STAGE-1-1".to_string(),
                    project_name: "Desarrollo App Mobile".to_string(),
                    amount: 1250.0,
                    status: InvoiceStatus::Paid,
                    due_date: day(2024, 1, 15),
                    paid_at: Some(day(2024, 1, 14)),
                    created_at: day(2024, 1, 1),
                    download_url: None,
                    kind: InvoiceKind::StagedPayment {
                        stage_name: "Anticipo del Proyecto".to_string(),
                        stage_percentage: 25.0,
                    },
                },
                Invoice {
                    id: 2,
                    invoice_number: "INV-STAGE-1-2".to_string(),
                    project_name: "Desarrollo App Mobile".to_string(),
                    amount: 1250.0,
                    status: InvoiceStatus::Paid,
                    due_date: day(2024, 2, 15),
                    paid_at: Some(day(2024, 2, 14)),
                    created_at: day(2024, 2, 1),
                    download_url: None,
                    kind: InvoiceKind::StagedPayment {
                        stage_name: "50% de Progreso".to_string(),
                        stage_percentage: 25.0,
                    },
                },
                Invoice {
                    id: 3,
                    invoice_number: "INV-2024-002".to_string(),
                    project_name: "Sistema de Gestión".to_string(),
                    amount: 2500.0,
                    status: InvoiceStatus::Pending,
                    due_date: day(2024, 2, 15),
                    paid_at: None,
                    created_at: day(2024, 1, 15),
                    download_url: None,
                    kind: InvoiceKind::Traditional,
                },
            ],
        }
    }
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
