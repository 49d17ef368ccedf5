use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::status::{InvoiceStatus, TransactionStatus};
use super::wire::{amount, day, day_opt};

const STAGE_PAYMENT: &str = "stage_payment";
const TRADITIONAL: &str = "traditional";

/// A billing document for a project or a project stage.
///
/// Owned by the backend; this client only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InvoiceRecord", into = "InvoiceRecord")]
pub struct Invoice {
    pub id: u64,
    pub invoice_number: String,
    pub project_name: String,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub paid_at: Option<NaiveDate>,
    pub created_at: NaiveDate,
    pub download_url: Option<String>,
    pub kind: InvoiceKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceKind {
    /// Tied to a percentage milestone of the project
    StagedPayment {
        stage_name: String,
        stage_percentage: f64,
    },
    Traditional,
}

impl Invoice {
    pub fn is_staged(&self) -> bool {
        matches!(self.kind, InvoiceKind::StagedPayment { .. })
    }
}

#[derive(Error, Debug)]
#[error("invoice {number}: {reason}")]
pub struct InvalidInvoice {
    pub number: String,
    pub reason: String,
}

/// Invoice as it travels over the wire: one flat shape, stage fields gated by `type`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceRecord {
    id: u64,
    invoice_number: String,
    project_name: String,
    #[serde(with = "amount")]
    amount: f64,
    status: InvoiceStatus,
    #[serde(with = "day")]
    due_date: NaiveDate,
    #[serde(default, with = "day_opt", skip_serializing_if = "Option::is_none")]
    paid_at: Option<NaiveDate>,
    #[serde(with = "day")]
    created_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stage_percentage: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = InvalidInvoice;

    fn try_from(record: InvoiceRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| InvalidInvoice {
            number: record.invoice_number.clone(),
            reason: reason.to_string(),
        };

        // Anything other than a staged payment is treated as traditional
        let kind = if record.kind.as_deref() == Some(STAGE_PAYMENT) {
            let stage_name = record
                .stage_name
                .clone()
                .ok_or_else(|| invalid("staged payment without stageName"))?;
            let stage_percentage = record
                .stage_percentage
                .ok_or_else(|| invalid("staged payment without stagePercentage"))?;
            if !(0.0..=100.0).contains(&stage_percentage) {
                return Err(invalid("stagePercentage must be between 0 and 100"));
            }
            InvoiceKind::StagedPayment {
                stage_name,
                stage_percentage,
            }
        } else {
            InvoiceKind::Traditional
        };

        Ok(Invoice {
            id: record.id,
            invoice_number: record.invoice_number,
            project_name: record.project_name,
            amount: record.amount,
            status: record.status,
            due_date: record.due_date,
            paid_at: record.paid_at,
            created_at: record.created_at,
            download_url: record.download_url,
            kind,
        })
    }
}

impl From<Invoice> for InvoiceRecord {
    fn from(invoice: Invoice) -> Self {
        let (kind, stage_name, stage_percentage) = match invoice.kind {
            InvoiceKind::StagedPayment {
                stage_name,
                stage_percentage,
            } => (STAGE_PAYMENT, Some(stage_name), Some(stage_percentage)),
            InvoiceKind::Traditional => (TRADITIONAL, None, None),
        };

        InvoiceRecord {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            project_name: invoice.project_name,
            amount: invoice.amount,
            status: invoice.status,
            due_date: invoice.due_date,
            paid_at: invoice.paid_at,
            created_at: invoice.created_at,
            download_url: invoice.download_url,
            stage_name,
            stage_percentage,
            kind: Some(kind.to_string()),
        }
    }
}

/// Aggregate figures for the summary cards.
///
/// Fetched independently of the invoice list and never reconciled with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    #[serde(with = "amount")]
    pub current_balance: f64,
    #[serde(with = "amount")]
    pub total_paid: f64,
    #[serde(with = "amount")]
    pub pending_payments: f64,
    #[serde(default, with = "day_opt")]
    pub next_payment_due: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Card,
    BankTransfer,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodDetails {
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: PaymentMethodKind,
    #[serde(default)]
    pub details: Option<PaymentMethodDetails>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Payment,
    Refund,
    Fee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(with = "amount")]
    pub amount: f64,
    pub description: String,
    pub status: TransactionStatus,
    #[serde(with = "day")]
    pub date: NaiveDate,
    #[serde(default)]
    pub invoice_id: Option<u64>,
    #[serde(default)]
    pub payment_method_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_staged_invoice_with_string_amount() {
        let json = r#"{
            "id": 7,
            "invoiceNumber": "INV-STAGE-3-1",
            "projectName": "Tienda Online",
            "amount": "1250.50",
            "status": "pending",
            "dueDate": "2024-03-01T00:00:00.000Z",
            "createdAt": "2024-02-01",
            "stageName": "Anticipo del Proyecto",
            "stagePercentage": 25,
            "type": "stage_payment"
        }"#;

        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.amount, 1250.5);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.paid_at, None);
        assert_eq!(
            invoice.kind,
            InvoiceKind::StagedPayment {
                stage_name: "Anticipo del Proyecto".to_string(),
                stage_percentage: 25.0,
            }
        );
    }

    #[test]
    fn missing_type_means_traditional_and_stage_fields_are_ignored() {
        let json = r#"{
            "id": 3,
            "invoiceNumber": "INV-2024-002",
            "projectName": "Sistema de Gestión",
            "amount": 2500,
            "status": "pending",
            "dueDate": "2024-02-15",
            "paidAt": null,
            "createdAt": "2024-01-15",
            "stageName": "leftover"
        }"#;

        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.kind, InvoiceKind::Traditional);
        assert!(!invoice.is_staged());
    }

    #[test]
    fn staged_invoice_without_stage_fields_is_rejected() {
        let json = r#"{
            "id": 8, "invoiceNumber": "INV-STAGE-3-2", "projectName": "Tienda",
            "amount": 100, "status": "paid", "dueDate": "2024-03-01",
            "createdAt": "2024-02-01", "type": "stage_payment", "stageName": "Final"
        }"#;

        let err = serde_json::from_str::<Invoice>(json).unwrap_err();
        assert!(err.to_string().contains("stagePercentage"));
    }

    #[test]
    fn malformed_amount_is_rejected() {
        let json = r#"{
            "id": 9, "invoiceNumber": "INV-9", "projectName": "X",
            "amount": "12,50", "status": "paid", "dueDate": "2024-03-01",
            "createdAt": "2024-02-01"
        }"#;

        let err = serde_json::from_str::<Invoice>(json).unwrap_err();
        assert!(err.to_string().contains("invalid amount"));
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let invoice = Invoice {
            id: 1,
            invoice_number: "INV-STAGE-1-1".to_string(),
            project_name: "Desarrollo App Mobile".to_string(),
            amount: 1250.0,
            status: InvoiceStatus::Paid,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            paid_at: NaiveDate::from_ymd_opt(2024, 1, 14),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            download_url: None,
            kind: InvoiceKind::StagedPayment {
                stage_name: "Anticipo del Proyecto".to_string(),
                stage_percentage: 25.0,
            },
        };

        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(value["invoiceNumber"], "INV-STAGE-1-1");
        assert_eq!(value["type"], "stage_payment");
        assert_eq!(value["paidAt"], "2024-01-14");
        assert_eq!(value["stagePercentage"], 25.0);
        assert!(value.get("downloadUrl").is_none());
    }

    #[test]
    fn decodes_summary_without_next_due() {
        let json = r#"{"currentBalance": "0", "totalPaid": 15750, "pendingPayments": 2500.5}"#;
        let summary: BillingSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.current_balance, 0.0);
        assert_eq!(summary.pending_payments, 2500.5);
        assert_eq!(summary.next_payment_due, None);
    }

    #[test]
    fn decodes_payment_method_and_transaction() {
        let method: PaymentMethod = serde_json::from_str(
            r#"{"id": 2, "type": "bank_transfer",
                "details": {"bankName": "Banco Santander", "accountNumber": "****5678"},
                "isDefault": false}"#,
        )
        .unwrap();
        assert_eq!(method.kind, PaymentMethodKind::BankTransfer);
        let details = method.details.unwrap();
        assert_eq!(details.bank_name.as_deref(), Some("Banco Santander"));
        assert_eq!(details.last4, None);

        let transaction: Transaction = serde_json::from_str(
            r#"{"id": 2, "type": "fee", "amount": 150, "description": "Comisión MercadoPago",
                "status": "completed", "date": "2024-01-14"}"#,
        )
        .unwrap();
        assert_eq!(transaction.kind, TransactionKind::Fee);
        assert_eq!(transaction.status, TransactionStatus::Completed);
        assert_eq!(transaction.invoice_id, None);
    }
}
