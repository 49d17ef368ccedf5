use serde::{Deserialize, Serialize};
use std::fmt;

/// Badge style a status renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Default,
    Secondary,
    Destructive,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub category: StatusCategory,
    pub label: String,
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Map an invoice or transaction status code to its badge.
///
/// Unrecognized codes render as `Outline` with the raw code as the label.
pub fn classify(status: &str) -> StatusBadge {
    let (category, label) = match status {
        "paid" => (StatusCategory::Default, "Pagado"),
        "completed" => (StatusCategory::Default, "Completado"),
        "pending" => (StatusCategory::Secondary, "Pendiente"),
        "overdue" => (StatusCategory::Destructive, "Vencido"),
        "failed" => (StatusCategory::Destructive, "Fallido"),
        "cancelled" => (StatusCategory::Outline, "Cancelado"),
        other => (StatusCategory::Outline, other),
    };

    StatusBadge {
        category,
        label: label.to_string(),
    }
}

/// Invoice lifecycle status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
    Cancelled,
    /// Any code this client does not know yet, kept verbatim
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
            InvoiceStatus::Other(code) => code,
        }
    }

    pub fn badge(&self) -> StatusBadge {
        classify(self.as_str())
    }
}

impl From<String> for InvoiceStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "paid" => InvoiceStatus::Paid,
            "pending" => InvoiceStatus::Pending,
            "overdue" => InvoiceStatus::Overdue,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Other(code),
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Other(code) => code,
        }
    }

    pub fn badge(&self) -> StatusBadge {
        classify(self.as_str())
    }
}

impl From<String> for TransactionStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "completed" => TransactionStatus::Completed,
            "pending" => TransactionStatus::Pending,
            "failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Other(code),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}
