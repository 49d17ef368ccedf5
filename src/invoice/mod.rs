mod model;
mod status;
mod view;
mod wire;

pub use model::{
    BillingSummary, InvalidInvoice, Invoice, InvoiceKind, PaymentMethod, PaymentMethodDetails,
    PaymentMethodKind, Transaction, TransactionKind,
};
pub use status::{classify, InvoiceStatus, StatusBadge, StatusCategory, TransactionStatus};
pub use view::{
    display_amount, display_date, display_date_label, download_action, format_amount,
    pending_count, DownloadAction, InvoiceView,
};
pub use wire::parse_day;
