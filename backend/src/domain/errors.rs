//! Error types raised by the domain layer.
//!
//! Services return `anyhow::Result`; these enums ride inside the `anyhow::Error`
//! so the REST layer can downcast and pick a status code.

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound { entity, id: id.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    #[error("Payment amount must be positive")]
    NonPositiveAmount,
    #[error("No fee structure for '{fee_type}' in semester {semester}")]
    UnknownFee { semester: u32, fee_type: String },
    #[error("Fee '{fee_type}' is not applicable to this student in semester {semester}")]
    NotApplicable { semester: u32, fee_type: String },
    #[error("Payment of {amount:.2} exceeds the outstanding balance of {balance:.2} for '{fee_type}'")]
    Overpayment { fee_type: String, amount: f64, balance: f64 },
    #[error("Nothing is pending for semester {0}")]
    NothingPending(u32),
    #[error("'{0}' is a compulsory fee and cannot be toggled")]
    CompulsoryFee(String),
    /// `completed` counts fees whose payment row reached the log;
    /// `totals_updated` counts those whose running total also moved
    #[error("Logged {completed} of {attempted} pending fees ({totals_updated} running totals updated) before failing: {message}")]
    PartialPayment {
        completed: usize,
        totals_updated: usize,
        attempted: usize,
        message: String,
    },
}
