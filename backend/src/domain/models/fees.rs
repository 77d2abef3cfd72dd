use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PAYMENT_STATUS_COMPLETED: &str = "Completed";

/// Expected charge for one fee type in one semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructure {
    pub id: String,
    pub semester: u32,
    pub fee_type: String,
    pub amount: f64,
    pub due_date: NaiveDate,
}

impl FeeStructure {
    pub fn generate_id(semester: u32, fee_type: &str) -> String {
        let slug: String = fee_type
            .chars()
            .filter(|c| c.is_alphanumeric())
            .take(16)
            .collect::<String>()
            .to_lowercase();
        format!("fee-s{}-{}-{}", semester, slug, &Uuid::new_v4().simple().to_string()[..8])
    }
}

/// Append-only payment log row. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePayment {
    pub id: String,
    pub student_id: String,
    pub fee_type: String,
    pub semester: u32,
    pub amount: f64,
    pub payment_method: String,
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
    pub status: String,
}

impl FeePayment {
    pub fn generate_id() -> String {
        format!("payment-{}", Uuid::new_v4().simple())
    }

    pub fn generate_transaction_id(now: DateTime<Utc>) -> String {
        format!("TXN{}{}", now.timestamp_millis(), &Uuid::new_v4().simple().to_string()[..6])
    }
}
