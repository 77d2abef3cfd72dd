use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{FeeLineStatus, FeeStatusEntry};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Domain model representing an enrolled student.
///
/// `fee_status` is the cumulative amount paid per (semester, fee type). It is
/// updated in place on each payment and is a projection of the payment log,
/// not the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub roll_no: String,
    pub name: String,
    pub course: String,
    pub semester: u32,
    #[serde(default)]
    pub fee_status: BTreeMap<u32, BTreeMap<String, FeeStatusEntry>>,
    #[serde(default)]
    pub optional_fees: BTreeMap<u32, BTreeMap<String, bool>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn generate_id() -> String {
        format!("student-{}", Uuid::new_v4().simple())
    }

    /// Running total paid for a fee type in a semester (0 when never paid)
    pub fn running_total(&self, semester: u32, fee_type: &str) -> f64 {
        self.fee_status
            .get(&semester)
            .and_then(|fees| fees.get(fee_type))
            .map(|entry| entry.amount)
            .unwrap_or(0.0)
    }

    pub fn optional_fee_enabled(&self, semester: u32, fee_type: &str) -> bool {
        self.optional_fees
            .get(&semester)
            .and_then(|fees| fees.get(fee_type))
            .copied()
            .unwrap_or(false)
    }

    /// Overwrite the running total for a fee and derive its status
    pub fn set_running_total(&mut self, semester: u32, fee_type: &str, paid: f64, fee_amount: f64) {
        let status = if paid >= fee_amount {
            FeeLineStatus::Paid
        } else if paid > 0.0 {
            FeeLineStatus::PartiallyPaid
        } else {
            FeeLineStatus::Unpaid
        };

        self.fee_status
            .entry(semester)
            .or_default()
            .insert(fee_type.to_string(), FeeStatusEntry { amount: paid, status });
    }
}
