use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::AttendanceRecord;
use uuid::Uuid;

use crate::domain::models::same_roll_no;

/// One attendance-taking event for a subject. Several sessions may share a
/// date; nothing in the store prevents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub id: String,
    pub date: NaiveDate,
    pub subject_id: String,
    pub subject_name: String,
    pub records: Vec<AttendanceRecord>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceSession {
    pub fn generate_id(date: NaiveDate) -> String {
        format!("session-{}-{}", date.format("%Y%m%d"), Uuid::new_v4().simple())
    }

    pub fn record_for(&self, roll_no: &str) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| same_roll_no(&r.roll_no, roll_no))
    }
}
