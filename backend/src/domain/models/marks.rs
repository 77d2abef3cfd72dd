use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::MarksRecord;

/// Scores for one exam of one subject, keyed by roll number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksExam {
    pub exam_id: String,
    pub subject_id: String,
    pub records: Vec<MarksRecord>,
    pub updated_at: DateTime<Utc>,
}
