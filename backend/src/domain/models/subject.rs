use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{RosterStudent, SubjectTeacher};
use uuid::Uuid;

use crate::domain::models::same_roll_no;

/// A subject with its roster embedded at creation time.
/// No foreign keys: roster entries are copies, not references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub subject_code: String,
    pub subject_name: String,
    #[serde(default)]
    pub teachers: Vec<SubjectTeacher>,
    #[serde(default)]
    pub students: Vec<RosterStudent>,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    pub fn generate_id() -> String {
        format!("subject-{}", Uuid::new_v4().simple())
    }

    pub fn roster_entry(&self, roll_no: &str) -> Option<&RosterStudent> {
        self.students.iter().find(|s| same_roll_no(&s.roll_no, roll_no))
    }

    pub fn has_roll_no(&self, roll_no: &str) -> bool {
        self.roster_entry(roll_no).is_some()
    }
}
