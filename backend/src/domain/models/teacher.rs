use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain model for a teacher account. Role flags are independent booleans;
/// an admin is not implicitly a librarian or an account handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub uid: String,
    pub name: String,
    pub department: String,
    pub email: String,
    #[serde(default)]
    pub is_librarian: bool,
    #[serde(default)]
    pub account_handler: bool,
    #[serde(default)]
    pub is_admin: bool,
}

impl Teacher {
    pub fn generate_id() -> String {
        format!("teacher-{}", Uuid::new_v4().simple())
    }
}
