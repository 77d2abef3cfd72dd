use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::connection::{read_yaml_directory, write_yaml_atomic, FileConnection};
use crate::domain::models::attendance::AttendanceSession;
use crate::storage::traits::AttendanceStorage;

#[derive(Clone)]
pub struct AttendanceRepository {
    connection: FileConnection,
}

impl AttendanceRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl AttendanceStorage for AttendanceRepository {
    async fn store_session(&self, session: &AttendanceSession) -> Result<()> {
        let path = self
            .connection
            .attendance_directory(&session.subject_id)
            .join(format!("{}.yaml", FileConnection::safe_file_name(&session.id)));
        write_yaml_atomic(&path, session)?;
        info!(
            "Stored attendance session {} for subject {} on {} ({} records)",
            session.id,
            session.subject_id,
            session.date,
            session.records.len()
        );
        Ok(())
    }

    async fn list_sessions(&self, subject_id: &str) -> Result<Vec<AttendanceSession>> {
        let mut sessions: Vec<AttendanceSession> =
            read_yaml_directory(&self.connection.attendance_directory(subject_id))?;
        sessions.retain(|s| s.subject_id == subject_id);
        sessions.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }
}
