use crate::domain::attendance_service::SubmitSessionResult;
use crate::domain::models::attendance::AttendanceSession as DomainSession;
use crate::domain::models::format_calendar_date;
use shared::{AttendanceSession as SharedSession, AttendanceSessionListResponse, SubmitAttendanceResponse};

pub struct AttendanceMapper;

impl AttendanceMapper {
    pub fn to_dto(domain: DomainSession) -> SharedSession {
        SharedSession {
            id: domain.id,
            date: format_calendar_date(domain.date),
            subject_id: domain.subject_id,
            subject_name: domain.subject_name,
            records: domain.records,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_submit_response(result: SubmitSessionResult) -> SubmitAttendanceResponse {
        let success_message = if result.warnings.is_empty() {
            "Attendance recorded successfully".to_string()
        } else {
            format!("Attendance recorded with {} warning(s)", result.warnings.len())
        };
        SubmitAttendanceResponse {
            session: Self::to_dto(result.session),
            warnings: result.warnings,
            success_message,
        }
    }

    pub fn to_list_response(sessions: Vec<DomainSession>) -> AttendanceSessionListResponse {
        AttendanceSessionListResponse {
            sessions: sessions.into_iter().map(Self::to_dto).collect(),
        }
    }
}
