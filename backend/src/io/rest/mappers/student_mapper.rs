use crate::domain::models::student::Student as DomainStudent;
use shared::{Student as SharedStudent, StudentListResponse, StudentResponse};

/// Mapper from domain Student models to shared Student DTOs.
pub struct StudentMapper;

impl StudentMapper {
    pub fn to_dto(domain: DomainStudent) -> SharedStudent {
        SharedStudent {
            id: domain.id,
            roll_no: domain.roll_no,
            name: domain.name,
            course: domain.course,
            semester: domain.semester,
            fee_status: domain.fee_status,
            optional_fees: domain.optional_fees,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: DomainStudent, success_message: &str) -> StudentResponse {
        StudentResponse {
            student: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_response(students: Vec<DomainStudent>) -> StudentListResponse {
        StudentListResponse {
            students: students.into_iter().map(Self::to_dto).collect(),
        }
    }
}
