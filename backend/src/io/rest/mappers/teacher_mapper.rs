use crate::domain::models::teacher::Teacher as DomainTeacher;
use shared::{Teacher as SharedTeacher, TeacherListResponse, TeacherResponse};

pub struct TeacherMapper;

impl TeacherMapper {
    pub fn to_dto(domain: DomainTeacher) -> SharedTeacher {
        SharedTeacher {
            id: domain.id,
            uid: domain.uid,
            name: domain.name,
            department: domain.department,
            email: domain.email,
            is_librarian: domain.is_librarian,
            account_handler: domain.account_handler,
            is_admin: domain.is_admin,
        }
    }

    pub fn to_response(domain: DomainTeacher, success_message: &str) -> TeacherResponse {
        TeacherResponse {
            teacher: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_response(teachers: Vec<DomainTeacher>) -> TeacherListResponse {
        TeacherListResponse {
            teachers: teachers.into_iter().map(Self::to_dto).collect(),
        }
    }
}
