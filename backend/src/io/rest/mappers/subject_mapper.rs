use crate::domain::models::subject::Subject as DomainSubject;
use shared::{Subject as SharedSubject, SubjectListResponse, SubjectResponse};

pub struct SubjectMapper;

impl SubjectMapper {
    pub fn to_dto(domain: DomainSubject) -> SharedSubject {
        SharedSubject {
            id: domain.id,
            subject_code: domain.subject_code,
            subject_name: domain.subject_name,
            teachers: domain.teachers,
            students: domain.students,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: DomainSubject, success_message: &str) -> SubjectResponse {
        SubjectResponse {
            subject: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_response(subjects: Vec<DomainSubject>) -> SubjectListResponse {
        SubjectListResponse {
            subjects: subjects.into_iter().map(Self::to_dto).collect(),
        }
    }
}
