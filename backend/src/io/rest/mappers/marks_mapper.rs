use crate::domain::models::marks::MarksExam as DomainExam;
use shared::{MarksExam as SharedExam, RecordMarksResponse};

pub struct MarksMapper;

impl MarksMapper {
    pub fn to_dto(domain: DomainExam) -> SharedExam {
        SharedExam {
            exam_id: domain.exam_id,
            subject_id: domain.subject_id,
            records: domain.records,
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_record_response(domain: DomainExam) -> RecordMarksResponse {
        RecordMarksResponse {
            success_message: format!("Marks saved for exam '{}'", domain.exam_id),
            exam: Self::to_dto(domain),
        }
    }
}
