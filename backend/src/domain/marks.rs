//! Marks lookup: exam documents flattened into roll number -> exam -> score.

use std::collections::BTreeMap;

use crate::domain::models::marks::MarksExam;

pub type FlattenedMarks = BTreeMap<String, BTreeMap<String, f64>>;

/// Records with an empty roll number are skipped. A roll number listed twice
/// in one exam keeps the later score.
pub fn flatten_marks(exams: &[MarksExam]) -> FlattenedMarks {
    let mut flattened = FlattenedMarks::new();
    for exam in exams {
        for record in &exam.records {
            let roll_no = record.roll_no.trim();
            if roll_no.is_empty() {
                continue;
            }
            flattened
                .entry(roll_no.to_string())
                .or_default()
                .insert(exam.exam_id.clone(), record.marks);
        }
    }
    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::MarksRecord;

    fn exam(exam_id: &str, records: &[(&str, f64)]) -> MarksExam {
        MarksExam {
            exam_id: exam_id.to_string(),
            subject_id: "subject-1".to_string(),
            records: records
                .iter()
                .map(|(roll_no, marks)| MarksRecord {
                    roll_no: roll_no.to_string(),
                    marks: *marks,
                })
                .collect(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_flatten_marks() {
        let exams = vec![
            exam("midterm", &[("A", 42.0), ("B", 37.5)]),
            exam("final", &[("A", 78.0), ("", 10.0), ("A", 80.0)]),
        ];

        let flattened = flatten_marks(&exams);
        assert_eq!(flattened.len(), 2);
        assert_eq!(flattened["A"]["midterm"], 42.0);
        assert_eq!(flattened["A"]["final"], 80.0);
        assert_eq!(flattened["B"].len(), 1);
    }

    #[test]
    fn test_flatten_no_exams() {
        assert!(flatten_marks(&[]).is_empty());
    }
}
