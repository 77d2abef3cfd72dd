//! Attendance service: session submission and the reports built on top of
//! the roster join in [`crate::domain::attendance`].
//!
//! Submissions are validated strictly for shape (date format, non-empty list,
//! unique roll numbers) but leniently for content: roll numbers outside the
//! roster and repeat sessions on the same date are accepted with a warning.

use anyhow::Result;
use chrono::Utc;
use shared::{
    AttendanceRecord, AttendanceRecordInput, AttendanceReport, StudentAttendanceOverview,
    SubjectAttendanceSummary,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::attendance::{aggregate_attendance, count_present, is_below_threshold, percentage};
use crate::domain::errors::DomainError;
use crate::domain::models::attendance::AttendanceSession;
use crate::domain::models::{parse_calendar_date, roll_no_key};
use crate::storage::{AttendanceStorage, Repositories, StudentStorage, SubjectStorage};

#[derive(Debug, Clone)]
pub struct SubmitSessionCommand {
    pub subject_id: String,
    pub date: String,
    pub records: Vec<AttendanceRecordInput>,
}

#[derive(Debug, Clone)]
pub struct SubmitSessionResult {
    pub session: AttendanceSession,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct AttendanceService {
    subjects: Arc<dyn SubjectStorage>,
    students: Arc<dyn StudentStorage>,
    attendance: Arc<dyn AttendanceStorage>,
    low_threshold: u32,
}

impl AttendanceService {
    pub fn new(repositories: &Repositories, low_threshold: u32) -> Self {
        Self {
            subjects: repositories.subjects.clone(),
            students: repositories.students.clone(),
            attendance: repositories.attendance.clone(),
            low_threshold,
        }
    }

    /// Record one attendance session for a subject
    pub async fn submit_session(&self, command: SubmitSessionCommand) -> Result<SubmitSessionResult> {
        info!(
            "Submitting attendance for subject {} on {} ({} records)",
            command.subject_id,
            command.date,
            command.records.len()
        );

        let subject = self
            .subjects
            .get_subject(&command.subject_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subject", &command.subject_id))?;

        let date = parse_calendar_date("date", &command.date)?;
        if command.records.is_empty() {
            return Err(DomainError::Validation("Attendance must include at least one record".to_string()).into());
        }

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(command.records.len());
        let mut unrostered = Vec::new();

        for input in &command.records {
            let roll_no = input.roll_no.trim();
            if roll_no.is_empty() {
                return Err(DomainError::Validation("Roll number cannot be empty".to_string()).into());
            }
            if !seen.insert(roll_no_key(roll_no)) {
                return Err(DomainError::Validation(format!(
                    "Roll number {} appears more than once in this session",
                    roll_no
                ))
                .into());
            }

            let (roll_no, name) = match subject.roster_entry(roll_no) {
                Some(entry) => (entry.roll_no.clone(), entry.name.clone()),
                None => {
                    unrostered.push(roll_no.to_string());
                    let name = input
                        .name
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .unwrap_or(roll_no)
                        .to_string();
                    (roll_no.to_string(), name)
                }
            };

            records.push(AttendanceRecord {
                roll_no,
                name,
                status: input.status,
            });
        }

        let mut warnings = Vec::new();
        if !unrostered.is_empty() {
            warn!(
                "Subject {} attendance includes roll numbers not on the roster: {:?}",
                subject.id, unrostered
            );
            warnings.push(format!("Not on the roster: {}", unrostered.join(", ")));
        }

        let existing = self.attendance.list_sessions(&subject.id).await?;
        if existing.iter().any(|s| s.date == date) {
            warn!("Subject {} already has a session on {}", subject.id, date);
            warnings.push(format!(
                "A session for {} already exists; this submission takes precedence in reports",
                date
            ));
        }

        let unmarked = subject
            .students
            .iter()
            .filter(|s| !seen.contains(&roll_no_key(&s.roll_no)))
            .count();
        if unmarked > 0 {
            warnings.push(format!("{} rostered student(s) were not marked", unmarked));
        }

        let session = AttendanceSession {
            id: AttendanceSession::generate_id(date),
            date,
            subject_id: subject.id.clone(),
            subject_name: subject.subject_name.clone(),
            records,
            created_at: Utc::now(),
        };
        self.attendance.store_session(&session).await?;

        info!("Stored attendance session {} for subject {}", session.id, subject.id);
        Ok(SubmitSessionResult { session, warnings })
    }

    /// Roster x dates report for one subject
    pub async fn subject_report(&self, subject_id: &str) -> Result<AttendanceReport> {
        info!("Building attendance report for subject {}", subject_id);
        let subject = self
            .subjects
            .get_subject(subject_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subject", subject_id))?;
        let sessions = self.attendance.list_sessions(subject_id).await?;

        Ok(aggregate_attendance(&subject, &sessions, self.low_threshold))
    }

    /// Attendance across every subject whose roster lists the student
    pub async fn student_attendance(&self, student_id: &str) -> Result<StudentAttendanceOverview> {
        info!("Building attendance overview for student {}", student_id);
        let student = self
            .students
            .get_student(student_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Student", student_id))?;

        let mut subjects = Vec::new();
        let mut overall_present = 0;
        let mut overall_total = 0;

        for subject in self.subjects.list_subjects().await? {
            if !subject.has_roll_no(&student.roll_no) {
                continue;
            }
            let sessions = self.attendance.list_sessions(&subject.id).await?;
            let (present, total) = count_present(&student.roll_no, &sessions);
            let pct = percentage(present, total);

            overall_present += present;
            overall_total += total;
            subjects.push(SubjectAttendanceSummary {
                subject_id: subject.id.clone(),
                subject_code: subject.subject_code.clone(),
                subject_name: subject.subject_name.clone(),
                present_count: present,
                total_sessions: total,
                percentage: pct,
                below_threshold: is_below_threshold(pct, total, self.low_threshold),
            });
        }

        Ok(StudentAttendanceOverview {
            student_id: student.id,
            roll_no: student.roll_no,
            subjects,
            overall_present,
            overall_total,
            overall_percentage: percentage(overall_present, overall_total),
        })
    }

    pub async fn list_sessions(&self, subject_id: &str) -> Result<Vec<AttendanceSession>> {
        if self.subjects.get_subject(subject_id).await?.is_none() {
            return Err(DomainError::not_found("Subject", subject_id).into());
        }
        self.attendance.list_sessions(subject_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::files::test_utils::{sample_student, sample_subject, TestEnvironment};
    use shared::{AttendanceMark, AttendanceStatus};

    fn input(roll_no: &str, status: AttendanceStatus) -> AttendanceRecordInput {
        AttendanceRecordInput {
            roll_no: roll_no.to_string(),
            name: None,
            status,
        }
    }

    async fn setup() -> (TestEnvironment, AttendanceService, Repositories) {
        let env = TestEnvironment::new().unwrap();
        let repositories = env.repositories();
        let service = AttendanceService::new(&repositories, 75);
        (env, service, repositories)
    }

    #[tokio::test]
    async fn test_submit_and_report() {
        let (_env, service, repos) = setup().await;
        let subject = sample_subject("CS101", &[("A", "Asha"), ("B", "Bala")]);
        repos.subjects.store_subject(&subject).await.unwrap();

        let result = service
            .submit_session(SubmitSessionCommand {
                subject_id: subject.id.clone(),
                date: "2024-01-01".to_string(),
                records: vec![input("A", AttendanceStatus::Present), input("B", AttendanceStatus::Absent)],
            })
            .await
            .unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.session.records[0].name, "Asha");

        service
            .submit_session(SubmitSessionCommand {
                subject_id: subject.id.clone(),
                date: "2024-01-02".to_string(),
                records: vec![input("A", AttendanceStatus::Absent)],
            })
            .await
            .unwrap();

        let report = service.subject_report(&subject.id).await.unwrap();
        assert_eq!(report.total_sessions, 2);
        assert_eq!(report.students[0].percentage, 50);
        assert_eq!(report.students[1].statuses["2024-01-02"], AttendanceMark::Unmarked);
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let (_env, service, repos) = setup().await;
        let subject = sample_subject("CS101", &[("A", "Asha")]);
        repos.subjects.store_subject(&subject).await.unwrap();

        let bad_date = service
            .submit_session(SubmitSessionCommand {
                subject_id: subject.id.clone(),
                date: "01/02/2024".to_string(),
                records: vec![input("A", AttendanceStatus::Present)],
            })
            .await;
        assert!(matches!(
            bad_date.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));

        let empty = service
            .submit_session(SubmitSessionCommand {
                subject_id: subject.id.clone(),
                date: "2024-01-01".to_string(),
                records: vec![],
            })
            .await;
        assert!(empty.is_err());

        let duplicate = service
            .submit_session(SubmitSessionCommand {
                subject_id: subject.id.clone(),
                date: "2024-01-01".to_string(),
                records: vec![input("A", AttendanceStatus::Present), input("A", AttendanceStatus::Absent)],
            })
            .await;
        assert!(duplicate.unwrap_err().to_string().contains("more than once"));

        let missing = service
            .submit_session(SubmitSessionCommand {
                subject_id: "subject-missing".to_string(),
                date: "2024-01-01".to_string(),
                records: vec![input("A", AttendanceStatus::Present)],
            })
            .await;
        assert!(matches!(
            missing.unwrap_err().downcast_ref::<DomainError>(),
            Some(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_warns_but_accepts() {
        let (_env, service, repos) = setup().await;
        let subject = sample_subject("CS101", &[("A", "Asha"), ("B", "Bala")]);
        repos.subjects.store_subject(&subject).await.unwrap();

        let command = SubmitSessionCommand {
            subject_id: subject.id.clone(),
            date: "2024-01-01".to_string(),
            records: vec![
                input("A", AttendanceStatus::Present),
                AttendanceRecordInput {
                    roll_no: "Z".to_string(),
                    name: Some("Zoya".to_string()),
                    status: AttendanceStatus::Leave,
                },
            ],
        };
        let first = service.submit_session(command.clone()).await.unwrap();
        assert_eq!(first.warnings.len(), 2);
        assert_eq!(first.session.records[1].name, "Zoya");

        let second = service.submit_session(command).await.unwrap();
        assert!(second.warnings.iter().any(|w| w.contains("already exists")));

        let sessions = service.list_sessions(&subject.id).await.unwrap();
        assert_eq!(sessions.len(), 2);
        let report = service.subject_report(&subject.id).await.unwrap();
        assert_eq!(report.total_sessions, 1);
        assert_eq!(report.unrostered_roll_numbers, vec!["Z"]);
    }

    #[tokio::test]
    async fn test_student_attendance_across_subjects() {
        let (_env, service, repos) = setup().await;
        let student = sample_student("A", "Asha");
        repos.students.store_student(&student).await.unwrap();

        let maths = sample_subject("MA101", &[("A", "Asha")]);
        let physics = sample_subject("PH101", &[("A", "Asha"), ("B", "Bala")]);
        let chemistry = sample_subject("CH101", &[("B", "Bala")]);
        for subject in [&maths, &physics, &chemistry] {
            repos.subjects.store_subject(subject).await.unwrap();
        }

        for (subject, date, status) in [
            (&maths, "2024-01-01", AttendanceStatus::Present),
            (&maths, "2024-01-02", AttendanceStatus::Present),
            (&physics, "2024-01-01", AttendanceStatus::Absent),
            (&physics, "2024-01-03", AttendanceStatus::Present),
        ] {
            service
                .submit_session(SubmitSessionCommand {
                    subject_id: subject.id.clone(),
                    date: date.to_string(),
                    records: vec![input("A", status)],
                })
                .await
                .unwrap();
        }

        let overview = service.student_attendance(&student.id).await.unwrap();
        assert_eq!(overview.subjects.len(), 2);
        assert_eq!(overview.subjects[0].subject_code, "MA101");
        assert_eq!(overview.subjects[0].percentage, 100);
        assert_eq!(overview.subjects[1].percentage, 50);
        assert!(overview.subjects[1].below_threshold);
        assert_eq!((overview.overall_present, overview.overall_total), (3, 4));
        assert_eq!(overview.overall_percentage, 75);
    }

    #[tokio::test]
    async fn test_roll_number_case_does_not_split_student() {
        let (_env, service, repos) = setup().await;
        let student = sample_student("CS-01", "Asha");
        repos.students.store_student(&student).await.unwrap();

        let subjects = crate::domain::SubjectService::new(&repos);
        let subject = subjects
            .create_subject(shared::CreateSubjectRequest {
                subject_code: "CS101".to_string(),
                subject_name: "Programming".to_string(),
                teachers: vec![],
                students: vec![shared::RosterStudent {
                    id: String::new(),
                    roll_no: "cs-01".to_string(),
                    name: String::new(),
                }],
            })
            .await
            .unwrap();
        assert_eq!(subject.students[0].roll_no, "CS-01");
        assert_eq!(subject.students[0].id, student.id);

        let result = service
            .submit_session(SubmitSessionCommand {
                subject_id: subject.id.clone(),
                date: "2024-01-01".to_string(),
                records: vec![input("Cs-01", AttendanceStatus::Present)],
            })
            .await
            .unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.session.records[0].roll_no, "CS-01");

        let report = service.subject_report(&subject.id).await.unwrap();
        assert_eq!(report.students[0].statuses["2024-01-01"], AttendanceMark::Present);
        assert!(report.unrostered_roll_numbers.is_empty());

        let overview = service.student_attendance(&student.id).await.unwrap();
        assert_eq!(overview.subjects.len(), 1);
        assert_eq!(overview.overall_present, 1);
    }
}
