//! Roster join and attendance aggregation.
//!
//! Turns a subject's roster plus its submitted sessions into a per-student
//! table of marks by date. Everything here is pure: no storage, no clock.
//!
//! ## Rules
//!
//! - Columns are the distinct session dates, ascending.
//! - When several sessions share a date, the most recently submitted one
//!   (by `created_at`, then id) supplies that date's records.
//! - A roster student missing from a date's records is `Unmarked` ("-"),
//!   which is not the same as `Absent`.
//! - Roll numbers recorded but not on the roster are reported separately and
//!   otherwise ignored.

use shared::{AttendanceMark, AttendanceReport, AttendanceStatus, StudentAttendanceRow};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::models::attendance::AttendanceSession;
use crate::domain::models::{format_calendar_date, roll_no_key};
use crate::domain::models::subject::Subject;

/// round(present / total * 100), or 0 when there were no sessions
pub fn percentage(present: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let raw = (present as f64 / total as f64 * 100.0).round() as u32;
    raw.min(100)
}

pub fn is_below_threshold(percentage: u32, total_sessions: u32, low_threshold: u32) -> bool {
    total_sessions > 0 && percentage < low_threshold
}

/// Pick the session that speaks for each date
fn effective_sessions(sessions: &[AttendanceSession]) -> BTreeMap<chrono::NaiveDate, &AttendanceSession> {
    let mut by_date: BTreeMap<chrono::NaiveDate, &AttendanceSession> = BTreeMap::new();
    for session in sessions {
        match by_date.get(&session.date) {
            Some(current) if (current.created_at, &current.id) >= (session.created_at, &session.id) => {}
            _ => {
                by_date.insert(session.date, session);
            }
        }
    }
    by_date
}

/// Join the roster of `subject` with its sessions
pub fn aggregate_attendance(
    subject: &Subject,
    sessions: &[AttendanceSession],
    low_threshold: u32,
) -> AttendanceReport {
    let by_date = effective_sessions(sessions);
    let total_sessions = by_date.len() as u32;
    let dates: Vec<String> = by_date.keys().map(|d| format_calendar_date(*d)).collect();

    let rostered: HashSet<String> = subject.students.iter().map(|s| roll_no_key(&s.roll_no)).collect();
    let unrostered_roll_numbers: Vec<String> = sessions
        .iter()
        .flat_map(|s| s.records.iter())
        .filter(|r| !rostered.contains(&roll_no_key(&r.roll_no)))
        .map(|r| r.roll_no.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let students = subject
        .students
        .iter()
        .map(|roster_student| {
            let mut statuses = BTreeMap::new();
            let mut present_count = 0;

            for (date, session) in &by_date {
                let mark = session
                    .record_for(&roster_student.roll_no)
                    .map(|record| AttendanceMark::from(record.status))
                    .unwrap_or(AttendanceMark::Unmarked);
                if mark == AttendanceMark::Present {
                    present_count += 1;
                }
                statuses.insert(format_calendar_date(*date), mark);
            }

            let pct = percentage(present_count, total_sessions);
            StudentAttendanceRow {
                student_id: roster_student.id.clone(),
                roll_no: roster_student.roll_no.clone(),
                name: roster_student.name.clone(),
                statuses,
                present_count,
                total_sessions,
                percentage: pct,
                below_threshold: is_below_threshold(pct, total_sessions, low_threshold),
            }
        })
        .collect();

    AttendanceReport {
        subject_id: subject.id.clone(),
        subject_code: subject.subject_code.clone(),
        subject_name: subject.subject_name.clone(),
        dates,
        total_sessions,
        students,
        unrostered_roll_numbers,
    }
}

/// Present count for a single roll number, using the same date rules
pub fn count_present(roll_no: &str, sessions: &[AttendanceSession]) -> (u32, u32) {
    let by_date = effective_sessions(sessions);
    let present = by_date
        .values()
        .filter(|session| {
            session
                .record_for(roll_no)
                .map(|r| r.status == AttendanceStatus::Present)
                .unwrap_or(false)
        })
        .count() as u32;
    (present, by_date.len() as u32)
}
