use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Roster entities
// ---------------------------------------------------------------------------

/// A student as embedded in a subject's roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStudent {
    pub id: String,
    pub roll_no: String,
    pub name: String,
}

/// A teacher as embedded in a subject document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectTeacher {
    pub id: String,
    pub name: String,
}

/// Subject ID in format: "subject-<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub subject_code: String,
    pub subject_name: String,
    pub teachers: Vec<SubjectTeacher>,
    /// Roster, denormalized when the subject is created
    pub students: Vec<RosterStudent>,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub roll_no: String,
    pub name: String,
    pub course: String,
    pub semester: u32,
    /// semester -> fee type -> cumulative amount paid
    #[serde(default)]
    pub fee_status: BTreeMap<u32, BTreeMap<String, FeeStatusEntry>>,
    /// semester -> optional fee type -> enabled
    #[serde(default)]
    pub optional_fees: BTreeMap<u32, BTreeMap<String, bool>>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    /// Account id at the external auth provider
    pub uid: String,
    pub name: String,
    pub department: String,
    pub email: String,
    pub is_librarian: bool,
    pub account_handler: bool,
    pub is_admin: bool,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// Status a teacher records for a student in one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

/// Status shown in an aggregated report. `Unmarked` means the student was not
/// in that session's record list at all, which is not the same as `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceMark {
    Present,
    Absent,
    Leave,
    #[serde(rename = "-")]
    Unmarked,
}

impl From<AttendanceStatus> for AttendanceMark {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => AttendanceMark::Present,
            AttendanceStatus::Absent => AttendanceMark::Absent,
            AttendanceStatus::Leave => AttendanceMark::Leave,
        }
    }
}

impl fmt::Display for AttendanceMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttendanceMark::Present => "Present",
            AttendanceMark::Absent => "Absent",
            AttendanceMark::Leave => "Leave",
            AttendanceMark::Unmarked => "-",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub roll_no: String,
    pub name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub id: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub subject_id: String,
    pub subject_name: String,
    pub records: Vec<AttendanceRecord>,
    /// Submission time (RFC 3339)
    pub created_at: String,
}

/// One row of a subject attendance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendanceRow {
    pub student_id: String,
    pub roll_no: String,
    pub name: String,
    /// date (YYYY-MM-DD) -> mark
    pub statuses: BTreeMap<String, AttendanceMark>,
    pub present_count: u32,
    pub total_sessions: u32,
    pub percentage: u32,
    pub below_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReport {
    pub subject_id: String,
    pub subject_code: String,
    pub subject_name: String,
    /// Distinct session dates, ascending
    pub dates: Vec<String>,
    pub total_sessions: u32,
    pub students: Vec<StudentAttendanceRow>,
    /// Roll numbers recorded in sessions but missing from the roster
    pub unrostered_roll_numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAttendanceSummary {
    pub subject_id: String,
    pub subject_code: String,
    pub subject_name: String,
    pub present_count: u32,
    pub total_sessions: u32,
    pub percentage: u32,
    pub below_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAttendanceOverview {
    pub student_id: String,
    pub roll_no: String,
    pub subjects: Vec<SubjectAttendanceSummary>,
    pub overall_present: u32,
    pub overall_total: u32,
    pub overall_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecordInput {
    pub roll_no: String,
    /// Taken from the roster when omitted
    pub name: Option<String>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitAttendanceRequest {
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub records: Vec<AttendanceRecordInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitAttendanceResponse {
    pub session: AttendanceSession,
    pub warnings: Vec<String>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSessionListResponse {
    pub sessions: Vec<AttendanceSession>,
}

// ---------------------------------------------------------------------------
// Marks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksRecord {
    pub roll_no: String,
    pub marks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksExam {
    pub exam_id: String,
    pub subject_id: String,
    pub records: Vec<MarksRecord>,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMarksRequest {
    pub exam_id: String,
    pub records: Vec<MarksRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMarksResponse {
    pub exam: MarksExam,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksRow {
    pub roll_no: String,
    /// Empty when the roll number is not on the roster
    pub name: String,
    /// exam id -> score
    pub marks: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksTable {
    pub subject_id: String,
    pub exam_ids: Vec<String>,
    pub rows: Vec<MarksRow>,
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeLineStatus {
    Paid,
    PartiallyPaid,
    Unpaid,
}

impl fmt::Display for FeeLineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FeeLineStatus::Paid => "Paid",
            FeeLineStatus::PartiallyPaid => "Partially Paid",
            FeeLineStatus::Unpaid => "Unpaid",
        };
        write!(f, "{}", label)
    }
}

/// Cumulative amount paid for one (semester, fee type), kept on the student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStatusEntry {
    pub amount: f64,
    pub status: FeeLineStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructure {
    pub id: String,
    pub semester: u32,
    pub fee_type: String,
    pub amount: f64,
    /// Calendar date (YYYY-MM-DD)
    pub due_date: String,
}

/// Append-only payment log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePayment {
    pub id: String,
    pub student_id: String,
    pub fee_type: String,
    pub semester: u32,
    pub amount: f64,
    pub payment_method: String,
    pub transaction_id: String,
    /// RFC 3339
    pub payment_date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLine {
    pub fee_type: String,
    pub optional: bool,
    pub amount: f64,
    pub paid: f64,
    pub balance: f64,
    pub status: FeeLineStatus,
    pub due_date: String,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterFeeSummary {
    pub student_id: String,
    pub semester: u32,
    pub lines: Vec<FeeLine>,
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeOverviewResponse {
    pub student_id: String,
    pub semesters: Vec<SemesterFeeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFeeStructureRequest {
    pub semester: u32,
    pub fee_type: String,
    pub amount: f64,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructureListResponse {
    pub structures: Vec<FeeStructure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayFeeRequest {
    pub semester: u32,
    pub fee_type: String,
    pub amount: f64,
    pub payment_method: String,
    /// Generated when not supplied by the payment provider
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayFeeResponse {
    pub payment: FeePayment,
    pub summary: SemesterFeeSummary,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayAllPendingRequest {
    pub semester: u32,
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayAllPendingResponse {
    pub payments: Vec<FeePayment>,
    pub summary: SemesterFeeSummary,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePaymentListResponse {
    pub payments: Vec<FeePayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOptionalFeeRequest {
    pub semester: u32,
    pub fee_type: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDrift {
    pub semester: u32,
    pub fee_type: String,
    pub running_total: f64,
    pub ledger_total: f64,
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAuditResponse {
    pub student_id: String,
    pub consistent: bool,
    pub drifts: Vec<LedgerDrift>,
}

// ---------------------------------------------------------------------------
// Roster management requests/responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub roll_no: String,
    pub name: String,
    pub course: String,
    pub semester: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub course: Option<String>,
    pub semester: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: Student,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTeacherRequest {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub is_librarian: Option<bool>,
    pub account_handler: Option<bool>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherResponse {
    pub teacher: Teacher,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherListResponse {
    pub teachers: Vec<Teacher>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub subject_code: String,
    pub subject_name: String,
    #[serde(default)]
    pub teachers: Vec<SubjectTeacher>,
    #[serde(default)]
    pub students: Vec<RosterStudent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectResponse {
    pub subject: Subject,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<Subject>,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable code, e.g. `NOT_FOUND`
    pub code: String,
}
