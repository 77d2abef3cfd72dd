//! Fee reconciliation: expected charges vs. amounts paid, per semester.
//!
//! Pure functions over already-loaded data. The caller decides where paid
//! amounts come from (payment log or the running totals on the student) and
//! passes today's date, so the same inputs always produce the same summary.

use chrono::NaiveDate;
use shared::{FeeLine, FeeLineStatus, LedgerDrift, SemesterFeeSummary};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::FeeConfig;
use crate::domain::models::fees::{FeePayment, FeeStructure, PAYMENT_STATUS_COMPLETED};
use crate::domain::models::format_calendar_date;
use crate::domain::models::student::Student;

/// Paid amount per (semester, fee type)
pub type PaidAmounts = BTreeMap<(u32, String), f64>;

/// Differences smaller than this are rounding noise
const MONEY_EPSILON: f64 = 0.005;

pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fee types are compared trimmed and lowercased
pub fn normalize_fee_type(fee_type: &str) -> String {
    fee_type.trim().to_lowercase()
}

/// Which fee types are compulsory and which are opt-in
#[derive(Debug, Clone, PartialEq)]
pub struct FeeCatalog {
    compulsory: BTreeSet<String>,
    optional: BTreeSet<String>,
}

impl FeeCatalog {
    pub fn new<I, J>(compulsory: I, optional: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let compulsory: BTreeSet<String> = compulsory.into_iter().map(|f| normalize_fee_type(&f)).collect();
        let optional = optional
            .into_iter()
            .map(|f| normalize_fee_type(&f))
            .filter(|fee_type| !compulsory.contains(fee_type))
            .collect();
        Self { compulsory, optional }
    }

    pub fn from_config(config: &FeeConfig) -> Self {
        Self::new(config.compulsory.iter().cloned(), config.optional.iter().cloned())
    }

    /// Unknown fee types count as compulsory
    pub fn is_optional(&self, fee_type: &str) -> bool {
        self.optional.contains(&normalize_fee_type(fee_type))
    }

    pub fn is_compulsory(&self, fee_type: &str) -> bool {
        !self.is_optional(fee_type)
    }

    pub fn is_applicable(&self, student: &Student, semester: u32, fee_type: &str) -> bool {
        self.is_compulsory(fee_type) || student.optional_fee_enabled(semester, fee_type)
    }
}

/// Sum completed log rows per (semester, fee type)
pub fn paid_from_ledger(payments: &[FeePayment]) -> PaidAmounts {
    let mut paid = PaidAmounts::new();
    for payment in payments.iter().filter(|p| p.status == PAYMENT_STATUS_COMPLETED) {
        *paid.entry((payment.semester, payment.fee_type.clone())).or_insert(0.0) += payment.amount;
    }
    paid.values_mut().for_each(|v| *v = round_money(*v));
    paid
}

pub fn paid_from_running_totals(student: &Student) -> PaidAmounts {
    student
        .fee_status
        .iter()
        .flat_map(|(semester, fees)| {
            fees.iter()
                .map(move |(fee_type, entry)| ((*semester, fee_type.clone()), entry.amount))
        })
        .collect()
}

pub fn line_status(amount: f64, paid: f64, balance: f64) -> FeeLineStatus {
    if balance <= MONEY_EPSILON {
        FeeLineStatus::Paid
    } else if paid > 0.0 && paid < amount {
        FeeLineStatus::PartiallyPaid
    } else {
        FeeLineStatus::Unpaid
    }
}

pub fn paid_percentage(paid: f64, total: f64) -> u32 {
    if total <= 0.0 {
        return 0;
    }
    (paid / total * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Structures that apply to `student` in `semester`, one per fee type,
/// ordered by fee type
pub fn applicable_structures<'a>(
    student: &Student,
    semester: u32,
    structures: &'a [FeeStructure],
    catalog: &FeeCatalog,
) -> Vec<&'a FeeStructure> {
    let mut by_type: BTreeMap<&str, &FeeStructure> = BTreeMap::new();
    for structure in structures.iter().filter(|s| s.semester == semester) {
        if catalog.is_applicable(student, semester, &structure.fee_type) {
            by_type.entry(structure.fee_type.as_str()).or_insert(structure);
        }
    }
    by_type.into_values().collect()
}

/// Reconcile one semester for one student
pub fn reconcile_semester(
    student: &Student,
    semester: u32,
    structures: &[FeeStructure],
    catalog: &FeeCatalog,
    paid: &PaidAmounts,
    today: NaiveDate,
) -> SemesterFeeSummary {
    let lines: Vec<FeeLine> = applicable_structures(student, semester, structures, catalog)
        .into_iter()
        .map(|structure| {
            let paid_amount = paid
                .get(&(semester, structure.fee_type.clone()))
                .copied()
                .unwrap_or(0.0);
            let balance = round_money((structure.amount - paid_amount).max(0.0));
            FeeLine {
                fee_type: structure.fee_type.clone(),
                optional: catalog.is_optional(&structure.fee_type),
                amount: structure.amount,
                paid: paid_amount,
                balance,
                status: line_status(structure.amount, paid_amount, balance),
                due_date: format_calendar_date(structure.due_date),
                overdue: structure.due_date < today && balance > 0.0,
            }
        })
        .collect();

    let total = round_money(lines.iter().map(|l| l.amount).sum());
    let paid_total = round_money(lines.iter().map(|l| l.paid).sum());
    let pending = round_money(lines.iter().map(|l| l.balance).sum());

    SemesterFeeSummary {
        student_id: student.id.clone(),
        semester,
        lines,
        total,
        paid: paid_total,
        pending,
        percentage: paid_percentage(paid_total, total),
    }
}

/// Entries where the running totals on the student disagree with the log
pub fn ledger_drifts(student: &Student, ledger: &PaidAmounts) -> Vec<LedgerDrift> {
    let running = paid_from_running_totals(student);
    let keys: BTreeSet<&(u32, String)> = running.keys().chain(ledger.keys()).collect();

    keys.into_iter()
        .filter_map(|key| {
            let running_total = running.get(key).copied().unwrap_or(0.0);
            let ledger_total = ledger.get(key).copied().unwrap_or(0.0);
            let difference = round_money(running_total - ledger_total);
            if difference.abs() <= MONEY_EPSILON {
                return None;
            }
            Some(LedgerDrift {
                semester: key.0,
                fee_type: key.1.clone(),
                running_total,
                ledger_total,
                difference,
            })
        })
        .collect()
}
