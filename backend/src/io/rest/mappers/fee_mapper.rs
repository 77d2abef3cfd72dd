use crate::domain::fee_service::{PayAllPendingResult, PayFeeResult};
use crate::domain::models::fees::{FeePayment as DomainPayment, FeeStructure as DomainStructure};
use crate::domain::models::format_calendar_date;
use shared::{
    FeePayment as SharedPayment, FeePaymentListResponse, FeeStructure as SharedStructure,
    FeeStructureListResponse, PayAllPendingResponse, PayFeeResponse,
};

pub struct FeeMapper;

impl FeeMapper {
    pub fn to_structure_dto(domain: DomainStructure) -> SharedStructure {
        SharedStructure {
            id: domain.id,
            semester: domain.semester,
            fee_type: domain.fee_type,
            amount: domain.amount,
            due_date: format_calendar_date(domain.due_date),
        }
    }

    pub fn to_structure_list_response(structures: Vec<DomainStructure>) -> FeeStructureListResponse {
        FeeStructureListResponse {
            structures: structures.into_iter().map(Self::to_structure_dto).collect(),
        }
    }

    pub fn to_payment_dto(domain: DomainPayment) -> SharedPayment {
        SharedPayment {
            id: domain.id,
            student_id: domain.student_id,
            fee_type: domain.fee_type,
            semester: domain.semester,
            amount: domain.amount,
            payment_method: domain.payment_method,
            transaction_id: domain.transaction_id,
            payment_date: domain.payment_date.to_rfc3339(),
            status: domain.status,
        }
    }

    pub fn to_payment_list_response(payments: Vec<DomainPayment>) -> FeePaymentListResponse {
        FeePaymentListResponse {
            payments: payments.into_iter().map(Self::to_payment_dto).collect(),
        }
    }

    pub fn to_pay_response(result: PayFeeResult) -> PayFeeResponse {
        PayFeeResponse {
            success_message: format!(
                "Paid {:.2} towards {} (transaction {})",
                result.payment.amount, result.payment.fee_type, result.payment.transaction_id
            ),
            payment: Self::to_payment_dto(result.payment),
            summary: result.summary,
        }
    }

    pub fn to_pay_all_response(result: PayAllPendingResult) -> PayAllPendingResponse {
        let total: f64 = result.payments.iter().map(|p| p.amount).sum();
        PayAllPendingResponse {
            success_message: format!("Paid {} pending fee(s) totalling {:.2}", result.payments.len(), total),
            payments: result.payments.into_iter().map(Self::to_payment_dto).collect(),
            summary: result.summary,
        }
    }
}
