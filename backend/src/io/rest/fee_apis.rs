//! # REST API for Fees
//!
//! Fee structure management plus the per-student endpoints: reconciliation,
//! payments, the payment log, and the ledger audit.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::fee_service::{CreateFeeStructureCommand, PayFeeCommand};
use crate::io::rest::error::error_response;
use crate::io::rest::mappers::fee_mapper::FeeMapper;
use crate::io::rest::mappers::student_mapper::StudentMapper;
use crate::AppState;
use shared::{CreateFeeStructureRequest, PayAllPendingRequest, PayFeeRequest, SetOptionalFeeRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fees/structure", get(list_structures).post(create_structure))
        .route("/fees/structure/:id", delete(delete_structure))
        .route("/students/:id/fees", get(get_semester_fees))
        .route("/students/:id/fees/overview", get(get_fee_overview))
        .route("/students/:id/fees/pay", post(pay_fee))
        .route("/students/:id/fees/pay-all", post(pay_all_pending))
        .route("/students/:id/fees/payments", get(list_payments))
        .route("/students/:id/fees/audit", get(audit_ledger))
        .route("/students/:id/fees/rebuild", post(rebuild_running_totals))
        .route("/students/:id/optional-fees", put(set_optional_fee))
}

/// Query parameters for the semester reconciliation endpoint
#[derive(Debug, Deserialize)]
pub struct SemesterQuery {
    /// Defaults to the student's current semester
    pub semester: Option<u32>,
}

pub async fn create_structure(
    State(state): State<AppState>,
    Json(request): Json<CreateFeeStructureRequest>,
) -> impl IntoResponse {
    info!("POST /api/fees/structure - request: {:?}", request);

    let command = CreateFeeStructureCommand {
        semester: request.semester,
        fee_type: request.fee_type,
        amount: request.amount,
        due_date: request.due_date,
    };

    match state.fee_service.create_structure(command).await {
        Ok(structure) => (StatusCode::CREATED, Json(FeeMapper::to_structure_dto(structure))).into_response(),
        Err(e) => error_response("create fee structure", e),
    }
}

pub async fn list_structures(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/fees/structure");

    match state.fee_service.list_structures().await {
        Ok(structures) => (StatusCode::OK, Json(FeeMapper::to_structure_list_response(structures))).into_response(),
        Err(e) => error_response("list fee structures", e),
    }
}

pub async fn delete_structure(State(state): State<AppState>, Path(structure_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/fees/structure/{}", structure_id);

    match state.fee_service.delete_structure(&structure_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete fee structure", e),
    }
}

/// Reconciliation for one semester
pub async fn get_semester_fees(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(query): Query<SemesterQuery>,
) -> impl IntoResponse {
    info!("GET /api/students/{}/fees - query: {:?}", student_id, query);

    let semester = match query.semester {
        Some(semester) => semester,
        None => match state.student_service.get_student(&student_id).await {
            Ok(student) => student.semester,
            Err(e) => return error_response("load student", e),
        },
    };

    match state.fee_service.semester_summary(&student_id, semester).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response("reconcile fees", e),
    }
}

pub async fn get_fee_overview(State(state): State<AppState>, Path(student_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/students/{}/fees/overview", student_id);

    match state.fee_service.fee_overview(&student_id).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => error_response("build fee overview", e),
    }
}

pub async fn pay_fee(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<PayFeeRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/{}/fees/pay - request: {:?}", student_id, request);

    let command = PayFeeCommand {
        student_id,
        semester: request.semester,
        fee_type: request.fee_type,
        amount: request.amount,
        payment_method: request.payment_method,
        transaction_id: request.transaction_id,
    };

    match state.fee_service.pay_fee(command).await {
        Ok(result) => (StatusCode::CREATED, Json(FeeMapper::to_pay_response(result))).into_response(),
        Err(e) => error_response("pay fee", e),
    }
}

pub async fn pay_all_pending(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<PayAllPendingRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/{}/fees/pay-all - request: {:?}", student_id, request);

    match state
        .fee_service
        .pay_all_pending(&student_id, request.semester, &request.payment_method)
        .await
    {
        Ok(result) => (StatusCode::CREATED, Json(FeeMapper::to_pay_all_response(result))).into_response(),
        Err(e) => error_response("pay all pending fees", e),
    }
}

/// Payment log for a student, newest first
pub async fn list_payments(State(state): State<AppState>, Path(student_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/students/{}/fees/payments", student_id);

    match state.fee_service.list_payments(&student_id).await {
        Ok(payments) => (StatusCode::OK, Json(FeeMapper::to_payment_list_response(payments))).into_response(),
        Err(e) => error_response("list payments", e),
    }
}

pub async fn audit_ledger(State(state): State<AppState>, Path(student_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/students/{}/fees/audit", student_id);

    match state.fee_service.audit_ledger(&student_id).await {
        Ok(audit) => (StatusCode::OK, Json(audit)).into_response(),
        Err(e) => error_response("audit payment ledger", e),
    }
}

pub async fn rebuild_running_totals(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/students/{}/fees/rebuild", student_id);

    match state.fee_service.rebuild_running_totals(&student_id).await {
        Ok(student) => {
            let response = StudentMapper::to_response(student, "Fee status rebuilt from the payment log");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("rebuild fee status", e),
    }
}

pub async fn set_optional_fee(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<SetOptionalFeeRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/{}/optional-fees - request: {:?}", student_id, request);

    match state
        .fee_service
        .set_optional_fee(&student_id, request.semester, &request.fee_type, request.enabled)
        .await
    {
        Ok(student) => {
            let message = if request.enabled {
                format!("Opted in to {} for semester {}", request.fee_type, request.semester)
            } else {
                format!("Opted out of {} for semester {}", request.fee_type, request.semester)
            };
            (StatusCode::OK, Json(StudentMapper::to_response(student, &message))).into_response()
        }
        Err(e) => error_response("set optional fee", e),
    }
}
