//! Expenditure API endpoints

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Response,
    routing::{get, put},
};
use engine::{
    CreateExpenditure, DeleteExpenditure, GetExpenditure, GetExpenditures, UpdateExpenditure,
};

use crate::{
    ServerError, created,
    labels::{page_request, page_view},
    no_content, ok,
    server::ServerState,
    types::{
        common::{LabelRef, PageQuery},
        expenditure::{ExpenditureDetail, ExpenditureNew, ExpenditureUpdate, ExpenditureView},
    },
};

pub(crate) fn routes(router: Router<ServerState>) -> Router<ServerState> {
    router
        .route("/api/expenditures", get(list).post(create))
        .route("/api/expenditure/{id}", get(get_one))
        .route("/api/expenditures/{id}", put(update).delete(delete))
}

fn expenditure_view(detail: &ExpenditureDetail) -> ExpenditureView {
    let expenditure = &detail.expenditure;
    ExpenditureView {
        id: expenditure.id().to_string(),
        payment_name: expenditure.payment_name().to_string(),
        amount: expenditure.amount(),
        payment_date_on_utc: expenditure.payment_date_on_utc(),
        label: LabelRef {
            id: detail.label.id().to_string(),
            name: detail.label.name().to_string(),
        },
    }
}

/// Handle requests for recording a new expenditure
async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenditureNew>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let outcome = state
        .send(CreateExpenditure {
            payment_name: payload.payment_name,
            amount: payload.amount,
            payment_date_on_utc: payload.payment_date_on_utc,
            label_id: payload.label_id,
        })
        .await?;
    Ok(created(outcome))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let outcome = state.send(GetExpenditure { id }).await?;
    Ok(ok(outcome, |detail| expenditure_view(&detail)))
}

/// Handle requests for listing expenditures, newest first
async fn list(
    State(state): State<ServerState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    let page = page_request(query)?;
    let outcome = state.send(GetExpenditures { page }).await?;
    Ok(ok(outcome, |page| page_view(page, expenditure_view)))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenditureUpdate>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let outcome = state
        .send(UpdateExpenditure {
            id,
            payment_name: payload.payment_name,
            amount: payload.amount,
            payment_date_on_utc: payload.payment_date_on_utc,
            label_id: payload.label_id,
        })
        .await?;
    Ok(no_content(outcome))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let outcome = state.send(DeleteExpenditure { id }).await?;
    Ok(no_content(outcome))
}
