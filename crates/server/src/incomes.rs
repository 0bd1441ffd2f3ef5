//! Income API endpoints

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Response,
    routing::get,
};
use engine::{CreateIncome, DeleteIncome, GetIncome, GetIncomes, UpdateIncome};

use crate::{
    ServerError, created,
    labels::{page_request, page_view},
    no_content, ok,
    server::ServerState,
    types::{
        common::{LabelRef, PageQuery},
        income::{IncomeDetail, IncomeNew, IncomeUpdate, IncomeView},
    },
};

pub(crate) fn routes(router: Router<ServerState>) -> Router<ServerState> {
    router
        .route("/api/incomes", get(list).post(create))
        .route("/api/incomes/{id}", get(get_one).put(update).delete(delete))
}

fn income_view(detail: &IncomeDetail) -> IncomeView {
    let income = &detail.income;
    IncomeView {
        id: income.id().to_string(),
        income_name: income.income_name().to_string(),
        amount: income.amount(),
        income_date_on_utc: income.income_date_on_utc(),
        label: LabelRef {
            id: detail.label.id().to_string(),
            name: detail.label.name().to_string(),
        },
    }
}

/// Handle requests for recording a new income
async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<IncomeNew>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let outcome = state
        .send(CreateIncome {
            income_name: payload.income_name,
            amount: payload.amount,
            income_date_on_utc: payload.income_date_on_utc,
            label_id: payload.label_id,
        })
        .await?;
    Ok(created(outcome))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let outcome = state.send(GetIncome { id }).await?;
    Ok(ok(outcome, |detail| income_view(&detail)))
}

/// Handle requests for listing incomes, newest first
async fn list(
    State(state): State<ServerState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    let page = page_request(query)?;
    let outcome = state.send(GetIncomes { page }).await?;
    Ok(ok(outcome, |page| page_view(page, income_view)))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<IncomeUpdate>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let outcome = state
        .send(UpdateIncome {
            id,
            income_name: payload.income_name,
            amount: payload.amount,
            income_date_on_utc: payload.income_date_on_utc,
            label_id: payload.label_id,
        })
        .await?;
    Ok(no_content(outcome))
}

async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let outcome = state.send(DeleteIncome { id }).await?;
    Ok(no_content(outcome))
}
