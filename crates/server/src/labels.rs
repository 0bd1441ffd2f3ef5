//! Label API endpoints

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Response,
    routing::get,
};
use engine::{
    CreateLabel, DeleteLabel, GetLabel, GetLabels, Label, LabelKind, Page, PageRequest,
    UpdateLabel,
};

use crate::{
    ServerError, created, no_content, ok,
    server::ServerState,
    types::{
        common::{self, PageQuery},
        label::{LabelNew, LabelUpdate, LabelView},
    },
};

pub(crate) fn routes(router: Router<ServerState>) -> Router<ServerState> {
    router
        .route("/api/labels", get(list).post(create))
        .route("/api/labels/expenditures", get(list_expenditure_labels))
        .route("/api/labels/incomes", get(list_income_labels))
        .route("/api/labels/{id}", get(get_one).put(update).delete(delete))
}

pub(crate) fn label_view(label: &Label) -> LabelView {
    LabelView {
        id: label.id().to_string(),
        name: label.name().to_string(),
        is_income: label.is_income(),
        is_deleted: label.is_deleted(),
    }
}

pub(crate) fn page_view<T, V>(page: Page<T>, view: impl Fn(&T) -> V) -> common::Page<V> {
    common::Page {
        items: page.items.iter().map(view).collect(),
        page: page.page,
        page_size: page.page_size,
        total_count: page.total_count,
    }
}

pub(crate) fn page_request(
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<PageRequest, ServerError> {
    let Query(query) = query?;
    Ok(PageRequest::new(query.page, query.page_size))
}

/// Handle requests for creating a new `Label`
async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<LabelNew>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let outcome = state
        .send(CreateLabel {
            name: payload.name,
            is_income: payload.is_income,
        })
        .await?;
    Ok(created(outcome))
}

async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let outcome = state.send(GetLabel { id }).await?;
    Ok(ok(outcome, |label| label_view(&label)))
}

async fn list_labels(
    state: ServerState,
    query: Result<Query<PageQuery>, QueryRejection>,
    kind: Option<LabelKind>,
) -> Result<Response, ServerError> {
    let page = page_request(query)?;
    let outcome = state.send(GetLabels { page, kind }).await?;
    Ok(ok(outcome, |page| page_view(page, label_view)))
}

/// Handle requests for listing every label, deleted ones included
async fn list(
    State(state): State<ServerState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    list_labels(state, query, None).await
}

/// Handle requests for listing the labels new expenditures may use
async fn list_expenditure_labels(
    State(state): State<ServerState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    list_labels(state, query, Some(LabelKind::Expenditure)).await
}

/// Handle requests for listing the labels new incomes may use
async fn list_income_labels(
    State(state): State<ServerState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    list_labels(state, query, Some(LabelKind::Income)).await
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<LabelUpdate>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    let outcome = state
        .send(UpdateLabel {
            id,
            name: payload.name,
            is_income: payload.is_income,
        })
        .await?;
    Ok(no_content(outcome))
}

/// Handle requests for soft-deleting a `Label`
async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let outcome = state.send(DeleteLabel { id }).await?;
    Ok(no_content(outcome))
}
