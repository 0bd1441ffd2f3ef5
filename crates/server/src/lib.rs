use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{EngineError, Failure, Outcome};
use serde::Serialize;

pub use server::{app, run_with_listener};

mod expenditures;
mod incomes;
mod labels;
mod server;

pub mod types {
    pub mod common {
        pub use api_types::common::{ErrorBody, LabelRef, Page, PageQuery, Problem};
    }

    pub mod label {
        pub use api_types::label::{LabelNew, LabelUpdate, LabelView};
        pub use engine::{Label, LabelKind};
    }

    pub mod expenditure {
        pub use api_types::expenditure::{ExpenditureNew, ExpenditureUpdate, ExpenditureView};
        pub use engine::ExpenditureDetail;
    }

    pub mod income {
        pub use api_types::income::{IncomeNew, IncomeUpdate, IncomeView};
        pub use engine::IncomeDetail;
    }
}

use types::common::{ErrorBody, Problem};

/// Code of the failure returned for a body or query string that cannot be
/// decoded at all.
pub const MALFORMED_REQUEST: &str = "Request.Malformed";

pub enum ServerError {
    Engine(EngineError),
    Malformed(String),
}

pub(crate) fn internal_error() -> Response {
    let problem = Problem {
        title: "Internal Server Error".to_string(),
        detail: "An error occurred while processing your request. Please try again.".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(problem)).into_response()
}

pub(crate) fn failure_response(failure: Failure) -> Response {
    let body = ErrorBody {
        code: failure.code().to_string(),
        message: failure.message().to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// 200 with the success value rendered by `view`.
pub(crate) fn ok<T, V: Serialize>(outcome: Outcome<T>, view: impl FnOnce(T) -> V) -> Response {
    outcome.resolve(|value| Json(view(value)).into_response(), failure_response)
}

/// 200 with the new id as a bare JSON string.
pub(crate) fn created(outcome: Outcome<String>) -> Response {
    ok(outcome, |id| id)
}

/// 204 without body.
pub(crate) fn no_content(outcome: Outcome<()>) -> Response {
    outcome.resolve(|()| StatusCode::NO_CONTENT.into_response(), failure_response)
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Engine(err) => {
                tracing::error!("request failed: {err}");
                internal_error()
            }
            ServerError::Malformed(message) => {
                failure_response(Failure::new(MALFORMED_REQUEST, message))
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Malformed(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Malformed(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use sea_orm::DbErr;

    #[test]
    fn failure_maps_to_400() {
        let res = failure_response(Failure::new("GetLabel.LabelNotFound", "missing"));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_fault_maps_to_500() {
        let err = EngineError::Database(DbErr::Custom("disk on fire".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_handler_maps_to_500() {
        let res = ServerError::from(EngineError::MissingHandler("GetLabel")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_maps_to_400() {
        let res = ServerError::Malformed("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn success_without_payload_is_204() {
        let res = no_content(Outcome::success(()));
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn created_answers_the_bare_id() {
        let res = created(Outcome::success("l_1".to_string()));
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#""l_1""#);
    }
}
