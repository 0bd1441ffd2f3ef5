use std::{any::Any, future::Future, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    response::Response,
};
use engine::{CancellationToken, Engine, Outcome, Request as EngineRequest};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{ServerError, expenditures, incomes, internal_error, labels};

/// Every resource module adds its own routes through one entry here.
const ENDPOINTS: &[fn(Router<ServerState>) -> Router<ServerState>] =
    &[labels::routes, expenditures::routes, incomes::routes];

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    /// Forward `request` to the engine with a token of its own.
    ///
    /// Nothing cancels that token: a request whose client disconnects runs
    /// to completion, and its open transaction commits or rolls back as
    /// usual. Ctrl-C stops accepting connections but lets in-flight requests
    /// finish.
    pub(crate) async fn send<R: EngineRequest>(
        &self,
        request: R,
    ) -> Result<Outcome<R::Response>, ServerError> {
        let cancel = CancellationToken::new();
        Ok(self.engine.send(request, &cancel).await?)
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {detail}");
    internal_error()
}

fn add_layers(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Faults are logged where they are mapped to a response.
        .on_failure(());

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(tracing_layer)
}

/// The complete HTTP application around `engine`.
pub fn app(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };
    let router = ENDPOINTS
        .iter()
        .fold(Router::new(), |router, endpoints| endpoints(router))
        .with_state(state);
    add_layers(router)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine))
        .with_graceful_shutdown(shutdown)
        .await
}
