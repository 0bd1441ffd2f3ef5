use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::{
    Clock, EngineError, Failure, Outcome, ResultEngine, SystemClock,
    dispatch::{Context, Registry, Request},
    validation,
};

pub mod expenditures;
pub mod incomes;
pub mod labels;

/// Every operation module contributes its handlers through one entry here.
const FEATURES: &[fn(&mut Registry) -> ResultEngine<()>] = &[
    labels::register,
    expenditures::register,
    incomes::register,
];

/// Run a handler body inside the request's storage session.
///
/// The body evaluates to an `Outcome`; the session is committed only when it
/// is a success. Early returns and errors drop the session, which rolls it
/// back.
macro_rules! with_tx {
    ($ctx:expr, |$tx:ident| $body:expr) => {{
        let $tx = $ctx.begin().await?;
        let outcome = $body;
        if outcome.is_success() {
            $ctx.commit($tx).await?;
        }
        Ok(outcome)
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    clock: Arc<dyn Clock>,
    registry: Registry,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Submit `request` to its handler and wait for the outcome.
    ///
    /// Rule violations short-circuit into an `<Operation>.Validation` failure
    /// without reaching the handler. `Err` is reserved for infrastructure
    /// faults, including cancellation through `cancel`.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> ResultEngine<Outcome<R::Response>> {
        let handler = self
            .registry
            .get::<R>()
            .ok_or(EngineError::MissingHandler(R::OPERATION))?;

        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let violations = validation::check(&request);
        if !violations.is_empty() {
            tracing::debug!(
                operation = R::OPERATION,
                violations = violations.len(),
                "request rejected by validation"
            );
            return Ok(Outcome::failure(Failure::validation(
                R::OPERATION,
                &violations,
            )));
        }

        tracing::debug!(operation = R::OPERATION, "dispatching request");
        let ctx = Context::new(&self.database, self.clock.as_ref(), cancel);
        let outcome = handler.handle(request, &ctx).await?;
        if let Outcome::Failure(failure) = &outcome {
            tracing::debug!(operation = R::OPERATION, code = failure.code(), "request failed");
        }
        Ok(outcome)
    }

    /// Names of every operation the engine can serve.
    pub fn operations(&self) -> Vec<&'static str> {
        self.registry.operations()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Replace the wall clock, e.g. with a [`FixedClock`](crate::FixedClock).
    pub fn clock(mut self, clock: impl Clock + 'static) -> EngineBuilder {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Construct `Engine`, registering the handler of every operation.
    pub async fn build(self) -> ResultEngine<Engine> {
        let mut registry = Registry::default();
        for register in FEATURES {
            register(&mut registry)?;
        }

        Ok(Engine {
            database: self.database,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            registry,
        })
    }
}
