//! Request dispatch.
//!
//! A [`Request`] is a plain value describing one operation. Exactly one
//! [`Handler`] is registered per request type in a [`Registry`]; the
//! [`Engine`](crate::Engine) looks it up by the request's type, runs the
//! request's rule set and only then hands it to the handler.

use std::{
    any::{Any, TypeId},
    collections::{HashMap, hash_map::Entry},
    future::Future,
};

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tokio_util::sync::CancellationToken;

use crate::{Clock, EngineError, Outcome, ResultEngine, validation::Validate};

/// An operation submitted to the engine.
pub trait Request: Validate + Send + 'static {
    /// Payload of a successful outcome.
    type Response: Send + 'static;
    /// Prefix of every failure code this request can produce.
    const OPERATION: &'static str;
}

/// Business logic for one request type.
///
/// Handlers report expected failures through the returned [`Outcome`] and
/// keep `Err` for infrastructure faults.
#[async_trait]
pub trait Handler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: R, ctx: &Context<'_>) -> ResultEngine<Outcome<R::Response>>;
}

/// Everything a handler may touch while serving one request.
pub struct Context<'a> {
    database: &'a DatabaseConnection,
    clock: &'a dyn Clock,
    cancel: &'a CancellationToken,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        database: &'a DatabaseConnection,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            database,
            clock,
            cancel,
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run a storage call unless the request is cancelled first.
    ///
    /// When cancellation wins the call's future is dropped; inside an
    /// uncommitted transaction that leaves nothing behind.
    pub async fn guard<T, F>(&self, operation: F) -> ResultEngine<T>
    where
        F: Future<Output = Result<T, DbErr>> + Send,
        T: Send,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(EngineError::Cancelled),
            result = operation => Ok(result?),
        }
    }

    /// Open the per-request storage session.
    pub async fn begin(&self) -> ResultEngine<DatabaseTransaction> {
        self.guard(self.database.begin()).await
    }

    /// Commit the session. A commit is never interrupted once started.
    pub async fn commit(&self, db_tx: DatabaseTransaction) -> ResultEngine<()> {
        if self.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        db_tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug)]
struct Registered {
    operation: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

/// Request type → handler table, filled once while the engine is built.
#[derive(Debug, Default)]
pub struct Registry {
    handlers: HashMap<TypeId, Registered>,
}

impl Registry {
    /// Bind `handler` to request type `R`.
    ///
    /// A second handler for the same request type is rejected.
    pub fn register<R, H>(&mut self, handler: H) -> ResultEngine<()>
    where
        R: Request,
        H: Handler<R>,
    {
        match self.handlers.entry(TypeId::of::<R>()) {
            Entry::Occupied(_) => Err(EngineError::DuplicateHandler(R::OPERATION)),
            Entry::Vacant(slot) => {
                let handler: Box<dyn Handler<R>> = Box::new(handler);
                slot.insert(Registered {
                    operation: R::OPERATION,
                    handler: Box::new(handler),
                });
                Ok(())
            }
        }
    }

    pub(crate) fn get<R: Request>(&self) -> Option<&dyn Handler<R>> {
        self.handlers
            .get(&TypeId::of::<R>())?
            .handler
            .downcast_ref::<Box<dyn Handler<R>>>()
            .map(|handler| handler.as_ref())
    }

    /// Registered operation names, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut operations: Vec<_> = self.handlers.values().map(|r| r.operation).collect();
        operations.sort_unstable();
        operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rules;

    struct Ping;

    impl Validate for Ping {
        fn validate(&self, _rules: &mut Rules) {}
    }

    impl Request for Ping {
        type Response = &'static str;
        const OPERATION: &'static str = "Ping";
    }

    struct Pong;

    #[async_trait]
    impl Handler<Ping> for Pong {
        async fn handle(
            &self,
            _request: Ping,
            _ctx: &Context<'_>,
        ) -> ResultEngine<Outcome<&'static str>> {
            Ok(Outcome::success("pong"))
        }
    }

    #[test]
    fn second_handler_for_same_request_is_rejected() {
        let mut registry = Registry::default();
        registry.register::<Ping, _>(Pong).unwrap();

        let err = registry.register::<Ping, _>(Pong).unwrap_err();

        assert_eq!(err, EngineError::DuplicateHandler("Ping"));
        assert_eq!(registry.operations(), vec!["Ping"]);
    }

    #[test]
    fn lookup_finds_registered_handler() {
        let mut registry = Registry::default();
        assert!(registry.get::<Ping>().is_none());

        registry.register::<Ping, _>(Pong).unwrap();

        assert!(registry.get::<Ping>().is_some());
        assert_eq!(registry.operations(), vec!["Ping"]);
    }

    #[tokio::test]
    async fn guard_stops_at_cancellation() {
        let database = DatabaseConnection::default();
        let clock = crate::SystemClock;
        let cancel = CancellationToken::new();
        let ctx = Context::new(&database, &clock, &cancel);

        cancel.cancel();
        let result = ctx
            .guard(std::future::pending::<Result<(), DbErr>>())
            .await;

        assert_eq!(result, Err(EngineError::Cancelled));
    }
}
