use crate::domain::model::{LookupOutcome, LookupRequest, OrderResult};
use async_trait::async_trait;

/// Performs a single status lookup. Implementations report every failure
/// through `LookupOutcome::Failure` instead of returning an error.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn lookup(&self, request: &LookupRequest) -> LookupOutcome;
}

/// Receives each per-order result as soon as its unit completes.
pub trait ResultSink: Send + Sync {
    fn emit(&self, result: &OrderResult);
}
