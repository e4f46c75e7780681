use std::future::Future;

use async_trait::async_trait;

pub type QueryError = Box<dyn std::error::Error + Send + Sync>;

/// The computation a [`LazyRefreshCache`](super::LazyRefreshCache) wraps.
///
/// Must be idempotent: its result is cached verbatim and it may run again at
/// any time for the same request.
#[async_trait]
pub trait RawQuery<Req, Resp>: Send + Sync {
    async fn query(&self, request: Req) -> Result<Resp, QueryError>;
}

#[async_trait]
impl<F, Fut, Req, Resp> RawQuery<Req, Resp> for F
where
    F: Fn(Req) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Resp, QueryError>> + Send + 'static,
    Req: Send + 'static,
    Resp: Send + 'static,
{
    async fn query(&self, request: Req) -> Result<Resp, QueryError> {
        (self)(request).await
    }
}
