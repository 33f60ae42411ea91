use std::error::Error;

use crate::error::ErrorKind;
use crate::request::CompletionRequest;
use crate::response::CompletionResult;

/// The error type for a completion service.
pub trait CompletionServiceError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a hosted chat model, reachable through one
/// request/response round trip.
///
/// Once the service is created, it should behave like a stateless object.
/// It can still have internal state (connection pools, counters), but
/// callers should not rely on it, and the service should be prepared for
/// being dropped anytime.
///
/// Timeouts are the implementor's business. A request that takes too long
/// should fail with [`ErrorKind::TransientNetwork`].
pub trait CompletionService: Send + Sync {
    /// The error type that may be returned by the service.
    type Error: CompletionServiceError;

    /// Sends a request to the model and waits for the complete reply.
    ///
    /// The returned future must not borrow `self` or `req`.
    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResult, Self::Error>> + Send + 'static;
}
