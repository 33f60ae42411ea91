use std::pin::Pin;
use std::sync::Arc;

use recall_model::{
    CompletionRequest, CompletionResult, CompletionService,
    CompletionServiceError,
};
use tracing::Instrument;

type CompleteResult = Result<CompletionResult, Box<dyn CompletionServiceError>>;
type BoxedCompleteFuture = Pin<Box<dyn Future<Output = CompleteResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(CompletionRequest) -> BoxedCompleteFuture + Send + Sync>;

/// A wrapper around a completion service that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct CompletionClient {
    handler_fn: HandlerFn,
}

impl CompletionClient {
    #[inline]
    pub fn new<S: CompletionService + 'static>(service: S) -> Self {
        // We have to erase the type `S`, since `Agent` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = service.complete(&req);
            Box::pin(
                async move {
                    trace!("got a request: {req:?}");
                    let result = fut.await;
                    handle_result::<S>(result)
                }
                .instrument(debug_span!("completion round trip")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and waits for the complete reply.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future drops the pending
    /// service call, nothing else is touched.
    #[inline]
    pub async fn complete(&self, req: CompletionRequest) -> CompleteResult {
        (self.handler_fn)(req).await
    }
}

fn handle_result<S: CompletionService + 'static>(
    result: Result<CompletionResult, S::Error>,
) -> CompleteResult {
    match result {
        Ok(result) => {
            trace!(
                "got a reply of {} bytes, usage: {:?}",
                result.text.len(),
                result.usage
            );
            Ok(result)
        }
        Err(err) => {
            error!("got an error ({}): {err:?}", err.kind());
            Err(Box::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use recall_model::{ErrorKind, Turn};
    use recall_test_model::{PresetReply, TestCompletionService};

    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            instruction: "You are concise.".to_owned(),
            history: vec![Turn::user("Hi"), Turn::assistant("Hello")],
            input: "How are you?".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_complete() {
        let mut service = TestCompletionService::default();
        for _ in 0..3 {
            service.add_reply_step(PresetReply::with_text("Fine, thanks."));
        }

        let client = CompletionClient::new(service.clone());
        for _ in 0..3 {
            let resp = client.complete(request()).await.unwrap();
            assert_eq!(resp.text, "Fine, thanks.");
        }
        assert_eq!(service.requests(), vec![request(); 3]);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let mut service = TestCompletionService::default();
        service.add_failure_step(ErrorKind::EndpointNotFound);

        let client = CompletionClient::new(service);
        let err = client.complete(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
    }
}
