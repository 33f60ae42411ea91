//! A completion service for OpenAI-compatible chat APIs, including Azure
//! OpenAI deployments.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use recall_model::{
    CompletionRequest, CompletionResult, CompletionService,
    CompletionServiceError, ErrorKind,
};
use reqwest::{Client, StatusCode, header};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use proto::ChatCompletion;

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        let kind = match err.status() {
            Some(status) => kind_for_status(status),
            None if err.is_decode() => ErrorKind::Other,
            None => ErrorKind::TransientNetwork,
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl CompletionServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Maps an HTTP status to the failure category callers act on.
fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ErrorKind::Authentication
        }
        StatusCode::NOT_FOUND => ErrorKind::EndpointNotFound,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT => ErrorKind::TransientNetwork,
        s if s.is_server_error() => ErrorKind::TransientNetwork,
        _ => ErrorKind::Other,
    }
}

/// OpenAI-compatible completion service.
///
/// Cloning is cheap, clones share the connection pool.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl CompletionService for OpenAIProvider {
    type Error = Error;

    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResult, Self::Error>> + Send + 'static
    {
        let body = proto::create_request(req, &self.config);
        let mut builder = self
            .client
            .post(&self.config.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&body);
        if let Some((name, value)) = &self.config.auth_header {
            builder = builder.header(*name, value);
        }
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        debug!("sending {} messages to {}", req.messages().count(), self.config.url);
        let resp_fut = builder.send();

        async move {
            let resp = resp_fut.await.map_err(Error::from_transport)?;

            let status = resp.status();
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let body = match resp.text().await {
                Ok(body) => body,
                Err(err) if status.is_success() => {
                    return Err(Error::from_transport(err));
                }
                // The status alone is enough to report the failure.
                Err(_) => String::new(),
            };
            handle_response(status, content_type.as_deref(), &body)
        }
    }
}

/// Turns a received response into a reply or a classified error.
fn handle_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: &str,
) -> Result<CompletionResult, Error> {
    if !status.is_success() {
        let message = proto::error_message(body)
            .unwrap_or_else(|| format!("HTTP {status}"));
        warn!("request failed with {status}: {message}");
        return Err(Error::new(message, kind_for_status(status)));
    }

    let is_json = content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| m.subtype().as_str() == "json")
        .unwrap_or(true);
    if !is_json {
        return Err(Error::new(
            format!("Unexpected content type: {content_type:?}"),
            ErrorKind::Other,
        ));
    }

    // Here we got a successful response.
    trace!("got response body: {body}");
    let completion = serde_json::from_str::<ChatCompletion>(body)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
    proto::into_result(completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_status() {
        let cases = [
            (401, ErrorKind::Authentication),
            (403, ErrorKind::Authentication),
            (404, ErrorKind::EndpointNotFound),
            (429, ErrorKind::RateLimited),
            (408, ErrorKind::TransientNetwork),
            (500, ErrorKind::TransientNetwork),
            (503, ErrorKind::TransientNetwork),
            (400, ErrorKind::Other),
        ];
        for (code, kind) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(kind_for_status(status), kind, "status {code}");
        }
    }

    #[test]
    fn test_error_kind() {
        let err = Error::new("slow down", ErrorKind::RateLimited);
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(err.kind().is_retryable());
        assert_eq!(err.to_string(), "slow down");
    }

    #[test]
    fn test_handle_success() {
        let body = include_str!("../fixtures/chat_completion.json");
        let result = handle_response(
            StatusCode::OK,
            Some("application/json; charset=utf-8"),
            body,
        )
        .unwrap();
        assert_eq!(result.text, "Noted: 10am, 4 attendees.");
        assert_eq!(result.usage.unwrap().total, 37);

        // A missing content type is taken as JSON.
        assert!(handle_response(StatusCode::OK, None, body).is_ok());
    }

    #[test]
    fn test_handle_error_status() {
        let body = r#"{"error":{"code":"429","message":"Rate limit is exceeded."}}"#;
        let err = handle_response(
            StatusCode::TOO_MANY_REQUESTS,
            Some("application/json"),
            body,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.message(), "429: Rate limit is exceeded.");

        let err =
            handle_response(StatusCode::BAD_GATEWAY, Some("text/html"), "<html>")
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransientNetwork);
        assert_eq!(err.message(), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_handle_unexpected_body() {
        let err = handle_response(StatusCode::OK, Some("text/html"), "<html>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);

        let err = handle_response(StatusCode::OK, Some("application/json"), "{}")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
