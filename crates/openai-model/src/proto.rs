use recall_model::{
    CompletionRequest, CompletionResult, ErrorKind, Speaker, TokenUsage,
};
use serde::{Deserialize, Serialize};

use crate::{Error, OpenAIConfig};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorBody {
    error: ApiError,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ApiError {
    message: String,
    code: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &CompletionRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: req
            .messages()
            .map(|(speaker, text)| create_message(speaker, text))
            .collect(),
        max_completion_tokens: config.max_completion_tokens,
    }
}

#[inline]
fn create_message(speaker: Speaker, text: &str) -> Message {
    let content = text.to_owned();
    match speaker {
        Speaker::System => Message::System { content },
        Speaker::User => Message::User { content },
        Speaker::Assistant => Message::Assistant { content },
    }
}

/// Takes the reply out of the first choice.
///
/// A missing content is not an error here, it comes back as an empty text
/// and the caller decides what to do with it.
pub fn into_result(completion: ChatCompletion) -> Result<CompletionResult, Error> {
    let usage = completion.usage.map(|u| TokenUsage {
        prompt: u.prompt_tokens,
        completion: u.completion_tokens,
        total: u.total_tokens,
    });
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new("response has no choices", ErrorKind::Other));
    };
    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(Error::new(
            "reply was blocked by the content filter",
            ErrorKind::Refused,
        ));
    }
    Ok(CompletionResult {
        text: choice.message.content.unwrap_or_default(),
        usage,
    })
}

/// Extracts a readable message from an error response body.
pub fn error_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    Some(match body.error.code {
        Some(code) => format!("{code}: {}", body.error.message),
        None => body.error.message,
    })
}

#[cfg(test)]
mod tests {
    use recall_model::Turn;
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let request = CompletionRequest {
            instruction: "You are a helpful assistant.".to_owned(),
            history: vec![Turn::user("Hi"), Turn::assistant("Hello!")],
            input: "What did I say?".to_owned(),
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model("custom")
            .with_max_completion_tokens(500)
            .build();
        let expected = ChatCompletionRequest {
            model: "custom".to_owned(),
            messages: vec![
                Message::System {
                    content: "You are a helpful assistant.".to_owned(),
                },
                Message::User {
                    content: "Hi".to_owned(),
                },
                Message::Assistant {
                    content: "Hello!".to_owned(),
                },
                Message::User {
                    content: "What did I say?".to_owned(),
                },
            ],
            max_completion_tokens: Some(500),
        };
        let created = create_request(&request, &config);
        assert_eq!(created, expected);

        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            json!({
                "model": "custom",
                "messages": [
                    { "role": "system", "content": "You are a helpful assistant." },
                    { "role": "user", "content": "Hi" },
                    { "role": "assistant", "content": "Hello!" },
                    { "role": "user", "content": "What did I say?" },
                ],
                "max_completion_tokens": 500,
            })
        );
    }

    #[test]
    fn test_parse_completion() {
        let completion: ChatCompletion =
            serde_json::from_str(include_str!("../fixtures/chat_completion.json"))
                .unwrap();
        let result = into_result(completion).unwrap();
        assert_eq!(result.text, "Noted: 10am, 4 attendees.");
        assert_eq!(
            result.usage,
            Some(TokenUsage {
                prompt: 28,
                completion: 9,
                total: 37,
            })
        );
    }

    #[test]
    fn test_empty_content() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": { "role": "assistant", "content": null },
                "finish_reason": "length",
            }],
        }))
        .unwrap();
        let result = into_result(completion).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.usage, None);
    }

    #[test]
    fn test_content_filter() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "" },
                "finish_reason": "content_filter",
            }],
        }))
        .unwrap();
        let err = into_result(completion).unwrap_err();
        assert_eq!(recall_model::CompletionServiceError::kind(&err), ErrorKind::Refused);

        let completion: ChatCompletion =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(into_result(completion).is_err());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":"DeploymentNotFound","message":"The API deployment for this resource does not exist."}}"#;
        assert_eq!(
            error_message(body).unwrap(),
            "DeploymentNotFound: The API deployment for this resource does not exist."
        );
        assert_eq!(error_message("<html>"), None);
    }
}
