use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AZURE_API_VERSION: &str = "2024-12-01-preview";

#[derive(Clone, PartialEq, Eq, Hash)]
enum Endpoint {
    OpenAI {
        base_url: String,
    },
    Azure {
        endpoint: String,
        deployment: String,
        api_version: String,
    },
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum Credential {
    ApiKey(String),
    BearerToken(String),
}

/// Builder for [`OpenAIConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OpenAIConfigBuilder {
    endpoint: Endpoint,
    credential: Option<Credential>,
    model: Option<String>,
    base_url: Option<String>,
    api_version: Option<String>,
    max_completion_tokens: Option<u32>,
    timeout: Option<Duration>,
}

impl OpenAIConfigBuilder {
    /// Creates a builder for an OpenAI-style endpoint with the given API
    /// key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self::new(
            Endpoint::OpenAI {
                base_url: DEFAULT_OPENAI_BASE_URL.to_owned(),
            },
            Some(Credential::ApiKey(api_key.into())),
        )
    }

    /// Creates a builder for an Azure OpenAI deployment, e.g.
    /// `https://my-resource.openai.azure.com` and `gpt-4o`.
    ///
    /// Set a credential with [`with_key`](Self::with_key) or
    /// [`with_bearer_token`](Self::with_bearer_token).
    #[inline]
    pub fn azure<E: Into<String>, D: Into<String>>(
        endpoint: E,
        deployment: D,
    ) -> Self {
        Self::new(
            Endpoint::Azure {
                endpoint: endpoint.into(),
                deployment: deployment.into(),
                api_version: DEFAULT_AZURE_API_VERSION.to_owned(),
            },
            None,
        )
    }

    fn new(endpoint: Endpoint, credential: Option<Credential>) -> Self {
        Self {
            endpoint,
            credential,
            model: None,
            base_url: None,
            api_version: None,
            max_completion_tokens: None,
            timeout: None,
        }
    }

    /// Sets the API key.
    #[inline]
    pub fn with_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.credential = Some(Credential::ApiKey(api_key.into()));
        self
    }

    /// Uses a bearer token (e.g. an Entra ID access token) instead of an
    /// API key.
    #[inline]
    pub fn with_bearer_token<S: Into<String>>(mut self, token: S) -> Self {
        self.credential = Some(Credential::BearerToken(token.into()));
        self
    }

    /// Sets the model to use. Azure deployments default to the deployment
    /// name.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a custom base URL. For Azure, this replaces the resource
    /// endpoint.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the Azure API version. Ignored for OpenAI-style endpoints.
    #[inline]
    pub fn with_api_version<S: Into<String>>(mut self, version: S) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Limits the number of tokens in each reply.
    #[inline]
    pub fn with_max_completion_tokens(mut self, tokens: u32) -> Self {
        self.max_completion_tokens = Some(tokens);
        self
    }

    /// Fails requests that take longer than `timeout`.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> OpenAIConfig {
        let (url, default_model, is_azure) = match self.endpoint {
            Endpoint::OpenAI { base_url } => {
                let base_url = self.base_url.unwrap_or(base_url);
                let url =
                    format!("{}/chat/completions", base_url.trim_end_matches('/'));
                (url, DEFAULT_OPENAI_MODEL.to_owned(), false)
            }
            Endpoint::Azure {
                endpoint,
                deployment,
                api_version,
            } => {
                let endpoint = self.base_url.unwrap_or(endpoint);
                let api_version = self.api_version.unwrap_or(api_version);
                let url = format!(
                    "{}/openai/deployments/{deployment}/chat/completions?api-version={api_version}",
                    endpoint.trim_end_matches('/'),
                );
                (url, deployment, true)
            }
        };
        let auth_header = self.credential.map(|credential| match credential {
            Credential::BearerToken(token) => {
                ("authorization", format!("Bearer {token}"))
            }
            Credential::ApiKey(key) if is_azure => {
                ("api-key", key)
            }
            Credential::ApiKey(key) => ("authorization", format!("Bearer {key}")),
        });

        OpenAIConfig {
            url,
            auth_header,
            model: self.model.unwrap_or(default_model),
            max_completion_tokens: self.max_completion_tokens,
            timeout: self.timeout,
        }
    }
}

impl Debug for OpenAIConfigBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let endpoint = match &self.endpoint {
            Endpoint::OpenAI { base_url } => base_url,
            Endpoint::Azure { endpoint, .. } => endpoint,
        };
        f.debug_struct("OpenAIConfigBuilder")
            .field("endpoint", endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Configuration for the OpenAI-compatible provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OpenAIConfig {
    pub(crate) url: String,
    pub(crate) auth_header: Option<(&'static str, String)>,
    pub(crate) model: String,
    pub(crate) max_completion_tokens: Option<u32>,
    pub(crate) timeout: Option<Duration>,
}

impl OpenAIConfig {
    /// Returns the full URL of the chat completions endpoint.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the model name sent with each request.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Debug for OpenAIConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("url", &self.url)
            .field(
                "auth_header",
                &self.auth_header.as_ref().map(|(name, _)| (name, "<redacted>")),
            )
            .field("model", &self.model)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_defaults() {
        let config = OpenAIConfigBuilder::with_api_key("sk-secret").build();
        assert_eq!(config.url(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(config.model(), DEFAULT_OPENAI_MODEL);
        assert_eq!(
            config.auth_header,
            Some(("authorization", "Bearer sk-secret".to_owned()))
        );

        let config = OpenAIConfigBuilder::with_api_key("sk-secret")
            .with_base_url("http://localhost:8080/v1/")
            .with_model("local")
            .build();
        assert_eq!(config.url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model(), "local");
    }

    #[test]
    fn test_azure() {
        let config =
            OpenAIConfigBuilder::azure("https://res.openai.azure.com/", "gpt-4o")
                .with_key("azure-key")
                .build();
        assert_eq!(
            config.url(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-12-01-preview"
        );
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.auth_header, Some(("api-key", "azure-key".to_owned())));

        let config = OpenAIConfigBuilder::azure("https://res.openai.azure.com", "gpt-4o")
            .with_bearer_token("token")
            .with_api_version("2024-08-01-preview")
            .build();
        assert!(config.url().ends_with("?api-version=2024-08-01-preview"));
        assert_eq!(
            config.auth_header,
            Some(("authorization", "Bearer token".to_owned()))
        );

        let config =
            OpenAIConfigBuilder::azure("https://res.openai.azure.com", "gpt-4o")
                .build();
        assert_eq!(config.auth_header, None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let builder = OpenAIConfigBuilder::with_api_key("sk-secret");
        assert!(!format!("{builder:?}").contains("sk-secret"));
        let config = builder.build();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
