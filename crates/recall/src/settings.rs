use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use recall_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

/// Settings read from the environment.
#[derive(Debug)]
pub struct Settings {
    pub provider: OpenAIConfig,
    pub max_retries: Option<u32>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SettingsError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => {
                write!(f, "{name} environment variable is not set")
            }
            Self::Invalid { name, value } => {
                write!(f, "{name} has an invalid value `{value}`")
            }
        }
    }
}

impl StdError for SettingsError {}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the settings with `lookup`. Blank values count as unset.
    ///
    /// An Azure OpenAI deployment is used if `AZURE_OPENAI_ENDPOINT` is
    /// set, otherwise an OpenAI-style endpoint configured by `RECALL_*`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut builder = match get("AZURE_OPENAI_ENDPOINT") {
            Some(endpoint) => {
                let deployment = get("AZURE_OPENAI_DEPLOYMENT_NAME")
                    .ok_or(SettingsError::Missing("AZURE_OPENAI_DEPLOYMENT_NAME"))?;
                let mut builder = OpenAIConfigBuilder::azure(endpoint, deployment);
                if let Some(key) = get("AZURE_OPENAI_API_KEY") {
                    builder = builder.with_key(key);
                } else if let Some(token) = get("AZURE_OPENAI_AD_TOKEN") {
                    builder = builder.with_bearer_token(token);
                } else {
                    return Err(SettingsError::Missing("AZURE_OPENAI_API_KEY"));
                }
                if let Some(version) = get("AZURE_OPENAI_API_VERSION") {
                    builder = builder.with_api_version(version);
                }
                builder
            }
            None => {
                let key = get("RECALL_API_KEY")
                    .ok_or(SettingsError::Missing("RECALL_API_KEY"))?;
                let mut builder = OpenAIConfigBuilder::with_api_key(key);
                if let Some(base_url) = get("RECALL_BASE_URL") {
                    builder = builder.with_base_url(base_url);
                }
                if let Some(model) = get("RECALL_MODEL") {
                    builder = builder.with_model(model);
                }
                builder
            }
        };

        if let Some(tokens) = parse(&get, "RECALL_MAX_COMPLETION_TOKENS")? {
            builder = builder.with_max_completion_tokens(tokens);
        }
        if let Some(secs) = parse::<u64, _>(&get, "RECALL_TIMEOUT_SECS")? {
            builder = builder.with_timeout(Duration::from_secs(secs));
        }
        let max_retries = parse(&get, "RECALL_MAX_RETRIES")?;

        Ok(Self {
            provider: builder.build(),
            max_retries,
        })
    }
}

fn parse<T, F>(get: &F, name: &'static str) -> Result<Option<T>, SettingsError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(SettingsError::Invalid { name, value }),
        },
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_openai_settings() {
        let s = settings(&[
            ("RECALL_API_KEY", "sk-test"),
            ("RECALL_MODEL", "gpt-4o"),
            ("RECALL_MAX_RETRIES", "5"),
        ])
        .unwrap();
        assert_eq!(s.provider.url(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(s.provider.model(), "gpt-4o");
        assert_eq!(s.max_retries, Some(5));
    }

    #[test]
    fn test_azure_settings() {
        let s = settings(&[
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("AZURE_OPENAI_DEPLOYMENT_NAME", "gpt-4o"),
            ("AZURE_OPENAI_AD_TOKEN", "token"),
            ("RECALL_API_KEY", "ignored"),
        ])
        .unwrap();
        assert!(s.provider.url().contains("/openai/deployments/gpt-4o/"));
        assert_eq!(s.max_retries, None);

        let err = settings(&[("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com")])
            .unwrap_err();
        assert_eq!(err, SettingsError::Missing("AZURE_OPENAI_DEPLOYMENT_NAME"));
    }

    #[test]
    fn test_missing_and_invalid() {
        let err = settings(&[("RECALL_API_KEY", "  ")]).unwrap_err();
        assert_eq!(err, SettingsError::Missing("RECALL_API_KEY"));

        let err = settings(&[
            ("RECALL_API_KEY", "sk-test"),
            ("RECALL_MAX_COMPLETION_TOKENS", "lots"),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "RECALL_MAX_COMPLETION_TOKENS has an invalid value `lots`"
        );
    }
}
