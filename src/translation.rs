use crate::config::Config;
use crate::error::{GreeterError, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

/// Anything that can turn `text` written in `source` into `target`.
///
/// A failed call (transport error, non-200 status, unexpected body) returns
/// `GreeterError::Translation`; the greeter then leaves its state untouched.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Google Translate v2 response body
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Client for the Google Translate v2 REST endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_url: api_url.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.translate_api_key.clone(),
            config.translate_api_url.clone(),
        )
    }

    /// Build the request URL. Parameter order is fixed: key, q, source, target.
    fn build_url(&self, message: &str, source: &str, target: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.api_url,
            &[
                ("key", self.api_key.as_str()),
                ("q", message),
                ("source", source),
                ("target", target),
            ],
        )
        .map_err(|e| {
            GreeterError::Translation(format!("invalid endpoint '{}': {}", self.api_url, e))
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = self.build_url(text, source, target)?;
        debug!("Translating '{}' from {} to {}", text, source, target);

        let response = self.client.get(url).send().await.map_err(|e| {
            GreeterError::Translation(format!("failed to send request: {}", e))
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            warn!("Translation API returned {}: {}", status, body);
            return Err(GreeterError::Translation(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let parsed: TranslateResponse = response.json().await.map_err(|e| {
            GreeterError::Translation(format!("failed to parse response: {}", e))
        })?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| GreeterError::Translation("response contained no translations".into()))
    }
}
