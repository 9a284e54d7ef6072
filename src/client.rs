//! HTTP client for the word-of-the-day and result services.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;

/// Score posted to `/resultado` after a win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Player name, trimmed.
    #[serde(rename = "nome")]
    pub name: String,
    /// Number of guesses used, including the winning one.
    #[serde(rename = "tentativas")]
    pub attempts: usize,
    /// Seconds spent playing.
    #[serde(rename = "tempo")]
    pub elapsed_secs: u64,
}

#[derive(Debug, Deserialize)]
struct WordResponse {
    palavra: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    mensagem: Option<String>,
    erro: Option<String>,
}

/// The two remote calls the game makes.
#[async_trait]
pub trait TermoApi: Send + Sync + 'static {
    /// Fetches the secret word of the day, lowercased.
    async fn fetch_word(&self) -> Result<String, ApiError>;

    /// Posts a result and returns the service acknowledgement.
    async fn submit_result(&self, record: &ResultRecord) -> Result<String, ApiError>;
}

/// `TermoApi` over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpTermoClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTermoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn parse_word(body: &str) -> Result<String, ApiError> {
    let response: WordResponse = serde_json::from_str(body)?;
    match response.palavra {
        Some(word) if !word.trim().is_empty() => Ok(word.trim().to_lowercase()),
        _ => Err(ApiError::MissingWord),
    }
}

// The body decides success; status codes are not interpreted.
fn parse_submit(body: &str) -> Result<String, ApiError> {
    let response: SubmitResponse = serde_json::from_str(body)?;
    match (response.mensagem, response.erro) {
        (Some(ack), _) if !ack.is_empty() => Ok(ack),
        (_, Some(message)) if !message.is_empty() => Err(ApiError::Service { message }),
        _ => Err(ApiError::Malformed {
            message: "response has neither mensagem nor erro".to_string(),
        }),
    }
}

#[async_trait]
impl TermoApi for HttpTermoClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_word(&self) -> Result<String, ApiError> {
        let response = self.client.get(self.url("palavra")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "word service responded");

        let word = parse_word(&body).inspect_err(|e| warn!(error = %e, "bad word response"))?;
        info!(length = word.chars().count(), "word of the day loaded");
        Ok(word)
    }

    #[instrument(skip(self, record), fields(base_url = %self.base_url, attempts = record.attempts, elapsed_secs = record.elapsed_secs))]
    async fn submit_result(&self, record: &ResultRecord) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("resultado"))
            .json(record)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, %body, "result service responded");

        let ack = parse_submit(&body).inspect_err(|e| warn!(error = %e, "result rejected"))?;
        info!("result saved");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn record_serializes_with_service_field_names() {
        let record = ResultRecord {
            name: "Ana".into(),
            attempts: 3,
            elapsed_secs: 42,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "nome": "Ana", "tentativas": 3, "tempo": 42 })
        );
    }

    #[test]
    fn word_is_trimmed_and_lowercased() {
        assert_eq!(parse_word(r#"{"palavra":" TERMO "}"#).unwrap(), "termo");
    }

    #[test]
    fn missing_or_empty_word_is_an_error() {
        assert_matches!(parse_word("{}"), Err(ApiError::MissingWord));
        assert_matches!(parse_word(r#"{"palavra":""}"#), Err(ApiError::MissingWord));
        assert_matches!(parse_word("not json"), Err(ApiError::Malformed { .. }));
    }

    #[test]
    fn submit_response_shapes() {
        assert_eq!(parse_submit(r#"{"mensagem":"ok"}"#).unwrap(), "ok");
        assert_matches!(
            parse_submit(r#"{"erro":"nome duplicado"}"#),
            Err(ApiError::Service { message }) if message == "nome duplicado"
        );
        assert_matches!(parse_submit("{}"), Err(ApiError::Malformed { .. }));
        assert_matches!(parse_submit(r#"{"mensagem":""}"#), Err(ApiError::Malformed { .. }));
    }

    #[test]
    fn trailing_slash_in_base_url_is_dropped() {
        let client = HttpTermoClient::new("http://localhost:5003/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5003");
        assert_eq!(client.url("palavra"), "http://localhost:5003/palavra");
    }
}
