//! HTTP oracle backed by the puzzle website.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::OracleConfig;

use super::page::parse_puzzle_page;
use super::types::{GuessReply, OracleError, PuzzleOracle, PuzzleState};

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    num: u32,
    answer: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    #[serde(default)]
    x: GuessReply,
}

/// Oracle talking to the live puzzle site.
///
/// `puzzle_state` must be called first: it records the puzzle number that
/// guesses are scored against.
pub struct HttpOracle {
    client: Client,
    config: OracleConfig,
    day: RwLock<Option<u32>>,
}

impl HttpOracle {
    /// Create a new HttpOracle with the given configuration.
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| OracleError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            day: RwLock::new(None),
        })
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn score_url(&self, day: u32) -> String {
        format!("{}/score?n={}", self.base_url(), day)
    }

    async fn check_status(response: Response) -> Result<Response, OracleError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(OracleError::ApiError(format!(
            "HTTP {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        )))
    }
}

fn map_request_error(e: reqwest::Error) -> OracleError {
    if e.is_timeout() {
        OracleError::Timeout
    } else if e.is_connect() {
        OracleError::ConnectionFailed(e.to_string())
    } else {
        OracleError::ApiError(e.to_string())
    }
}

#[async_trait]
impl PuzzleOracle for HttpOracle {
    fn name(&self) -> &str {
        "http"
    }

    async fn puzzle_state(&self) -> Result<PuzzleState, OracleError> {
        debug!(url = %self.config.url, "Fetching puzzle page");

        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(map_request_error)?;
        let html = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(map_request_error)?;

        let state = parse_puzzle_page(&html)?;
        *self.day.write().await = Some(state.day);

        debug!(
            day = state.day,
            title_words = state.title_lengths.len(),
            text_words = state.text_lengths.len(),
            "Puzzle page parsed"
        );
        Ok(state)
    }

    async fn submit_guess(&self, word: &str) -> Result<GuessReply, OracleError> {
        let day = self.day.read().await.ok_or(OracleError::NoPuzzle)?;

        let response = self
            .client
            .post(self.score_url(day))
            .json(&ScoreRequest {
                num: day,
                answer: [word],
            })
            .send()
            .await
            .map_err(map_request_error)?;

        let reply: ScoreResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(format!("Failed to parse score: {}", e)))?;

        debug!(word = word, revealed = reply.x.len(), "Guess scored");
        Ok(reply.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle(url: &str) -> HttpOracle {
        HttpOracle::new(OracleConfig {
            url: url.to_string(),
            guess_delay_ms: 0,
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_score_url_trims_slash() {
        assert_eq!(
            oracle("https://example.org/").score_url(812),
            "https://example.org/score?n=812"
        );
        assert_eq!(
            oracle("http://localhost:8000").score_url(3),
            "http://localhost:8000/score?n=3"
        );
    }

    #[test]
    fn test_score_request_body() {
        let body = serde_json::to_value(ScoreRequest {
            num: 812,
            answer: ["prince"],
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"num": 812, "answer": ["prince"]}));
    }

    #[test]
    fn test_score_response_parsing() {
        let json = r##"{"x": {"prince": [2], "#princesse": [2]}, "v": 1}"##;
        let parsed: ScoreResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.x.get("prince"), Some(&vec![2]));
        assert_eq!(parsed.x.len(), 2);

        let empty: ScoreResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.x.is_empty());
    }

    #[tokio::test]
    async fn test_guess_without_puzzle_fails() {
        let err = oracle("http://127.0.0.1:9").submit_guess("word").await.unwrap_err();
        assert!(matches!(err, OracleError::NoPuzzle));
    }
}
