use crate::domain::model::{Board, BoardId, PositionUpdate};
use crate::domain::ports::{BoardApi, ConfigProvider};
use crate::utils::error::{BoardError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Counts requests in flight; drives the progress indicator.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    in_flight: Arc<AtomicUsize>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request as started until the returned guard is dropped.
    pub fn start(&self) -> RequestGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        RequestGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }
}

pub struct RequestGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// [`BoardApi`] over the board REST service.
#[derive(Debug, Clone)]
pub struct RestBoardApi {
    client: Client,
    base_url: String,
    tracker: RequestTracker,
}

impl RestBoardApi {
    pub fn new(base_url: &str, auth_token: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                BoardError::InvalidConfigValueError {
                    field: "api.auth_token".to_string(),
                    value: "<redacted>".to_string(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            tracker: RequestTracker::new(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            config.auth_token(),
            config.timeout_seconds().map(Duration::from_secs),
        )
    }

    pub fn tracker(&self) -> RequestTracker {
        self.tracker.clone()
    }

    pub fn board_url(&self, board_id: BoardId) -> String {
        format!("{}/board/{}", self.base_url, board_id)
    }

    pub fn cards_url(&self, board_id: BoardId) -> String {
        format!("{}/board/{}/card/", self.base_url, board_id)
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(BoardError::HttpStatusError {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}

#[async_trait]
impl BoardApi for RestBoardApi {
    async fn update_card_positions(&self, board_id: BoardId, updates: &[PositionUpdate]) -> Result<()> {
        let url = self.cards_url(board_id);
        let _guard = self.tracker.start();

        tracing::debug!("PUT {} ({} updates)", url, updates.len());
        let response = self.client.put(&url).json(updates).send().await?;
        tracing::debug!("API response status: {}", response.status());

        Self::check_status(response)?;
        Ok(())
    }

    async fn fetch_board(&self, board_id: BoardId) -> Result<Board> {
        let url = self.board_url(board_id);
        let _guard = self.tracker.start();

        tracing::debug!("GET {}", url);
        let response = Self::check_status(self.client.get(&url).send().await?)?;
        let board: Board = response.json().await?;

        tracing::debug!("📥 Board {} fetched with {} lists", board.id, board.lists.len());
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let api = RestBoardApi::new("http://localhost:8000/api/", None, None).unwrap();
        assert_eq!(api.board_url(BoardId(7)), "http://localhost:8000/api/board/7");
        assert_eq!(api.cards_url(BoardId(7)), "http://localhost:8000/api/board/7/card/");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            RestBoardApi::new("not a url", None, None),
            Err(BoardError::UrlError(_))
        ));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let err = RestBoardApi::new("http://localhost", Some("bad\ntoken"), None).unwrap_err();
        assert!(matches!(err, BoardError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_tracker_counts_guards() {
        let tracker = RequestTracker::new();
        assert!(!tracker.is_busy());

        let first = tracker.start();
        let second = tracker.clone().start();
        assert_eq!(tracker.in_flight(), 2);

        drop(first);
        assert_eq!(tracker.in_flight(), 1);
        drop(second);
        assert!(!tracker.is_busy());
    }
}
