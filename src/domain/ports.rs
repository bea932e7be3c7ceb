use crate::domain::model::{Board, BoardId, ListId, PositionUpdate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Remote board persistence. Each call is one network round trip.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// `PUT /board/{board_id}/card/` with the updates as the body.
    async fn update_card_positions(&self, board_id: BoardId, updates: &[PositionUpdate]) -> Result<()>;

    /// `GET /board/{board_id}`.
    async fn fetch_board(&self, board_id: BoardId) -> Result<Board>;
}

/// Renders the insertion marker while a card is dragged over a list.
pub trait SlotIndicator {
    fn show_indicator(&mut self, list_id: ListId, index: usize);
    fn clear_indicator(&mut self, list_id: ListId);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Transient user-facing messages (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn board_id(&self) -> Option<u64>;
    fn auth_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
}
