pub mod drop_target;
pub mod reorder;
pub mod sequencer;
pub mod store;

pub use crate::domain::model::{Board, Card, CardId, DragPayload, DropTarget, ListId, PositionUpdate};
pub use crate::domain::ports::{BoardApi, ConfigProvider, Notifier, SlotIndicator};
pub use crate::utils::error::Result;
