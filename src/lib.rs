pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{RequestTracker, RestBoardApi, TracingNotifier};
pub use app::{BoardSession, DropOutcome};
pub use config::TomlConfig;
pub use core::drop_target::DropTargetResolver;
pub use core::reorder::{plan_drop, StepKind, UpdatePlan, UpdateStep};
pub use core::sequencer::{PersistenceMode, PersistenceSequencer, SequenceReport};
pub use domain::model::{Board, BoardId, Card, CardId, DragPayload, DropTarget, List, ListId, Position, PositionUpdate};
pub use utils::error::{BoardError, Result};
