use crate::core::reorder::{plan_drop, UpdatePlan};
use crate::core::sequencer::{PersistenceSequencer, SequenceReport};
use crate::core::store::BoardStore;
use crate::domain::model::{Board, Card, CardId, DragPayload, DropTarget, ListId};
use crate::domain::ports::{BoardApi, Notification, Notifier};
use crate::utils::error::Result;
use tokio::sync::Mutex;
use tracing::Instrument;

pub const MOVE_SUCCESS_MESSAGE: &str = "Card successfully moved";
pub const MOVE_FAILURE_MESSAGE: &str = "Error! Failed to move card";

/// Completion signal for one drop.
#[derive(Debug)]
pub struct DropOutcome {
    pub execution_id: String,
    pub plan: UpdatePlan,
    pub report: SequenceReport,
}

impl DropOutcome {
    /// Dropped back onto its own slot; nothing was sent.
    pub fn is_noop(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn succeeded(&self) -> bool {
        self.report.succeeded()
    }
}

/// Entry point for the view layer: drag start, drop, and the board
/// snapshot it renders from.
///
/// The store lock is held for a drop's whole write-and-refetch sequence, so
/// drops on one session never interleave.
pub struct BoardSession<A: BoardApi, N: Notifier> {
    sequencer: PersistenceSequencer<A>,
    store: Mutex<BoardStore>,
    notifier: N,
    optimistic: bool,
}

impl<A: BoardApi, N: Notifier> BoardSession<A, N> {
    pub fn new(sequencer: PersistenceSequencer<A>, notifier: N) -> Self {
        Self {
            sequencer,
            store: Mutex::new(BoardStore::new()),
            notifier,
            optimistic: false,
        }
    }

    pub fn with_optimistic_updates(mut self, enabled: bool) -> Self {
        self.optimistic = enabled;
        self
    }

    pub fn sequencer(&self) -> &PersistenceSequencer<A> {
        &self.sequencer
    }

    pub async fn load(&self) -> Result<Board> {
        let board = self.sequencer.refresh().await?;
        tracing::info!("📥 Loaded board '{}' ({} lists)", board.title, board.lists.len());
        self.store.lock().await.replace(board.clone());
        Ok(board)
    }

    pub async fn snapshot(&self) -> Option<Board> {
        self.store.lock().await.snapshot().cloned()
    }

    /// Resolves a card and its list, e.g. for a deep link to the card.
    pub async fn find_card(&self, card_id: CardId) -> Result<(Card, ListId)> {
        let store = self.store.lock().await;
        let (card, list_id) = store.find_card(card_id)?;
        Ok((card.clone(), list_id))
    }

    pub async fn on_drag_start(&self, card_id: CardId) -> Result<DragPayload> {
        let store = self.store.lock().await;
        let payload = DragPayload::capture(store.board()?, card_id)?;
        tracing::debug!(
            "Drag started: card {} at {} in list {}",
            payload.card_id,
            payload.position,
            payload.source_list_id
        );
        Ok(payload)
    }

    /// Drag released outside any drop target.
    pub fn on_drag_cancel(&self, payload: DragPayload) {
        tracing::debug!("Drag of card {} abandoned", payload.card_id);
    }

    pub async fn on_drop(&self, payload: DragPayload, target: DropTarget) -> Result<DropOutcome> {
        let execution_id = format!("drop_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        let span = tracing::info_span!(
            "drop",
            execution_id = %execution_id,
            card_id = %payload.card_id,
            target_list = %target.list_id,
            target_position = target.position
        );

        self.execute_drop(execution_id, payload, target)
            .instrument(span)
            .await
    }

    async fn execute_drop(
        &self,
        execution_id: String,
        payload: DragPayload,
        target: DropTarget,
    ) -> Result<DropOutcome> {
        let mut store = self.store.lock().await;
        let destination = store.list(target.list_id)?.ordered_cards();
        let plan = plan_drop(&payload, &target, &destination);

        if plan.is_empty() {
            tracing::debug!("Card {} dropped on its own slot", payload.card_id);
            return Ok(DropOutcome {
                execution_id,
                plan,
                report: SequenceReport::default(),
            });
        }

        tracing::info!(
            "🎬 Persisting {} updates in {} steps",
            plan.total_updates(),
            plan.steps.len()
        );

        let mut pre_patch = None;
        if self.optimistic {
            let previous = store.board()?.clone();
            match store.apply_optimistic(&plan.all_updates()) {
                Ok(()) => pre_patch = Some(previous),
                Err(e) => tracing::warn!("⚠️ Optimistic update skipped: {}", e),
            }
        }

        let report = self.sequencer.execute(&plan).await;

        match (&report.board, pre_patch) {
            (Some(board), _) => store.replace(board.clone()),
            // The server rejected the move and nothing newer arrived.
            (None, Some(previous)) if !report.succeeded() => {
                tracing::warn!("⚠️ Reverting optimistic update for card {}", payload.card_id);
                store.replace(previous);
            }
            _ => {}
        }

        if report.succeeded() {
            if let Some(e) = &report.refetch_error {
                tracing::warn!("⚠️ Moves applied but board refresh failed: {}", e);
            }
            self.notifier
                .notify(Notification::Success(MOVE_SUCCESS_MESSAGE.to_string()));
        } else {
            self.notifier
                .notify(Notification::Error(MOVE_FAILURE_MESSAGE.to_string()));
        }

        Ok(DropOutcome {
            execution_id,
            plan,
            report,
        })
    }
}
