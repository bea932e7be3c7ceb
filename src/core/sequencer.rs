use crate::core::reorder::{StepKind, UpdatePlan, UpdateStep};
use crate::domain::model::{Board, BoardId};
use crate::domain::ports::BoardApi;
use crate::utils::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How a plan's steps reach the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
    /// One write per step, each awaited before the next.
    #[default]
    Stepwise,
    /// The whole plan as a single batch write.
    Combined,
}

#[derive(Debug)]
pub enum StepStatus {
    Applied,
    /// Nothing to write for this step; no request was sent.
    Skipped,
    Failed(BoardError),
    /// An earlier step failed.
    NotAttempted,
}

#[derive(Debug)]
pub struct StepOutcome {
    pub kind: StepKind,
    pub update_count: usize,
    pub status: StepStatus,
    pub duration: Duration,
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, StepStatus::Failed(_))
    }
}

/// Per-step results of one sequence plus the reconciliation refetch.
#[derive(Debug, Default)]
pub struct SequenceReport {
    pub steps: Vec<StepOutcome>,
    pub board: Option<Board>,
    pub refetch_error: Option<BoardError>,
}

impl SequenceReport {
    /// All writes went through. The refetch is judged separately.
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|step| !step.is_failure())
    }

    pub fn failed_step(&self) -> Option<&StepOutcome> {
        self.steps.iter().find(|step| step.is_failure())
    }

    pub fn writes_issued(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.status, StepStatus::Applied | StepStatus::Failed(_)))
            .count()
    }

    pub fn refetched(&self) -> bool {
        self.board.is_some() || self.refetch_error.is_some()
    }
}

/// Applies update plans against a [`BoardApi`] one write at a time and
/// finishes every non-empty plan with a full board refetch. There is no
/// rollback and no retry: a failed step ends the sequence.
pub struct PersistenceSequencer<A: BoardApi> {
    api: A,
    board_id: BoardId,
    mode: PersistenceMode,
}

impl<A: BoardApi> PersistenceSequencer<A> {
    pub fn new(api: A, board_id: BoardId) -> Self {
        Self {
            api,
            board_id,
            mode: PersistenceMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: PersistenceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn refresh(&self) -> Result<Board> {
        self.api.fetch_board(self.board_id).await
    }

    pub async fn execute(&self, plan: &UpdatePlan) -> SequenceReport {
        if plan.is_empty() {
            tracing::debug!("Empty update plan, nothing to persist");
            return SequenceReport::default();
        }

        let steps = match self.mode {
            PersistenceMode::Stepwise => plan.steps.clone(),
            PersistenceMode::Combined => {
                vec![UpdateStep::new(StepKind::Combined, plan.all_updates())]
            }
        };

        let mut outcomes = Vec::with_capacity(steps.len());
        let mut stopped = false;

        for step in steps {
            let started = Instant::now();
            let update_count = step.updates.len();

            let status = if stopped {
                StepStatus::NotAttempted
            } else if step.updates.is_empty() {
                tracing::debug!("⏭️ Step {} has no updates, skipping", step.kind.label());
                StepStatus::Skipped
            } else {
                match self
                    .api
                    .update_card_positions(self.board_id, &step.updates)
                    .await
                {
                    Ok(()) => {
                        tracing::info!(
                            "✅ Step {} applied ({} updates)",
                            step.kind.label(),
                            update_count
                        );
                        StepStatus::Applied
                    }
                    Err(e) => {
                        tracing::error!("❌ Step {} failed: {}", step.kind.label(), e);
                        stopped = true;
                        StepStatus::Failed(e)
                    }
                }
            };

            outcomes.push(StepOutcome {
                kind: step.kind,
                update_count,
                status,
                duration: started.elapsed(),
            });
        }

        let (board, refetch_error) = match self.refresh().await {
            Ok(board) => {
                if !board.is_consistent() {
                    tracing::warn!("⚠️ Refetched board {} has non-contiguous card positions", self.board_id);
                }
                (Some(board), None)
            }
            Err(e) => {
                tracing::error!("❌ Reconciliation refetch failed: {}", e);
                (None, Some(e))
            }
        };

        SequenceReport {
            steps: outcomes,
            board,
            refetch_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reorder::{move_between_lists, ListSnapshot};
    use crate::domain::model::{Card, CardId, List, ListId, PositionUpdate};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Put(Vec<PositionUpdate>),
        Get,
    }

    #[derive(Clone, Default)]
    struct MockApi {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_put_number: Option<usize>,
    }

    impl MockApi {
        fn failing_on(put_number: usize) -> Self {
            Self {
                fail_put_number: Some(put_number),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BoardApi for MockApi {
        async fn update_card_positions(&self, _board_id: BoardId, updates: &[PositionUpdate]) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call::Put(updates.to_vec()));
            let put_number = calls.iter().filter(|c| matches!(c, Call::Put(_))).count();
            if Some(put_number) == self.fail_put_number {
                return Err(BoardError::HttpStatusError {
                    status: 500,
                    url: "mock".to_string(),
                });
            }
            Ok(())
        }

        async fn fetch_board(&self, board_id: BoardId) -> Result<Board> {
            self.calls.lock().unwrap().push(Call::Get);
            Ok(Board {
                id: board_id,
                title: "mock".to_string(),
                users: vec![],
                lists: vec![List::new(1, "l", vec![])],
            })
        }
    }

    fn three_step_plan() -> UpdatePlan {
        let source = vec![Card::new(1, "A", 0), Card::new(2, "B", 1)];
        let destination = vec![Card::new(10, "X", 0), Card::new(11, "Y", 1)];
        move_between_lists(
            CardId(1),
            0,
            1,
            ListSnapshot::new(ListId(1), &source),
            ListSnapshot::new(ListId(2), &destination),
        )
    }

    #[tokio::test]
    async fn test_steps_run_in_order_then_refetch() {
        let api = MockApi::default();
        let sequencer = PersistenceSequencer::new(api.clone(), BoardId(3));

        let report = sequencer.execute(&three_step_plan()).await;

        assert!(report.succeeded());
        assert_eq!(report.writes_issued(), 3);
        assert!(report.board.is_some());

        let calls = api.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[0],
            Call::Put(vec![PositionUpdate::new(CardId(1), 1, ListId(2))])
        );
        assert_eq!(
            calls[1],
            Call::Put(vec![PositionUpdate::new(CardId(2), 0, ListId(1))])
        );
        assert_eq!(
            calls[2],
            Call::Put(vec![PositionUpdate::new(CardId(11), 2, ListId(2))])
        );
        assert_eq!(calls[3], Call::Get);
    }

    #[tokio::test]
    async fn test_failure_stops_sequence_but_still_refetches() {
        let api = MockApi::failing_on(2);
        let sequencer = PersistenceSequencer::new(api.clone(), BoardId(3));

        let report = sequencer.execute(&three_step_plan()).await;

        assert!(!report.succeeded());
        assert_eq!(report.failed_step().unwrap().kind, StepKind::SourceGapClose);
        assert!(matches!(report.steps[0].status, StepStatus::Applied));
        assert!(matches!(report.steps[2].status, StepStatus::NotAttempted));
        assert!(report.refetched());

        let puts = api
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Put(_)))
            .count();
        assert_eq!(puts, 2);
        assert_eq!(api.calls().last(), Some(&Call::Get));
    }

    #[tokio::test]
    async fn test_empty_plan_issues_nothing() {
        let api = MockApi::default();
        let sequencer = PersistenceSequencer::new(api.clone(), BoardId(3));

        let report = sequencer.execute(&UpdatePlan::default()).await;

        assert!(report.steps.is_empty());
        assert!(!report.refetched());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_step_is_skipped() {
        let source = vec![Card::new(1, "A", 0)];
        let plan = move_between_lists(
            CardId(1),
            0,
            0,
            ListSnapshot::new(ListId(1), &source),
            ListSnapshot::new(ListId(2), &[]),
        );
        let api = MockApi::default();
        let sequencer = PersistenceSequencer::new(api.clone(), BoardId(3));

        let report = sequencer.execute(&plan).await;

        assert!(report.succeeded());
        assert_eq!(report.writes_issued(), 1);
        assert!(matches!(report.steps[1].status, StepStatus::Skipped));
        assert!(matches!(report.steps[2].status, StepStatus::Skipped));
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_combined_mode_sends_one_batch() {
        let api = MockApi::default();
        let sequencer =
            PersistenceSequencer::new(api.clone(), BoardId(3)).with_mode(PersistenceMode::Combined);

        let report = sequencer.execute(&three_step_plan()).await;

        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].kind, StepKind::Combined);
        assert_eq!(report.steps[0].update_count, 3);
        assert_eq!(api.calls().len(), 2);
    }
}
