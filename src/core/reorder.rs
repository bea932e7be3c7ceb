//! Position reconciliation for drag-and-drop moves.
//!
//! Everything here is pure: callers hand in list snapshots and get back the
//! ordered update sets that restore contiguous `0..n` positions.

use crate::domain::model::{Card, CardId, DragPayload, DropTarget, ListId, Position, PositionUpdate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Reorder,
    DestinationInsert,
    SourceGapClose,
    DestinationGapOpen,
    /// Every step of a plan sent as one batch.
    Combined,
}

impl StepKind {
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Reorder => "reorder",
            StepKind::DestinationInsert => "destination-insert",
            StepKind::SourceGapClose => "source-gap-close",
            StepKind::DestinationGapOpen => "destination-gap-open",
            StepKind::Combined => "combined",
        }
    }
}

/// One batch write worth of updates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStep {
    pub kind: StepKind,
    pub updates: Vec<PositionUpdate>,
}

impl UpdateStep {
    pub fn new(kind: StepKind, updates: Vec<PositionUpdate>) -> Self {
        Self { kind, updates }
    }
}

/// Ordered, causally dependent steps for a single drop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdatePlan {
    pub steps: Vec<UpdateStep>,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(|step| step.updates.is_empty())
    }

    pub fn total_updates(&self) -> usize {
        self.steps.iter().map(|step| step.updates.len()).sum()
    }

    pub fn step(&self, kind: StepKind) -> Option<&UpdateStep> {
        self.steps.iter().find(|step| step.kind == kind)
    }

    /// All updates flattened in step order.
    pub fn all_updates(&self) -> Vec<PositionUpdate> {
        self.steps
            .iter()
            .flat_map(|step| step.updates.iter().copied())
            .collect()
    }
}

/// A list id with the cards it held when the snapshot was taken.
#[derive(Debug, Clone, Copy)]
pub struct ListSnapshot<'a> {
    pub id: ListId,
    pub cards: &'a [Card],
}

impl<'a> ListSnapshot<'a> {
    pub fn new(id: ListId, cards: &'a [Card]) -> Self {
        Self { id, cards }
    }
}

/// Same-list reorder. `new_position` is the slot index from the drop target,
/// so dropping at `old_position` or `old_position + 1` is the card's own slot
/// and yields no updates.
///
/// The moved card is always the first update.
pub fn reorder_within_list(
    card_id: CardId,
    old_position: Position,
    new_position: Position,
    list_id: ListId,
    list_cards: &[Card],
) -> Vec<PositionUpdate> {
    if new_position == old_position || new_position == old_position + 1 {
        return Vec::new();
    }

    let siblings = list_cards.iter().filter(|card| card.id != card_id);
    let mut updates = Vec::with_capacity(list_cards.len());

    if old_position < new_position {
        let final_position = new_position - 1;
        updates.push(PositionUpdate::new(card_id, final_position, list_id));
        updates.extend(
            siblings
                .filter(|card| card.position > old_position && card.position <= final_position)
                .map(|card| PositionUpdate::new(card.id, card.position - 1, list_id)),
        );
    } else {
        updates.push(PositionUpdate::new(card_id, new_position, list_id));
        updates.extend(
            siblings
                .filter(|card| card.position >= new_position && card.position < old_position)
                .map(|card| PositionUpdate::new(card.id, card.position + 1, list_id)),
        );
    }

    updates
}

/// Cross-list move as three dependent steps: insert into the destination,
/// close the gap in the source, open the gap in the destination.
///
/// The destination snapshot is taken before insertion; a stale copy that
/// already contains the moved card is tolerated by skipping it by id.
pub fn move_between_lists(
    card_id: CardId,
    old_position: Position,
    target_position: Position,
    source: ListSnapshot<'_>,
    destination: ListSnapshot<'_>,
) -> UpdatePlan {
    let insert = vec![PositionUpdate::new(card_id, target_position, destination.id)];

    let gap_close = source
        .cards
        .iter()
        .filter(|card| card.id != card_id && card.position > old_position)
        .map(|card| PositionUpdate::new(card.id, card.position - 1, source.id))
        .collect();

    let gap_open = destination
        .cards
        .iter()
        .filter(|card| card.id != card_id && card.position >= target_position)
        .map(|card| PositionUpdate::new(card.id, card.position + 1, destination.id))
        .collect();

    UpdatePlan {
        steps: vec![
            UpdateStep::new(StepKind::DestinationInsert, insert),
            UpdateStep::new(StepKind::SourceGapClose, gap_close),
            UpdateStep::new(StepKind::DestinationGapOpen, gap_open),
        ],
    }
}

/// Turns a finished drag into an update plan. `destination_cards` is the
/// current snapshot of the target list.
pub fn plan_drop(payload: &DragPayload, target: &DropTarget, destination_cards: &[Card]) -> UpdatePlan {
    if payload.source_list_id == target.list_id {
        let updates = reorder_within_list(
            payload.card_id,
            payload.position,
            target.position,
            target.list_id,
            destination_cards,
        );
        if updates.is_empty() {
            return UpdatePlan::default();
        }
        return UpdatePlan {
            steps: vec![UpdateStep::new(StepKind::Reorder, updates)],
        };
    }

    move_between_lists(
        payload.card_id,
        payload.position,
        target.position,
        ListSnapshot::new(payload.source_list_id, &payload.source_cards),
        ListSnapshot::new(target.list_id, destination_cards),
    )
}
