//! Pointer-to-slot resolution while a card is being dragged.

use crate::domain::model::{Card, DropTarget, ListId, Position};
use crate::domain::ports::SlotIndicator;
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// The empty-list drop area counts as left slightly before its bottom edge.
pub const EMPTY_LIST_BOTTOM_INSET: f64 = 5.0;

/// Slot index for a pointer over a card: its own position in the upper
/// half, the next one in the lower half.
pub fn slot_for_card(pointer: Point, card_bounds: Rect, card_position: Position) -> Position {
    let is_above_half = pointer.y - card_bounds.y0 < card_bounds.height() / 2.0;
    if is_above_half {
        card_position
    } else {
        card_position + 1
    }
}

fn contains_inclusive(bounds: Rect, pointer: Point) -> bool {
    pointer.x >= bounds.x0 && pointer.x <= bounds.x1 && pointer.y >= bounds.y0 && pointer.y <= bounds.y1
}

/// Tracks the resolved slot per list and keeps at most one indicator shown
/// in each of them.
pub struct DropTargetResolver<I: SlotIndicator> {
    indicator: I,
    active: HashMap<ListId, DropTarget>,
}

impl<I: SlotIndicator> DropTargetResolver<I> {
    pub fn new(indicator: I) -> Self {
        Self {
            indicator,
            active: HashMap::new(),
        }
    }

    pub fn hover_card(
        &mut self,
        list_id: ListId,
        card: &Card,
        card_bounds: Rect,
        pointer: Point,
    ) -> DropTarget {
        let position = slot_for_card(pointer, card_bounds, card.position);
        self.show(DropTarget::new(list_id, position))
    }

    pub fn hover_empty_list(&mut self, list_id: ListId) -> DropTarget {
        self.show(DropTarget::new(list_id, 0))
    }

    fn show(&mut self, target: DropTarget) -> DropTarget {
        match self.active.get(&target.list_id) {
            Some(current) if *current == target => return target,
            Some(_) => self.indicator.clear_indicator(target.list_id),
            None => {}
        }

        tracing::trace!(list_id = %target.list_id, slot = target.position, "drop slot changed");
        self.indicator
            .show_indicator(target.list_id, target.position as usize);
        self.active.insert(target.list_id, target);
        target
    }

    /// Clears the list's indicator once the pointer is outside `list_bounds`.
    /// Returns whether the pointer left.
    pub fn leave_list(
        &mut self,
        list_id: ListId,
        list_bounds: Rect,
        pointer: Point,
        list_is_empty: bool,
    ) -> bool {
        let bounds = if list_is_empty {
            Rect::new(
                list_bounds.x0,
                list_bounds.y0,
                list_bounds.x1,
                (list_bounds.y1 - EMPTY_LIST_BOTTOM_INSET).max(list_bounds.y0),
            )
        } else {
            list_bounds
        };

        if contains_inclusive(bounds, pointer) {
            return false;
        }
        if self.active.remove(&list_id).is_some() {
            self.indicator.clear_indicator(list_id);
        }
        true
    }

    pub fn current(&self, list_id: ListId) -> Option<DropTarget> {
        self.active.get(&list_id).copied()
    }

    /// Final target for a drop on `list_id`; the indicator is removed.
    pub fn finish(&mut self, list_id: ListId) -> Option<DropTarget> {
        let target = self.active.remove(&list_id)?;
        self.indicator.clear_indicator(list_id);
        Some(target)
    }

    /// Drag abandoned: remove every indicator.
    pub fn cancel(&mut self) {
        for (list_id, _) in self.active.drain() {
            self.indicator.clear_indicator(list_id);
        }
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}
