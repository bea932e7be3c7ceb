use crate::utils::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering value of a card inside its list. Contiguous `0..n` per list.
pub type Position = u32;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(BoardId);
id_type!(ListId);
id_type!(CardId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub position: Position,
    #[serde(default)]
    pub description: Option<String>,
}

impl Card {
    pub fn new(id: u64, title: impl Into<String>, position: Position) -> Self {
        Self {
            id: CardId(id),
            title: title.into(),
            position,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl List {
    pub fn new(id: u64, title: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            id: ListId(id),
            title: title.into(),
            position: 0,
            cards,
        }
    }

    /// Cards sorted by position; the server does not promise an order.
    pub fn ordered_cards(&self) -> Vec<Card> {
        let mut cards = self.cards.clone();
        cards.sort_by_key(|card| card.position);
        cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// True when positions are exactly `0..len` with no gaps or duplicates.
    pub fn is_contiguous(&self) -> bool {
        let mut positions: Vec<Position> = self.cards.iter().map(|c| c.position).collect();
        positions.sort_unstable();
        positions
            .iter()
            .enumerate()
            .all(|(index, position)| *position as usize == index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardUser {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub users: Vec<BoardUser>,
    #[serde(default)]
    pub lists: Vec<List>,
}

impl Board {
    pub fn list(&self, list_id: ListId) -> Option<&List> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    /// Finds a card together with the id of the list that owns it.
    pub fn find_card(&self, card_id: CardId) -> Option<(&Card, ListId)> {
        self.lists.iter().find_map(|list| {
            list.cards
                .iter()
                .find(|card| card.id == card_id)
                .map(|card| (card, list.id))
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.lists.iter().all(List::is_contiguous)
    }

    /// Applies position updates to this local copy, moving cards between
    /// lists where `list_id` changes. Lists stay sorted by position.
    pub fn apply_updates(&mut self, updates: &[PositionUpdate]) -> Result<()> {
        for update in updates {
            if self.list(update.list_id).is_none() {
                return Err(BoardError::ListNotFound {
                    list_id: update.list_id.0,
                });
            }

            let mut card = None;
            for list in &mut self.lists {
                if let Some(index) = list.cards.iter().position(|c| c.id == update.id) {
                    card = Some(list.cards.remove(index));
                    break;
                }
            }
            let mut card = card.ok_or(BoardError::CardNotFound {
                card_id: update.id.0,
            })?;
            card.position = update.position;

            if let Some(list) = self.lists.iter_mut().find(|l| l.id == update.list_id) {
                list.cards.push(card);
            }
        }

        for list in &mut self.lists {
            list.cards.sort_by_key(|card| card.position);
        }
        Ok(())
    }
}

/// One element of a batch position write: `{id, position, list_id}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: CardId,
    pub position: Position,
    pub list_id: ListId,
}

impl PositionUpdate {
    pub fn new(id: CardId, position: Position, list_id: ListId) -> Self {
        Self {
            id,
            position,
            list_id,
        }
    }
}

/// Snapshot taken when a drag starts. The source list is copied because its
/// siblings must be re-indexed even though the board is refetched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub card_id: CardId,
    pub position: Position,
    pub source_list_id: ListId,
    pub source_cards: Vec<Card>,
}

impl DragPayload {
    pub fn capture(board: &Board, card_id: CardId) -> Result<Self> {
        let (card, list_id) = board.find_card(card_id).ok_or(BoardError::CardNotFound {
            card_id: card_id.0,
        })?;
        let source = board.list(list_id).ok_or(BoardError::ListNotFound {
            list_id: list_id.0,
        })?;

        Ok(Self {
            card_id,
            position: card.position,
            source_list_id: list_id,
            source_cards: source.ordered_cards(),
        })
    }
}

/// Insertion point under the pointer; `position` is in `[0, list_len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub list_id: ListId,
    pub position: Position,
}

impl DropTarget {
    pub fn new(list_id: ListId, position: Position) -> Self {
        Self { list_id, position }
    }
}
