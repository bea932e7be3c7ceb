use crate::domain::model::{Board, Card, CardId, List, ListId, PositionUpdate};
use crate::utils::error::{BoardError, Result};

/// Last board snapshot fetched from the server. It is only ever replaced
/// wholesale, or patched optimistically until the next refetch lands.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    board: Option<Board>,
    revision: u64,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn board(&self) -> Result<&Board> {
        self.board.as_ref().ok_or(BoardError::BoardNotLoaded)
    }

    /// Number of snapshots installed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, board: Board) {
        self.board = Some(board);
        self.revision += 1;
    }

    pub fn list(&self, list_id: ListId) -> Result<&List> {
        self.board()?.list(list_id).ok_or(BoardError::ListNotFound {
            list_id: list_id.0,
        })
    }

    pub fn find_card(&self, card_id: CardId) -> Result<(&Card, ListId)> {
        self.board()?.find_card(card_id).ok_or(BoardError::CardNotFound {
            card_id: card_id.0,
        })
    }

    /// Patches the local copy ahead of the refetch. A failed patch leaves the
    /// snapshot untouched.
    pub fn apply_optimistic(&mut self, updates: &[PositionUpdate]) -> Result<()> {
        let mut patched = self.board()?.clone();
        patched.apply_updates(updates)?;
        self.board = Some(patched);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BoardId;

    fn board() -> Board {
        Board {
            id: BoardId(1),
            title: "b".to_string(),
            users: vec![],
            lists: vec![List::new(
                5,
                "Todo",
                vec![Card::new(1, "A", 0), Card::new(2, "B", 1)],
            )],
        }
    }

    #[test]
    fn test_empty_store_reports_not_loaded() {
        let store = BoardStore::new();
        assert!(store.snapshot().is_none());
        assert!(matches!(store.board(), Err(BoardError::BoardNotLoaded)));
        assert!(matches!(
            store.find_card(CardId(1)),
            Err(BoardError::BoardNotLoaded)
        ));
    }

    #[test]
    fn test_replace_bumps_revision() {
        let mut store = BoardStore::new();
        store.replace(board());
        store.replace(board());
        assert_eq!(store.revision(), 2);
        assert_eq!(store.list(ListId(5)).unwrap().len(), 2);
        assert!(matches!(
            store.list(ListId(6)),
            Err(BoardError::ListNotFound { list_id: 6 })
        ));
    }

    #[test]
    fn test_failed_optimistic_patch_keeps_snapshot() {
        let mut store = BoardStore::new();
        store.replace(board());

        let result = store.apply_optimistic(&[
            PositionUpdate::new(CardId(1), 1, ListId(5)),
            PositionUpdate::new(CardId(99), 0, ListId(5)),
        ]);

        assert!(result.is_err());
        let (card, _) = store.find_card(CardId(1)).unwrap();
        assert_eq!(card.position, 0);
    }
}
