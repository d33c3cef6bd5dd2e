//! The persistence seam for boards.
//!
//! [`BoardStore`] is what the list container and the suggestion applier talk
//! to. [`MemoryStore`] keeps everything in memory and applies commands the
//! way a database-backed store would, which makes it suitable for the demo
//! and for checking that a confirmed snapshot matches the optimistic one.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use tripboard_protocol::{
    BoardId, Card, CardId, CardOrderUpdate, List, ListDraft, ListId, ListOrderUpdate,
};

use crate::error::{Result, StoreError};

/// A list to be appended to a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
    /// Title of the list.
    pub title: String,
    /// Titles of the cards to create, in order.
    #[serde(default)]
    pub card_titles: Vec<String>,
}

impl NewList {
    /// Creates a list with no cards.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            card_titles: Vec::new(),
        }
    }

    /// Adds cards to the list, returning it.
    #[must_use]
    pub fn with_cards<I, T>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.card_titles.extend(titles.into_iter().map(Into::into));
        self
    }
}

impl From<ListDraft> for NewList {
    fn from(draft: ListDraft) -> Self {
        Self {
            title: draft.title,
            card_titles: draft.card_titles,
        }
    }
}

/// Loads and persists board contents.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Returns the lists of a board ordered by position, each with its cards
    /// ordered by position.
    async fn lists(&self, board_id: &BoardId) -> Result<Vec<List>>;

    /// Sets the position of each list.
    ///
    /// Either every update is applied or none is.
    async fn update_list_order(&self, board_id: &BoardId, updates: &[ListOrderUpdate])
    -> Result<()>;

    /// Sets the position and owning list of each card.
    ///
    /// Either every update is applied or none is.
    async fn update_card_order(&self, board_id: &BoardId, updates: &[CardOrderUpdate])
    -> Result<()>;

    /// Appends a list to the end of a board, with one card per title.
    async fn create_list(&self, board_id: &BoardId, list: NewList) -> Result<List>;

    /// Renames a list, returning the updated list.
    async fn update_list_title(&self, board_id: &BoardId, list_id: &ListId, title: &str)
    -> Result<List>;

    /// Appends a card to the end of a list.
    async fn create_card(&self, board_id: &BoardId, list_id: &ListId, title: &str) -> Result<Card>;
}

#[async_trait]
impl<S: BoardStore + ?Sized> BoardStore for std::sync::Arc<S> {
    async fn lists(&self, board_id: &BoardId) -> Result<Vec<List>> {
        (**self).lists(board_id).await
    }

    async fn update_list_order(
        &self,
        board_id: &BoardId,
        updates: &[ListOrderUpdate],
    ) -> Result<()> {
        (**self).update_list_order(board_id, updates).await
    }

    async fn update_card_order(
        &self,
        board_id: &BoardId,
        updates: &[CardOrderUpdate],
    ) -> Result<()> {
        (**self).update_card_order(board_id, updates).await
    }

    async fn create_list(&self, board_id: &BoardId, list: NewList) -> Result<List> {
        (**self).create_list(board_id, list).await
    }

    async fn update_list_title(
        &self,
        board_id: &BoardId,
        list_id: &ListId,
        title: &str,
    ) -> Result<List> {
        (**self).update_list_title(board_id, list_id, title).await
    }

    async fn create_card(&self, board_id: &BoardId, list_id: &ListId, title: &str) -> Result<Card> {
        (**self).create_card(board_id, list_id, title).await
    }
}

/// In-memory [`BoardStore`].
///
/// # Examples
///
/// ```
/// use tripboard_board::{BoardStore, MemoryStore, NewList};
/// use tripboard_protocol::BoardId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let board = BoardId::new("b1");
/// let store = MemoryStore::default().with_board(board.clone(), Vec::new());
///
/// store.create_list(&board, NewList::new("Day 1").with_cards(["Museum"])).await.unwrap();
///
/// let lists = store.lists(&board).await.unwrap();
/// assert_eq!(lists[0].cards[0].title, "Museum");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    boards: RwLock<HashMap<BoardId, Vec<List>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a board with the given lists, returning the store.
    #[must_use]
    pub fn with_board(mut self, board_id: BoardId, lists: Vec<List>) -> Self {
        self.boards.get_mut().insert(board_id, lists);
        self
    }

}

fn board_mut<'a>(
    boards: &'a mut HashMap<BoardId, Vec<List>>,
    board_id: &BoardId,
) -> Result<&'a mut Vec<List>> {
    boards
        .get_mut(board_id)
        .ok_or_else(|| StoreError::BoardNotFound(board_id.clone()))
}

fn list_mut<'a>(lists: &'a mut [List], list_id: &ListId) -> Result<&'a mut List> {
    lists
        .iter_mut()
        .find(|list| &list.id == list_id)
        .ok_or_else(|| StoreError::ListNotFound(list_id.clone()))
}

fn sort_by_position(lists: &mut [List]) {
    lists.sort_by_key(|list| list.order);
    for list in lists.iter_mut() {
        list.cards.sort_by_key(|card| card.order);
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn lists(&self, board_id: &BoardId) -> Result<Vec<List>> {
        let boards = self.boards.read().await;
        let mut lists = boards
            .get(board_id)
            .cloned()
            .ok_or_else(|| StoreError::BoardNotFound(board_id.clone()))?;
        sort_by_position(&mut lists);
        Ok(lists)
    }

    #[instrument(skip(self, updates), fields(board = %board_id, updates = updates.len()))]
    async fn update_list_order(
        &self,
        board_id: &BoardId,
        updates: &[ListOrderUpdate],
    ) -> Result<()> {
        let mut boards = self.boards.write().await;
        let lists = board_mut(&mut boards, board_id)?;

        let positions = updates
            .iter()
            .map(|update| {
                lists
                    .iter()
                    .position(|list| list.id == update.id)
                    .ok_or_else(|| StoreError::ListNotFound(update.id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        for (idx, update) in positions.into_iter().zip(updates) {
            lists[idx].order = update.order;
        }
        debug!("list order updated");
        Ok(())
    }

    #[instrument(skip(self, updates), fields(board = %board_id, updates = updates.len()))]
    async fn update_card_order(
        &self,
        board_id: &BoardId,
        updates: &[CardOrderUpdate],
    ) -> Result<()> {
        let mut boards = self.boards.write().await;
        let lists = board_mut(&mut boards, board_id)?;

        for update in updates {
            if !lists.iter().any(|list| list.id == update.list_id) {
                return Err(StoreError::ListNotFound(update.list_id.clone()));
            }
            if !lists.iter().any(|list| list.get_card(&update.id).is_some()) {
                return Err(StoreError::CardNotFound(update.id.clone()));
            }
        }

        let mut moved: HashMap<CardId, Card> = HashMap::new();
        for list in lists.iter_mut() {
            let (taken, kept): (Vec<Card>, Vec<Card>) = std::mem::take(&mut list.cards)
                .into_iter()
                .partition(|card| updates.iter().any(|update| update.id == card.id));
            list.cards = kept;
            moved.extend(taken.into_iter().map(|card| (card.id.clone(), card)));
        }

        for update in updates {
            let Some(mut card) = moved.remove(&update.id) else {
                continue;
            };
            card.order = update.order;
            card.list_id = update.list_id.clone();
            if let Some(list) = lists.iter_mut().find(|list| list.id == update.list_id) {
                list.cards.push(card);
            }
        }

        sort_by_position(lists);
        debug!("card order updated");
        Ok(())
    }

    #[instrument(skip(self, list), fields(board = %board_id, title = %list.title))]
    async fn create_list(&self, board_id: &BoardId, list: NewList) -> Result<List> {
        let title = list.title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let mut boards = self.boards.write().await;
        let lists = board_mut(&mut boards, board_id)?;

        let order = lists
            .iter()
            .map(|existing| existing.order + 1)
            .max()
            .unwrap_or_default();
        let id = ListId::new_random();
        let cards = list
            .card_titles
            .into_iter()
            .enumerate()
            .map(|(idx, title)| Card::new(CardId::new_random(), id.clone(), title, idx as u32))
            .collect();

        let created = List::new(id, board_id.clone(), title, order).with_cards(cards);
        lists.push(created.clone());
        debug!(list = %created.id, cards = created.len(), "list created");
        Ok(created)
    }

    #[instrument(skip(self), fields(board = %board_id, list = %list_id))]
    async fn update_list_title(
        &self,
        board_id: &BoardId,
        list_id: &ListId,
        title: &str,
    ) -> Result<List> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let mut boards = self.boards.write().await;
        let list = list_mut(board_mut(&mut boards, board_id)?, list_id)?;
        list.title = title.to_string();
        debug!("list renamed");

        let mut renamed = list.clone();
        renamed.cards.sort_by_key(|card| card.order);
        Ok(renamed)
    }

    #[instrument(skip(self), fields(board = %board_id, list = %list_id))]
    async fn create_card(&self, board_id: &BoardId, list_id: &ListId, title: &str) -> Result<Card> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyCardTitle);
        }

        let mut boards = self.boards.write().await;
        let list = list_mut(board_mut(&mut boards, board_id)?, list_id)?;
        let card = Card::new(
            CardId::new_random(),
            list_id.clone(),
            title,
            list.cards.len() as u32,
        );
        list.cards.push(card.clone());
        debug!(card = %card.id, order = card.order, "card created");
        Ok(card)
    }
}
