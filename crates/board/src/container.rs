//! Optimistic board view.
//!
//! [`ListContainer`] owns the ordered snapshot the user sees. A drop is
//! applied to the snapshot immediately and persisted afterwards, so the board
//! never waits on the store to redraw.

use std::sync::Arc;

use tracing::{debug, instrument, warn};
use tripboard_protocol::{
    BoardId, Card, DragEvent, List, ListId, Notice, Notifier, Reorder, ReorderCommands,
    ReorderStatus, apply_drag,
};

use crate::error::Result;
use crate::store::BoardStore;

/// The lists of one board, kept in display order.
pub struct ListContainer<S> {
    board_id: BoardId,
    ordered: Vec<List>,
    store: S,
    notifier: Arc<dyn Notifier>,
}

impl<S> std::fmt::Debug for ListContainer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListContainer")
            .field("board_id", &self.board_id)
            .field("lists", &self.ordered.len())
            .finish_non_exhaustive()
    }
}

impl<S: BoardStore> ListContainer<S> {
    /// Creates a container showing `data`.
    pub fn new(board_id: BoardId, data: Vec<List>, store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            board_id,
            ordered: data,
            store,
            notifier,
        }
    }

    /// Creates a container from the store's current lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot load the board.
    pub async fn load(board_id: BoardId, store: S, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let data = store.lists(&board_id).await?;
        Ok(Self::new(board_id, data, store, notifier))
    }

    /// Returns the board shown.
    #[must_use]
    pub fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    /// Returns the lists as currently displayed.
    #[must_use]
    pub fn lists(&self) -> &[List] {
        &self.ordered
    }

    /// Returns the store changes are sent to.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the snapshot with server-confirmed data.
    pub fn sync(&mut self, data: Vec<List>) {
        debug!(board = %self.board_id, lists = data.len(), "snapshot synced");
        self.ordered = data;
    }

    /// Reloads the snapshot from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot load the board. The snapshot is
    /// left as it was.
    pub async fn refresh(&mut self) -> Result<()> {
        let data = self.store.lists(&self.board_id).await?;
        self.sync(data);
        Ok(())
    }

    /// Applies a finished drag.
    ///
    /// The new order is shown before the store is called. The outcome of the
    /// store call is reported through the notifier; a failure does not roll
    /// back the snapshot.
    #[instrument(skip(self), fields(board = %self.board_id))]
    pub async fn handle_drag_end(&mut self, event: &DragEvent) -> ReorderStatus {
        let Reorder {
            lists,
            commands,
            status,
        } = apply_drag(&self.ordered, event);

        match status {
            ReorderStatus::Moved => self.ordered = lists,
            ReorderStatus::Unchanged => return status,
            ReorderStatus::StaleSnapshot => {
                warn!("drag does not match the displayed board");
                return status;
            }
        }

        let (result, success) = match &commands {
            ReorderCommands::None => return status,
            ReorderCommands::Lists(updates) => (
                self.store.update_list_order(&self.board_id, updates).await,
                "List reordered",
            ),
            ReorderCommands::Cards(updates) => (
                self.store.update_card_order(&self.board_id, updates).await,
                "Card reordered",
            ),
        };

        match result {
            Ok(()) => {
                debug!(updates = commands.len(), "reorder persisted");
                self.notifier.notify(Notice::success(success));
            }
            Err(err) => {
                warn!(error = %err, "reorder not persisted");
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
        status
    }

    /// Renames a displayed list.
    ///
    /// A title equal to the current one is not sent to the store. Returns the
    /// renamed list, or `None` if nothing changed.
    #[instrument(skip(self), fields(board = %self.board_id))]
    pub async fn rename_list(&mut self, list_id: &ListId, title: &str) -> Option<List> {
        let shown = self.ordered.iter().find(|list| &list.id == list_id);
        if shown.is_some_and(|list| list.title == title) {
            return None;
        }

        match self.store.update_list_title(&self.board_id, list_id, title).await {
            Ok(renamed) => {
                if let Some(list) = self.ordered.iter_mut().find(|list| &list.id == list_id) {
                    list.title.clone_from(&renamed.title);
                }
                self.notifier
                    .notify(Notice::success(format!("Itinerary \"{}\" updated", renamed.title)));
                Some(renamed)
            }
            Err(err) => {
                warn!(error = %err, "list not renamed");
                self.notifier.notify(Notice::error(err.to_string()));
                None
            }
        }
    }

    /// Adds a card to the end of a displayed list.
    #[instrument(skip(self), fields(board = %self.board_id))]
    pub async fn add_card(&mut self, list_id: &ListId, title: &str) -> Option<Card> {
        match self.store.create_card(&self.board_id, list_id, title).await {
            Ok(card) => {
                if let Some(list) = self.ordered.iter_mut().find(|list| &list.id == list_id) {
                    list.cards.push(card.clone());
                }
                self.notifier
                    .notify(Notice::success(format!("Attractions \"{}\" created", card.title)));
                Some(card)
            }
            Err(err) => {
                warn!(error = %err, "card not created");
                self.notifier.notify(Notice::error(err.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tripboard_protocol::dummy::dummy_board;
    use tripboard_protocol::{CardOrderUpdate, ListOrderUpdate, NoticeLevel, RecordingNotifier};

    use crate::error::StoreError;
    use crate::store::{MemoryStore, NewList};

    /// Rejects every write.
    struct Offline;

    #[async_trait]
    impl BoardStore for Offline {
        async fn lists(&self, board_id: &BoardId) -> Result<Vec<List>> {
            Err(StoreError::BoardNotFound(board_id.clone()))
        }

        async fn update_list_order(&self, _: &BoardId, _: &[ListOrderUpdate]) -> Result<()> {
            Err(StoreError::Backend("database unreachable".to_string()))
        }

        async fn update_card_order(&self, _: &BoardId, _: &[CardOrderUpdate]) -> Result<()> {
            Err(StoreError::Backend("database unreachable".to_string()))
        }

        async fn create_list(&self, _: &BoardId, _: NewList) -> Result<List> {
            Err(StoreError::Backend("database unreachable".to_string()))
        }

        async fn update_list_title(&self, _: &BoardId, _: &ListId, _: &str) -> Result<List> {
            Err(StoreError::Backend("database unreachable".to_string()))
        }

        async fn create_card(&self, _: &BoardId, _: &ListId, _: &str) -> Result<Card> {
            Err(StoreError::Backend("database unreachable".to_string()))
        }
    }

    fn container<S: BoardStore>(store: S) -> (ListContainer<S>, Arc<RecordingNotifier>) {
        let (board, lists) = dummy_board();
        let notifier = Arc::new(RecordingNotifier::default());
        let container = ListContainer::new(board.id, lists, store, notifier.clone());
        (container, notifier)
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let (board, lists) = dummy_board();
        Arc::new(MemoryStore::new().with_board(board.id, lists))
    }

    #[tokio::test]
    async fn list_drag_is_shown_and_persisted() {
        let store = seeded_store();
        let (mut container, notifier) = container(store.clone());

        let status = container.handle_drag_end(&DragEvent::list(0, 2)).await;

        assert_eq!(status, ReorderStatus::Moved);
        let shown: Vec<_> = container.lists().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(shown, ["day-2", "day-3", "day-1"]);
        assert_eq!(store.lists(container.board_id()).await.unwrap(), container.lists());
        assert_eq!(
            notifier.notices(),
            [Notice::success("List reordered")]
        );
    }

    #[tokio::test]
    async fn card_drag_is_persisted() {
        let store = seeded_store();
        let (mut container, notifier) = container(store.clone());

        container
            .handle_drag_end(&DragEvent::card("day-1", 0, "day-2", 1))
            .await;

        assert_eq!(store.lists(container.board_id()).await.unwrap(), container.lists());
        assert_eq!(notifier.notices()[0].title.as_deref(), Some("Card reordered"));
    }

    #[tokio::test]
    async fn store_failure_keeps_optimistic_order() {
        let (mut container, notifier) = container(Offline);

        let status = container.handle_drag_end(&DragEvent::list(2, 0)).await;

        assert_eq!(status, ReorderStatus::Moved);
        assert_eq!(container.lists()[0].id, "day-3");
        let errors = notifier.with_level(NoticeLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].description.as_deref(),
            Some("Failed to update: database unreachable")
        );
    }

    #[tokio::test]
    async fn cancelled_drag_does_nothing() {
        let (mut container, notifier) = container(Offline);
        let before = container.lists().to_vec();

        let status = container
            .handle_drag_end(&DragEvent::list(0, 1).without_destination())
            .await;

        assert_eq!(status, ReorderStatus::Unchanged);
        assert_eq!(container.lists(), before);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn stale_drag_sends_nothing() {
        let (mut container, notifier) = container(Offline);

        let status = container
            .handle_drag_end(&DragEvent::card("day-9", 0, "day-1", 0))
            .await;

        assert_eq!(status, ReorderStatus::StaleSnapshot);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn rename_is_shown_and_announced() {
        let store = seeded_store();
        let (mut container, notifier) = container(store.clone());

        let renamed = container.rename_list(&ListId::new("day-2"), "Nara").await;

        assert_eq!(renamed.map(|list| list.title).as_deref(), Some("Nara"));
        assert_eq!(container.lists()[1].title, "Nara");
        assert_eq!(store.lists(container.board_id()).await.unwrap(), container.lists());
        assert_eq!(
            notifier.notices(),
            [Notice::success("Itinerary \"Nara\" updated")]
        );
    }

    #[tokio::test]
    async fn unchanged_title_is_not_sent() {
        let (mut container, notifier) = container(Offline);
        let title = container.lists()[0].title.clone();

        let renamed = container.rename_list(&ListId::new("day-1"), &title).await;

        assert!(renamed.is_none());
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn failed_rename_keeps_title() {
        let (mut container, notifier) = container(Offline);
        let before = container.lists()[0].title.clone();

        assert!(container.rename_list(&ListId::new("day-1"), "Osaka").await.is_none());

        assert_eq!(container.lists()[0].title, before);
        assert_eq!(
            notifier.with_level(NoticeLevel::Error)[0].description.as_deref(),
            Some("Failed to update: database unreachable")
        );
    }

    #[tokio::test]
    async fn added_card_is_shown_last() {
        let store = seeded_store();
        let (mut container, notifier) = container(store.clone());

        let card = container
            .add_card(&ListId::new("day-3"), "Philosopher's Path")
            .await
            .unwrap();

        let day_3 = &container.lists()[2];
        assert_eq!(day_3.cards.last(), Some(&card));
        assert!(day_3.has_dense_order());
        assert_eq!(store.lists(container.board_id()).await.unwrap(), container.lists());
        assert_eq!(
            notifier.notices()[0].title.as_deref(),
            Some("Attractions \"Philosopher's Path\" created")
        );
    }

    #[tokio::test]
    async fn blank_card_is_an_error() {
        let store = seeded_store();
        let (mut container, notifier) = container(store);
        let before = container.lists().to_vec();

        assert!(container.add_card(&ListId::new("day-1"), " ").await.is_none());

        assert_eq!(container.lists(), before);
        assert_eq!(
            notifier.with_level(NoticeLevel::Error)[0].description.as_deref(),
            Some("Card title cannot be empty")
        );
    }

    #[tokio::test]
    async fn sync_replaces_snapshot() {
        let store = seeded_store();
        let (mut container, _) = container(store.clone());
        store
            .create_list(container.board_id(), NewList::new("Day 4"))
            .await
            .unwrap();

        container.refresh().await.unwrap();
        assert_eq!(container.lists().len(), 4);

        container.sync(Vec::new());
        assert!(container.lists().is_empty());
    }
}
