//! Drag-and-drop reordering of lists and cards.
//!
//! [`apply_drag`] takes an ordered snapshot of a board's lists and a
//! [`DragEvent`], and returns a [`Reorder`]: a fresh snapshot reflecting the
//! move plus the update commands the persistence layer needs to apply the
//! same move. The input snapshot is never modified.
//!
//! Every touched container is renumbered so that `order` always equals the
//! final position (`0..N-1`, no gaps, no reused values). List moves re-stamp
//! every list on the board; card moves re-stamp every card of the source and
//! destination lists and nothing else.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Card, CardId, List, ListId};

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    /// A whole list, moved within the board.
    List,
    /// A single card, moved within or across lists.
    Card,
}

/// One end of a drag: a container and a position within it.
///
/// For list drags the container is the board itself; for card drags it is
/// the ID of the list holding the card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    /// ID of the container (list ID for cards).
    pub container_id: String,
    /// Zero-based position within the container.
    pub index: usize,
}

impl DragLocation {
    /// Creates a new drag location.
    #[must_use]
    pub fn new(container_id: impl Into<String>, index: usize) -> Self {
        Self {
            container_id: container_id.into(),
            index,
        }
    }
}

/// A completed drag gesture.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::{DragEvent, DragKind};
///
/// let event = DragEvent::card("l1", 0, "l2", 1);
/// assert_eq!(event.kind, DragKind::Card);
/// assert!(!event.is_identity());
///
/// let dropped_outside = event.without_destination();
/// assert!(dropped_outside.destination.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    /// What was dragged.
    pub kind: DragKind,
    /// Where the drag started.
    pub source: DragLocation,
    /// Where the item was dropped, or `None` if the drag was cancelled.
    pub destination: Option<DragLocation>,
}

impl DragEvent {
    /// Container ID used for list drags.
    pub const LISTS_CONTAINER: &'static str = "lists";

    /// Creates a list drag from one board position to another.
    #[must_use]
    pub fn list(from: usize, to: usize) -> Self {
        Self {
            kind: DragKind::List,
            source: DragLocation::new(Self::LISTS_CONTAINER, from),
            destination: Some(DragLocation::new(Self::LISTS_CONTAINER, to)),
        }
    }

    /// Creates a card drag between two list positions.
    #[must_use]
    pub fn card(
        source_list: impl Into<String>,
        from: usize,
        destination_list: impl Into<String>,
        to: usize,
    ) -> Self {
        Self {
            kind: DragKind::Card,
            source: DragLocation::new(source_list, from),
            destination: Some(DragLocation::new(destination_list, to)),
        }
    }

    /// Returns the same event with the destination removed.
    #[must_use]
    pub fn without_destination(mut self) -> Self {
        self.destination = None;
        self
    }

    /// Returns `true` if the item was dropped where it started.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.destination.as_ref() == Some(&self.source)
    }
}

/// New position of a list, for the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOrderUpdate {
    /// The list to update.
    pub id: ListId,
    /// Its new position on the board.
    pub order: u32,
}

/// New position and owning list of a card, for the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOrderUpdate {
    /// The card to update.
    pub id: CardId,
    /// Its new position within its list.
    pub order: u32,
    /// The list it belongs to after the move.
    pub list_id: ListId,
}

/// The update commands produced by a drag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReorderCommands {
    /// Nothing to persist.
    #[default]
    None,
    /// Re-stamped list positions.
    Lists(Vec<ListOrderUpdate>),
    /// Re-stamped card positions.
    Cards(Vec<CardOrderUpdate>),
}

impl ReorderCommands {
    /// Returns the number of update commands.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Lists(updates) => updates.len(),
            Self::Cards(updates) => updates.len(),
        }
    }

    /// Returns `true` if there is nothing to persist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a drag was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderStatus {
    /// The item was moved.
    Moved,
    /// The drag was cancelled or dropped in place.
    Unchanged,
    /// The event refers to a container or position missing from the snapshot.
    StaleSnapshot,
}

/// The result of applying a drag to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reorder {
    /// The new snapshot.
    pub lists: Vec<List>,
    /// Commands for the persistence layer.
    pub commands: ReorderCommands,
    /// How the drag was resolved.
    pub status: ReorderStatus,
}

impl Reorder {
    fn unchanged(snapshot: &[List], status: ReorderStatus) -> Self {
        Self {
            lists: snapshot.to_vec(),
            commands: ReorderCommands::None,
            status,
        }
    }
}

/// Moves the item at `from` so that it ends up at `to`.
///
/// `to` is clamped to the end of the sequence. An out-of-range `from` leaves
/// the sequence unchanged.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::reorder;
///
/// assert_eq!(reorder(vec!['a', 'b', 'c'], 0, 2), vec!['b', 'c', 'a']);
/// assert_eq!(reorder(vec!['a', 'b', 'c'], 2, 0), vec!['c', 'a', 'b']);
/// assert_eq!(reorder(vec!['a', 'b'], 0, 9), vec!['b', 'a']);
/// ```
#[must_use]
pub fn reorder<T>(mut items: Vec<T>, from: usize, to: usize) -> Vec<T> {
    if from >= items.len() {
        return items;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    items
}

/// Applies a drag event to a snapshot of a board's lists.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::{Card, DragEvent, List, ReorderStatus, apply_drag};
///
/// let lists = vec![
///     List::new("l1", "b1", "Day 1", 0).with_cards(vec![
///         Card::new("c1", "l1", "Museum", 0),
///         Card::new("c2", "l1", "Market", 1),
///     ]),
///     List::new("l2", "b1", "Day 2", 1),
/// ];
///
/// let result = apply_drag(&lists, &DragEvent::card("l1", 1, "l2", 0));
/// assert_eq!(result.status, ReorderStatus::Moved);
/// assert_eq!(result.lists[1].cards[0].id, "c2");
/// assert_eq!(result.lists[1].cards[0].list_id, "l2");
/// assert_eq!(result.commands.len(), 2);
/// ```
#[must_use]
pub fn apply_drag(snapshot: &[List], event: &DragEvent) -> Reorder {
    let Some(destination) = &event.destination else {
        return Reorder::unchanged(snapshot, ReorderStatus::Unchanged);
    };

    if event.is_identity() {
        return Reorder::unchanged(snapshot, ReorderStatus::Unchanged);
    }

    match event.kind {
        DragKind::List => move_list(snapshot, event.source.index, destination.index),
        DragKind::Card => move_card(snapshot, &event.source, destination),
    }
}

fn move_list(snapshot: &[List], from: usize, to: usize) -> Reorder {
    if from >= snapshot.len() {
        debug!(from, lists = snapshot.len(), "list drag source out of range");
        return Reorder::unchanged(snapshot, ReorderStatus::StaleSnapshot);
    }

    let mut lists = reorder(snapshot.to_vec(), from, to);
    for (idx, list) in lists.iter_mut().enumerate() {
        list.order = idx as u32;
    }

    let updates = lists
        .iter()
        .map(|list| ListOrderUpdate {
            id: list.id.clone(),
            order: list.order,
        })
        .collect();

    Reorder {
        lists,
        commands: ReorderCommands::Lists(updates),
        status: ReorderStatus::Moved,
    }
}

fn move_card(snapshot: &[List], source: &DragLocation, destination: &DragLocation) -> Reorder {
    let find = |container_id: &str| snapshot.iter().position(|list| list.id == container_id);

    let (Some(src), Some(dst)) = (find(&source.container_id), find(&destination.container_id))
    else {
        debug!(
            source = %source.container_id,
            destination = %destination.container_id,
            "card drag references an unknown list"
        );
        return Reorder::unchanged(snapshot, ReorderStatus::StaleSnapshot);
    };

    if source.index >= snapshot[src].cards.len() {
        debug!(
            list = %source.container_id,
            index = source.index,
            "card drag source out of range"
        );
        return Reorder::unchanged(snapshot, ReorderStatus::StaleSnapshot);
    }

    let mut lists = snapshot.to_vec();

    let updates = if src == dst {
        let list = &mut lists[src];
        let cards = std::mem::take(&mut list.cards);
        list.cards = reorder(cards, source.index, destination.index);
        renumber_cards(&mut list.cards);
        card_updates(list).collect()
    } else {
        let mut moved = lists[src].cards.remove(source.index);
        moved.list_id = lists[dst].id.clone();

        let target = &mut lists[dst].cards;
        let at = destination.index.min(target.len());
        target.insert(at, moved);

        renumber_cards(&mut lists[src].cards);
        renumber_cards(&mut lists[dst].cards);
        card_updates(&lists[src])
            .chain(card_updates(&lists[dst]))
            .collect()
    };

    Reorder {
        lists,
        commands: ReorderCommands::Cards(updates),
        status: ReorderStatus::Moved,
    }
}

/// Sets every card's `order` to its position.
pub fn renumber_cards(cards: &mut [Card]) {
    for (idx, card) in cards.iter_mut().enumerate() {
        card.order = idx as u32;
    }
}

fn card_updates(list: &List) -> impl Iterator<Item = CardOrderUpdate> + '_ {
    list.cards.iter().map(|card| CardOrderUpdate {
        id: card.id.clone(),
        order: card.order,
        list_id: list.id.clone(),
    })
}
