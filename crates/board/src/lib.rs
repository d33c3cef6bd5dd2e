//! Board state for tripboard.
//!
//! This crate connects the pure reorder engine in `tripboard-protocol` to a
//! persistence backend:
//!
//! - [`ListContainer`]: The displayed lists of one board, updated
//!   optimistically on every drop, renamed and extended with new cards
//! - [`BoardStore`]: Loads lists and persists order changes, titles, new
//!   lists and new cards
//! - [`MemoryStore`]: An in-memory store
//! - [`apply_suggestions`]: Creates lists from a suggested itinerary
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tripboard_board::{ListContainer, MemoryStore};
//! use tripboard_protocol::{DragEvent, ReorderStatus, TracingNotifier, dummy::dummy_board};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let (board, lists) = dummy_board();
//! let store = MemoryStore::new().with_board(board.id.clone(), lists.clone());
//! let mut container = ListContainer::new(board.id, lists, store, Arc::new(TracingNotifier));
//!
//! let status = container.handle_drag_end(&DragEvent::list(0, 1)).await;
//! assert_eq!(status, ReorderStatus::Moved);
//! assert_eq!(container.lists()[0].id, "day-2");
//! # });
//! ```

pub mod container;
pub mod error;
pub mod store;
pub mod suggestions;

pub use container::ListContainer;
pub use error::{Result, StoreError};
pub use store::{BoardStore, MemoryStore, NewList};
pub use suggestions::apply_suggestions;
