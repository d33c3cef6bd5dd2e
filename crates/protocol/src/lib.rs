//! Shared protocol types for the tripboard application.
//!
//! This crate defines the core types used across all tripboard components,
//! including boards, lists, cards, the drag-and-drop reorder engine,
//! itineraries, and error types.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`board`]: Identifiers and the `Board`, `List`, and `Card` structs
//! - [`reorder`]: Drag events and the reorder engine
//! - [`itinerary`]: Suggested itineraries and their validation
//! - [`trip`]: Trip windows and trip length calculation
//! - [`notice`]: User-facing notifications
//! - [`error`]: Error types for protocol operations
//!
//! # Examples
//!
//! Moving a list on a board:
//!
//! ```
//! use tripboard_protocol::{DragEvent, List, ReorderCommands, apply_drag};
//!
//! let lists = vec![
//!     List::new("L1", "b1", "Day 1", 0),
//!     List::new("L2", "b1", "Day 2", 1),
//! ];
//!
//! let result = apply_drag(&lists, &DragEvent::list(0, 1));
//! assert_eq!(result.lists[0].id.as_str(), "L2");
//! assert!(matches!(result.commands, ReorderCommands::Lists(ref updates) if updates.len() == 2));
//! ```

pub mod board;
pub mod dummy;
pub mod error;
pub mod itinerary;
pub mod notice;
pub mod reorder;
pub mod trip;

// Re-export primary types at crate root for convenience
pub use board::{Board, BoardId, Card, CardId, List, ListId};
pub use error::{ProtocolError, Result};
pub use itinerary::{Itinerary, ListDraft};
pub use notice::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use reorder::{
    CardOrderUpdate, DragEvent, DragKind, DragLocation, ListOrderUpdate, Reorder,
    ReorderCommands, ReorderStatus, apply_drag, reorder,
};
pub use trip::{TripDraft, TripLimits, TripWindow, trip_days};
