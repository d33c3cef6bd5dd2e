//! Itinerary suggestions for tripboard.
//!
//! This crate requests a day-by-day itinerary for a trip from a
//! text-generation service and follows the response as it streams in.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - [`SuggestionConsumer`]: Runs one suggestion at a time, with cancellation
//! - [`SuggestionService`]: The transport seam, returning a [`ChunkStream`]
//! - [`HttpSuggestionService`]: The HTTP transport, with optional bearer token
//! - [`Utf8StreamDecoder`]: Decodes chunks whose boundaries split characters
//! - [`SuggestionError`]: Why a suggestion failed
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use reqwest::Url;
//! use tripboard_planner::{HttpSuggestionService, SuggestionConsumer, SuggestionOutcome};
//! use tripboard_protocol::{TracingNotifier, TripDraft, TripLimits};
//!
//! # async fn example(draft: TripDraft) -> Result<(), Box<dyn std::error::Error>> {
//! let service = HttpSuggestionService::new(Url::parse("http://localhost:3000/api/boards/plan")?, None)?;
//! let consumer = SuggestionConsumer::new(service, TripLimits::default(), Arc::new(TracingNotifier));
//!
//! match consumer.start(&draft, |partial| eprint!("\r{} bytes", partial.len())).await {
//!     SuggestionOutcome::Completed(itinerary) => println!("{} sections", itinerary.len()),
//!     SuggestionOutcome::Cancelled { .. } => println!("stopped"),
//!     SuggestionOutcome::Failed(err) => eprintln!("{err}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod consumer;
pub mod decoder;
pub mod error;
pub mod request;
pub mod service;

pub use client::HttpSuggestionService;
pub use consumer::{ConsumerState, SuggestionConsumer, SuggestionOutcome};
pub use decoder::Utf8StreamDecoder;
pub use error::{Result, SuggestionError};
pub use request::SuggestionRequest;
pub use service::{ChunkStream, SuggestionService};
