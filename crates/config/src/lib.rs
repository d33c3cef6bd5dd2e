//! Configuration management for the tripboard application.
//!
//! This crate handles loading, validating, and persisting configuration
//! from multiple sources (files, environment variables, defaults).
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`planner`]: Suggestion service settings and trip length limits
//! - [`persistence`]: Config file reading and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! Configuration is loaded from multiple sources with the following priority
//! (highest to lowest):
//!
//! 1. Environment variables (`TRIPBOARD_*`)
//! 2. Local config (`./tripboard.json5` or `./tripboard.json`)
//! 3. User config (`~/.config/tripboard/config.json5` or `~/.config/tripboard/config.json`)
//! 4. Built-in defaults
//!
//! # File Format
//!
//! ```json5
//! {
//!   planner: {
//!     endpoint: "https://trips.example.com/api/boards/plan",
//!     // Sent as a bearer token when present
//!     api_token: "secret",
//!     max_trip_days: 7,
//!   },
//!   log_filter: "tripboard=debug",
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use tripboard_config::Config;
//!
//! # fn example() -> tripboard_config::Result<()> {
//! let config = Config::load()?;
//! println!("Suggestions from {}", config.planner.endpoint);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod planner;

// Re-export primary types at crate root for convenience
pub use config::Config;
pub use error::{ConfigError, Result};
pub use planner::PlannerConfig;
