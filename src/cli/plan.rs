//! CLI handler for the `plan` subcommand
//!
//! Streams a suggested itinerary to stdout as it arrives. Ctrl-C stops the
//! stream and keeps what was received.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};
use tripboard_board::{BoardStore, MemoryStore, apply_suggestions};
use tripboard_config::Config;
use tripboard_planner::{HttpSuggestionService, SuggestionConsumer, SuggestionOutcome};
use tripboard_protocol::{Itinerary, TracingNotifier, TripDraft, dummy::dummy_board};

use crate::cli::{PlanArgs, render};

pub async fn execute(args: PlanArgs, config: &Config) -> anyhow::Result<()> {
    let service = HttpSuggestionService::new(config.planner.endpoint_url()?, config.planner_token())?;
    debug!(
        endpoint = %service.endpoint(),
        authenticated = service.is_authenticated(),
        "suggestion service ready"
    );
    let consumer = Arc::new(SuggestionConsumer::new(
        service,
        config.trip_limits(),
        Arc::new(TracingNotifier),
    ));

    let stopper = tokio::spawn({
        let consumer = consumer.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() && consumer.stop() {
                debug!("stop requested from terminal");
            }
        }
    });

    let draft = TripDraft {
        location: args.location.clone(),
        start_date: args.start,
        end_date: args.end,
    };

    let mut echo = Echo::new(io::stdout());
    let outcome = consumer
        .start(&draft, |partial| {
            if !echo.show(partial) && consumer.stop() {
                warn!("stdout closed, stopping suggestion");
            }
        })
        .await;
    stopper.abort();
    if let Some(err) = echo.error {
        return Err(err).context("writing suggestion to stdout");
    }
    println!();

    match outcome {
        SuggestionOutcome::Completed(itinerary) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&itinerary)?);
            } else {
                print!("{}", render::itinerary(&itinerary));
            }
            if args.apply {
                apply_to_sample(&itinerary).await?;
            }
            Ok(())
        }
        SuggestionOutcome::Cancelled { partial } => {
            info!(received = partial.len(), "suggestion stopped");
            eprintln!("Stopped after {} characters.", partial.chars().count());
            Ok(())
        }
        SuggestionOutcome::Failed(err) => Err(err.into()),
    }
}

/// Writes the new part of each partial suggestion to `out`.
struct Echo<W> {
    out: W,
    shown: usize,
    error: Option<io::Error>,
}

impl<W: Write> Echo<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            shown: 0,
            error: None,
        }
    }

    /// Returns `false` once a write has failed.
    fn show(&mut self, partial: &str) -> bool {
        if self.error.is_some() {
            return false;
        }
        let written = self
            .out
            .write_all(partial[self.shown..].as_bytes())
            .and_then(|()| self.out.flush());
        match written {
            Ok(()) => {
                self.shown = partial.len();
                true
            }
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }
}

async fn apply_to_sample(itinerary: &Itinerary) -> anyhow::Result<()> {
    let (board, lists) = dummy_board();
    let store = MemoryStore::new().with_board(board.id.clone(), lists);

    apply_suggestions(&store, &TracingNotifier, Some(&board.id), Some(itinerary)).await;

    println!("{}", render::board(&board, &store.lists(&board.id).await?));
    Ok(())
}
