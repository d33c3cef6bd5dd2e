//! CLI handler for the `demo` subcommand
//!
//! Loads the sample board into an in-memory store and replays a few drags
//! through the list container, printing the board after each one. It then
//! renames a list and adds a card the same way.

use std::sync::Arc;

use tracing::info;
use tripboard_board::{BoardStore, ListContainer, MemoryStore};
use tripboard_protocol::{DragEvent, ListId, TracingNotifier, dummy::dummy_board};

use crate::cli::{DemoArgs, render};

/// The drags replayed by the demo, with a caption for each.
fn script() -> Vec<(&'static str, DragEvent)> {
    vec![
        ("Move Day 3 to the front", DragEvent::list(2, 0)),
        (
            "Swap the first two stops of Day 1",
            DragEvent::card("day-1", 0, "day-1", 1),
        ),
        (
            "Move Tenryu-ji to the end of Day 3",
            DragEvent::card("day-2", 1, "day-3", 99),
        ),
        (
            "Drop Kinkaku-ji outside the board",
            DragEvent::card("day-3", 0, "day-1", 0).without_destination(),
        ),
    ]
}

pub async fn execute(args: DemoArgs) -> anyhow::Result<()> {
    let (board, lists) = dummy_board();
    let store = Arc::new(MemoryStore::new().with_board(board.id.clone(), lists));
    let mut container =
        ListContainer::load(board.id.clone(), store.clone(), Arc::new(TracingNotifier)).await?;

    println!("{}", render::board(&board, container.lists()));
    for (caption, event) in script() {
        let status = container.handle_drag_end(&event).await;
        info!(?status, "{caption}");
        println!("== {caption} ({status:?})");
        println!("{}", render::board(&board, container.lists()));
    }

    let day_3 = ListId::new("day-3");
    container.rename_list(&day_3, "Day 3: Northern temples").await;
    container.add_card(&day_3, "Philosopher's Path").await;
    println!("== Rename Day 3 and add a stop");
    println!("{}", render::board(&board, container.lists()));

    let confirmed = store.lists(&board.id).await?;
    if confirmed != container.lists() {
        anyhow::bail!("stored board differs from the displayed board");
    }
    container.sync(confirmed);

    if args.json {
        println!("{}", serde_json::to_string_pretty(container.lists())?);
    }
    Ok(())
}
