//! Turning a suggested itinerary into board lists.

use tracing::{info, instrument, warn};
use tripboard_protocol::{BoardId, Itinerary, List, Notice, Notifier};

use crate::store::{BoardStore, NewList};

/// Creates one list per itinerary section on the board.
///
/// Sections are created one at a time in itinerary order. Each created list
/// is announced with a success notice; a failed creation is announced with an
/// error notice and the remaining sections are still attempted.
///
/// Returns the lists that were created.
#[instrument(skip_all, fields(board = board_id.map(BoardId::as_str)))]
pub async fn apply_suggestions<S>(
    store: &S,
    notifier: &dyn Notifier,
    board_id: Option<&BoardId>,
    itinerary: Option<&Itinerary>,
) -> Vec<List>
where
    S: BoardStore + ?Sized,
{
    let Some(board_id) = board_id else {
        notifier.notify(Notice::error("Board data is not available."));
        return Vec::new();
    };
    let Some(itinerary) = itinerary else {
        notifier.notify(Notice::warning("No suggested itinerary to apply."));
        return Vec::new();
    };

    let mut created = Vec::with_capacity(itinerary.len());
    for draft in itinerary.to_list_drafts() {
        let title = draft.title.clone();
        match store.create_list(board_id, NewList::from(draft)).await {
            Ok(list) => {
                notifier.notify(Notice::success(format!("Itinerary \"{}\" created", list.title)));
                created.push(list);
            }
            Err(err) => {
                warn!(%title, error = %err, "could not create suggested list");
                notifier.notify(Notice::error(err.to_string()));
            }
        }
    }

    info!(created = created.len(), sections = itinerary.len(), "suggestions applied");
    created
}
