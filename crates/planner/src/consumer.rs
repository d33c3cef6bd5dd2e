//! Streamed suggestion consumer.
//!
//! [`SuggestionConsumer`] drives one suggestion at a time through
//! `Idle → Requesting → Streaming → {Completed | Cancelled | Failed}`.
//!
//! # Cancellation
//!
//! Each operation owns a [`CancellationToken`]. [`SuggestionConsumer::stop`]
//! cancels it and the operation observes the cancellation the next time it
//! waits, either for the response or for the next chunk. Nothing is appended
//! to the buffers after that point.
//!
//! # Concurrency
//!
//! At most one operation is in flight. A second [`start`] is rejected with
//! [`SuggestionError::Busy`] and leaves the running one alone. A stopped
//! operation gives up its place immediately, so a [`start`] right after
//! [`stop`](SuggestionConsumer::stop) is accepted even if the old operation
//! has not observed the cancellation yet.
//!
//! [`start`]: SuggestionConsumer::start

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use tripboard_protocol::{Itinerary, Notifier, TripDraft, TripLimits};

use crate::decoder::Utf8StreamDecoder;
use crate::error::SuggestionError;
use crate::request::SuggestionRequest;
use crate::service::SuggestionService;

/// Where the consumer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsumerState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// The request is sent and no response has arrived.
    Requesting,
    /// Chunks are being received.
    Streaming,
    /// The last operation produced an itinerary.
    Completed,
    /// The last operation was stopped.
    Cancelled,
    /// The last operation failed.
    Failed,
}

impl ConsumerState {
    /// Returns `true` while an operation is in flight.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Requesting | Self::Streaming)
    }
}

impl fmt::Display for ConsumerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Streaming => "streaming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a suggestion ended.
#[derive(Debug)]
pub enum SuggestionOutcome {
    /// The stream ended and its text is a valid itinerary.
    Completed(Itinerary),
    /// The operation was stopped.
    Cancelled {
        /// Text received before the stop was observed.
        partial: String,
    },
    /// The operation failed. A notice has been sent.
    Failed(SuggestionError),
}

impl SuggestionOutcome {
    /// Returns the itinerary if the suggestion completed.
    #[must_use]
    pub fn itinerary(&self) -> Option<&Itinerary> {
        match self {
            Self::Completed(itinerary) => Some(itinerary),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the itinerary if the suggestion
    /// completed.
    #[must_use]
    pub fn into_itinerary(self) -> Option<Itinerary> {
        match self {
            Self::Completed(itinerary) => Some(itinerary),
            _ => None,
        }
    }

    /// Returns the error if the suggestion failed.
    #[must_use]
    pub fn error(&self) -> Option<&SuggestionError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the state the consumer is left in.
    #[must_use]
    pub fn state(&self) -> ConsumerState {
        match self {
            Self::Completed(_) => ConsumerState::Completed,
            Self::Cancelled { .. } => ConsumerState::Cancelled,
            Self::Failed(_) => ConsumerState::Failed,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    state: ConsumerState,
    cancel: Option<CancellationToken>,
    /// Incremented for every admitted operation.
    generation: u64,
}

impl Slot {
    /// Returns `true` if an operation holds the slot and has not been stopped.
    fn is_busy(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the cancellation slot when an operation ends, however it ends.
///
/// Only the operation that currently owns the slot touches it; one that was
/// stopped and replaced by a newer operation leaves it alone. If the owning
/// operation future is dropped mid-flight the state becomes
/// [`ConsumerState::Cancelled`].
struct ActiveOperation<'a> {
    slot: &'a Mutex<Slot>,
    generation: u64,
}

impl ActiveOperation<'_> {
    fn owned(&self) -> Option<MutexGuard<'_, Slot>> {
        let slot = lock(self.slot);
        (slot.generation == self.generation).then_some(slot)
    }

    fn set_state(&self, state: ConsumerState) {
        if let Some(mut slot) = self.owned() {
            slot.state = state;
        }
    }

    fn finish(self, state: ConsumerState) {
        if let Some(mut slot) = self.owned() {
            slot.state = state;
            slot.cancel = None;
        }
    }
}

impl Drop for ActiveOperation<'_> {
    fn drop(&mut self) {
        if let Some(mut slot) = self.owned() {
            slot.cancel = None;
            if slot.state.is_active() {
                slot.state = ConsumerState::Cancelled;
            }
        }
    }
}

/// The two buffers filled while streaming.
#[derive(Debug, Default)]
struct Transcript {
    /// What the observer sees.
    visible: String,
    /// What gets parsed at end of stream.
    raw: String,
}

impl Transcript {
    fn append(&mut self, text: &str, on_partial: &mut impl FnMut(&str)) {
        if text.is_empty() {
            return;
        }
        self.visible.push_str(text);
        self.raw.push_str(text);
        on_partial(&self.visible);
    }
}

enum Flow {
    Ended,
    Stopped,
}

/// Requests itineraries and follows them as they stream in.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use reqwest::Url;
/// use tripboard_planner::{HttpSuggestionService, SuggestionConsumer};
/// use tripboard_protocol::{TracingNotifier, TripDraft, TripLimits};
///
/// # async fn example(draft: TripDraft) -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = Url::parse("http://localhost:3000/api/boards/plan")?;
/// let service = HttpSuggestionService::new(endpoint, None)?;
/// let consumer = SuggestionConsumer::new(service, TripLimits::default(), Arc::new(TracingNotifier));
///
/// let outcome = consumer.start(&draft, |partial| println!("{partial}")).await;
/// if let Some(itinerary) = outcome.itinerary() {
///     println!("{} days planned", itinerary.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct SuggestionConsumer<S> {
    service: S,
    limits: TripLimits,
    notifier: Arc<dyn Notifier>,
    slot: Mutex<Slot>,
}

impl<S: fmt::Debug> fmt::Debug for SuggestionConsumer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionConsumer")
            .field("service", &self.service)
            .field("limits", &self.limits)
            .field("state", &lock(&self.slot).state)
            .finish_non_exhaustive()
    }
}

impl<S: SuggestionService> SuggestionConsumer<S> {
    /// Creates an idle consumer.
    pub fn new(service: S, limits: TripLimits, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            limits,
            notifier,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ConsumerState {
        lock(&self.slot).state
    }

    /// Returns `true` while a suggestion is being requested or received.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.state().is_active()
    }

    /// Returns the trip length limits suggestions are accepted for.
    #[must_use]
    pub fn limits(&self) -> TripLimits {
        self.limits
    }

    /// Requests an itinerary for `draft` and follows the response.
    ///
    /// `on_partial` is called with the text received so far after every
    /// chunk that adds text.
    ///
    /// Failures are reported to the notifier before being returned. A
    /// cancelled operation is never reported.
    #[instrument(skip_all, fields(location = draft.location.as_deref().unwrap_or_default()))]
    pub async fn start<F>(&self, draft: &TripDraft, mut on_partial: F) -> SuggestionOutcome
    where
        F: FnMut(&str) + Send,
    {
        let (operation, token, request) = match self.admit(draft) {
            Ok(admitted) => admitted,
            Err(err) => return self.fail(err),
        };
        info!(days = request.days, generation = operation.generation, "requesting suggestion");

        let mut transcript = Transcript::default();
        let flow = self
            .exchange(&operation, &token, &request, &mut transcript, &mut on_partial)
            .await;

        let outcome = match flow {
            Ok(Flow::Stopped) => {
                debug!(received = transcript.visible.len(), "suggestion stopped");
                SuggestionOutcome::Cancelled {
                    partial: transcript.visible,
                }
            }
            Ok(Flow::Ended) => match Itinerary::parse(&transcript.raw) {
                Ok(itinerary) => {
                    info!(sections = itinerary.len(), "suggestion completed");
                    SuggestionOutcome::Completed(itinerary)
                }
                Err(err) => SuggestionOutcome::Failed(SuggestionError::ParseFailed(err)),
            },
            Err(err) => SuggestionOutcome::Failed(err),
        };

        operation.finish(outcome.state());
        if let SuggestionOutcome::Failed(err) = &outcome {
            warn!(error = %err, "suggestion failed");
            self.notifier.notify(err.notice());
        }
        outcome
    }

    /// Stops the in-flight suggestion.
    ///
    /// Returns `false` if nothing was in flight or it was already stopped.
    pub fn stop(&self) -> bool {
        let slot = lock(&self.slot);
        match &slot.cancel {
            Some(token) if !token.is_cancelled() => {
                debug!(generation = slot.generation, "stopping suggestion");
                token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Claims the slot for a new operation.
    ///
    /// A busy consumer is left untouched; an ineligible draft moves it to
    /// [`ConsumerState::Failed`]. A stopped operation still winding down
    /// loses the slot to the new one.
    fn admit(
        &self,
        draft: &TripDraft,
    ) -> Result<(ActiveOperation<'_>, CancellationToken, SuggestionRequest), SuggestionError> {
        let mut slot = lock(&self.slot);
        if slot.is_busy() {
            return Err(SuggestionError::Busy);
        }

        match draft.validate(&self.limits) {
            Ok(window) => {
                let token = CancellationToken::new();
                slot.generation += 1;
                slot.cancel = Some(token.clone());
                slot.state = ConsumerState::Requesting;
                let operation = ActiveOperation {
                    slot: &self.slot,
                    generation: slot.generation,
                };
                Ok((operation, token, SuggestionRequest::from(&window)))
            }
            Err(err) => {
                slot.state = ConsumerState::Failed;
                Err(SuggestionError::PreconditionUnmet(err))
            }
        }
    }

    fn fail(&self, err: SuggestionError) -> SuggestionOutcome {
        warn!(error = %err, "suggestion refused");
        self.notifier.notify(err.notice());
        SuggestionOutcome::Failed(err)
    }

    async fn exchange<F>(
        &self,
        operation: &ActiveOperation<'_>,
        token: &CancellationToken,
        request: &SuggestionRequest,
        transcript: &mut Transcript,
        on_partial: &mut F,
    ) -> Result<Flow, SuggestionError>
    where
        F: FnMut(&str) + Send,
    {
        let mut chunks = tokio::select! {
            biased;
            () = token.cancelled() => return Ok(Flow::Stopped),
            opened = self.service.open(request) => opened?,
        };
        operation.set_state(ConsumerState::Streaming);

        let mut decoder = Utf8StreamDecoder::new();
        loop {
            let next = tokio::select! {
                biased;
                () = token.cancelled() => return Ok(Flow::Stopped),
                next = chunks.next() => next,
            };

            match next {
                Some(Ok(bytes)) => {
                    debug!(bytes = bytes.len(), "received chunk");
                    transcript.append(&decoder.decode(&bytes), on_partial);
                }
                Some(Err(err)) => return Err(err),
                None => {
                    transcript.append(&decoder.finish(), on_partial);
                    return Ok(Flow::Ended);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::{DateTime, TimeZone, Utc};
    use futures_util::stream;
    use tripboard_protocol::{NoticeLevel, RecordingNotifier};

    use crate::error::Result;
    use crate::service::ChunkStream;

    /// Serves a fresh stream from `script` on every call.
    struct Scripted<F> {
        script: F,
        calls: AtomicUsize,
    }

    impl<F: Fn() -> ChunkStream + Send + Sync> Scripted<F> {
        fn new(script: F) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<F: Fn() -> ChunkStream + Send + Sync> SuggestionService for Scripted<F> {
        async fn open(&self, _request: &SuggestionRequest) -> Result<ChunkStream> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.script)())
        }
    }

    /// Never answers.
    struct Hanging;

    #[async_trait]
    impl SuggestionService for Hanging {
        async fn open(&self, _request: &SuggestionRequest) -> Result<ChunkStream> {
            std::future::pending().await
        }
    }

    fn chunks(parts: &[&'static [u8]]) -> ChunkStream {
        let items: Vec<Result<Bytes>> = parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        stream::iter(items).boxed()
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn kyoto() -> TripDraft {
        TripDraft {
            location: Some("Kyoto".to_string()),
            start_date: Some(date(2024, 4, 1)),
            end_date: Some(date(2024, 4, 4)),
        }
    }

    fn consumer<S: SuggestionService>(
        service: S,
    ) -> (Arc<SuggestionConsumer<S>>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let consumer = SuggestionConsumer::new(service, TripLimits::default(), notifier.clone());
        (Arc::new(consumer), notifier)
    }

    async fn wait_for(consumer: &SuggestionConsumer<Hanging>, state: ConsumerState) {
        while consumer.state() != state {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn two_week_trip_is_refused_without_request() {
        let service = Arc::new(Scripted::new(|| chunks(&[b"{}"])));
        let (consumer, notifier) = consumer(service.clone());
        let draft = TripDraft {
            location: Some("Lisbon".to_string()),
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 15)),
        };

        let outcome = consumer.start(&draft, |_| {}).await;

        assert!(matches!(
            outcome,
            SuggestionOutcome::Failed(SuggestionError::PreconditionUnmet(_))
        ));
        assert_eq!(consumer.state(), ConsumerState::Failed);
        assert_eq!(service.calls(), 0);
        assert_eq!(notifier.with_level(NoticeLevel::Warning).len(), 1);
        assert!(notifier.with_level(NoticeLevel::Error).is_empty());
    }

    #[tokio::test]
    async fn missing_location_is_refused() {
        let service = Arc::new(Scripted::new(|| chunks(&[b"{}"])));
        let (consumer, notifier) = consumer(service.clone());
        let draft = TripDraft {
            location: Some("   ".to_string()),
            ..kyoto()
        };

        let outcome = consumer.start(&draft, |_| {}).await;

        assert!(outcome.error().is_some_and(SuggestionError::is_warning));
        assert_eq!(service.calls(), 0);
        assert_eq!(
            notifier.notices()[0].description.as_deref(),
            Some("Please provide location, start date, and end date.")
        );
    }

    #[tokio::test]
    async fn chunks_are_observed_then_parsed() {
        let (consumer, notifier) = consumer(Scripted::new(|| {
            chunks(&[br#"{"Day 1":["Museum""#, br#","Market"]}"#])
        }));
        let mut seen = Vec::new();

        let outcome = consumer
            .start(&kyoto(), |partial| seen.push(partial.to_string()))
            .await;

        assert_eq!(
            seen,
            [
                r#"{"Day 1":["Museum""#.to_string(),
                r#"{"Day 1":["Museum","Market"]}"#.to_string()
            ]
        );
        let itinerary = outcome.into_itinerary().expect("completed");
        assert_eq!(
            itinerary.get("Day 1"),
            Some(&["Museum".to_string(), "Market".to_string()][..])
        );
        assert_eq!(consumer.state(), ConsumerState::Completed);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn multibyte_character_split_across_chunks() {
        let (consumer, _) = consumer(Scripted::new(|| {
            chunks(&[b"{\"D\xC3", b"\xA9part\":[\"Caf\xC3\xA9\"]}"])
        }));
        let mut seen = Vec::new();

        let outcome = consumer
            .start(&kyoto(), |partial| seen.push(partial.to_string()))
            .await;

        assert_eq!(seen[0], "{\"D");
        let itinerary = outcome.into_itinerary().expect("completed");
        assert_eq!(itinerary.get("Départ"), Some(&["Café".to_string()][..]));
    }

    #[tokio::test]
    async fn stop_mid_stream_keeps_partial_text() {
        let (consumer, notifier) = consumer(Scripted::new(|| {
            stream::iter(vec![Ok(Bytes::from_static(br#"{"Day 1":["Mus"#))])
                .chain(stream::pending())
                .boxed()
        }));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let task = tokio::spawn({
            let consumer = consumer.clone();
            async move {
                consumer
                    .start(&kyoto(), move |partial| {
                        let _ = tx.send(partial.to_string());
                    })
                    .await
            }
        });

        assert_eq!(rx.recv().await.unwrap(), r#"{"Day 1":["Mus"#);
        assert!(consumer.is_streaming());
        assert!(consumer.stop());

        let outcome = task.await.unwrap();
        match outcome {
            SuggestionOutcome::Cancelled { partial } => assert_eq!(partial, r#"{"Day 1":["Mus"#),
            other => panic!("expected cancellation, got {other:?}"),
        }
        assert_eq!(consumer.state(), ConsumerState::Cancelled);
        assert!(notifier.notices().is_empty());
        assert!(!consumer.stop());
    }

    #[tokio::test]
    async fn stop_while_requesting() {
        let (consumer, notifier) = consumer(Hanging);
        let task = tokio::spawn({
            let consumer = consumer.clone();
            async move { consumer.start(&kyoto(), |_| {}).await }
        });

        wait_for(&consumer, ConsumerState::Requesting).await;
        assert!(consumer.stop());

        let outcome = task.await.unwrap();
        assert!(matches!(outcome, SuggestionOutcome::Cancelled { ref partial } if partial.is_empty()));
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn start_while_busy_is_rejected() {
        let (consumer, notifier) = consumer(Hanging);
        let task = tokio::spawn({
            let consumer = consumer.clone();
            async move { consumer.start(&kyoto(), |_| {}).await }
        });
        wait_for(&consumer, ConsumerState::Requesting).await;

        let second = consumer.start(&kyoto(), |_| {}).await;

        assert!(matches!(second, SuggestionOutcome::Failed(SuggestionError::Busy)));
        assert_eq!(consumer.state(), ConsumerState::Requesting);
        assert_eq!(notifier.with_level(NoticeLevel::Warning).len(), 1);

        consumer.stop();
        assert!(matches!(
            task.await.unwrap(),
            SuggestionOutcome::Cancelled { .. }
        ));
    }

    #[tokio::test]
    async fn start_right_after_stop_is_accepted() {
        let (consumer, notifier) = consumer(Hanging);
        let first = tokio::spawn({
            let consumer = consumer.clone();
            async move { consumer.start(&kyoto(), |_| {}).await }
        });
        wait_for(&consumer, ConsumerState::Requesting).await;
        assert!(consumer.stop());
        assert!(!consumer.stop());

        // poll the second start once so it claims the slot before the first
        // operation has observed its cancellation
        let draft = kyoto();
        let mut second = Box::pin(consumer.start(&draft, |_| {}));
        tokio::select! {
            biased;
            outcome = &mut second => panic!("second start ended early: {outcome:?}"),
            () = std::future::ready(()) => {}
        }
        assert_eq!(consumer.state(), ConsumerState::Requesting);

        assert!(matches!(
            first.await.unwrap(),
            SuggestionOutcome::Cancelled { .. }
        ));
        // the stopped operation must not clear the slot of its successor
        assert_eq!(consumer.state(), ConsumerState::Requesting);
        assert!(consumer.stop());
        assert!(matches!(second.await, SuggestionOutcome::Cancelled { .. }));
        assert_eq!(consumer.state(), ConsumerState::Cancelled);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn slot_is_cleared_between_operations() {
        let service = Arc::new(Scripted::new(|| chunks(&[br#"{"Day 1":[]}"#])));
        let (consumer, _) = consumer(service.clone());

        assert!(consumer.start(&kyoto(), |_| {}).await.itinerary().is_some());
        assert!(consumer.start(&kyoto(), |_| {}).await.itinerary().is_some());
        assert_eq!(service.calls(), 2);
        assert!(!consumer.stop());
    }

    #[tokio::test]
    async fn invalid_itinerary_is_parse_failure() {
        let (consumer, notifier) = consumer(Scripted::new(|| chunks(&[b"Day 1: Museum"])));

        let outcome = consumer.start(&kyoto(), |_| {}).await;

        assert!(matches!(
            outcome,
            SuggestionOutcome::Failed(SuggestionError::ParseFailed(_))
        ));
        assert_eq!(consumer.state(), ConsumerState::Failed);
        assert_eq!(notifier.with_level(NoticeLevel::Error).len(), 1);
    }

    #[tokio::test]
    async fn stream_error_is_request_failure() {
        let (consumer, notifier) = consumer(Scripted::new(|| {
            stream::iter(vec![
                Ok(Bytes::from_static(b"{")),
                Err(SuggestionError::RequestFailed {
                    status: None,
                    reason: "connection reset".to_string(),
                }),
            ])
            .boxed()
        }));

        let outcome = consumer.start(&kyoto(), |_| {}).await;

        assert!(outcome.error().is_some_and(SuggestionError::is_request_failure));
        assert_eq!(consumer.state(), ConsumerState::Failed);
        assert_eq!(
            notifier.notices()[0].title.as_deref(),
            Some("Error requesting suggestions!")
        );
    }
}
