//! The seam between the consumer and whatever produces suggestion text.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use crate::error::Result;
use crate::request::SuggestionRequest;

/// A stream of raw response chunks.
///
/// Chunk boundaries are arbitrary and may split multi-byte characters.
pub type ChunkStream = BoxStream<'static, Result<Bytes>>;

/// Opens suggestion streams.
///
/// [`HttpSuggestionService`](crate::HttpSuggestionService) is the production
/// implementation; tests substitute scripted streams.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Sends the request and returns the response body as a chunk stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the service does not
    /// answer with a success status.
    async fn open(&self, request: &SuggestionRequest) -> Result<ChunkStream>;
}

#[async_trait]
impl<S: SuggestionService + ?Sized> SuggestionService for std::sync::Arc<S> {
    async fn open(&self, request: &SuggestionRequest) -> Result<ChunkStream> {
        (**self).open(request).await
    }
}
