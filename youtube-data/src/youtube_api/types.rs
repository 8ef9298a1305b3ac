//! Shared types and streaming infrastructure for the YouTube API client.

use crate::error::{Error, Result};
use crate::url::{QueryEnum, QueryValue, UrlOptions};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

/// One undecoded entry of a list response's `items` array.
pub type RawItem = serde_json::Map<String, serde_json::Value>;

/// Turns one [`RawItem`] into a typed resource.
pub type Decoder<T> = fn(RawItem) -> Result<T>;

type OneFuturePage<'a, F> = Pin<Box<dyn Future<Output = Result<(F, Page)>> + 'a + Send>>;

/// The envelope shared by every `*.list` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The resources on this page. Absent is the same as empty.
    #[serde(default)]
    pub items: VecDeque<RawItem>,
    /// Token to pass as `pageToken` to retrieve the next page. Absent on the last page.
    pub next_page_token: Option<String>,
    /// Result counts as reported by the API. Informational only: pagination follows
    /// `next_page_token`.
    pub page_info: Option<PageInfo>,
}

/// Decodes a raw item with serde.
pub fn decode_item<T: DeserializeOwned>(raw: RawItem) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(raw)).map_err(Error::Decode)
}

/// A paginated stream that automatically fetches subsequent pages from a YouTube API list endpoint.
///
/// This stream yields items one by one. The request for the next page is only issued once every
/// item of the current page has been yielded, so the stream only ever waits on the network at a
/// page boundary. Only supports forward pagination (no previous page support).
///
/// The stream ends when a page arrives without a `nextPageToken`. A page with no items but with a
/// token does not end it. After the first error the stream is finished and yields `None`.
/// Dropping the stream drops any not-yet-completed page request.
pub struct PagedStream<'a, T, F> {
    /// Undecoded items from the most recent API response
    current_items: VecDeque<RawItem>,
    /// Future representing the next page request, if any.
    ///
    /// Futures are lazy, so holding one does not mean the request has been sent.
    pending_request: Option<OneFuturePage<'a, F>>,
    decode: Decoder<T>,
    /// Whether we've reached the end of all available data
    is_done: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    /// Create a new PagedStream that starts at `cursor` (or the first page if `None`).
    ///
    /// `fetcher` is called with the page token of each page to fetch; `decode` turns each raw
    /// item into a `T`.
    pub fn new<Fut>(fetcher: F, cursor: Option<String>, decode: Decoder<T>) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<Page>> + Send + 'a,
    {
        Self {
            current_items: VecDeque::new(),
            pending_request: Some(Self::fetch(fetcher, cursor)),
            decode,
            is_done: false,
        }
    }

    fn fetch<Fut>(fetcher: F, cursor: Option<String>) -> OneFuturePage<'a, F>
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<Page>> + Send + 'a,
    {
        Box::pin(async move {
            let page = fetcher(cursor).await?;
            Ok((fetcher, page))
        })
    }

    fn finish(&mut self) {
        self.is_done = true;
        self.pending_request = None;
        self.current_items.clear();
    }
}

impl<'a, T, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = Result<Page>> + Send + 'a,
{
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            // If we have items in the current batch, return the next one
            if let Some(raw) = this.current_items.pop_front() {
                let item = (this.decode)(raw);
                if item.is_err() {
                    this.finish();
                }
                return Poll::Ready(Some(item));
            }

            if this.is_done {
                return Poll::Ready(None);
            }

            let Some(pending) = this.pending_request.as_mut() else {
                this.is_done = true;
                return Poll::Ready(None);
            };

            match pending.as_mut().poll(cx) {
                Poll::Ready(Ok((fetcher, page))) => {
                    let next_page_token = page.next_page_token.filter(|t| !t.is_empty());
                    tracing::debug!(
                        returned_items = page.items.len(),
                        has_next_page = next_page_token.is_some(),
                        "fetched page"
                    );
                    this.current_items.extend(page.items);

                    if let Some(next_page_token) = next_page_token {
                        // Set up the future for the next page
                        // (but don't poll it until this page is drained)
                        this.pending_request = Some(Self::fetch(fetcher, Some(next_page_token)));
                    } else {
                        this.pending_request = None;
                        this.is_done = true;
                    }

                    // Continue the loop to try yielding an item
                    continue;
                }
                Poll::Ready(Err(e)) => {
                    this.finish();
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_done {
            (self.current_items.len(), Some(self.current_items.len()))
        } else {
            (self.current_items.len(), None)
        }
    }
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// The total number of results in the result set.
    pub total_results: u32,
    /// The number of results included in the API response.
    pub results_per_page: u32,
}

/// A single thumbnail image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// The thumbnail images associated with a resource, keyed by quality.
///
/// Not every resource has every size, so all are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// Returns the best available thumbnail.
    pub fn highest_quality(&self) -> Option<&Thumbnail> {
        self.maxres
            .as_ref()
            .or(self.standard.as_ref())
            .or(self.high.as_ref())
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
    }
}

/// Identifies the resource another resource points at, e.g. the video of a playlist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    /// The type of the referred resource, e.g. `youtube#video`.
    pub kind: String,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
    pub playlist_id: Option<String>,
}

/// Defines an enum of request parts with their wire names.
macro_rules! parts {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $crate::url::QueryEnum for $name {
            fn query_value(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::url::QueryEnum::query_value(self))
            }
        }
    };
}
pub(crate) use parts;

/// Renders parts as the comma-separated `part` parameter.
pub(crate) fn part_param<P: QueryEnum + Copy>(parts: &[P]) -> Result<QueryValue> {
    if parts.is_empty() {
        return Err(Error::validation("at least one part is required"));
    }
    let parts = QueryValue::List(parts.iter().copied().map(QueryValue::enumerated).collect());
    Ok(parts.joined(&UrlOptions::default()))
}
