//! YouTube Data API v3 client library.
//!
//! This module provides the [`YouTubeClient`] and the typed resources it returns: videos,
//! channels, playlist items and subscriptions.
//!
//! # Parts
//!
//! Every list call takes the `part`s to request, e.g. [`VideoPart::Snippet`]. The API only
//! returns the parts that were asked for, so the matching fields on the resource are optional.
//! Reading one that is absent fails with [`Error::PartMissing`](crate::Error::PartMissing)
//! instead of panicking or silently returning defaults.
//!
//! # Pagination
//!
//! List calls return a [`Stream`](tokio_stream::Stream) of items. Pages are fetched on demand:
//! the first page is requested when the stream is first polled, and each further page only
//! once the previous one has been fully consumed.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_data::{AuthScope, ChannelPart, PlaylistItemPart, YouTubeClient};
//! use tokio_stream::StreamExt;
//!
//! # async fn example() -> youtube_data::Result<()> {
//! let client = YouTubeClient::default();
//! client
//!     .set_user_authentication("ya29.token", [AuthScope::ReadOnly], None)
//!     .await?;
//!
//! let mut channels = client.get_user_channels(&[ChannelPart::ContentDetails]).await?;
//! while let Some(channel) = channels.next().await {
//!     let channel = channel?;
//!     let mut uploads =
//!         client.get_playlist_items(channel.upload_playlist_id()?, &[PlaylistItemPart::Snippet])?;
//!     while let Some(item) = uploads.next().await {
//!         println!("{}", item?.snippet()?.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod channels;
pub mod client;
pub mod playlist_items;
pub mod request;
pub mod subscriptions;
pub mod types;
pub mod videos;

// Re-export main types for convenience
pub use client::YouTubeClient;
pub use request::RequestMethod;
pub use types::{PageInfo, PagedStream, ResourceId, Thumbnail, Thumbnails};

pub use videos::{
    LiveBroadcastContent, Video, VideoContentDetails, VideoDefinition, VideoDimension,
    VideoLiveStreamingDetails, VideoPart, VideoProjection, VideoSnippet, VideoStatistics,
};

pub use channels::{
    Channel, ChannelContentDetails, ChannelPart, ChannelSnippet, ChannelStatistics,
    RelatedPlaylists,
};

pub use playlist_items::{
    PlaylistItem, PlaylistItemContentDetails, PlaylistItemPart, PlaylistItemSnippet,
    PlaylistItemStatus, PrivacyStatus,
};

pub use subscriptions::{
    Subscription, SubscriptionContentDetails, SubscriptionPart, SubscriptionSnippet,
};
