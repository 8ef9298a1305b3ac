//! YouTube PlaylistItems API types.

use crate::error::{Error, Result};
use crate::youtube_api::types::{ResourceId, Thumbnails, parts};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

parts! {
    /// The `part` values accepted by `playlistItems.list`.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/playlistItems/list#part>
    PlaylistItemPart {
        ContentDetails => "contentDetails",
        Id => "id",
        Snippet => "snippet",
        Status => "status",
    }
}

/// A `playlistItem` resource identifies a resource, such as a video, that is part of a playlist.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    /// The ID that YouTube uses to uniquely identify the playlist item.
    pub id: String,
    snippet: Option<PlaylistItemSnippet>,
    content_details: Option<PlaylistItemContentDetails>,
    status: Option<PlaylistItemStatus>,
}

impl PlaylistItem {
    pub fn snippet(&self) -> Result<&PlaylistItemSnippet> {
        self.snippet.as_ref().ok_or(Error::PartMissing("snippet"))
    }

    pub fn content_details(&self) -> Result<&PlaylistItemContentDetails> {
        self.content_details
            .as_ref()
            .ok_or(Error::PartMissing("contentDetails"))
    }

    pub fn status(&self) -> Result<&PlaylistItemStatus> {
        self.status.as_ref().ok_or(Error::PartMissing("status"))
    }
}

/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#snippet>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    /// When the item was added to the playlist.
    pub published_at: Timestamp,
    /// The channel that added the item.
    pub channel_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub channel_title: String,
    /// The channel that uploaded the video.
    pub video_owner_channel_id: Option<String>,
    pub video_owner_channel_title: Option<String>,
    pub playlist_id: String,
    /// Zero-based position of the item in the playlist.
    pub position: u32,
    pub resource_id: ResourceId,
}

/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#contentDetails>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
    /// When the video was published to YouTube. Absent for private or deleted videos.
    pub video_published_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemStatus {
    pub privacy_status: PrivacyStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrivacyStatus {
    Private,
    Public,
    Unlisted,
}
