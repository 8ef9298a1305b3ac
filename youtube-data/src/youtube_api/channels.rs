//! YouTube Channels API types and functionality.

use crate::error::{Error, Result};
use crate::youtube_api::types::{Thumbnails, parts};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

parts! {
    /// The `part` values accepted by `channels.list`.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/channels/list#part>
    ChannelPart {
        AuditDetails => "auditDetails",
        BrandingSettings => "brandingSettings",
        ContentDetails => "contentDetails",
        ContentOwnerDetails => "contentOwnerDetails",
        Id => "id",
        Localizations => "localizations",
        Snippet => "snippet",
        Statistics => "statistics",
        Status => "status",
        TopicDetails => "topicDetails",
    }
}

/// A `channel` resource contains information about a YouTube channel.
///
/// Each channel represents a user or organization account on YouTube. Only the requested parts
/// are present; reading any other fails with [`Error::PartMissing`].
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// The ID that YouTube uses to uniquely identify the channel.
    pub id: String,
    snippet: Option<ChannelSnippet>,
    content_details: Option<ChannelContentDetails>,
    statistics: Option<ChannelStatistics>,
}

impl Channel {
    /// Requires [`ChannelPart::Snippet`].
    pub fn snippet(&self) -> Result<&ChannelSnippet> {
        self.snippet.as_ref().ok_or(Error::PartMissing("snippet"))
    }

    /// Requires [`ChannelPart::ContentDetails`].
    pub fn content_details(&self) -> Result<&ChannelContentDetails> {
        self.content_details
            .as_ref()
            .ok_or(Error::PartMissing("contentDetails"))
    }

    /// Requires [`ChannelPart::Statistics`].
    pub fn statistics(&self) -> Result<&ChannelStatistics> {
        self.statistics
            .as_ref()
            .ok_or(Error::PartMissing("statistics"))
    }

    /// The ID of the playlist holding every upload of this channel.
    ///
    /// Feed it to [`YouTubeClient::get_playlist_items`](crate::YouTubeClient::get_playlist_items)
    /// to list the channel's videos. Requires [`ChannelPart::ContentDetails`].
    pub fn upload_playlist_id(&self) -> Result<&str> {
        Ok(&self.content_details()?.related_playlists.uploads)
    }
}

/// The snippet object contains basic details about the channel.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#snippet>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    /// The channel's title.
    pub title: String,
    /// The channel's description.
    #[serde(default)]
    pub description: String,
    /// The channel's handle, e.g. `@GoogleDevelopers`.
    pub custom_url: Option<String>,
    /// The date and time that the channel was created.
    ///
    /// The value is specified in ISO 8601 format.
    pub published_at: Timestamp,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub default_language: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

/// Playlists associated with the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPlaylists {
    /// The playlist of videos liked by the channel. Usually only visible to its owner.
    #[serde(default)]
    pub likes: Option<String>,
    /// The playlist of videos uploaded to the channel.
    pub uploads: String,
}

/// Statistics for the channel.
///
/// Counts are sent as decimal strings.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#statistics>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub view_count: Option<String>,
    /// Rounded to three significant figures, and absent if the owner hides it.
    pub subscriber_count: Option<String>,
    pub hidden_subscriber_count: bool,
    pub video_count: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube_api::types::decode_item;
    use serde_json::json;

    #[test]
    fn test_upload_playlist_id() {
        let serde_json::Value::Object(raw) = json!({
            "id": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
            "contentDetails": {
                "relatedPlaylists": {"likes": "", "uploads": "UU_x5XG1OV2P6uZZ5FSM9Ttw"}
            }
        }) else {
            unreachable!()
        };
        let channel: Channel = decode_item(raw).unwrap();
        assert_eq!(channel.upload_playlist_id().unwrap(), "UU_x5XG1OV2P6uZZ5FSM9Ttw");
        assert!(matches!(channel.snippet(), Err(Error::PartMissing("snippet"))));
        assert!(matches!(
            channel.statistics(),
            Err(Error::PartMissing("statistics"))
        ));
    }

    #[test]
    fn test_snippet_without_thumbnails() {
        let serde_json::Value::Object(raw) = json!({
            "id": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
            "snippet": {
                "title": "Google for Developers",
                "publishedAt": "2007-08-23T00:34:43Z"
            }
        }) else {
            unreachable!()
        };
        let channel: Channel = decode_item(raw).unwrap();
        let snippet = channel.snippet().unwrap();
        assert_eq!(snippet.description, "");
        assert_eq!(snippet.thumbnails, Thumbnails::default());
    }

    #[test]
    fn test_part_display() {
        assert_eq!(ChannelPart::ContentDetails.to_string(), "contentDetails");
        assert_eq!(ChannelPart::Snippet.to_string(), "snippet");
    }
}
