//! YouTube Videos API types and functionality.

use crate::error::{Error, Result};
use crate::helper::parse_duration;
use crate::youtube_api::types::{Thumbnails, parts};
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

parts! {
    /// The `part` values accepted by `videos.list`.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/videos/list#part>
    VideoPart {
        ContentDetails => "contentDetails",
        FileDetails => "fileDetails",
        Id => "id",
        LiveStreamingDetails => "liveStreamingDetails",
        Localizations => "localizations",
        Player => "player",
        ProcessingDetails => "processingDetails",
        RecordingDetails => "recordingDetails",
        Snippet => "snippet",
        Statistics => "statistics",
        Status => "status",
        Suggestions => "suggestions",
        TopicDetails => "topicDetails",
    }
}

/// A `video` resource represents a YouTube video.
///
/// Only the parts that were requested are present. Reading one that was not fails with
/// [`Error::PartMissing`].
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    snippet: Option<VideoSnippet>,
    content_details: Option<VideoContentDetails>,
    statistics: Option<VideoStatistics>,
    live_streaming_details: Option<VideoLiveStreamingDetails>,
}

impl Video {
    /// Basic details about the video. Requires [`VideoPart::Snippet`].
    pub fn snippet(&self) -> Result<&VideoSnippet> {
        self.snippet.as_ref().ok_or(Error::PartMissing("snippet"))
    }

    /// Requires [`VideoPart::ContentDetails`].
    pub fn content_details(&self) -> Result<&VideoContentDetails> {
        self.content_details
            .as_ref()
            .ok_or(Error::PartMissing("contentDetails"))
    }

    /// Requires [`VideoPart::Statistics`].
    pub fn statistics(&self) -> Result<&VideoStatistics> {
        self.statistics
            .as_ref()
            .ok_or(Error::PartMissing("statistics"))
    }

    /// Requires [`VideoPart::LiveStreamingDetails`]. Only live and upcoming broadcasts have it.
    pub fn live_streaming_details(&self) -> Result<&VideoLiveStreamingDetails> {
        self.live_streaming_details
            .as_ref()
            .ok_or(Error::PartMissing("liveStreamingDetails"))
    }

    /// The length of the video. Requires [`VideoPart::ContentDetails`].
    pub fn duration(&self) -> Result<SignedDuration> {
        parse_duration(&self.content_details()?.duration)
    }

    /// Whether the video is a broadcast that is live right now. Requires [`VideoPart::Snippet`].
    pub fn is_live(&self) -> Result<bool> {
        Ok(self.snippet()?.live_broadcast_content == LiveBroadcastContent::Live)
    }
}

/// Basic details about the video, such as its title, description, and category.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    /// The date and time that the video was published.
    pub published_at: Timestamp,
    /// The ID of the channel the video was uploaded to.
    pub channel_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub channel_title: String,
    /// Keyword tags associated with the video. Absent if the video has none.
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: Option<String>,
    pub live_broadcast_content: LiveBroadcastContent,
    pub default_language: Option<String>,
    pub default_audio_language: Option<String>,
}

/// Whether a video is an upcoming or active live broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiveBroadcastContent {
    Live,
    None,
    Upcoming,
}

/// Information about the video content, including its length and resolution.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#contentDetails>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    /// The length of the video as an ISO 8601 duration, e.g. `PT15M33S`.
    ///
    /// See [`Video::duration`] for the parsed value.
    pub duration: String,
    pub dimension: VideoDimension,
    pub definition: VideoDefinition,
    /// Whether captions are available. The API sends this as the string `"true"` or `"false"`.
    pub caption: String,
    pub licensed_content: bool,
    pub projection: VideoProjection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoDimension {
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoDefinition {
    Hd,
    Sd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProjection {
    Rectangular,
    #[serde(rename = "360")]
    ThreeSixty,
}

/// Statistics about the video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    /// The number of times the video has been viewed.
    pub view_count: Option<String>,
    /// The number of users who have indicated that they liked the video.
    pub like_count: Option<String>,
    /// The number of users who have indicated that they disliked the video.
    /// Note: This is only visible to the video owner.
    pub dislike_count: Option<String>,
    /// The number of users who currently have the video marked as a favorite video.
    /// Note: This property is deprecated and always returns 0.
    pub favorite_count: Option<String>,
    /// The number of comments for the video.
    pub comment_count: Option<String>,
}

/// Metadata about a live video broadcast.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#liveStreamingDetails>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoLiveStreamingDetails {
    pub actual_start_time: Option<Timestamp>,
    pub actual_end_time: Option<Timestamp>,
    pub scheduled_start_time: Option<Timestamp>,
    pub scheduled_end_time: Option<Timestamp>,
    /// Present only while the broadcast is live, and only if the owner shows viewer counts.
    pub concurrent_viewers: Option<String>,
    pub active_live_chat_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube_api::types::decode_item;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Video {
        match value {
            serde_json::Value::Object(raw) => decode_item(raw).unwrap(),
            _ => unreachable!("test items are objects"),
        }
    }

    #[test]
    fn test_missing_parts() {
        let video = decode(json!({"kind": "youtube#video", "id": "Ks-_Mh1QhMc"}));
        assert_eq!(video.id, "Ks-_Mh1QhMc");
        assert!(matches!(video.snippet(), Err(Error::PartMissing("snippet"))));
        assert!(matches!(
            video.duration(),
            Err(Error::PartMissing("contentDetails"))
        ));
        assert!(matches!(video.is_live(), Err(Error::PartMissing(_))));
    }

    #[test]
    fn test_content_details() {
        let video = decode(json!({
            "id": "Ks-_Mh1QhMc",
            "contentDetails": {
                "duration": "PT21M3S",
                "dimension": "2d",
                "definition": "hd",
                "caption": "true",
                "licensedContent": true,
                "projection": "rectangular"
            },
            "statistics": {"viewCount": "100", "likeCount": "3"}
        }));
        let details = video.content_details().unwrap();
        assert_eq!(details.dimension, VideoDimension::TwoD);
        assert_eq!(details.definition, VideoDefinition::Hd);
        assert_eq!(details.projection, VideoProjection::Rectangular);
        assert_eq!(video.duration().unwrap(), SignedDuration::from_secs(21 * 60 + 3));
        assert_eq!(video.statistics().unwrap().view_count.as_deref(), Some("100"));
        assert_eq!(video.statistics().unwrap().comment_count, None);
    }

    #[test]
    fn test_live_broadcast_content() {
        let video = decode(json!({
            "id": "abc",
            "snippet": {
                "publishedAt": "2024-05-01T18:00:00Z",
                "channelId": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
                "title": "live now",
                "description": "",
                "thumbnails": {},
                "channelTitle": "Google for Developers",
                "liveBroadcastContent": "live"
            },
            "liveStreamingDetails": {
                "actualStartTime": "2024-05-01T18:00:05Z",
                "concurrentViewers": "42"
            }
        }));
        assert!(video.is_live().unwrap());
        let snippet = video.snippet().unwrap();
        assert!(snippet.tags.is_empty());
        assert_eq!(snippet.default_language, None);
        assert_eq!(
            video
                .live_streaming_details()
                .unwrap()
                .concurrent_viewers
                .as_deref(),
            Some("42")
        );
    }

    #[test]
    fn test_snippet_without_description_or_thumbnails() {
        let video = decode(json!({
            "id": "abc",
            "snippet": {
                "publishedAt": "2024-05-01T18:00:00Z",
                "channelId": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
                "title": "untitled upload",
                "channelTitle": "Google for Developers",
                "liveBroadcastContent": "none"
            }
        }));
        let snippet = video.snippet().unwrap();
        assert_eq!(snippet.description, "");
        assert_eq!(snippet.thumbnails, Thumbnails::default());
        assert!(!video.is_live().unwrap());
    }
}
