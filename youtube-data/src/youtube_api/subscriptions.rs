//! YouTube Subscriptions API types.

use crate::error::{Error, Result};
use crate::youtube_api::types::{ResourceId, Thumbnails, parts};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

parts! {
    /// The `part` values accepted by `subscriptions.list`.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/subscriptions/list#part>
    SubscriptionPart {
        ContentDetails => "contentDetails",
        Id => "id",
        Snippet => "snippet",
        SubscriberSnippet => "subscriberSnippet",
    }
}

/// A `subscription` resource contains information about a YouTube user subscription.
///
/// See: <https://developers.google.com/youtube/v3/docs/subscriptions#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    snippet: Option<SubscriptionSnippet>,
    content_details: Option<SubscriptionContentDetails>,
}

impl Subscription {
    pub fn snippet(&self) -> Result<&SubscriptionSnippet> {
        self.snippet.as_ref().ok_or(Error::PartMissing("snippet"))
    }

    pub fn content_details(&self) -> Result<&SubscriptionContentDetails> {
        self.content_details
            .as_ref()
            .ok_or(Error::PartMissing("contentDetails"))
    }

    /// The ID of the channel subscribed to. Requires [`SubscriptionPart::Snippet`].
    pub fn subscribed_channel_id(&self) -> Result<Option<&str>> {
        Ok(self.snippet()?.resource_id.channel_id.as_deref())
    }
}

/// See: <https://developers.google.com/youtube/v3/docs/subscriptions#snippet>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnippet {
    /// When the subscription was created.
    pub published_at: Timestamp,
    /// The title of the channel subscribed to.
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Points at the channel subscribed to.
    pub resource_id: ResourceId,
    /// The ID of the subscriber's channel.
    pub channel_id: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

/// See: <https://developers.google.com/youtube/v3/docs/subscriptions#contentDetails>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionContentDetails {
    pub total_item_count: u32,
    pub new_item_count: u32,
    pub activity_type: Option<String>,
}
