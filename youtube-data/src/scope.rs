//! OAuth scopes understood by the YouTube Data API.
//!
//! See: <https://developers.google.com/youtube/v3/guides/auth/installed-apps#identify-access-scopes>

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A permission grant that a credential may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuthScope {
    /// Manage your YouTube account.
    #[serde(rename = "https://www.googleapis.com/auth/youtube")]
    Manage,
    /// See a list of your current active channel members, their level, and when they became a
    /// member.
    #[serde(rename = "https://www.googleapis.com/auth/youtube.channel-memberships.creator")]
    ManageMemberships,
    /// See, edit, and permanently delete your YouTube videos, ratings, comments and captions.
    #[serde(rename = "https://www.googleapis.com/auth/youtube.force-ssl")]
    ForceSsl,
    /// View your YouTube account.
    #[serde(rename = "https://www.googleapis.com/auth/youtube.readonly")]
    ReadOnly,
    /// Manage your YouTube videos.
    #[serde(rename = "https://www.googleapis.com/auth/youtube.upload")]
    Upload,
    /// View and manage your assets and associated content on YouTube.
    #[serde(rename = "https://www.googleapis.com/auth/youtubepartner")]
    Partner,
    /// View private information of your YouTube channel relevant during the audit process with a
    /// YouTube partner.
    #[serde(rename = "https://www.googleapis.com/auth/youtubepartner-channel-audit")]
    PartnerAudit,
}

impl AuthScope {
    /// Every scope known to this crate.
    pub const ALL: [AuthScope; 7] = [
        Self::Manage,
        Self::ManageMemberships,
        Self::ForceSsl,
        Self::ReadOnly,
        Self::Upload,
        Self::Partner,
        Self::PartnerAudit,
    ];

    /// Scopes that allow reading the authenticated user's own resources.
    pub(crate) const READ: [AuthScope; 3] = [Self::ReadOnly, Self::Manage, Self::ForceSsl];

    /// The scope URL as sent to the authorization server.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manage => "https://www.googleapis.com/auth/youtube",
            Self::ManageMemberships => {
                "https://www.googleapis.com/auth/youtube.channel-memberships.creator"
            }
            Self::ForceSsl => "https://www.googleapis.com/auth/youtube.force-ssl",
            Self::ReadOnly => "https://www.googleapis.com/auth/youtube.readonly",
            Self::Upload => "https://www.googleapis.com/auth/youtube.upload",
            Self::Partner => "https://www.googleapis.com/auth/youtubepartner",
            Self::PartnerAudit => "https://www.googleapis.com/auth/youtubepartner-channel-audit",
        }
    }
}

impl fmt::Display for AuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown scope: {s}")))
    }
}

/// Joins scopes into the space-separated form the token endpoint expects.
pub fn build_scope(scopes: &[AuthScope]) -> String {
    scopes
        .iter()
        .map(AuthScope::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_scope() {
        assert_eq!(
            build_scope(&[AuthScope::Manage, AuthScope::ForceSsl]),
            "https://www.googleapis.com/auth/youtube https://www.googleapis.com/auth/youtube.force-ssl"
        );
        assert_eq!(build_scope(&[]), "");
    }

    #[test]
    fn test_scope_string_conversions() {
        for scope in AuthScope::ALL {
            assert_eq!(scope.as_str().parse::<AuthScope>().unwrap(), scope);
            // serde and as_str must agree
            let json = serde_json::to_string(&scope).unwrap();
            assert_eq!(json.trim_matches('"'), scope.as_str());
        }
        assert!("https://example.com/scope".parse::<AuthScope>().is_err());
    }
}
