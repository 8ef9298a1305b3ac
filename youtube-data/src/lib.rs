//! Async client for the YouTube Data API v3.
//!
//! The heart of the crate is one request pipeline shared by every list endpoint:
//!
//! - a [`TokenStore`] holds the app and user credentials of a client;
//! - an [`Authenticator`] talks to Google's OAuth 2.0 token endpoint to refresh user tokens
//!   and to issue app tokens;
//! - the client attaches the current token to each request, refreshes an expired user token
//!   first when auto-refresh is on, and maps failed responses onto [`Error`];
//! - a [`PagedStream`] turns `*.list` responses into a lazy [`Stream`](tokio_stream::Stream)
//!   of typed items, following `nextPageToken` one page at a time.
//!
//! ```rust,no_run
//! use youtube_data::{ClientConfig, VideoPart, YouTubeClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = YouTubeClient::new(ClientConfig::builder().build()?);
//! if let Some(video) = client.get_video("Ks-_Mh1QhMc", &[VideoPart::Snippet]).await? {
//!     println!("{}", video.snippet()?.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod helper;
pub mod oauth;
pub mod scope;
pub mod token;
pub mod url;
pub mod youtube_api;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use helper::{first, limit, parse_duration};
pub use oauth::{AppToken, Authenticator, RefreshedToken};
pub use scope::{AuthScope, build_scope};
pub use token::{Credential, CredentialKind, TokenStore};
pub use youtube_api::*;
