//! Client configuration.

use crate::oauth::TOKEN_URL;
use derive_builder::Builder;
use std::time::Duration;

/// Base URL of the YouTube Data API v3. Resource paths are appended to it.
pub const API_BASE_URL: &str = "https://youtube.googleapis.com/youtube/v3/";

/// Prefix of YouTube Shorts URLs; the video id is appended to it.
pub const SHORTS_BASE_URL: &str = "https://www.youtube.com/shorts/";

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a [`YouTubeClient`](crate::YouTubeClient) is constructed from.
///
/// ```rust
/// use youtube_data::ClientConfig;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder()
///     .app_id("my-app.apps.googleusercontent.com")
///     .app_secret("hunter2")
///     .request_timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ClientConfig {
    /// The OAuth client ID of the application.
    #[builder(setter(into, strip_option), default)]
    pub(crate) app_id: Option<String>,

    /// The OAuth client secret of the application.
    #[builder(setter(into, strip_option), default)]
    pub(crate) app_secret: Option<String>,

    /// An HTTP client to use for all API requests.
    ///
    /// A supplied session is never closed by the library. Without one, the client opens its own
    /// on first use and drops it on [`close`](crate::YouTubeClient::close).
    #[builder(setter(strip_option), default)]
    pub(crate) session: Option<reqwest::Client>,

    /// Deadline applied to each individual HTTP request.
    #[builder(default = "DEFAULT_REQUEST_TIMEOUT")]
    pub(crate) request_timeout: Duration,

    /// Whether expired user tokens are refreshed automatically.
    ///
    /// Defaults to `true` exactly when both `app_id` and `app_secret` are set. When enabled,
    /// user credentials must come with a refresh token.
    #[builder(setter(strip_option), default)]
    pub(crate) auto_refresh_auth: Option<bool>,

    #[builder(setter(into), default = "API_BASE_URL.to_string()")]
    pub(crate) api_base_url: String,

    #[builder(setter(into), default = "TOKEN_URL.to_string()")]
    pub(crate) token_url: String,

    #[builder(setter(into), default = "SHORTS_BASE_URL.to_string()")]
    pub(crate) shorts_base_url: String,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// The auto-refresh policy this configuration resolves to.
    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh_auth
            .unwrap_or(self.app_id.is_some() && self.app_secret.is_some())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_secret: None,
            session: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            auto_refresh_auth: None,
            api_base_url: API_BASE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            shorts_base_url: SHORTS_BASE_URL.to_string(),
        }
    }
}

impl ClientConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err("request timeout must be non-zero".to_string());
        }

        let has_app_id = matches!(self.app_id, Some(Some(_)));
        let has_app_secret = matches!(self.app_secret, Some(Some(_)));
        if has_app_secret && !has_app_id {
            return Err("an app secret was given without an app id".to_string());
        }

        if let Some(base) = &self.api_base_url
            && !base.ends_with('/')
        {
            return Err(format!("api base url must end with '/': {base}"));
        }

        Ok(())
    }
}
