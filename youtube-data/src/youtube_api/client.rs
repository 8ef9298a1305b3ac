//! Core YouTube API client functionality and authentication management.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::helper::first;
use crate::oauth::Authenticator;
use crate::scope::AuthScope;
use crate::token::{Credential, CredentialKind, TokenStore};
use crate::url::{QueryParams, QueryValue, UrlOptions, build_url};
use crate::youtube_api::{
    channels::{Channel, ChannelPart},
    playlist_items::{PlaylistItem, PlaylistItemPart},
    request::RequestMethod,
    subscriptions::{Subscription, SubscriptionPart},
    types::{Decoder, Page, PagedStream, decode_item, part_param},
    videos::{Video, VideoPart},
};
use http::StatusCode;
use oauth2::{ClientId, ClientSecret};
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio_stream::Stream;
use tracing::instrument;

/// Client for interacting with the YouTube Data API v3.
///
/// The client owns a [`TokenStore`] holding the current app and user credentials, and attaches
/// the current token to every request. With auto-refresh enabled (see
/// [`ClientConfig::auto_refresh`]), a user token that has passed its expiry is refreshed before
/// the next request goes out.
///
/// List operations return a [`Stream`] that walks all pages of the result lazily. The next
/// page is only requested once the previous one has been consumed, and dropping the stream
/// stops pagination.
#[derive(Debug)]
pub struct YouTubeClient {
    /// The current credentials
    pub(crate) tokens: TokenStore,
    /// Serializes token refreshes so concurrent requests refresh at most once.
    pub(crate) refresh_lock: Mutex<()>,
    authenticator: Authenticator,
    app_id: Option<ClientId>,
    app_secret: Option<ClientSecret>,
    /// HTTP client for API requests; created on first use unless one was supplied.
    session: OnceCell<reqwest::Client>,
    owns_session: bool,
    /// Never follows redirects. Carries token endpoint calls and shorts checks.
    redirectless_session: OnceCell<reqwest::Client>,
    pub(crate) request_timeout: Duration,
    api_base_url: String,
    shorts_base_url: String,
}

impl Default for YouTubeClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl YouTubeClient {
    /// Creates a new YouTube API client from the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        let auto_refresh = config.auto_refresh();
        let owns_session = config.session.is_none();
        Self {
            tokens: TokenStore::new(auto_refresh),
            refresh_lock: Mutex::new(()),
            authenticator: Authenticator::new(config.token_url)
                .with_timeout(config.request_timeout),
            app_id: config.app_id.map(ClientId::new),
            app_secret: config.app_secret.map(ClientSecret::new),
            session: OnceCell::new_with(config.session),
            owns_session,
            redirectless_session: OnceCell::new(),
            request_timeout: config.request_timeout,
            api_base_url: config.api_base_url,
            shorts_base_url: config.shorts_base_url,
        }
    }

    /// The credentials this client authenticates with.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Sets the user token to authenticate requests with.
    ///
    /// # Arguments
    ///
    /// * `token` - The user access token
    /// * `scopes` - The scopes the token was granted
    /// * `refresh_token` - Required when auto-refresh is enabled
    ///
    /// # Errors
    ///
    /// * [`Error::Validation`] - auto-refresh is enabled but `refresh_token` is `None`
    /// * [`Error::MissingScope`] - `scopes` is empty
    pub async fn set_user_authentication(
        &self,
        token: impl Into<String>,
        scopes: impl IntoIterator<Item = AuthScope>,
        refresh_token: Option<String>,
    ) -> Result<()> {
        self.tokens
            .set_user_credential(token, scopes, refresh_token)
            .await
    }

    /// Returns the current user auth token, `None` if no user authentication is set.
    pub async fn user_auth_token(&self) -> Option<String> {
        self.tokens.user_token().await
    }

    /// Returns the HTTP session, opening one if this client has none yet.
    pub(crate) async fn session(&self) -> Result<&reqwest::Client> {
        self.session
            .get_or_try_init(|| async {
                tracing::debug!("opening HTTP session");
                reqwest::Client::builder().build().map_err(Error::Connection)
            })
            .await
    }

    /// Returns the session that never follows redirects, opening it on first use.
    ///
    /// A caller-supplied session cannot stand in for it: its redirect policy is unknown, and a
    /// redirected token request would re-post the app secret to wherever it points.
    async fn redirectless_session(&self) -> Result<&reqwest::Client> {
        self.redirectless_session
            .get_or_try_init(|| async { self.authenticator.open_session() })
            .await
    }

    /// Releases the HTTP sessions this client opened.
    ///
    /// A session supplied through [`ClientConfig`] is left alone. Using the client after
    /// `close` opens fresh sessions.
    pub fn close(&mut self) {
        self.redirectless_session.take();
        if self.owns_session && self.session.take().is_some() {
            tracing::debug!("closed HTTP session");
        }
    }

    fn app_credentials(&self) -> Result<(&ClientId, &ClientSecret)> {
        let Some(app_id) = &self.app_id else {
            return Err(Error::validation("an app id is required"));
        };
        let Some(app_secret) = &self.app_secret else {
            return Err(Error::MissingAppSecret);
        };
        Ok((app_id, app_secret))
    }

    /// Refreshes the user token now, regardless of its expiry.
    ///
    /// The refreshed credential keeps the scopes of the one it replaces.
    ///
    /// # Errors
    ///
    /// * [`Error::Unauthorized`] - no user authentication is set
    /// * [`Error::Authorization`] - the user credential has no refresh token
    /// * [`Error::MissingAppSecret`] - the client was configured without an app secret
    /// * Any error of [`Authenticator::refresh_user_token`]
    #[instrument(skip(self))]
    pub async fn refresh_user_auth(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_user_credential().await
    }

    /// Refreshes and stores the user credential. Callers must hold `refresh_lock`.
    pub(crate) async fn refresh_user_credential(&self) -> Result<()> {
        let Some(credential) = self.tokens.user_credential().await else {
            return Err(Error::Unauthorized(
                "no user authentication is set".to_string(),
            ));
        };
        let Some(refresh_token) = credential.refresh_token() else {
            tracing::warn!("no refresh token available, cannot refresh");
            return Err(Error::Authorization(
                "no refresh token available".to_string(),
            ));
        };
        let (app_id, app_secret) = self.app_credentials()?;

        let session = self.redirectless_session().await?;
        let refreshed = self
            .authenticator
            .refresh_user_token(refresh_token, app_id, app_secret, Some(session))
            .await?;

        let renewed = Credential::new(
            CredentialKind::User,
            refreshed.access_token,
            credential.scopes().clone(),
            Some(refreshed.refresh_token),
        )
        .expiring_in(refreshed.expires_in);
        self.tokens.replace(CredentialKind::User, renewed).await;
        tracing::debug!("access token successfully refreshed");
        Ok(())
    }

    /// Obtains an app access token for `scopes` and stores it.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingAppSecret`] - the client was configured without an app secret
    /// * [`Error::MissingScope`] - `scopes` is empty
    /// * Any error of [`Authenticator::issue_app_token`]
    #[instrument(skip(self))]
    pub async fn authenticate_app(&self, scopes: &[AuthScope]) -> Result<()> {
        let (app_id, app_secret) = self.app_credentials()?;
        if scopes.is_empty() {
            return Err(Error::MissingScope("no scope was provided".to_string()));
        }

        let session = self.redirectless_session().await?;
        let token = self
            .authenticator
            .issue_app_token(app_id, app_secret, scopes, Some(session))
            .await?;

        let credential = Credential::new(
            CredentialKind::App,
            token.access_token,
            scopes.iter().copied().collect(),
            None,
        )
        .expiring_in(token.expires_in);
        self.tokens.replace(CredentialKind::App, credential).await;
        Ok(())
    }

    /// Returns a stream over every item of the list endpoint at `path`.
    ///
    /// `params` are sent with every page request; the page token is added per page. With
    /// `split_lists`, list-valued parameters become repeated parameters.
    fn paginate<T>(
        &self,
        path: &'static str,
        params: QueryParams,
        split_lists: bool,
        decode: Decoder<T>,
    ) -> impl Stream<Item = Result<T>> + use<'_, T> {
        let base = format!("{}{}", self.api_base_url, path);
        let opts = UrlOptions {
            remove_none: true,
            split_lists,
            ..Default::default()
        };
        PagedStream::new(
            move |page_token: Option<String>| {
                let mut params = params.clone();
                params.push(("pageToken", page_token.into()));
                let url = build_url(&base, &params, opts);
                async move { self.fetch_page(url).await }
            },
            None,
            decode,
        )
    }

    /// Fetches and parses one page of a list endpoint.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn fetch_page(&self, url: String) -> Result<Page> {
        let response = self.execute(RequestMethod::Get, &url).await?;
        let body = response.bytes().await.map_err(Error::Connection)?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }

    /// Returns a paginated stream of the videos with the given IDs.
    ///
    /// Uses the `videos.list` API. Only the requested `parts` are populated on the returned
    /// [`Video`]s; reading any other part fails with [`Error::PartMissing`].
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Validation`] before any request is made if `video_ids` or `parts`
    /// is empty.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self, video_ids))]
    pub fn get_videos<I, S>(
        &self,
        video_ids: I,
        parts: &[VideoPart],
    ) -> Result<impl Stream<Item = Result<Video>> + use<'_, I, S>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let video_ids: Vec<String> = video_ids.into_iter().map(Into::into).collect();
        if video_ids.is_empty() {
            return Err(Error::validation("at least one video id has to be set"));
        }
        let params = vec![
            ("part", part_param(parts)?),
            ("id", QueryValue::list(video_ids)),
        ];
        Ok(self.paginate("videos", params, true, decode_item::<Video>))
    }

    /// Gets a single video by its ID, or `None` if YouTube returned nothing for it.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self))]
    pub async fn get_video(&self, video_id: &str, parts: &[VideoPart]) -> Result<Option<Video>> {
        first(self.get_videos([video_id], parts)?).await
    }

    /// Returns a paginated stream of the channels with the given IDs.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self, channel_ids))]
    pub fn get_channels<I, S>(
        &self,
        channel_ids: I,
        parts: &[ChannelPart],
    ) -> Result<impl Stream<Item = Result<Channel>> + use<'_, I, S>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channel_ids: Vec<String> = channel_ids.into_iter().map(Into::into).collect();
        if channel_ids.is_empty() {
            return Err(Error::validation("at least one channel id has to be set"));
        }
        let params = vec![
            ("part", part_param(parts)?),
            ("id", QueryValue::list(channel_ids)),
        ];
        Ok(self.paginate("channels", params, true, decode_item::<Channel>))
    }

    /// Gets a single channel by its ID, or `None` if YouTube returned nothing for it.
    #[instrument(skip(self))]
    pub async fn get_channel(
        &self,
        channel_id: &str,
        parts: &[ChannelPart],
    ) -> Result<Option<Channel>> {
        first(self.get_channels([channel_id], parts)?).await
    }

    /// Returns a paginated stream of YouTube channels owned by the authenticated user.
    ///
    /// Uses the `channels.list` API with `mine=true`. This typically returns one channel for
    /// personal accounts, but may return several for brand accounts.
    ///
    /// # Required Scopes
    ///
    /// Any of:
    /// * `https://www.googleapis.com/auth/youtube.readonly`
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self))]
    pub async fn get_user_channels(
        &self,
        parts: &[ChannelPart],
    ) -> Result<impl Stream<Item = Result<Channel>>> {
        self.tokens.require_user_scope(&AuthScope::READ).await?;
        let params = vec![
            ("part", part_param(parts)?),
            ("mine", QueryValue::from(true)),
        ];
        Ok(self.paginate("channels", params, false, decode_item::<Channel>))
    }

    /// Returns a paginated stream of the items in a playlist.
    ///
    /// Pass a channel's [`Channel::upload_playlist_id`] to walk all of its uploads.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/list>
    #[instrument(skip(self))]
    pub fn get_playlist_items(
        &self,
        playlist_id: &str,
        parts: &[PlaylistItemPart],
    ) -> Result<impl Stream<Item = Result<PlaylistItem>> + use<'_>> {
        if playlist_id.is_empty() {
            return Err(Error::validation("a playlist id has to be set"));
        }
        let params = vec![
            ("part", part_param(parts)?),
            ("playlistId", QueryValue::from(playlist_id)),
            ("maxResults", QueryValue::from(50u32)),
        ];
        Ok(self.paginate(
            "playlistItems",
            params,
            false,
            decode_item::<PlaylistItem>,
        ))
    }

    /// Returns a paginated stream of the authenticated user's subscriptions.
    ///
    /// # Required Scopes
    ///
    /// Any of:
    /// * `https://www.googleapis.com/auth/youtube.readonly`
    /// * `https://www.googleapis.com/auth/youtube`
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/subscriptions/list>
    #[instrument(skip(self))]
    pub async fn get_user_subscriptions(
        &self,
        parts: &[SubscriptionPart],
    ) -> Result<impl Stream<Item = Result<Subscription>>> {
        self.tokens.require_user_scope(&AuthScope::READ).await?;
        let params = vec![
            ("part", part_param(parts)?),
            ("mine", QueryValue::from(true)),
        ];
        Ok(self.paginate(
            "subscriptions",
            params,
            false,
            decode_item::<Subscription>,
        ))
    }

    /// Checks whether a video is a YouTube Short.
    ///
    /// YouTube serves `/shorts/<id>` directly for shorts and redirects to the regular watch page
    /// for everything else, so this issues a `HEAD` request without following redirects.
    ///
    /// The request goes through the client's own redirect-less session even when a session
    /// was supplied through [`ClientConfig`].
    #[instrument(skip(self), ret)]
    pub async fn is_short(&self, video_id: &str) -> Result<bool> {
        let client = self.redirectless_session().await?;
        let url = format!("{}{}", self.shorts_base_url, video_id);

        let response = tokio::time::timeout(
            self.request_timeout,
            client.request(RequestMethod::Head.as_http(), &url).send(),
        )
        .await
        .map_err(|_| Error::Timeout)?
        .map_err(Error::Connection)?;

        Ok(response.status() == StatusCode::OK)
    }
}
