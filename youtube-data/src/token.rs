//! In-memory credential storage.
//!
//! A [`TokenStore`] holds at most one app credential and one user credential. Credentials are
//! immutable; every update swaps in a whole new [`Credential`], so a reader either sees the old
//! credential or the new one.

use crate::error::{Error, Result};
use crate::scope::AuthScope;
use oauth2::{AccessToken, RefreshToken};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Safety margin subtracted from `expires_in` so tokens are refreshed before they actually lapse.
const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

/// How a credential was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Issued to the application itself.
    App,
    /// Issued on behalf of a user.
    User,
}

/// An access token together with what it grants.
#[derive(Debug, Clone)]
pub struct Credential {
    token: AccessToken,
    refresh_token: Option<RefreshToken>,
    scopes: BTreeSet<AuthScope>,
    kind: CredentialKind,
    expires_at: Option<SystemTime>,
}

impl Credential {
    pub(crate) fn new(
        kind: CredentialKind,
        token: AccessToken,
        scopes: BTreeSet<AuthScope>,
        refresh_token: Option<RefreshToken>,
    ) -> Self {
        Self {
            token,
            refresh_token,
            scopes,
            kind,
            expires_at: None,
        }
    }

    /// Sets the expiry from an `expires_in` duration as reported by the token endpoint.
    pub(crate) fn expiring_in(mut self, expires_in: Option<Duration>) -> Self {
        self.expires_at = expires_in.map(|d| SystemTime::now() + d.saturating_sub(EXPIRY_BUFFER));
        self
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.token
    }

    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    pub fn scopes(&self) -> &BTreeSet<AuthScope> {
        &self.scopes
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// When this credential should be considered expired, if known.
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Whether the credential has passed its expiry. Credentials with unknown expiry never are.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| SystemTime::now() >= expires_at)
    }
}

/// Holds the app and user credentials of one client.
#[derive(Debug)]
pub struct TokenStore {
    app: RwLock<Option<Arc<Credential>>>,
    user: RwLock<Option<Arc<Credential>>>,
    auto_refresh: bool,
}

impl TokenStore {
    /// Creates an empty store.
    ///
    /// With `auto_refresh`, user credentials must come with a refresh token.
    pub fn new(auto_refresh: bool) -> Self {
        Self {
            app: RwLock::new(None),
            user: RwLock::new(None),
            auto_refresh,
        }
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    /// Stores an app credential, replacing any previous one.
    pub async fn set_app_credential(
        &self,
        token: impl Into<String>,
        scopes: impl IntoIterator<Item = AuthScope>,
    ) -> Result<()> {
        let scopes: BTreeSet<_> = scopes.into_iter().collect();
        if scopes.is_empty() {
            return Err(Error::MissingScope("no scope was provided".to_string()));
        }
        let credential = Credential::new(
            CredentialKind::App,
            AccessToken::new(token.into()),
            scopes,
            None,
        );
        self.replace(CredentialKind::App, credential).await;
        Ok(())
    }

    /// Stores a user credential, replacing any previous one.
    ///
    /// Fails with [`Error::Validation`] if auto-refresh is enabled and no `refresh_token` is
    /// given, and with [`Error::MissingScope`] if `scopes` is empty.
    pub async fn set_user_credential(
        &self,
        token: impl Into<String>,
        scopes: impl IntoIterator<Item = AuthScope>,
        refresh_token: Option<String>,
    ) -> Result<()> {
        let credential = self.user_credential_from(token.into(), scopes, refresh_token)?;
        self.replace(CredentialKind::User, credential).await;
        Ok(())
    }

    /// Like [`Self::set_user_credential`], for a token known to expire after `expires_in`.
    ///
    /// With auto-refresh enabled, the client refreshes such a credential before it is used past
    /// its expiry.
    pub async fn set_user_credential_expiring(
        &self,
        token: impl Into<String>,
        scopes: impl IntoIterator<Item = AuthScope>,
        refresh_token: Option<String>,
        expires_in: Duration,
    ) -> Result<()> {
        let credential = self
            .user_credential_from(token.into(), scopes, refresh_token)?
            .expiring_in(Some(expires_in));
        self.replace(CredentialKind::User, credential).await;
        Ok(())
    }

    fn user_credential_from(
        &self,
        token: String,
        scopes: impl IntoIterator<Item = AuthScope>,
        refresh_token: Option<String>,
    ) -> Result<Credential> {
        if refresh_token.is_none() && self.auto_refresh {
            return Err(Error::validation(
                "refresh_token has to be provided when auto_refresh_auth is enabled",
            ));
        }
        let scopes: BTreeSet<_> = scopes.into_iter().collect();
        if scopes.is_empty() {
            return Err(Error::MissingScope("no scope was provided".to_string()));
        }
        Ok(Credential::new(
            CredentialKind::User,
            AccessToken::new(token),
            scopes,
            refresh_token.map(RefreshToken::new),
        ))
    }

    /// Swaps in a complete credential of the given kind.
    pub(crate) async fn replace(&self, kind: CredentialKind, credential: Credential) {
        let slot = match kind {
            CredentialKind::App => &self.app,
            CredentialKind::User => &self.user,
        };
        *slot.write().await = Some(Arc::new(credential));
    }

    pub async fn user_credential(&self) -> Option<Arc<Credential>> {
        self.user.read().await.clone()
    }

    pub async fn app_credential(&self) -> Option<Arc<Credential>> {
        self.app.read().await.clone()
    }

    /// The current user access token, if user authentication is set.
    pub async fn user_token(&self) -> Option<String> {
        self.user_credential()
            .await
            .map(|c| c.token.secret().clone())
    }

    /// The current app access token, if app authentication is set.
    pub async fn app_token(&self) -> Option<String> {
        self.app_credential()
            .await
            .map(|c| c.token.secret().clone())
    }

    pub async fn has_user_auth(&self) -> bool {
        self.user.read().await.is_some()
    }

    /// Scopes granted to the user credential, empty if there is none.
    pub async fn user_scopes(&self) -> BTreeSet<AuthScope> {
        self.user_credential()
            .await
            .map(|c| c.scopes.clone())
            .unwrap_or_default()
    }

    /// Checks that a user credential is set and holds at least one of `any_of`.
    pub async fn require_user_scope(&self, any_of: &[AuthScope]) -> Result<()> {
        let Some(credential) = self.user_credential().await else {
            return Err(Error::Unauthorized(
                "this operation requires user authentication".to_string(),
            ));
        };
        if any_of.iter().any(|s| credential.scopes.contains(s)) {
            Ok(())
        } else {
            Err(Error::MissingScope(format!(
                "requires one of: {}",
                crate::scope::build_scope(any_of)
            )))
        }
    }

    /// Drops both credentials.
    pub async fn clear(&self) {
        *self.app.write().await = None;
        *self.user.write().await = None;
    }
}
