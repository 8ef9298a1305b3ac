//! OAuth 2.0 token endpoint operations.
//!
//! The [`Authenticator`] only talks to the token endpoint. It never stores what it obtains:
//! callers decide where the new credentials go (normally the client's
//! [`TokenStore`](crate::TokenStore)).

use crate::error::{Error, Result};
use crate::scope::{AuthScope, build_scope};
use oauth2::{AccessToken, ClientId, ClientSecret, RefreshToken};
use serde::Deserialize;
use std::time::Duration;

/// Google OAuth2 token endpoint URL used for both app authentication and token refresh.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Result of a successful user token refresh.
#[derive(Debug, Clone)]
pub struct RefreshedToken {
    pub access_token: AccessToken,
    /// The refresh token to use next time.
    ///
    /// Google usually does not rotate refresh tokens, in which case this is the one that was
    /// passed in.
    pub refresh_token: RefreshToken,
    pub expires_in: Option<Duration>,
}

/// Result of a successful app token request.
#[derive(Debug, Clone)]
pub struct AppToken {
    pub access_token: AccessToken,
    pub expires_in: Option<Duration>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenEndpointResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

/// Obtains and refreshes access tokens against an OAuth 2.0 token endpoint.
#[derive(Debug, Clone)]
pub struct Authenticator {
    token_url: String,
    timeout: Option<Duration>,
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new(TOKEN_URL)
    }
}

impl Authenticator {
    /// Creates an authenticator for the given token endpoint.
    pub fn new(token_url: impl Into<String>) -> Self {
        Self {
            token_url: token_url.into(),
            timeout: None,
        }
    }

    /// Sets the deadline for each token endpoint call, whichever session it goes through.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Exchanges a refresh token for a new user access token.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The refresh token of the current user credential
    /// * `app_id` - The OAuth client ID of the application
    /// * `app_secret` - The OAuth client secret of the application
    /// * `session` - An HTTP client to reuse; if `None`, one is created for this call only
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidRefreshToken`] - the endpoint answered 400
    /// * [`Error::Unauthorized`] - the endpoint answered 401, e.g. because access was revoked
    /// * [`Error::Authorization`] - a redirect, any other failure status, or an unusable
    ///   response body
    /// * [`Error::Timeout`] - the call outlived the deadline set with [`Self::with_timeout`]
    #[tracing::instrument(skip_all)]
    pub async fn refresh_user_token(
        &self,
        refresh_token: &RefreshToken,
        app_id: &ClientId,
        app_secret: &ClientSecret,
        session: Option<&reqwest::Client>,
    ) -> Result<RefreshedToken> {
        tracing::debug!("attempting to refresh OAuth token");
        let form = [
            ("refresh_token", refresh_token.secret().as_str()),
            ("client_id", app_id.as_str()),
            ("grant_type", "refresh_token"),
            ("client_secret", app_secret.secret().as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];
        let (access_token, response) = self.post_form(&form, session).await?;
        tracing::debug!(
            rotated = response.refresh_token.is_some(),
            "successfully refreshed OAuth token"
        );

        Ok(RefreshedToken {
            access_token,
            refresh_token: response
                .refresh_token
                .map(RefreshToken::new)
                .unwrap_or_else(|| refresh_token.clone()),
            expires_in: response.expires_in.map(Duration::from_secs),
        })
    }

    /// Requests an application access token using the client credentials grant.
    ///
    /// Errors are classified exactly as for [`Self::refresh_user_token`].
    #[tracing::instrument(skip(self, app_secret, session))]
    pub async fn issue_app_token(
        &self,
        app_id: &ClientId,
        app_secret: &ClientSecret,
        scopes: &[AuthScope],
        session: Option<&reqwest::Client>,
    ) -> Result<AppToken> {
        let scope = build_scope(scopes);
        let form = [
            ("client_id", app_id.as_str()),
            ("client_secret", app_secret.secret().as_str()),
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ];
        let (access_token, response) = self.post_form(&form, session).await?;
        tracing::debug!("obtained app access token");

        Ok(AppToken {
            access_token,
            expires_in: response.expires_in.map(Duration::from_secs),
        })
    }

    /// POSTs `form` to the token endpoint and classifies the answer.
    async fn post_form(
        &self,
        form: &[(&str, &str)],
        session: Option<&reqwest::Client>,
    ) -> Result<(AccessToken, TokenEndpointResponse)> {
        // A session we open here lives only until this function returns.
        let owned;
        let client = match session {
            Some(client) => client,
            None => {
                owned = self.open_session()?;
                &owned
            }
        };

        let exchange = async {
            let response = client
                .post(&self.token_url)
                .form(form)
                .send()
                .await
                .map_err(Error::Connection)?;
            let status = response.status();
            let body = response.bytes().await.map_err(Error::Connection)?;
            Ok::<_, Error>((status, body))
        };
        let (status, body) = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .map_err(|_| Error::Timeout)??,
            None => exchange.await?,
        };
        let parsed = serde_json::from_slice::<TokenEndpointResponse>(&body);

        let error_text = || {
            parsed
                .as_ref()
                .ok()
                .and_then(|r| r.error.clone())
                .unwrap_or_default()
        };
        match status.as_u16() {
            400 => return Err(Error::InvalidRefreshToken(error_text())),
            401 => return Err(Error::Unauthorized(error_text())),
            300..=399 => {
                return Err(Error::Authorization(format!(
                    "token endpoint tried to redirect (status {status})"
                )));
            }
            _ if !status.is_success() => {
                return Err(Error::Authorization(format!(
                    "token endpoint answered with status {status}"
                )));
            }
            _ => {}
        }

        let mut response = parsed.map_err(|e| {
            Error::Authorization(format!("malformed token endpoint response: {e}"))
        })?;
        let Some(access_token) = response.access_token.take() else {
            return Err(Error::Authorization(
                "token endpoint response lacks access_token".to_string(),
            ));
        };
        Ok((AccessToken::new(access_token), response))
    }

    /// Opens a session suitable for token calls: it never follows redirects.
    pub(crate) fn open_session(&self) -> Result<reqwest::Client> {
        reqwest::ClientBuilder::new()
            // SSRF no thank you.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(Error::Connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> (RefreshToken, ClientId, ClientSecret) {
        (
            RefreshToken::new("asdasd".to_string()),
            ClientId::new("app_id".to_string()),
            ClientSecret::new("app_secret".to_string()),
        )
    }

    async fn authenticator(server: &MockServer) -> Authenticator {
        Authenticator::new(format!("{}/token", server.uri()))
    }

    #[tokio::test]
    async fn test_refresh_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string(
                "refresh_token=asdasd&client_id=app_id&grant_type=refresh_token&\
                 client_secret=app_secret&access_type=offline&prompt=consent",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "new_access",
                "expires_in": 3599,
                "scope": "https://www.googleapis.com/auth/youtube.readonly",
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (refresh, id, secret) = credentials();
        let session = reqwest::Client::new();
        let token = authenticator(&server)
            .await
            .refresh_user_token(&refresh, &id, &secret, Some(&session))
            .await
            .unwrap();
        assert_eq!(token.access_token.secret(), "new_access");
        // not rotated, so the old one carries over
        assert_eq!(token.refresh_token.secret(), "asdasd");
        assert_eq!(token.expires_in, Some(Duration::from_secs(3599)));
    }

    #[tokio::test]
    async fn test_refresh_access_token_new_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "new_access",
                "refresh_token": "rotated"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (refresh, id, secret) = credentials();
        let token = authenticator(&server)
            .await
            .refresh_user_token(&refresh, &id, &secret, None)
            .await
            .unwrap();
        assert_eq!(token.access_token.secret(), "new_access");
        assert_eq!(token.refresh_token.secret(), "rotated");
        assert_eq!(token.expires_in, None);
    }

    #[tokio::test]
    async fn test_refresh_access_token_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let (refresh, id, secret) = credentials();
        let err = authenticator(&server)
            .await
            .refresh_user_token(&refresh, &id, &secret, None)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, Error::InvalidRefreshToken(e) if e == "invalid_grant"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_refresh_access_token_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "unauthorized_client"})),
            )
            .mount(&server)
            .await;

        let (refresh, id, secret) = credentials();
        let err = authenticator(&server)
            .await
            .refresh_user_token(&refresh, &id, &secret, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_refresh_access_token_other_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let (refresh, id, secret) = credentials();
        let auth = authenticator(&server).await;
        for _ in 0..3 {
            let err = auth
                .refresh_user_token(&refresh, &id, &secret, None)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Authorization(_)), "{err:?}");
        }
    }

    #[tokio::test]
    async fn test_refresh_access_token_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let (refresh, id, secret) = credentials();
        // a caller-supplied session without a timeout of its own
        let session = reqwest::Client::new();
        let auth = authenticator(&server)
            .await
            .with_timeout(Duration::from_millis(100));
        let started = std::time::Instant::now();
        let err = auth
            .refresh_user_token(&refresh, &id, &secret, Some(&session))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_refresh_access_token_redirect_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(307).insert_header("Location", "/elsewhere"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "x"})))
            .expect(0)
            .mount(&server)
            .await;

        let (refresh, id, secret) = credentials();
        let err = authenticator(&server)
            .await
            .refresh_user_token(&refresh, &id, &secret, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authorization(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_issue_app_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains(
                "scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fyoutube.readonly",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "app_access",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (_, id, secret) = credentials();
        let token = authenticator(&server)
            .await
            .issue_app_token(&id, &secret, &[AuthScope::ReadOnly], None)
            .await
            .unwrap();
        assert_eq!(token.access_token.secret(), "app_access");
        assert_eq!(token.expires_in, Some(Duration::from_secs(3600)));
    }
}
