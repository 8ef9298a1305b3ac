//! Authenticated request execution and response classification.

use crate::error::{Error, Result};
use crate::youtube_api::client::YouTubeClient;
use http::Method;
use http::header::CONTENT_TYPE;
use std::fmt;
use tracing::instrument;

/// HTTP methods the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Head,
}

impl RequestMethod {
    pub fn as_http(&self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Head => Method::HEAD,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_http())
    }
}

impl YouTubeClient {
    /// Makes an authenticated HTTP request to the YouTube API with common error handling.
    ///
    /// This method consolidates the shared logic across all YouTube API requests:
    /// - Token freshness validation and refresh
    /// - Authorization header setup
    /// - The per-request deadline
    /// - Status code and content type validation
    ///
    /// # Returns
    ///
    /// The raw [`reqwest::Response`]; the body is left for the caller to parse.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    pub(crate) async fn execute(&self, method: RequestMethod, url: &str) -> Result<reqwest::Response> {
        let access_token = self.fresh_access_token().await?;
        let session = self.session().await?;

        let mut request = session.request(method.as_http(), url);
        if let Some(access_token) = access_token {
            request = request.header("Authorization", format!("Bearer {}", access_token));
        }

        tracing::debug!(%method, url, "making request");
        tokio::time::timeout(self.request_timeout, async {
            let response = request.send().await.map_err(Error::Connection)?;
            check_response(response).await
        })
        .await
        .map_err(|_| Error::Timeout)?
    }

    /// Gets the token to send with the next request, refreshing it first if necessary.
    ///
    /// The user token is preferred over the app token. Neither being set is not an error; the
    /// request is then sent unauthenticated.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    pub(crate) async fn fresh_access_token(&self) -> Result<Option<String>> {
        if self.tokens.auto_refresh()
            && let Some(credential) = self.tokens.user_credential().await
            && credential.is_expired()
        {
            let _guard = self.refresh_lock.lock().await;
            // another request may have refreshed while we waited for the lock
            if self
                .tokens
                .user_credential()
                .await
                .is_some_and(|c| c.is_expired())
            {
                tracing::debug!("access token expired, attempting refresh");
                self.refresh_user_credential().await?;
            }
        }

        if let Some(token) = self.tokens.user_token().await {
            return Ok(Some(token));
        }
        Ok(self.tokens.app_token().await)
    }
}

/// Maps an API response to an error based on its status and content type.
///
/// The first matching rule wins: 500, 404, 403, 401, 400, other 4xx, other 5xx. A successful
/// response must carry a JSON body.
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    match status.as_u16() {
        500 => Err(Error::Backend(status)),
        404 => Err(Error::ResourceNotFound),
        403 => Err(Error::Forbidden),
        401 => Err(Error::Unauthorized(
            error_message(response)
                .await
                .unwrap_or_else(|| "request was not authorized".to_string()),
        )),
        400 => Err(Error::BadRequest {
            message: error_message(response).await,
        }),
        400..=499 => Err(Error::Api(format!("request failed with status {status}"))),
        500..=599 => Err(Error::Backend(status)),
        _ if !status.is_success() => Err(Error::Api(format!("unexpected status {status}"))),
        _ if !is_json(&response) => Err(Error::Api("unexpected response type".to_string())),
        _ => Ok(response),
    }
}

fn is_json(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Extracts the error message of a failed response, if it has one.
///
/// Looks at a top-level `message` first and then at Google's `{"error": {"message": ..}}`.
async fn error_message(response: reqwest::Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("message")
        .or_else(|| body.pointer("/error/message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn respond(template: ResponseTemplate) -> Result<reqwest::Response> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check"))
            .respond_with(template)
            .mount(&server)
            .await;
        let response = reqwest::get(format!("{}/check", server.uri()))
            .await
            .unwrap();
        check_response(response).await
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let err = respond(ResponseTemplate::new(500)).await.unwrap_err();
        assert!(matches!(err, Error::Backend(s) if s.as_u16() == 500), "{err:?}");

        let err = respond(ResponseTemplate::new(503)).await.unwrap_err();
        assert!(matches!(err, Error::Backend(s) if s.as_u16() == 503), "{err:?}");

        let err = respond(ResponseTemplate::new(404)).await.unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound), "{err:?}");

        let err = respond(ResponseTemplate::new(403)).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden), "{err:?}");

        let err = respond(ResponseTemplate::new(401)).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)), "{err:?}");

        let err = respond(ResponseTemplate::new(429)).await.unwrap_err();
        assert!(matches!(err, Error::Api(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_bad_request_message() {
        let err = respond(ResponseTemplate::new(400).set_body_json(json!({"message": "bad"})))
            .await
            .unwrap_err();
        assert!(
            matches!(&err, Error::BadRequest { message: Some(m) } if m == "bad"),
            "{err:?}"
        );

        let err = respond(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "invalid part"}
        })))
        .await
        .unwrap_err();
        assert!(
            matches!(&err, Error::BadRequest { message: Some(m) } if m == "invalid part"),
            "{err:?}"
        );

        let err = respond(ResponseTemplate::new(400).set_body_string("nope"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::BadRequest { message: None }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_success_requires_json() {
        let response = respond(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .await
            .unwrap();
        assert!(response.status().is_success());

        let err = respond(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(_)), "{err:?}");

        // parameters on the media type are fine
        let ok = respond(
            ResponseTemplate::new(200)
                .set_body_raw("{}", "application/json; charset=UTF-8"),
        )
        .await;
        assert!(ok.is_ok(), "{ok:?}");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(RequestMethod::Get.to_string(), "GET");
        assert_eq!(RequestMethod::Head.as_http(), Method::HEAD);
    }
}
