//! Typed client for the speech service REST API.
//!
//! The bearer token comes from the shared [`AuthContext`]. A 401 on an
//! authenticated endpoint logs the user out before the error is returned.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::config::ApiConfig;
use crate::domain::{
    AppError, Credentials, ProfileUpdate, Registration, Result, Session, Speech, SpeechDraft,
    SpeechId, User,
};

use super::auth_context::AuthContext;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Error body shape used by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// REST client bound to one API base URL and one auth context.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Arc<AuthContext>,
}

impl ApiClient {
    /// Build a client from the API configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is empty or invalid, or the HTTP client
    /// cannot be built.
    pub fn new(config: &ApiConfig, auth: Arc<AuthContext>) -> Result<Self> {
        let raw = config.base_url.trim().trim_end_matches('/');
        if raw.is_empty() {
            return Err(AppError::Config {
                message: "API base URL is empty".into(),
            });
        }
        let base_url = Url::parse(raw).map_err(|e| AppError::Config {
            message: format!("Invalid API base URL {raw}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config {
                message: format!("API base URL cannot carry a path: {raw}"),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `POST /api/auth/login`. Does not store the returned token.
    ///
    /// # Errors
    /// `InvalidCredentials` when the server rejects the login.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let request = self
            .request(Method::POST, &["api", "auth", "login"])?
            .json(credentials);
        let response = dispatch(request).await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                Err(AppError::InvalidCredentials)
            }
            _ => decode(check(response, "login").await?).await,
        }
    }

    /// `POST /api/auth/register`.
    ///
    /// # Errors
    /// `EmailInUse` on a 409 response.
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let request = self
            .request(Method::POST, &["api", "auth", "register"])?
            .json(registration);
        let response = dispatch(request).await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(AppError::EmailInUse);
        }
        check(response, "registration").await?;
        Ok(())
    }

    /// `GET /api/users/me`.
    ///
    /// # Errors
    /// Returns error on missing/expired session or API failure.
    pub async fn current_user(&self) -> Result<User> {
        let request = self.authed(Method::GET, &["api", "users", "me"])?;
        decode(self.send_authed(request, "user profile").await?).await
    }

    /// `PUT /api/users/me`.
    ///
    /// # Errors
    /// Returns error on missing/expired session or API failure.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let request = self.authed(Method::PUT, &["api", "users", "me"])?.json(update);
        self.send_authed(request, "user profile").await?;
        Ok(())
    }

    /// `GET /api/speeches`.
    ///
    /// # Errors
    /// Returns error on missing/expired session or API failure.
    pub async fn list_speeches(&self) -> Result<Vec<Speech>> {
        let request = self.authed(Method::GET, &["api", "speeches"])?;
        decode(self.send_authed(request, "speeches").await?).await
    }

    /// `GET /api/speeches/:id`.
    ///
    /// # Errors
    /// `NotFound` when the speech does not exist.
    pub async fn get_speech(&self, id: &SpeechId) -> Result<Speech> {
        let request = self.authed(Method::GET, &speech_segments(id)?)?;
        decode(self.send_authed(request, &format!("speech {id}")).await?).await
    }

    /// `POST /api/speeches`. Returns the created record when the API echoes it.
    ///
    /// # Errors
    /// Returns error on missing/expired session or API failure.
    pub async fn create_speech(&self, draft: &SpeechDraft) -> Result<Option<Speech>> {
        let request = self.authed(Method::POST, &["api", "speeches"])?.json(draft);
        let response = self.send_authed(request, "speeches").await?;

        let body = response.text().await.map_err(AppError::network)?;
        match serde_json::from_str(&body) {
            Ok(speech) => Ok(Some(speech)),
            Err(e) => {
                tracing::debug!(error = %e, "Create response carried no speech record");
                Ok(None)
            }
        }
    }

    /// `PUT /api/speeches/:id`.
    ///
    /// # Errors
    /// `NotFound` when the speech does not exist.
    pub async fn update_speech(&self, id: &SpeechId, draft: &SpeechDraft) -> Result<()> {
        let request = self.authed(Method::PUT, &speech_segments(id)?)?.json(draft);
        self.send_authed(request, &format!("speech {id}")).await?;
        Ok(())
    }

    /// `DELETE /api/speeches/:id`.
    ///
    /// # Errors
    /// `NotFound` when the speech does not exist.
    pub async fn delete_speech(&self, id: &SpeechId) -> Result<()> {
        let request = self.authed(Method::DELETE, &speech_segments(id)?)?;
        self.send_authed(request, &format!("speech {id}")).await?;
        Ok(())
    }

    /// Endpoint URL below the base. Each segment is percent-encoded on its own.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Config {
                message: format!("API base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request carrying the token when one is present.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let request = self.http.request(method, self.url(segments)?);
        Ok(match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Request for an endpoint that requires a token.
    fn authed(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let token = self.auth.token().ok_or(AppError::NotAuthenticated)?;
        Ok(self
            .http
            .request(method, self.url(segments)?)
            .bearer_auth(token))
    }

    async fn send_authed(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = dispatch(request).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Token rejected by the API, logging out");
            self.auth.logout()?;
            return Err(AppError::SessionExpired);
        }

        check(response, what).await
    }
}

async fn dispatch(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(AppError::network)?;
    tracing::debug!(
        status = response.status().as_u16(),
        url = %response.url(),
        "API response"
    );
    Ok(response)
}

/// Path of one speech. The id always stays a single segment below
/// `/api/speeches`; ids that cannot be one are never sent.
fn speech_segments(id: &SpeechId) -> Result<[&str; 3]> {
    match id.as_str() {
        "" | "." | ".." => Err(AppError::NotFound {
            what: format!("speech {id}"),
        }),
        raw => Ok(["api", "speeches", raw]),
    }
}

/// Map non-success statuses to errors.
async fn check(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound {
            what: what.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request for {what} failed"));

    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await.map_err(AppError::network)?;
    serde_json::from_str(&body).map_err(AppError::json_parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock_api::{client, spawn_api, TOKEN};
    use crate::infrastructure::token_store::MemoryTokenStore;

    #[test]
    fn test_rejects_empty_base_url() {
        let auth = Arc::new(AuthContext::load(Box::new(MemoryTokenStore::default())).unwrap());
        let config = ApiConfig {
            base_url: "  ".into(),
            timeout_secs: 5,
        };
        assert!(matches!(
            ApiClient::new(&config, auth),
            Err(AppError::Config { .. })
        ));
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let auth = Arc::new(AuthContext::load(Box::new(MemoryTokenStore::default())).unwrap());
        let config = ApiConfig {
            base_url: "localhost:3001".into(),
            timeout_secs: 5,
        };
        assert!(matches!(
            ApiClient::new(&config, auth),
            Err(AppError::Config { .. })
        ));
    }

    #[test]
    fn test_endpoint_urls_keep_base_path() {
        let api = client("https://speeches.example.com/v2/", None);
        assert_eq!(api.base_url(), "https://speeches.example.com/v2");
        assert_eq!(
            api.url(&["api", "speeches", "a/b?c#d"]).unwrap().as_str(),
            "https://speeches.example.com/v2/api/speeches/a%2Fb%3Fc%23d"
        );
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let (url, _) = spawn_api().await;
        let api = client(&url, None);
        assert_eq!(api.base_url(), url.trim_end_matches('/'));

        let session = api
            .login(&Credentials {
                email: "ana@example.com".into(),
                password: "Secret#123".into(),
            })
            .await
            .unwrap();
        assert_eq!(session.token, TOKEN);

        let rejected = api
            .login(&Credentials {
                email: "ana@example.com".into(),
                password: "wrong".into(),
            })
            .await;
        assert!(matches!(rejected, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_conflict_maps_to_email_in_use() {
        let (url, _) = spawn_api().await;
        let api = client(&url, None);

        let fresh = Registration {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "Secret#123".into(),
        };
        api.register(&fresh).await.unwrap();

        let taken = Registration {
            email: "taken@example.com".into(),
            ..fresh
        };
        assert!(matches!(
            api.register(&taken).await,
            Err(AppError::EmailInUse)
        ));
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let (url, _) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        let speeches = api.list_speeches().await.unwrap();
        assert_eq!(speeches.len(), 2);
        assert_eq!(speeches[0].id.as_str(), "1");
        assert_eq!(speeches[1].title, "Eulogy");

        let user = api.current_user().await.unwrap();
        assert_eq!(user.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_missing_token_fails_fast() {
        let (url, _) = spawn_api().await;
        let api = client(&url, None);
        assert!(matches!(
            api.list_speeches().await,
            Err(AppError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_rejected_token_forces_logout() {
        let (url, _) = spawn_api().await;
        let api = client(&url, Some("expired"));

        assert!(matches!(
            api.get_speech(&SpeechId::new("1")).await,
            Err(AppError::SessionExpired)
        ));
        assert!(!api.auth().is_authenticated());
        assert!(matches!(
            api.list_speeches().await,
            Err(AppError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_speech_crud_paths() {
        let (url, recorded) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        let fetched = api.get_speech(&SpeechId::new("b2")).await.unwrap();
        assert_eq!(fetched.id.as_str(), "b2");

        let missing = api.get_speech(&SpeechId::new("missing")).await;
        assert!(matches!(missing, Err(AppError::NotFound { .. })));

        let draft = SpeechDraft {
            title: "Keynote".into(),
            content: "<p>Hello</p>".into(),
        };
        let created = api.create_speech(&draft).await.unwrap().unwrap();
        assert_eq!(created.id.as_str(), "7");
        assert_eq!(recorded.bodies.lock().unwrap()[0]["title"], "Keynote");

        api.update_speech(&SpeechId::new("b2"), &draft).await.unwrap();
        let updates = recorded.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "b2");
        assert_eq!(updates[0].1["content"], "<p>Hello</p>");
    }

    #[tokio::test]
    async fn test_create_without_echoed_record_is_still_success() {
        let (url, recorded) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        let draft = SpeechDraft {
            title: "Draft only".into(),
            content: "<p>Hello</p>".into(),
        };
        let created = api.create_speech(&draft).await.unwrap();
        assert!(created.is_none());
        assert_eq!(recorded.bodies.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_of_missing_speech_is_not_found() {
        let (url, recorded) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        let draft = SpeechDraft {
            title: "Keynote".into(),
            content: "<p>Hello</p>".into(),
        };
        assert!(matches!(
            api.update_speech(&SpeechId::new("missing"), &draft).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(recorded.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_speech_id_stays_one_path_segment() {
        let (url, _) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        for raw in ["../users/me", "a/b", "what?now", "part#2", "%2e%2e"] {
            let fetched = api.get_speech(&SpeechId::new(raw)).await.unwrap();
            assert_eq!(fetched.id.as_str(), raw);
        }
    }

    #[tokio::test]
    async fn test_dot_segment_ids_are_never_sent() {
        let (url, recorded) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        for raw in ["", ".", ".."] {
            let id = SpeechId::new(raw);
            assert!(matches!(
                api.get_speech(&id).await,
                Err(AppError::NotFound { .. })
            ));
            assert!(matches!(
                api.delete_speech(&id).await,
                Err(AppError::NotFound { .. })
            ));
        }
        assert!(recorded.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_message_surfaces() {
        let (url, _) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        match api.delete_speech(&SpeechId::new("1")).await {
            Err(AppError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_profile_update_body() {
        let (url, recorded) = spawn_api().await;
        let api = client(&url, Some(TOKEN));

        api.update_profile(&ProfileUpdate {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            current_password: "Secret#123".into(),
            new_password: None,
        })
        .await
        .unwrap();

        let bodies = recorded.bodies.lock().unwrap();
        assert_eq!(bodies[0]["currentPassword"], "Secret#123");
        assert!(bodies[0].get("newPassword").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{addr}"), Some(TOKEN));
        assert!(matches!(
            api.list_speeches().await,
            Err(AppError::Network { .. })
        ));
    }
}
