// Admin REST API HTTP client
//
// Wraps `reqwest::Client` with `/api/v1` URL construction, bearer-token
// injection, and envelope parsing. Endpoint groups (users, roles, ...) are
// implemented as inherent methods in `crate::endpoints` to keep this module
// focused on transport mechanics.

use std::sync::RwLock;

use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape: the backend reuses the envelope for failures.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Raw HTTP client for the admin backend.
///
/// All paths are relative to `{base_url}/api/v1/`. Secured endpoints send
/// `Authorization: Bearer <token>` once a token has been stored, either by
/// [`login`](Self::login) or [`set_token`](Self::set_token).
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://admin.example.com`);
    /// the `/api/v1` prefix is appended here.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            token: RwLock::new(None),
        })
    }

    /// Ensure the base URL ends with `/api/v1/` so relative joins work.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/v1/"));
        }
        Ok(url)
    }

    /// The resolved API root (always ends with `/api/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Store a bearer token for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing access token");
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    /// Forget the stored token.
    pub fn clear_token(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_ok_and(|guard| guard.is_some())
    }

    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let Ok(guard) = self.token.read() else {
            return builder;
        };
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"users/3"`) onto the API root.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.apply_token(self.http.get(url)).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .apply_token(self.http.get(url).query(params))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<bytes::Bytes, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (binary)");

        let resp = self.apply_token(self.http.get(url)).send().await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.bytes().await?)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .apply_token(self.http.post(url).json(body))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (multipart)");

        let resp = self
            .apply_token(self.http.post(url).multipart(form))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self
            .apply_token(self.http.patch(url).json(body))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.apply_token(self.http.delete(url)).send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map non-2xx responses to errors, passing successful ones through.
    ///
    /// The message follows the backend body first, then the transport
    /// message, then the literal `"Error"`.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let transport_message = status.canonical_reason().map(str::to_owned);
        let body = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
        let code = parsed.as_ref().and_then(|b| b.code);
        let message = parsed
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .or(transport_message)
            .unwrap_or_else(|| "Error".to_owned());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication { message });
        }

        Err(Error::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        trace!(len = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            }
        })
    }
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
