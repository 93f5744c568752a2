// Resource client
//
// Wraps `reqwest::Client` with base-URL joining, per-request bearer
// auth, and uniform response/error handling. Endpoint-specific methods
// (products, account) are inherent methods in separate files so this
// module stays focused on transport mechanics.

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::RequestContext;
use crate::endpoint::{Endpoint, Endpoints};
use crate::error::Error;
use crate::transport::TransportConfig;

const PREVIEW_CHARS: usize = 200;

// ── Error response shape ─────────────────────────────────────────────

/// Error payloads look like `{"message": "...", "error": "Not Found",
/// "statusCode": 404}`. `message` may also be an array of validation
/// messages, or missing entirely.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        let from_message = match self.message {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            Some(serde_json::Value::Array(items)) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        };
        from_message.or(self.error.filter(|s| !s.is_empty()))
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the catalogue REST API.
///
/// Cheap to clone (the inner `reqwest::Client` is reference counted).
/// Holds no credential of its own: every call takes a [`RequestContext`]
/// and the bearer header is attached to that one request only.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl ResourceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL (e.g. `https://api.example.com/api/v1`),
    /// a routing table, and transport settings.
    pub fn new(
        base_url: &str,
        endpoints: Endpoints,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, endpoints)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        endpoints: Endpoints,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            endpoints,
        })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The routing table used to build endpoint descriptors.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn builder(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &Endpoint,
    ) -> Result<RequestBuilder, Error> {
        let url = self.base_url.join(endpoint.path())?;
        debug!(%method, %url, authenticated = ctx.is_authenticated(), "sending request");

        let mut builder = self.http.request(method, url);
        if !endpoint.query().is_empty() {
            builder = builder.query(endpoint.query());
        }
        if let Some(credential) = ctx.credential() {
            builder = builder.bearer_auth(credential.expose());
        }
        Ok(builder)
    }

    /// Issue a request and decode the JSON response body.
    ///
    /// Attaches `Authorization: Bearer <token>` when `ctx` carries a
    /// credential. Never retries; non-2xx statuses come back as
    /// [`Error::Status`] untranslated.
    pub async fn request<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &Endpoint,
        body: Option<&serde_json::Value>,
    ) -> Result<T, Error> {
        let mut builder = self.builder(ctx, method, endpoint)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        endpoint: &Endpoint,
    ) -> Result<T, Error> {
        let resp = self.builder(ctx, Method::GET, endpoint)?.send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<T, Error> {
        let resp = self
            .builder(ctx, method, endpoint)?
            .json(body)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// Send a body-less request whose response payload is ignored.
    pub(crate) async fn send_empty(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &Endpoint,
    ) -> Result<(), Error> {
        let resp = self.builder(ctx, method, endpoint)?.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(parse_error(status, resp).await)
        }
    }
}

// ── Response handling ────────────────────────────────────────────────

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    trace!(len = body.len(), "response body received");
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let fallback = || {
        status
            .canonical_reason()
            .map_or_else(|| status.to_string(), str::to_owned)
    };

    let message = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(ErrorResponse::into_message)
        .unwrap_or_else(fallback);

    debug!(status = status.as_u16(), %message, "request failed");
    Error::Status {
        status: status.as_u16(),
        message,
        body: raw,
    }
}
