//! HTTP transport seam between session logic and the browser fetch stack.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`. Server-side (SSR):
//! a stub failing with a network error, since these calls are only
//! meaningful in the browser. Tests script the trait directly.

use crate::net::error::ApiError;

/// A single REST call to the gateway.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: &'static str, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, bearer: None }
    }

    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// Raw response: status plus body text. Non-2xx statuses are data, not
/// `Err`; classification happens above this seam.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues HTTP requests. `Err` is reserved for transport-level failures
/// (connectivity, CORS); HTTP error statuses come back as `Ok`.
#[async_trait::async_trait(?Send)]
pub trait AuthTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Browser transport backed by `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
fn builder_for(method: &'static str, url: &str) -> gloo_net::http::RequestBuilder {
    use gloo_net::http::Request;
    match method {
        "POST" => Request::post(url),
        "PUT" => Request::put(url),
        "PATCH" => Request::patch(url),
        "DELETE" => Request::delete(url),
        _ => Request::get(url),
    }
}

#[async_trait::async_trait(?Send)]
impl AuthTransport for GlooTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let network = |e: gloo_net::Error| ApiError::NetworkError { message: e.to_string() };

            let mut builder = builder_for(req.method, &req.path);
            if let Some(token) = &req.bearer {
                builder = builder.header("Authorization", &format!("Bearer {token}"));
            }
            let request = match &req.body {
                Some(json) => builder.json(json).map_err(network)?,
                None => builder.build().map_err(network)?,
            };
            let resp = request.send().await.map_err(network)?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = req;
            Err(ApiError::NetworkError { message: "not available on server".to_owned() })
        }
    }
}
