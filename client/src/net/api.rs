//! Authenticated REST client with one-shot 401 recovery.
//!
//! ARCHITECTURE
//! ============
//! Per-request state machine: attach bearer → send → (on 401) refresh →
//! retry once. Auth endpoints are allow-listed out of the policy so a
//! failing refresh can never recurse into another refresh. Any non-401
//! failure is classified and propagated without a retry.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use serde::de::DeserializeOwned;

use crate::net::error::{ApiError, classify_response, decode_data};
use crate::net::transport::{ApiRequest, ApiResponse, AuthTransport};
use crate::state::session::SessionManager;
use crate::util::token_store::TokenStore;

/// Endpoints that authenticate by payload, not bearer token. They bypass
/// token attachment and the 401 recovery path entirely.
const PUBLIC_ENDPOINTS: &[&str] = &[
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/refresh",
    "/api/auth/logout",
];

#[must_use]
pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS.contains(&path)
}

/// REST client for everything behind authentication. Shares the session's
/// transport so scripted tests observe both layers through one seam.
pub struct ApiClient<T, S> {
    transport: Rc<T>,
    session: SessionManager<T, S>,
}

impl<T, S> Clone for ApiClient<T, S> {
    fn clone(&self) -> Self {
        Self { transport: Rc::clone(&self.transport), session: self.session.clone() }
    }
}

impl<T, S> ApiClient<T, S>
where
    T: AuthTransport + 'static,
    S: TokenStore + 'static,
{
    #[must_use]
    pub fn new(session: SessionManager<T, S>) -> Self {
        Self { transport: session.transport(), session }
    }

    /// Send a request through the attach/refresh/retry policy and return the
    /// successful response.
    ///
    /// # Errors
    ///
    /// The classified failure. After a 401: the retried outcome when the
    /// refresh succeeded, otherwise the refresh failure itself (not the
    /// original 401).
    pub async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        if is_public_endpoint(&req.path) {
            let resp = self.transport.send(req).await?;
            return if resp.ok() { Ok(resp) } else { Err(classify_response(resp.status, &resp.body)) };
        }

        let first = self
            .transport
            .send(req.clone().with_bearer(self.session.access_token()))
            .await?;
        if first.status != 401 {
            return if first.ok() {
                Ok(first)
            } else {
                Err(classify_response(first.status, &first.body))
            };
        }

        // Expired or missing access token. With nothing to refresh from, the
        // session is dead on the spot and the original 401 stands.
        if !self.session.has_refresh_token() {
            self.session.force_logout();
            return Err(classify_response(first.status, &first.body));
        }

        if let Err(err) = self.session.refresh().await {
            if err.is_auth_fatal() {
                self.session.force_logout();
            }
            return Err(err);
        }

        let retried = self
            .transport
            .send(req.with_bearer(self.session.access_token()))
            .await?;
        if retried.ok() {
            Ok(retried)
        } else {
            // A second 401 propagates as-is; there is no further recursion.
            Err(classify_response(retried.status, &retried.body))
        }
    }

    /// GET a typed payload out of the response envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; additionally [`ApiError::Decode`] when the
    /// envelope does not match `D`.
    pub async fn get_json<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        let resp = self.send(ApiRequest::new("GET", path)).await?;
        decode_data(&resp.body)
    }

    /// POST a JSON body and decode the typed response payload.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn post_json<D: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<D, ApiError> {
        let resp = self.send(ApiRequest::new("POST", path).with_json(body)).await?;
        decode_data(&resp.body)
    }

    /// PUT a JSON body and decode the typed response payload.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn put_json<D: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<D, ApiError> {
        let resp = self.send(ApiRequest::new("PUT", path).with_json(body)).await?;
        decode_data(&resp.body)
    }

    /// DELETE a resource, ignoring the response payload.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::new("DELETE", path)).await?;
        Ok(())
    }
}
