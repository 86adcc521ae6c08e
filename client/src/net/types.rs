//! Shared wire-protocol DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! Every backend response is wrapped in a `{code, status, data}` envelope;
//! error responses carry `{message, errors?}` in `data`. These types mirror
//! that shape so serde round-trips stay lossless. Ids and timestamps stay
//! wire strings; nothing in the client parses them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Account role as reported by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Whether this role grants access to the admin dashboard.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// Profile snapshot for a blog account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Login handle, unique per account.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Display name shown on published posts.
    pub full_name: String,
    /// Optional author biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar image URL, if set.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Account role; defaults to the regular-user role when omitted.
    #[serde(default)]
    pub role: Role,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Whether the email address has been verified.
    pub is_verified: bool,
    /// Creation timestamp (RFC 3339 string).
    pub created_at: String,
    /// Last-update timestamp (RFC 3339 string).
    pub updated_at: String,
}

/// `POST /api/auth/login` input.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register` input.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Token pair minted by login, register and refresh. The backend rotates the
/// refresh token on every use; the previous one is dead once this arrives.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Full auth payload returned by login and register (auto-login semantics):
/// the user profile plus a flat token pair.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Response envelope wrapping every backend payload.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub status: String,
    pub data: T,
}

/// Error payload carried in the envelope of a failed request.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// Per-field validation details, when the backend provides them.
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}
