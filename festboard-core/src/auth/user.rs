//! Identity as reported by the API, and the shape the rest of the crate works with

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity endpoint, returns [`MeResponse`]
pub const ME_ENDPOINT: &str = "/users/me";
/// Login endpoint, takes [`LoginRequest`] and returns [`LoginResponse`]
pub const LOGIN_ENDPOINT: &str = "/users/login";

#[derive(Debug, Clone, Deserialize)]
pub struct PermissionPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RolePayload {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub team_id: Option<String>,
    pub role: RolePayload,
}

/// `GET /users/me`
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: UserPayload,
}

/// `POST /users/login` success body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPayload,
}

/// `POST /users/login` request body
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    pub role_name: String,
    /// Permission names granted through the role
    pub permissions: BTreeSet<String>,
}

impl User {
    /// Whether the role lists `permission`. Ignores super-admin status.
    pub fn lists_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        Self {
            id: payload.id,
            username: payload.username,
            team_id: payload.team_id.filter(|t| !t.is_empty()),
            role_id: payload.role.id,
            role_name: payload.role.name,
            permissions: payload.role.permissions.into_iter().map(|p| p.name).collect(),
        }
    }
}
