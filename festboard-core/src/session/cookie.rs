//! Session cookie mirror
//!
//! The token is mirrored into a cookie so the edge route guard can see it on navigation
//! requests. The cookie is written by the client, so it is never `HttpOnly`.

use super::storage::TokenStorage;
use super::SameSitePolicy;
use crate::config::SessionsConfig;
use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Cookie name
    pub name: String,

    /// Cookie path
    pub path: String,

    /// Secure flag (HTTPS only)
    pub secure: bool,

    /// SameSite policy
    pub same_site: SameSitePolicy,

    /// Max age in seconds
    pub max_age: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "token".to_string(),
            path: "/".to_string(),
            secure: true,
            same_site: SameSitePolicy::Strict,
            max_age: 7 * 24 * 60 * 60,
        }
    }
}

impl From<&SessionsConfig> for CookieConfig {
    fn from(config: &SessionsConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            path: "/".to_string(),
            secure: config.cookie_secure,
            same_site: config.cookie_samesite.parse().unwrap_or(SameSitePolicy::Strict),
            max_age: config.max_age_days as i64 * 24 * 60 * 60,
        }
    }
}

/// Session cookie builder
#[derive(Debug, Clone)]
pub struct SessionCookie {
    config: CookieConfig,
}

impl SessionCookie {
    /// Create a new session cookie builder
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn max_age(&self) -> i64 {
        self.config.max_age
    }

    /// Build the cookie string written on login
    pub fn build_set_cookie(&self, token: &str) -> String {
        let mut parts = vec![
            format!("{}={}", self.config.name, token),
            format!("Path={}", self.config.path),
            format!("Max-Age={}", self.config.max_age),
        ];
        self.push_flags(&mut parts);
        parts.join("; ")
    }

    /// Build the cookie string that removes the session cookie
    pub fn build_delete_cookie(&self) -> String {
        let mut parts = vec![
            format!("{}=", self.config.name),
            format!("Path={}", self.config.path),
            "Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
            "Max-Age=0".to_string(),
        ];
        self.push_flags(&mut parts);
        parts.join("; ")
    }

    fn push_flags(&self, parts: &mut Vec<String>) {
        if self.config.secure {
            parts.push("Secure".to_string());
        }
        parts.push(format!("SameSite={}", self.config.same_site.as_str()));
    }

    /// Extract the session token from a `Cookie` request header
    ///
    /// An empty value counts as absent.
    pub fn extract_from_header(&self, cookie_header: &str) -> Option<String> {
        extract_cookie(cookie_header, &self.config.name)
    }
}

/// Find cookie `name` in a `Cookie` header value; empty values count as absent
pub fn extract_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|cookie| {
        let (key, value) = cookie.trim().split_once('=')?;
        if key.trim() == name && !value.trim().is_empty() {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

/// Client-side cookie jar
pub trait CookieJar: Send + Sync {
    /// Apply a cookie string (`name=value; attr; attr=value`)
    fn set(&self, set_cookie: &str) -> Result<()>;

    /// Current, unexpired value of cookie `name`
    fn get(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Cookie jar persisted through a [`TokenStorage`]
///
/// Each cookie lives under `cookie:<name>`. Expiry is evaluated on read, so an expired cookie
/// behaves exactly like a missing one.
pub struct StoredCookieJar {
    storage: Arc<dyn TokenStorage>,
}

impl StoredCookieJar {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    fn key(name: &str) -> String {
        format!("cookie:{}", name)
    }
}

impl CookieJar for StoredCookieJar {
    fn set(&self, set_cookie: &str) -> Result<()> {
        let parsed = ParsedCookie::parse(set_cookie)?;
        let key = Self::key(&parsed.name);

        if parsed.is_expired(Utc::now()) || parsed.value.is_empty() {
            return self.storage.remove(&key);
        }

        let stored = StoredCookie { value: parsed.value, expires_at: parsed.expires_at };
        self.storage.set(&key, &serde_json::to_string(&stored)?)
    }

    fn get(&self, name: &str) -> Option<String> {
        let raw = match self.storage.get(&Self::key(name)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read cookie {}: {}", name, e);
                return None;
            }
        };

        let stored: StoredCookie = serde_json::from_str(&raw).ok()?;
        match stored.expires_at {
            Some(at) if at <= Utc::now() => None,
            _ => Some(stored.value),
        }
    }
}

/// The parts of a cookie string the jar cares about
#[derive(Debug)]
struct ParsedCookie {
    name: String,
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl ParsedCookie {
    fn parse(set_cookie: &str) -> Result<Self> {
        let mut segments = set_cookie.split(';');
        let (name, value) = segments
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or_else(|| anyhow::anyhow!("malformed cookie string"))?;

        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("cookie name is empty");
        }

        let mut max_age: Option<i64> = None;
        let mut expires: Option<DateTime<Utc>> = None;

        for attr in segments {
            let (key, val) = attr.split_once('=').unwrap_or((attr, ""));
            match key.trim().to_ascii_lowercase().as_str() {
                "max-age" => max_age = val.trim().parse().ok(),
                "expires" => {
                    expires = NaiveDateTime::parse_from_str(val.trim(), EXPIRES_FORMAT)
                        .ok()
                        .map(|naive| naive.and_utc())
                }
                _ => {}
            }
        }

        // Max-Age wins over Expires; an age past chrono's range means no expiry
        let now = Utc::now();
        let expires_at = match max_age {
            Some(secs) if secs <= 0 => Some(now),
            Some(secs) => Duration::try_seconds(secs).and_then(|age| now.checked_add_signed(age)),
            None => expires,
        };

        Ok(Self { name: name.to_string(), value: value.trim().to_string(), expires_at })
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}
