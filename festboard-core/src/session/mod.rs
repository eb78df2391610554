//! Client-side session handling
//!
//! A session is an opaque bearer token kept in two places that must never drift apart:
//! - durable storage ([`TokenStorage`]), read by the HTTP client and the auth context
//! - a cookie mirror ([`CookieJar`]), read by the edge route guard
//!
//! [`SessionStore`] is the only writer of either copy.
//!
//! # Example
//!
//! ```no_run
//! use festboard_core::session::SessionStore;
//!
//! let store = SessionStore::in_memory();
//! store.save("token-from-login")?;
//! assert!(store.has_cookie());
//! store.clear();
//! # Ok::<(), anyhow::Error>(())
//! ```

mod cookie;
mod storage;
mod store;

#[cfg(test)]
mod security_tests;

pub use cookie::{extract_cookie, CookieConfig, CookieJar, SessionCookie, StoredCookieJar};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use store::SessionStore;

use std::str::FromStr;

/// SameSite cookie policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    /// Strict - cookie only sent to same site
    Strict,

    /// Lax - cookie sent on top-level navigation
    Lax,

    /// None - cookie sent on all requests (requires Secure)
    None,
}

impl SameSitePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSitePolicy::Strict => "Strict",
            SameSitePolicy::Lax => "Lax",
            SameSitePolicy::None => "None",
        }
    }
}

impl FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSitePolicy::Strict),
            "lax" => Ok(SameSitePolicy::Lax),
            "none" => Ok(SameSitePolicy::None),
            other => Err(format!("invalid SameSite policy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_site_parse() {
        assert_eq!("Strict".parse::<SameSitePolicy>(), Ok(SameSitePolicy::Strict));
        assert_eq!("lax".parse::<SameSitePolicy>(), Ok(SameSitePolicy::Lax));
        assert!("sometimes".parse::<SameSitePolicy>().is_err());
    }
}
