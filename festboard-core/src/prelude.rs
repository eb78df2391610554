//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use festboard_core::prelude::*;
//! ```

// === Configuration ===
pub use crate::config::FestboardConfig;
pub use crate::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};

// === Auth ===
pub use crate::auth::{
    try_use_auth, use_auth, AuthContext, AuthError, AuthProvider, AuthState, User,
};

// === Permissions ===
pub use crate::rbac::permissions::*;
pub use crate::rbac::{Permission, RoleName, SUPER_ADMIN_ROLE};

// === Session ===
pub use crate::session::{FileTokenStorage, MemoryTokenStorage, SessionStore, TokenStorage};

// === HTTP ===
pub use crate::http::{ApiClient, ApiError, GuardResult, RouteGuard};

// === Navigation ===
pub use crate::navigation::{MemoryNavigator, Navigator, Sidebar};
