//! Festboard - Core
//!
//! Client-side authentication and authorization for the festival management dashboard.
//!
//! # Overview
//!
//! The dashboard talks to a REST API with a bearer token. This crate owns everything between the
//! user and that API that has to do with *who* they are and *what* they may see:
//!
//! - [`session`] - the token's durable copy and its mirrored cookie
//! - [`http`] - the API client (bearer header, 401 handling) and the edge route guard
//! - [`auth`] - the shared auth state, login/logout, and permission checks
//! - [`navigation`] - the sidebar menu filtered by permission
//! - [`rbac`] - the permission catalog and role table
//! - [`config`] / [`logging`] - `festboard.toml` + `FESTBOARD_*` configuration and the log backend
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use festboard_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = FestboardConfig::load()?;
//!     let storage = Arc::new(FileTokenStorage::new(&config.sessions.storage_path));
//!     let navigator = Arc::new(MemoryNavigator::new("/login"));
//!
//!     let auth = AuthContext::from_config(&config, storage, navigator)?;
//!     auth.bootstrap().await;
//!     auth.login("organizer", "secret").await?;
//!
//!     let menu = Sidebar::festival_default().visible_to(&auth);
//!     println!("{}", serde_json::to_string_pretty(&menu)?);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config; // festboard.toml + FESTBOARD_* environment
pub mod http;
pub mod logging; // log::Log backend
pub mod navigation;
pub mod rbac;
pub mod session;

#[cfg(test)]
pub mod testing;

// Prelude module for convenient imports
pub mod prelude;

pub use auth::{AuthContext, AuthError, AuthState, User};
pub use config::FestboardConfig;
pub use http::{ApiClient, ApiError, RouteGuard};
pub use session::SessionStore;
