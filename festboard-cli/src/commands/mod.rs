//! Command implementations
//!
//! Each command gets an [`Env`]: configuration plus an auth context over the file-backed session.

pub mod access;
pub mod menu;
pub mod session;

use anyhow::{Context, Result};
use festboard_core::config::FestboardConfig;
use festboard_core::logging::{init_logging, LogLevel};
use festboard_core::navigation::MemoryNavigator;
use festboard_core::session::FileTokenStorage;
use festboard_core::{AuthContext, RouteGuard};
use std::path::Path;
use std::sync::Arc;

pub struct Env {
    pub config: FestboardConfig,
    pub navigator: Arc<MemoryNavigator>,
    pub auth: AuthContext,
}

impl Env {
    /// Resolve configuration, install logging and open the stored session
    pub fn load(config_path: &Path, verbose: bool) -> Result<Self> {
        let config = FestboardConfig::load_from(config_path)?;
        config.validate()?;

        let mut logging = config.logging.to_runtime();
        if verbose {
            logging = logging.with_level(LogLevel::Debug);
        }
        init_logging(&logging)?;

        Self::from_config(config)
    }

    pub fn from_config(config: FestboardConfig) -> Result<Self> {
        let storage = Arc::new(FileTokenStorage::new(&config.sessions.storage_path));
        let navigator = Arc::new(MemoryNavigator::new(config.routes.default_entry.clone()));
        let auth = AuthContext::from_config(&config, storage, navigator.clone())
            .context("Failed to set up API client")?;

        Ok(Self { config, navigator, auth })
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(&self.config.routes, self.config.sessions.cookie_name.clone())
    }

    /// Report a redirect the last command triggered, if any
    pub fn report_redirect(&self) {
        if let Some(to) = self.navigator.history().last() {
            eprintln!("-> {}", to);
        }
    }
}
