//! Navigation: where the user is, how they are sent elsewhere, and which menu entries they see
//!
//! [`Navigator`] stands in for the browser location. The HTTP client and the auth context use it
//! to perform full redirects to the login view; [`menu`] prunes the sidebar tree against the
//! current permission set.

pub mod menu;

pub use menu::{filter_nav_items, filter_projects, NavItem, NavSubItem, ProjectItem, Sidebar};

use std::sync::Mutex;

/// Current location plus the ability to navigate away from it
pub trait Navigator: Send + Sync {
    /// Path of the current view, without query string
    fn current_path(&self) -> String;

    /// Full navigation to `to` (a path, optionally with a query string)
    fn redirect(&self, to: &str);
}

/// In-process navigator that records every redirect
///
/// Used by the CLI and by tests; the path part of each redirect becomes the current path.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
    current: Mutex<String>,
}

impl MemoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self { history: Mutex::new(Vec::new()), current: Mutex::new(initial_path.into()) }
    }

    /// Every redirect target, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn redirect_count(&self) -> usize {
        self.history.lock().map(|h| h.len()).unwrap_or(0)
    }

    /// Move without recording a redirect, as a user clicking a link would
    pub fn visit(&self, path: impl Into<String>) {
        if let Ok(mut current) = self.current.lock() {
            *current = path.into();
        }
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.current.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn redirect(&self, to: &str) {
        log::info!("Redirecting to {}", to);
        let path = to.split(['?', '#']).next().unwrap_or(to);
        if let Ok(mut current) = self.current.lock() {
            *current = path.to_string();
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(to.to_string());
        }
    }
}
