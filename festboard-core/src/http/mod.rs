//! HTTP plumbing: the API client and the edge route guard
//!
//! - [`ApiClient`]: every call to the REST API, with bearer auth and session-invalid handling
//! - [`RouteGuard`]: cookie-presence checks on navigation requests

mod client;
mod error;
pub mod route_guard;

pub use client::ApiClient;
pub use error::ApiError;
pub use route_guard::{GuardResult, RouteGuard};

pub use reqwest::{Method, StatusCode};
