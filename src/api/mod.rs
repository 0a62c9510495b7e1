//! API client module for the storefront backend.
//!
//! Provides the authenticated HTTP executor with refresh-and-retry recovery,
//! keychain token persistence, the token refresh coordinator, login/logout
//! flows, and request/response types matching the backend API.

pub mod auth;
pub mod client;
pub mod error;
pub mod login;
pub mod refresh;
pub mod types;
