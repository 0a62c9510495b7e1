//! Resilient API access layer for the storefront backend.
//!
//! Wraps every backend request with bearer-token injection and a
//! refresh-and-retry recovery path, owns the access/refresh token pair
//! (with optional keychain persistence), and aggregates catalog products
//! across whole category subtrees.
//!
//! This crate has no process entry point of its own -- it is consumed by the
//! storefront and admin UI surfaces.

pub mod api;
pub mod catalog;
pub mod config;
pub mod session;

pub use api::client::ApiClient;
pub use api::error::ApiError;
pub use api::login::{login, logout};
pub use api::types::{Category, Product};
pub use catalog::{collect_products, CatalogSource, NodeReport, NodeStatus, ProductAggregate};
pub use config::Config;
pub use session::{Session, TokenPair};
