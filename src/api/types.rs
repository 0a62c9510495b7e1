//! Request and response types for the storefront backend API.
//!
//! All structs use camelCase serialization to match the API's JSON format.

use serde::{Deserialize, Serialize};

/// Login request body sent to POST /auth/login-user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response from POST /auth/login-user.
///
/// The refresh token is absent for sessions the backend issues without a
/// renewal path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Refresh request body sent to POST /auth/refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response from POST /auth/refresh.
///
/// The new access token arrives in `token`; `refreshToken` is only present
/// when the server rotated it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: Option<String>,
}

/// Catalog category: a node in the category tree.
///
/// `parent_category_id` is `None` for root categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_category_id: Option<i64>,
    pub parent_category_name: Option<String>,
}

/// Catalog product, assigned to exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category_id: i64,
}
