//! Login and logout flows against the backend auth endpoints.

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::types::{LoginRequest, LoginResponse};

/// Authenticate with username/password and store the issued token pair.
///
/// POST /auth/login-user. On a non-2xx response the error message carries the
/// backend's body text ("invalid credentials" and the like) for the UI to
/// display. Goes out without a bearer header and without refresh-and-retry --
/// there is nothing to refresh yet.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<(), ApiError> {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };

    let resp = client
        .http()
        .post(format!("{}/auth/login-user", client.base_url()))
        .json(&request)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(ApiError::from_response(resp).await);
    }

    let body: LoginResponse = resp
        .json()
        .await
        .map_err(|e| ApiError::Decode(format!("login response: {}", e)))?;

    client
        .session()
        .login(body.access_token, body.refresh_token)
        .await;
    log::info!("Login successful");
    Ok(())
}

/// Log out: best-effort server-side invalidation, then local token cleanup.
///
/// The local session is always cleared, even when the logout request fails.
pub async fn logout(client: &ApiClient) {
    if let Err(e) = client.post_empty("/auth/logout", &()).await {
        log::warn!("Logout request failed (will continue local cleanup): {}", e);
    }
    client.session().clear().await;
    log::info!("Logout complete");
}
