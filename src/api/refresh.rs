//! Token refresh coordination.
//!
//! Exchanges the stored refresh token for a new access token at
//! POST /auth/refresh. Refresh failures are never surfaced as errors: the
//! caller only learns `false` and lets the original request failure stand.

use crate::api::types::{RefreshRequest, RefreshResponse};
use crate::session::Session;

/// Exchange the stored refresh token for a fresh pair.
///
/// `stale_token` is the access token the failing request carried. When the
/// session already holds a different token, a concurrent caller finished the
/// exchange while we waited on the gate, so this call reports success without
/// touching the network. At most one exchange runs per rotation.
///
/// Returns `true` when the session now holds a usable access token.
pub(crate) async fn refresh_session(
    http: &reqwest::Client,
    base_url: &str,
    session: &Session,
    stale_token: Option<&str>,
) -> bool {
    let _gate = session.refresh_gate.lock().await;

    if session.access_token().await.as_deref() != stale_token {
        return true;
    }

    let Some(refresh_token) = session.refresh_token().await else {
        log::info!("No refresh token stored, refresh skipped");
        return false;
    };

    let request = RefreshRequest { refresh_token };
    let resp = match http
        .post(format!("{}/auth/refresh", base_url))
        .json(&request)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            log::warn!("Refresh request failed (network error): {}", e);
            return false;
        }
    };

    if !resp.status().is_success() {
        log::warn!("Refresh failed with status {}", resp.status());
        return false;
    }

    let refreshed: RefreshResponse = match resp.json().await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Failed to parse refresh response: {}", e);
            return false;
        }
    };

    session
        .apply_refresh(refreshed.token, refreshed.refresh_token)
        .await;
    log::info!("Access token refreshed");
    true
}
