//! Session state owning the access/refresh token pair.
//!
//! The session is the single writer of token state: login, refresh, and
//! logout mutate it; every outgoing request reads it. Token material is
//! zeroized when replaced or cleared. A persistent session mirrors every
//! mutation to the system keychain.

use tokio::sync::{Mutex, RwLock};
use zeroize::Zeroize;

use crate::api::auth;

/// Access/refresh token pair issued by the backend.
///
/// The refresh token is absent for sessions the backend chose not to make
/// renewable (e.g. short-lived admin logins).
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Shared session state. Wrap in `Arc` and hand the same instance to every
/// client that should share credentials.
pub struct Session {
    tokens: RwLock<Option<TokenPair>>,
    /// Serializes refresh attempts so concurrent 401s trigger a single
    /// exchange against the auth endpoint.
    pub(crate) refresh_gate: Mutex<()>,
    /// Mirror token mutations to the system keychain.
    persist: bool,
}

impl Session {
    /// Memory-only session; nothing touches the keychain.
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            persist: false,
        }
    }

    /// Keychain-backed session.
    ///
    /// Loads any stored token pair; load failures are logged and treated as a
    /// logged-out state.
    pub fn persistent() -> Self {
        let access = auth::get_access_token().unwrap_or_else(|e| {
            log::warn!("Failed to read access token from keychain: {}", e);
            None
        });
        let refresh = auth::get_refresh_token().unwrap_or_else(|e| {
            log::warn!("Failed to read refresh token from keychain: {}", e);
            None
        });

        let tokens = access.map(|access_token| TokenPair {
            access_token,
            refresh_token: refresh,
        });

        Self {
            tokens: RwLock::new(tokens),
            refresh_gate: Mutex::new(()),
            persist: true,
        }
    }

    /// Store a freshly issued pair (login).
    pub async fn login(&self, access_token: String, refresh_token: Option<String>) {
        self.replace(Some(TokenPair {
            access_token,
            refresh_token,
        }))
        .await;
    }

    /// Apply a successful refresh.
    ///
    /// The access token is always replaced; the refresh token only when the
    /// response supplied a rotated one, otherwise the stored one is retained.
    pub async fn apply_refresh(&self, access_token: String, refresh_token: Option<String>) {
        let mut guard = self.tokens.write().await;

        let retained =
            refresh_token.or_else(|| guard.as_ref().and_then(|p| p.refresh_token.clone()));

        if let Some(ref mut old) = *guard {
            old.access_token.zeroize();
            if let Some(ref mut r) = old.refresh_token {
                r.zeroize();
            }
        }

        let pair = TokenPair {
            access_token,
            refresh_token: retained,
        };
        self.mirror(Some(&pair));
        *guard = Some(pair);
    }

    /// Drop the pair (logout or irrecoverable refresh failure). Idempotent.
    pub async fn clear(&self) {
        self.replace(None).await;
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|p| p.access_token.clone())
    }

    /// Current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .and_then(|p| p.refresh_token.clone())
    }

    /// Whether a token pair is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    async fn replace(&self, pair: Option<TokenPair>) {
        let mut guard = self.tokens.write().await;
        if let Some(ref mut old) = *guard {
            old.access_token.zeroize();
            if let Some(ref mut r) = old.refresh_token {
                r.zeroize();
            }
        }
        self.mirror(pair.as_ref());
        *guard = pair;
    }

    /// Best-effort keychain mirror. Failures are logged; the in-memory
    /// session stays authoritative for the process lifetime.
    fn mirror(&self, pair: Option<&TokenPair>) {
        if !self.persist {
            return;
        }
        let result = match pair {
            Some(pair) => {
                auth::store_access_token(&pair.access_token).and_then(|_| {
                    match pair.refresh_token.as_deref() {
                        Some(token) => auth::store_refresh_token(token),
                        None => auth::delete_refresh_token(),
                    }
                })
            }
            None => auth::delete_access_token().and_then(|_| auth::delete_refresh_token()),
        };
        if let Err(e) = result {
            log::warn!("Keychain update failed: {}", e);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
