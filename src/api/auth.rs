//! Keychain operations for secure token storage.
//!
//! Uses the `keyring` crate with apple-native feature for macOS Keychain
//! integration. Tokens are stored in the system keychain under fixed keys,
//! never on disk.

use keyring::Entry;
use thiserror::Error;

/// Keychain service name for the storefront client.
const SERVICE_NAME: &str = "com.storefront.client";

/// Fixed key for the access token entry.
const ACCESS_TOKEN_KEY: &str = "access_token";

/// Fixed key for the refresh token entry.
const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("Keychain operation failed: {0}")]
    OperationFailed(String),
}

impl From<keyring::Error> for KeychainError {
    fn from(err: keyring::Error) -> Self {
        KeychainError::OperationFailed(err.to_string())
    }
}

fn entry(key: &str) -> Result<Entry, KeychainError> {
    Ok(Entry::new(SERVICE_NAME, key)?)
}

fn store(key: &str, value: &str) -> Result<(), KeychainError> {
    entry(key)?.set_password(value)?;
    Ok(())
}

/// Returns `None` if no entry exists (never logged in or logged out).
fn get(key: &str) -> Result<Option<String>, KeychainError> {
    match entry(key)?.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(KeychainError::from(e)),
    }
}

/// Idempotent: ignores `NoEntry` (already deleted or never stored).
fn delete(key: &str) -> Result<(), KeychainError> {
    match entry(key)?.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(KeychainError::from(e)),
    }
}

/// Store the access token in the keychain.
pub fn store_access_token(token: &str) -> Result<(), KeychainError> {
    store(ACCESS_TOKEN_KEY, token)
}

/// Retrieve the stored access token, if any.
pub fn get_access_token() -> Result<Option<String>, KeychainError> {
    get(ACCESS_TOKEN_KEY)
}

/// Delete the stored access token. Idempotent.
pub fn delete_access_token() -> Result<(), KeychainError> {
    delete(ACCESS_TOKEN_KEY)
}

/// Store the refresh token in the keychain.
pub fn store_refresh_token(token: &str) -> Result<(), KeychainError> {
    store(REFRESH_TOKEN_KEY, token)
}

/// Retrieve the stored refresh token, if any.
pub fn get_refresh_token() -> Result<Option<String>, KeychainError> {
    get(REFRESH_TOKEN_KEY)
}

/// Delete the stored refresh token. Idempotent.
pub fn delete_refresh_token() -> Result<(), KeychainError> {
    delete(REFRESH_TOKEN_KEY)
}
