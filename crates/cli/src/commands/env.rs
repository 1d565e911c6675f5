//! Credential presence report.
//!
//! # Usage
//!
//! ```bash
//! op-cli env
//! ```
//!
//! Reads `.env` if present, then reports `STORENAME`, `APIKEY` and
//! `APISECRET` as SET or MISSING. Values are never printed.

use order_proxy_core::CredentialPresence;
use order_proxy_core::credentials::{API_SECRET_VAR, MISSPELLED_API_SECRET_VAR};
use thiserror::Error;

/// Errors reported by `op-cli env`.
#[derive(Debug, Error)]
pub enum EnvError {
    /// At least one credential variable is unset.
    #[error("{0} credential variable(s) missing")]
    Missing(usize),
}

/// Log presence of each credential variable.
///
/// # Errors
///
/// Returns `EnvError::Missing` if any variable is unset, so the exit status
/// can gate deploy scripts.
pub fn report() -> Result<(), EnvError> {
    dotenvy::dotenv().ok();

    let lookup = |key: &str| std::env::var(key).ok();
    let presence = CredentialPresence::from_lookup(lookup);

    for (var, label) in presence.labels() {
        tracing::info!("  {var}: {label}");
    }

    if !presence.api_secret && lookup(MISSPELLED_API_SECRET_VAR).is_some() {
        tracing::warn!("{MISSPELLED_API_SECRET_VAR} is set; rename it to {API_SECRET_VAR}");
    }

    let missing = [presence.store_name, presence.api_key, presence.api_secret]
        .into_iter()
        .filter(|present| !present)
        .count();

    if missing > 0 {
        return Err(EnvError::Missing(missing));
    }

    tracing::info!("All credential variables are set");
    Ok(())
}
