//! Upstream store credentials.
//!
//! The upstream authenticates every call with three headers: a store name, an
//! API key and an API secret. They are loaded once per process into an
//! immutable [`CredentialContext`] and borrowed by every request afterwards.
//!
//! Loading is expressed over a key lookup closure instead of reading the
//! process environment directly, so callers decide where values come from.

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Variable holding the upstream store identifier.
pub const STORE_NAME_VAR: &str = "STORENAME";
/// Variable holding the upstream API key.
pub const API_KEY_VAR: &str = "APIKEY";
/// Variable holding the upstream API secret.
pub const API_SECRET_VAR: &str = "APISECRET";

/// Misspelling of [`API_SECRET_VAR`] seen in older deployment scripts.
pub const MISSPELLED_API_SECRET_VAR: &str = "PISECRET";

/// Label reported for a variable that is present.
pub const SET_LABEL: &str = "SET";
/// Label reported for a variable that is absent or blank.
pub const MISSING_LABEL: &str = "MISSING";

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Store credentials for the upstream API.
///
/// All three values are non-empty by construction. Every field is a secret:
/// `Debug` prints `[REDACTED]` and nothing here implements `Serialize`.
#[derive(Clone)]
pub struct CredentialContext {
    store_name: SecretString,
    api_key: SecretString,
    api_secret: SecretString,
}

impl std::fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialContext")
            .field("store_name", &"[REDACTED]")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

impl CredentialContext {
    /// Build a context from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` naming the first blank value.
    pub fn new(
        store_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let store_name = non_blank(STORE_NAME_VAR, Some(store_name.into()))?;
        let api_key = non_blank(API_KEY_VAR, Some(api_key.into()))?;
        let api_secret = non_blank(API_SECRET_VAR, Some(api_secret.into()))?;

        Ok(Self {
            store_name: SecretString::from(store_name),
            api_key: SecretString::from(api_key),
            api_secret: SecretString::from(api_secret),
        })
    }

    /// Load credentials through a key lookup (usually the process environment).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if any value is absent or blank, or
    /// `ConfigError::MisspelledEnvVar` if the secret was only provided under
    /// the misspelled `PISECRET` name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_name = non_blank(STORE_NAME_VAR, lookup(STORE_NAME_VAR))?;
        let api_key = non_blank(API_KEY_VAR, lookup(API_KEY_VAR))?;

        let api_secret = match non_blank(API_SECRET_VAR, lookup(API_SECRET_VAR)) {
            Ok(secret) => secret,
            Err(missing) => {
                if is_present(lookup(MISSPELLED_API_SECRET_VAR).as_deref()) {
                    return Err(ConfigError::MisspelledEnvVar {
                        found: MISSPELLED_API_SECRET_VAR.to_string(),
                        expected: API_SECRET_VAR.to_string(),
                    });
                }
                return Err(missing);
            }
        };

        Self::new(store_name, api_key, api_secret)
    }

    /// Store identifier, sent as the `storename` header.
    #[must_use]
    pub const fn store_name(&self) -> &SecretString {
        &self.store_name
    }

    /// API key, sent as the `apikey` header.
    #[must_use]
    pub const fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// API secret, sent as the `apisecret` header.
    #[must_use]
    pub const fn api_secret(&self) -> &SecretString {
        &self.api_secret
    }

    /// Names of variables whose values look like placeholders.
    ///
    /// Only names are returned, never values, so the result is safe to log.
    #[must_use]
    pub fn placeholder_vars(&self) -> Vec<&'static str> {
        [
            (STORE_NAME_VAR, &self.store_name),
            (API_KEY_VAR, &self.api_key),
            (API_SECRET_VAR, &self.api_secret),
        ]
        .into_iter()
        .filter(|(_, secret)| looks_like_placeholder(secret.expose_secret()))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Which credential variables are present, without their values.
///
/// Reported by the health and debug endpoints and by `op-cli env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CredentialPresence {
    pub store_name: bool,
    pub api_key: bool,
    pub api_secret: bool,
}

impl CredentialPresence {
    /// Inspect a key lookup for the three credential variables.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            store_name: is_present(lookup(STORE_NAME_VAR).as_deref()),
            api_key: is_present(lookup(API_KEY_VAR).as_deref()),
            api_secret: is_present(lookup(API_SECRET_VAR).as_deref()),
        }
    }

    /// Presence of a fully loaded context (always all set).
    #[must_use]
    pub const fn all_set() -> Self {
        Self {
            store_name: true,
            api_key: true,
            api_secret: true,
        }
    }

    /// True when every variable is present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.store_name && self.api_key && self.api_secret
    }

    /// Variable name and `SET`/`MISSING` label for each credential.
    #[must_use]
    pub const fn labels(&self) -> [(&'static str, &'static str); 3] {
        [
            (STORE_NAME_VAR, label(self.store_name)),
            (API_KEY_VAR, label(self.api_key)),
            (API_SECRET_VAR, label(self.api_secret)),
        ]
    }
}

/// `SET` or `MISSING`.
#[must_use]
pub const fn label(present: bool) -> &'static str {
    if present { SET_LABEL } else { MISSING_LABEL }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn non_blank(key: &str, value: Option<String>) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn looks_like_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_valid_triple() {
        let lookup = lookup_from(&[
            ("STORENAME", "shop-01"),
            ("APIKEY", "k3y-Zq81"),
            ("APISECRET", "s3cr-Lp20"),
        ]);
        let ctx = CredentialContext::from_lookup(lookup).unwrap();
        assert_eq!(ctx.store_name().expose_secret(), "shop-01");
        assert_eq!(ctx.api_key().expose_secret(), "k3y-Zq81");
        assert_eq!(ctx.api_secret().expose_secret(), "s3cr-Lp20");
    }

    #[test]
    fn test_load_fails_for_every_missing_field() {
        let full = [
            ("STORENAME", "shop-01"),
            ("APIKEY", "k3y-Zq81"),
            ("APISECRET", "s3cr-Lp20"),
        ];

        for skip in 0..full.len() {
            let partial: Vec<(&str, &str)> = full
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, pair)| *pair)
                .collect();
            let err = CredentialContext::from_lookup(lookup_from(&partial)).unwrap_err();
            let expected = full.get(skip).unwrap().0;
            assert_eq!(err, ConfigError::MissingEnvVar(expected.to_string()));
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let lookup = lookup_from(&[
            ("STORENAME", "shop-01"),
            ("APIKEY", "   "),
            ("APISECRET", "s3cr-Lp20"),
        ]);
        let err = CredentialContext::from_lookup(lookup).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("APIKEY".to_string()));
    }

    #[test]
    fn test_misspelled_secret_is_flagged() {
        let lookup = lookup_from(&[
            ("STORENAME", "shop-01"),
            ("APIKEY", "k3y-Zq81"),
            ("PISECRET", "s3cr-Lp20"),
        ]);
        let err = CredentialContext::from_lookup(lookup).unwrap_err();
        assert!(matches!(err, ConfigError::MisspelledEnvVar { .. }));
        assert!(err.to_string().contains("PISECRET"));
        assert!(err.to_string().contains("APISECRET"));
    }

    #[test]
    fn test_canonical_secret_wins_over_misspelling() {
        let lookup = lookup_from(&[
            ("STORENAME", "shop-01"),
            ("APIKEY", "k3y-Zq81"),
            ("APISECRET", "canonical"),
            ("PISECRET", "stale"),
        ]);
        let ctx = CredentialContext::from_lookup(lookup).unwrap();
        assert_eq!(ctx.api_secret().expose_secret(), "canonical");
    }

    #[test]
    fn test_debug_redacts_all_fields() {
        let ctx = CredentialContext::new("shop-visible", "key-visible", "secret-visible").unwrap();
        let debug_output = format!("{ctx:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shop-visible"));
        assert!(!debug_output.contains("key-visible"));
        assert!(!debug_output.contains("secret-visible"));
    }

    #[test]
    fn test_placeholder_detection_reports_names_only() {
        let ctx = CredentialContext::new("my-shop", "your-api-key", "aB3xY9mK2nL5").unwrap();
        assert_eq!(ctx.placeholder_vars(), vec!["APIKEY"]);
    }

    #[test]
    fn test_presence_labels() {
        let presence = CredentialPresence::from_lookup(lookup_from(&[
            ("STORENAME", "shop-01"),
            ("APISECRET", ""),
        ]));
        assert!(!presence.is_complete());
        assert_eq!(
            presence.labels(),
            [
                ("STORENAME", "SET"),
                ("APIKEY", "MISSING"),
                ("APISECRET", "MISSING"),
            ]
        );
        assert!(CredentialPresence::all_set().is_complete());
    }
}
