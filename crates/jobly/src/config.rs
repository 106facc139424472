//! Database settings from the environment.
//!
//! | Variable                 | Required | Default |
//! |--------------------------|----------|---------|
//! | `DATABASE_URL`           | yes      |         |
//! | `DATABASE_MAX_POOL_SIZE` | no       | 16      |
//!
//! A `.env` file in the working directory (or a parent) is loaded first if present.

use crate::error::{StoreError, StoreResult};

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_POOL_SIZE: usize = 16;

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
    pub max_pool_size: usize,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
        }
    }

    /// Set the maximum pool size.
    pub fn max_pool_size(mut self, max_pool_size: usize) -> Self {
        self.max_pool_size = max_pool_size;
        self
    }

    /// Load from the process environment (after reading `.env`, if any).
    pub fn from_env() -> StoreResult<Self> {
        // Missing .env is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| StoreError::Config("DATABASE_URL is not set".to_string()))?;

        let max_pool_size = match lookup("DATABASE_MAX_POOL_SIZE") {
            None => DEFAULT_MAX_POOL_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(StoreError::Config(format!(
                        "DATABASE_MAX_POOL_SIZE must be a positive integer, got '{raw}'"
                    )));
                }
            },
        };

        Ok(Self {
            database_url,
            max_pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn url_is_required() {
        let err = DbConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));

        let err = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn pool_size_defaults_and_parses() {
        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/jobly")]))
            .unwrap();
        assert_eq!(cfg, DbConfig::new("postgres://localhost/jobly"));

        let cfg = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/jobly"),
            ("DATABASE_MAX_POOL_SIZE", "4"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_pool_size, 4);
    }

    #[test]
    fn bad_pool_size_is_rejected() {
        for raw in ["0", "-1", "many"] {
            let res = DbConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://localhost/jobly"),
                ("DATABASE_MAX_POOL_SIZE", raw),
            ]));
            assert!(res.is_err(), "{raw}");
        }
    }
}
