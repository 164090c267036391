//! Service settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `REVIEWER_*` environment variables and an
//! optional configuration file, in increasing order of precedence as
//! implemented by `ortho_config`.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Runtime settings for the reviewer service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REVIEWER")]
pub struct ServiceSettings {
    /// PostgreSQL connection URL. Without it the service keeps state in memory.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seed for reviewer selection; omit for entropy-seeded selection.
    pub rng_seed: Option<u64>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

/// Settings failed validation after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl ServiceSettings {
    /// Parsed listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "REVIEWER_DATABASE_URL",
        "REVIEWER_BIND_ADDR",
        "REVIEWER_POOL_MAX_SIZE",
        "REVIEWER_RNG_SEED",
        "REVIEWER_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("reviewer-service")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert!(settings.database_url().is_none());
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert_eq!(settings.pool_max_size(), 10);
        assert!(settings.rng_seed.is_none());
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "REVIEWER_DATABASE_URL",
                Some("postgres://localhost/reviews".to_owned()),
            ),
            ("REVIEWER_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("REVIEWER_POOL_MAX_SIZE", Some("4".to_owned())),
            ("REVIEWER_RNG_SEED", Some("42".to_owned())),
            ("REVIEWER_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/reviews")
        );
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("literal address")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.rng_seed, Some(42));
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("REVIEWER_BIND_ADDR", Some("not-an-address".to_owned()))]);

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn blank_database_url_counts_as_unset() {
        let _guard = lock_env([("REVIEWER_DATABASE_URL", Some("  ".to_owned()))]);

        let settings = load_from_empty_args();

        assert!(settings.database_url().is_none());
    }
}
