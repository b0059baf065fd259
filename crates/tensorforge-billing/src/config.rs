//! Startup configuration from the environment.
//!
//! Provider credentials and the database URL are required — the daemon
//! refuses to start without them rather than failing lazily on the first
//! request that needs one.

use std::time::Duration;

use tensorforge_types::ConfigError;

/// Everything the billing service reads from the environment.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub database_url: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    /// Requests admitted per identity per window on billing endpoints.
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
}

const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 10;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

impl BillingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name→value lookup. Tests inject a map instead of
    /// mutating process-global env vars.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, ConfigError> {
            lookup(name).filter(|v| !v.is_empty()).ok_or_else(|| ConfigError::missing(name))
        };

        Ok(Self {
            razorpay_key_id: required("RAZORPAY_KEY_ID")?,
            razorpay_key_secret: required("RAZORPAY_KEY_SECRET")?,
            database_url: required("DATABASE_URL")?,
            supabase_url: required("SUPABASE_URL")?,
            supabase_service_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            rate_limit_requests: parse_or(
                &lookup,
                "RATE_LIMIT_REQUESTS",
                DEFAULT_RATE_LIMIT_REQUESTS,
            )?,
            rate_limit_window_secs: parse_or(
                &lookup,
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )?,
        })
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name: name.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("RAZORPAY_KEY_ID", "rzp_test_k1"),
            ("RAZORPAY_KEY_SECRET", "secret_s1"),
            ("DATABASE_URL", "postgres://localhost/tensorforge"),
            ("SUPABASE_URL", "https://proj.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-key"),
        ])
    }

    #[test]
    fn test_loads_with_defaults() {
        let env = full_env();
        let config = BillingConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap();
        assert_eq!(config.rate_limit_requests, 10);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_required_var_names_it() {
        let mut env = full_env();
        env.remove("RAZORPAY_KEY_SECRET");
        let err =
            BillingConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err, ConfigError::missing("RAZORPAY_KEY_SECRET"));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut env = full_env();
        env.insert("DATABASE_URL", "");
        let err =
            BillingConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err, ConfigError::missing("DATABASE_URL"));
    }

    #[test]
    fn test_unparseable_tuning_var() {
        let mut env = full_env();
        env.insert("RATE_LIMIT_REQUESTS", "lots");
        let err =
            BillingConfig::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { .. }));
    }
}
