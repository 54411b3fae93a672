use chrono::FixedOffset;
use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Config {
    // Shared secret for HMAC verification
    pub secret_key: String,

    // Server
    pub bind_addr: SocketAddr,

    // Quote store
    pub database_path: String,

    // Authentication window
    pub tolerance_secs: u64,
    pub utc_offset: FixedOffset,

    // Limits
    pub max_body_bytes: usize,

    // Nonce expiry (0 = nonces are kept for the process lifetime)
    pub nonce_ttl_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("database_path", &self.database_path)
            .field("tolerance_secs", &self.tolerance_secs)
            .field("utc_offset", &self.utc_offset)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("nonce_ttl_secs", &self.nonce_ttl_secs)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Shared secret - SECRET_KEY is required, never a compile-time constant
        let secret_key = env::var("SECRET_KEY")
            .map_err(|_| ConfigError::MissingVar("SECRET_KEY".to_string()))?;

        if secret_key.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SECRET_KEY".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:1337".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // Quote store
        let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "quotes.db".to_string());

        // Authentication window
        let tolerance_secs = parse_env_or_default("AUTH_TOLERANCE_SECS", 10)?;

        let utc_offset_str = env::var("AUTH_UTC_OFFSET").unwrap_or_else(|_| "+08:00".to_string());
        let utc_offset = utc_offset_str
            .parse::<FixedOffset>()
            .map_err(|e| ConfigError::ParseError("AUTH_UTC_OFFSET".to_string(), e.to_string()))?;

        // Limits
        let max_body_bytes = parse_env_or_default("MAX_BODY_BYTES", 1_048_576)?;

        // Nonce expiry
        let nonce_ttl_secs = parse_env_or_default("NONCE_TTL_SECS", 0)?;

        Ok(Config {
            secret_key,
            bind_addr,
            database_path,
            tolerance_secs,
            utc_offset,
            max_body_bytes,
            nonce_ttl_secs,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests run serially since they modify global env vars.
    // unwrap_or_else handles poison from prior panics.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_test_env() {
        env::remove_var("SECRET_KEY");
        env::remove_var("BIND_ADDR");
        env::remove_var("DATABASE_PATH");
        env::remove_var("AUTH_TOLERANCE_SECS");
        env::remove_var("AUTH_UTC_OFFSET");
        env::remove_var("MAX_BODY_BYTES");
        env::remove_var("NONCE_TTL_SECS");
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        env::set_var("TEST_U64", "12345");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_U64");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_empty_secret_key() {
        let _guard = lock_test();
        clear_test_env();

        // Set SECRET_KEY to empty to prevent dotenvy from reloading a valid
        // key from .env (dotenvy doesn't override existing vars). This
        // triggers the "cannot be empty" check in from_env().
        env::set_var("SECRET_KEY", "");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "SECRET_KEY"
        ));

        clear_test_env();
    }

    #[test]
    fn test_invalid_socket_addr() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("SECRET_KEY", "test-secret");
        env::set_var("BIND_ADDR", "invalid_address");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_, _)));

        clear_test_env();
    }

    #[test]
    fn test_invalid_utc_offset() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("SECRET_KEY", "test-secret");
        env::set_var("AUTH_UTC_OFFSET", "not-an-offset");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "AUTH_UTC_OFFSET"
        ));

        clear_test_env();
    }

    #[test]
    fn test_config_defaults() {
        let _guard = lock_test();
        clear_test_env();

        // Set required var + override any .env defaults to ensure predictable values
        env::set_var("SECRET_KEY", "test-secret");
        env::set_var("BIND_ADDR", "0.0.0.0:1337");

        let config = Config::from_env().unwrap();

        assert_eq!(config.secret_key, "test-secret");
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:1337");
        assert_eq!(config.database_path, "quotes.db");
        assert_eq!(config.tolerance_secs, 10);
        assert_eq!(config.utc_offset, FixedOffset::east_opt(8 * 3600).unwrap());
        assert_eq!(config.max_body_bytes, 1_048_576);
        assert_eq!(config.nonce_ttl_secs, 0);

        clear_test_env();
    }

    #[test]
    fn test_debug_redacts_secret() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("SECRET_KEY", "super-sensitive-value");

        let config = Config::from_env().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-sensitive-value"));
        assert!(debug.contains("[REDACTED]"));

        clear_test_env();
    }
}
