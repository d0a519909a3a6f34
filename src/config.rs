use secrecy::Secret;
use std::env;
use std::fmt;

/// Runtime configuration, read once at startup from the environment (and `.env`).
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: Secret<String>,
    pub jwt_expiry_minutes: i64,
    pub bind_address: String,
    pub cors_allowed_origins: Vec<String>,
    pub db_max_connections: u32,
    /// Users created on startup when missing, as (username, password)
    pub seed_users: Vec<(String, String)>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has invalid value '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiry_minutes = parse_or("JWT_EXPIRY_MINUTES", lookup("JWT_EXPIRY_MINUTES"), 60)?;
        if jwt_expiry_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY_MINUTES",
                value: jwt_expiry_minutes.to_string(),
            });
        }

        let db_max_connections =
            parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 20)?;

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let seed_users = match lookup("SEED_USERS") {
            Some(raw) => parse_seed_users(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            database_url,
            jwt_secret: Secret::new(jwt_secret),
            jwt_expiry_minutes,
            bind_address,
            cors_allowed_origins,
            db_max_connections,
            seed_users,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::Invalid { key, value })
        }
        None => Ok(default),
    }
}

/// Parses `user:pass,user2:pass2`
fn parse_seed_users(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((user, pass)) if !user.trim().is_empty() && !pass.is_empty() => {
                Ok((user.trim().to_string(), pass.to_string()))
            }
            _ => Err(ConfigError::Invalid {
                key: "SEED_USERS",
                value: entry.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("JWT_SECRET", "secret"),
        ]))
        .expect("config should load");

        assert_eq!(config.jwt_expiry_minutes, 60);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.db_max_connections, 20);
        assert!(config.seed_users.is_empty());
        assert_eq!(config.jwt_secret.expose_secret(), "secret");
    }

    #[test]
    fn test_missing_database_url() {
        let result = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "secret")]));
        assert_eq!(result.err(), Some(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("JWT_SECRET", "secret"),
            ("DB_MAX_CONNECTIONS", "lots"),
        ]));
        assert!(matches!(
            result.err(),
            Some(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. })
        ));
    }

    #[test]
    fn test_seed_users_and_origins_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("JWT_SECRET", "secret"),
            ("SEED_USERS", "u001:pass111, u002:pass111"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .expect("config should load");

        assert_eq!(
            config.seed_users,
            vec![
                ("u001".to_string(), "pass111".to_string()),
                ("u002".to_string(), "pass111".to_string())
            ]
        );
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_malformed_seed_entry() {
        let result = parse_seed_users("u001");
        assert!(result.is_err());
    }
}
