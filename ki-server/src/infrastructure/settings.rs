use anyhow::{Context, Result, anyhow};
use uuid::Uuid;

const MAX_SESSION_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_secret: String,
    pub session_ttl_seconds: i64,
    pub persistent_session_ttl_seconds: i64,
    pub session_cookie_secure: bool,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub membership_application_id: Uuid,
    pub min_required_password_length: usize,
    pub requires_unique_email: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env(lookup);

        let database_url = env.required("DATABASE_URL").context("DATABASE_URL is required")?;
        let session_secret = env
            .required("SESSION_SECRET")
            .context("SESSION_SECRET is required")?;
        if session_secret.chars().count() < 32 {
            return Err(anyhow!("SESSION_SECRET must be at least 32 characters"));
        }

        let session_ttl_seconds = env.parse_ttl("SESSION_TTL_SECONDS", 30 * 60)?;
        let persistent_session_ttl_seconds =
            env.parse_ttl("PERSISTENT_SESSION_TTL_SECONDS", 14 * 24 * 60 * 60)?;
        let session_cookie_secure = env.parse_bool("SESSION_COOKIE_SECURE", false)?;

        let http_addr = env.get_or("HTTP_ADDR", "0.0.0.0:8080");
        let cors_origins = parse_cors_origins(
            &env.get_or("CORS_ORIGINS", "http://localhost:8000,http://127.0.0.1:8000"),
        );
        let log_level = env
            .get("LOG_LEVEL")
            .or_else(|| env.get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        let db_max_connections = env.parse_positive("DB_MAX_CONNECTIONS", 10_u32)?;
        let http_request_body_limit_bytes =
            env.parse_positive("HTTP_REQUEST_BODY_LIMIT_BYTES", 64 * 1024_usize)?;
        let http_concurrency_limit = env.parse_positive("HTTP_CONCURRENCY_LIMIT", 256_usize)?;
        let http_request_timeout_secs = env.parse_positive("HTTP_REQUEST_TIMEOUT_SECS", 10_u64)?;

        let membership_application_id = match env.get("MEMBERSHIP_APPLICATION_ID") {
            Some(raw) => Uuid::parse_str(raw.trim())
                .context("Failed to parse MEMBERSHIP_APPLICATION_ID, expecting UUID")?,
            None => Uuid::nil(),
        };
        let min_required_password_length =
            env.parse_positive("MIN_REQUIRED_PASSWORD_LENGTH", 6_usize)?;
        let requires_unique_email = env.parse_bool("REQUIRES_UNIQUE_EMAIL", false)?;

        Ok(Self {
            database_url,
            db_max_connections,
            session_secret,
            session_ttl_seconds,
            persistent_session_ttl_seconds,
            session_cookie_secure,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            membership_application_id,
            min_required_password_length,
            requires_unique_email,
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String> {
        let value = self.get(key).ok_or_else(|| anyhow!("{key} is not set"))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(anyhow!("{key} must not be empty"));
        }
        Ok(value)
    }

    fn parse_positive<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + PartialOrd + Default + Copy,
    {
        let value = match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|_| anyhow!("Failed to parse {key}, expecting positive integer"))?,
            None => default,
        };

        if value <= T::default() {
            return Err(anyhow!("{key} must be > 0"));
        }
        Ok(value)
    }

    fn parse_ttl(&self, key: &str, default: i64) -> Result<i64> {
        let value = self.parse_positive(key, default)?;
        if value > MAX_SESSION_TTL_SECONDS {
            return Err(anyhow!("{key} must be <= {MAX_SESSION_TTL_SECONDS}"));
        }
        Ok(value)
    }

    fn parse_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key).as_deref().map(str::trim) {
            None => Ok(default),
            Some("1" | "true" | "TRUE" | "True" | "yes") => Ok(true),
            Some("0" | "false" | "FALSE" | "False" | "no") => Ok(false),
            Some(other) => Err(anyhow!("Failed to parse {key}: '{other}' is not a boolean")),
        }
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use super::Settings;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn settings_from(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let settings = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/ki"),
            ("SESSION_SECRET", SECRET),
        ])
        .expect("settings must load");

        assert_eq!(settings.min_required_password_length, 6);
        assert_eq!(settings.http_addr, "0.0.0.0:8080");
        assert_eq!(settings.membership_application_id, Uuid::nil());
        assert!(!settings.requires_unique_email);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.cors_origins.len(), 2);
    }

    #[test]
    fn missing_database_url_fails() {
        assert!(settings_from(&[("SESSION_SECRET", SECRET)]).is_err());
    }

    #[test]
    fn short_session_secret_fails() {
        let result = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/ki"),
            ("SESSION_SECRET", "too-short"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_password_length_fails() {
        let result = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/ki"),
            ("SESSION_SECRET", SECRET),
            ("MIN_REQUIRED_PASSWORD_LENGTH", "0"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn oversized_session_ttl_fails() {
        let result = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/ki"),
            ("SESSION_SECRET", SECRET),
            ("PERSISTENT_SESSION_TTL_SECONDS", "99999999999999999"),
        ]);
        assert!(result.is_err());

        let result = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/ki"),
            ("SESSION_SECRET", SECRET),
            ("SESSION_TTL_SECONDS", "31536001"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/ki"),
            ("SESSION_SECRET", SECRET),
            ("MIN_REQUIRED_PASSWORD_LENGTH", "8"),
            ("REQUIRES_UNIQUE_EMAIL", "true"),
            ("MEMBERSHIP_APPLICATION_ID", "6f1c1a36-3d52-4d8e-9a43-7e1e0f5f2b10"),
            ("CORS_ORIGINS", " https://ki.example , ,"),
        ])
        .expect("settings must load");

        assert_eq!(settings.min_required_password_length, 8);
        assert!(settings.requires_unique_email);
        assert_eq!(settings.cors_origins, vec!["https://ki.example".to_string()]);
        assert_ne!(settings.membership_application_id, Uuid::nil());
    }
}
