use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Process-wide settings, read once at start-up and shared read-only.
#[derive(Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET must be set to a non-empty value");
        }

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("invalid PORT '{raw}'"))?,
            None => 8080,
        };

        Ok(Self {
            db_path: lookup("SOBER_DB_PATH")
                .unwrap_or_else(|| "sober.db".into())
                .into(),
            jwt_secret,
            host: lookup("SOBER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            request_timeout: seconds(&lookup, "SOBER_REQUEST_TIMEOUT_SECS", 30)?,
            health_timeout: seconds(&lookup, "SOBER_HEALTH_TIMEOUT_SECS", 3)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid {key} '{raw}'"))?,
        None => default,
    };
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &self.db_path)
            .field("jwt_secret", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("health_timeout", &self.health_timeout)
            .finish()
    }
}
