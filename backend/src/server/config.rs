//! Server settings loaded via OrthoConfig and the runtime configuration
//! derived from them.

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use catalog_backend::domain::Registration;
use catalog_backend::outbound::persistence::DbPool;
use catalog_backend::outbound::security::TokenSecret;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 86_400;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_ADMIN_FULL_NAME: &str = "Administrator";
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Values read from `CATALOG_*` environment variables, CLI flags or a
/// configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// HMAC key for bearer credentials.
    #[serde(default, deserialize_with = "lenient_string")]
    pub token_secret: Option<String>,
    /// Credential lifetime in seconds.
    pub token_ttl_seconds: Option<u64>,
    /// Bootstrap administrator email.
    pub admin_email: Option<String>,
    /// Bootstrap administrator password.
    #[serde(default, deserialize_with = "lenient_string")]
    pub admin_password: Option<String>,
    /// Bootstrap administrator display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub admin_full_name: Option<String>,
    /// Leave the schema untouched at startup even when a database is set.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

/// Accept scalars for free-form string settings.
///
/// Environment values such as `123456` arrive as integers; secrets and
/// passwords must keep them as text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(flag) => flag.to_string(),
    }))
}

impl ServerSettings {
    /// Listen address, falling back to the default.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::other(format!("invalid bind address {raw:?}: {err}"))
        })
    }

    /// Database URL, treating a blank value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Pool size, falling back to the default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Credential lifetime; must be a positive number of seconds.
    pub fn token_ttl(&self) -> std::io::Result<Duration> {
        let seconds = self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
        let seconds = i64::try_from(seconds)
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| std::io::Error::other("token ttl must be a positive number of seconds"))?;
        Ok(Duration::seconds(seconds))
    }

    /// Signing key for credentials.
    ///
    /// Debug builds fall back to a random per-process key so local runs need
    /// no setup; every restart then invalidates issued credentials.
    pub fn token_secret(&self) -> std::io::Result<TokenSecret> {
        match self.token_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Ok(TokenSecret::new(secret.as_bytes().to_vec())),
            None if cfg!(debug_assertions) => {
                warn!("CATALOG_TOKEN_SECRET not set; using an ephemeral signing key (dev only)");
                let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
                rand::thread_rng().fill(bytes.as_mut_slice());
                Ok(TokenSecret::new(bytes))
            }
            None => Err(std::io::Error::other("CATALOG_TOKEN_SECRET must be set")),
        }
    }

    /// Validated bootstrap administrator, when both email and password are set.
    pub fn admin_bootstrap(&self) -> std::io::Result<Option<Registration>> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => {
                let full_name = self
                    .admin_full_name
                    .as_deref()
                    .unwrap_or(DEFAULT_ADMIN_FULL_NAME);
                Registration::try_from_parts(email, password, full_name)
                    .map(Some)
                    .map_err(|err| {
                        std::io::Error::other(format!("invalid bootstrap admin: {err}"))
                    })
            }
            _ => Err(std::io::Error::other(
                "CATALOG_ADMIN_EMAIL and CATALOG_ADMIN_PASSWORD must be set together",
            )),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: TokenSecret,
    pub(crate) token_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: Option<Registration>,
}

impl ServerConfig {
    /// Resolve everything that does not need I/O.
    pub fn from_settings(settings: &ServerSettings) -> std::io::Result<Self> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            token_secret: settings.token_secret()?,
            token_ttl: settings.token_ttl()?,
            db_pool: None,
            admin: settings.admin_bootstrap()?,
        })
    }

    /// Attach a database connection pool; repositories then use PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
