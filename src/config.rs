use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Run the embedded migrations (schema + role seed) at start-up.
    pub sync_db: bool,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_KEY").context("JWT_KEY must be set")?,
            ttl_hours: parse_ttl_hours(std::env::var("JWT_TTL_HOURS").ok().as_deref())
                .context("JWT_TTL_HOURS must be a whole number of hours between 1 and 8760")?,
        };
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;
        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            sync_db: parse_flag(std::env::var("SYNC_DB").ok().as_deref()),
            jwt,
        })
    }
}

const MAX_TTL_HOURS: i64 = 24 * 365;

fn parse_ttl_hours(value: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = value else {
        return Ok(24);
    };
    let hours = raw.trim().parse::<i64>()?;
    anyhow::ensure!(
        (1..=MAX_TTL_HOURS).contains(&hours),
        "token ttl of {hours}h is out of range"
    );
    Ok(hours)
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(value, Some(v) if v.trim() == "true")
}
