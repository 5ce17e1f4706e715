use serde::Deserialize;

/// Upper bound for access token lifetime (30 days).
pub const MAX_TTL_MINUTES: i64 = 30 * 24 * 60;
const DEFAULT_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "course-catalog".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "course-catalog-professors".into()),
            ttl_minutes: ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref()),
        };
        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            jwt,
        })
    }
}

/// Missing, unparsable or non-positive values fall back to the default;
/// larger ones are capped at [`MAX_TTL_MINUTES`].
fn ttl_minutes(raw: Option<&str>) -> i64 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(v) if v > MAX_TTL_MINUTES => {
            tracing::warn!(requested = v, max = MAX_TTL_MINUTES, "JWT_TTL_MINUTES capped");
            MAX_TTL_MINUTES
        }
        Some(v) if v > 0 => v,
        _ => DEFAULT_TTL_MINUTES,
    }
}
