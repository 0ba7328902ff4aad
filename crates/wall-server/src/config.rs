use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

use wall_embed::WidgetOrigin;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub public_origin: WidgetOrigin,
    pub google_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = get("WALL_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("WALL_JWT_SECRET is unset or still a placeholder; set it in your .env file");
        }

        let host = get("WALL_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("WALL_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("WALL_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let db_path: PathBuf = get("WALL_DB_PATH").unwrap_or_else(|| "walls.db".into()).into();

        let origin = get("WALL_PUBLIC_ORIGIN").unwrap_or_else(|| format!("http://localhost:{}", port));
        let public_origin = WidgetOrigin::parse(&origin)
            .map_err(|e| anyhow::anyhow!("WALL_PUBLIC_ORIGIN: {}", e))?;

        let google_api_key = get("GOOGLE_MAPS_API_KEY").filter(|k| !k.trim().is_empty());

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
            public_origin,
            google_api_key,
        })
    }
}
