use serde::Deserialize;
use std::path::Path;

/// Application configuration, loaded from an optional `config.toml` with
/// environment overrides (`PORT`, `DATABASE_URL`).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://postgres:password@db:5432/qa_service".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(
            Path::new("config.toml"),
            std::env::var("PORT").ok(),
            std::env::var("DATABASE_URL").ok(),
        )
    }

    fn load_from(
        path: &Path,
        port_env: Option<String>,
        database_url_env: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)?
        } else {
            Self::default()
        };

        if let Some(port) = port_env {
            config.server.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT is not a valid port number: {port}"))?;
        }
        if let Some(url) = database_url_env {
            config.database.url = url;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
