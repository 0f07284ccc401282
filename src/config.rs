use std::env;

/// Which backend serves the product store and manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Postgres,
    Memory,
}

impl Persistence {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Persistence::Postgres),
            "memory" => Ok(Persistence::Memory),
            other => anyhow::bail!("unknown PERSISTENCE backend '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub persistence: Persistence,
    /// Report item failures with 4xx/5xx instead of 200.
    pub conventional_status_codes: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let persistence = match lookup("PERSISTENCE") {
            Some(value) => Persistence::parse(&value)?,
            None => Persistence::Postgres,
        };
        let database_url = lookup("DATABASE_URL");
        if persistence == Persistence::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when PERSISTENCE=postgres");
        }
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let conventional_status_codes = lookup("PRODUCTS_CONVENTIONAL_STATUS")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            database_url,
            host,
            port,
            persistence,
            conventional_status_codes,
        })
    }
}
