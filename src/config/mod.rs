use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub purchase: PurchaseConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

/// Knobs for the buy flow: how wager mutations are isolated and how the
/// compensating delete is bounded.
#[derive(Debug, Clone)]
pub struct PurchaseConfig {
    pub isolation: PurchaseIsolation,
    pub compensation_timeout: Duration,
    pub compensation_max_in_flight: usize,
    pub compensation_queue_capacity: usize,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            isolation: PurchaseIsolation::PerWager,
            compensation_timeout: Duration::from_secs(3),
            compensation_max_in_flight: 8,
            compensation_queue_capacity: 256,
        }
    }
}

/// How concurrent buys against the same wager are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseIsolation {
    /// Plain read-modify-write with no coordination. Concurrent buys can
    /// oversell a wager or lose an update.
    Unguarded,
    /// Buys against one wager id are serialized through an async mutex.
    PerWager,
}

impl FromStr for PurchaseIsolation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unguarded" | "none" => Ok(Self::Unguarded),
            "per_wager" | "per-wager" | "locked" => Ok(Self::PerWager),
            other => Err(anyhow::anyhow!("unknown PURCHASE_ISOLATION value: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let log_format = match env::var("LOG_FORMAT").unwrap_or_default().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.into()),
            port: parse_var("PORT", DEFAULT_PORT)?,
            database: DatabaseConfig::from_env()?,
            purchase: PurchaseConfig::from_env()?,
            log_format,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => compose_database_url()?,
        };

        Ok(Self {
            url,
            max_connections: parse_var("DB_MAX_OPEN_CONN", 20)?,
            min_connections: parse_var("DB_MAX_IDLE_CONN", 5)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,
        })
    }
}

impl PurchaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let isolation = match env::var("PURCHASE_ISOLATION") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.isolation,
        };

        Ok(Self {
            isolation,
            compensation_timeout: Duration::from_secs(parse_var(
                "COMPENSATION_TIMEOUT_SECS",
                defaults.compensation_timeout.as_secs(),
            )?),
            compensation_max_in_flight: parse_var(
                "COMPENSATION_MAX_IN_FLIGHT",
                defaults.compensation_max_in_flight,
            )?,
            compensation_queue_capacity: parse_var(
                "COMPENSATION_QUEUE_CAPACITY",
                defaults.compensation_queue_capacity,
            )?,
        })
    }
}

/// Build a Postgres URL from the discrete `DB_*` variables.
fn compose_database_url() -> anyhow::Result<String> {
    let name = env::var("DB_NAME")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL or DB_NAME must be set"))?;
    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".into());
    let port: u16 = parse_var("DB_PORT", 5432)?;
    let user = env::var("DB_USER").unwrap_or_default();
    let pass = env::var("DB_PASS").unwrap_or_default();

    let credentials = match (user.trim(), pass.trim()) {
        ("", _) => String::new(),
        (user, "") => format!("{user}@"),
        (user, pass) => format!("{user}:{pass}@"),
    };

    Ok(format!(
        "postgres://{credentials}{}:{port}/{}",
        host.trim(),
        name.trim()
    ))
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        _ => Ok(default),
    }
}
