//! Command-line and environment configuration.
//!
//! Every option can come from a flag or from the environment; `.env` is
//! loaded before parsing so it feeds the same fallbacks.

use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// TLS behaviour towards Postgres, as spelled in `PGSSL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SslSetting {
    /// Encrypt, but accept any server certificate.
    Require,
    /// Encrypt and verify the server certificate.
    #[value(name = "true")]
    Verify,
    /// Plain connection.
    #[value(name = "false")]
    Disable,
}

impl SslSetting {
    pub fn mode(self) -> PgSslMode {
        match self {
            SslSetting::Require => PgSslMode::Require,
            SslSetting::Verify => PgSslMode::VerifyFull,
            SslSetting::Disable => PgSslMode::Disable,
        }
    }
}

/// When the queue table is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaBootstrap {
    /// Before accepting requests; the first request retries on failure.
    Startup,
    /// On the first intake request.
    Request,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "queue-service")]
#[command(about = "Queue channel ids for fetching and notify the workflow webhook")]
pub struct ServiceConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Full connection string; takes precedence over the PG* parts
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "PGHOST", default_value = "localhost")]
    pub pg_host: String,

    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    pub pg_port: u16,

    #[arg(long, env = "PGUSER", default_value = "postgres")]
    pub pg_user: String,

    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    pub pg_password: Option<String>,

    #[arg(long, env = "PGDATABASE", default_value = "postgres")]
    pub pg_database: String,

    #[arg(long, env = "PGSSL", value_enum, default_value_t = SslSetting::Require)]
    pub pg_ssl: SslSetting,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 10)]
    pub acquire_timeout_secs: u64,

    #[arg(long, env = "DB_IDLE_TIMEOUT_SECS", default_value_t = 30)]
    pub idle_timeout_secs: u64,

    /// Workflow webhook notified after each first-time insert
    #[arg(long, env = "N8N_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    #[arg(long, env = "WEBHOOK_TIMEOUT_SECS", default_value_t = 10)]
    pub webhook_timeout_secs: u64,

    #[arg(long, env = "SCHEMA_BOOTSTRAP", value_enum, default_value_t = SchemaBootstrap::Startup)]
    pub schema_bootstrap: SchemaBootstrap,
}

impl ServiceConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Webhook URL, treating an empty value as unset
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Connection options; a `DATABASE_URL` keeps its own `sslmode`.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return PgConnectOptions::from_str(url);
        }
        let mut options = PgConnectOptions::new()
            .host(&self.pg_host)
            .port(self.pg_port)
            .username(&self.pg_user)
            .database(&self.pg_database)
            .ssl_mode(self.pg_ssl.mode());
        if let Some(password) = &self.pg_password {
            options = options.password(password);
        }
        Ok(options)
    }
}
