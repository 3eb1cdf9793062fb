use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Front-end configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    /// Upstream pet-store base URL, e.g. `https://petstore.swagger.io/v2`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Upstream API key, sent on deletes
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level / `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for transient upload files (system temp dir when unset)
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,

    /// Maximum photo size in MB
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            bind_addr: default_bind_addr(),
            port: default_port(),
            log_level: default_log_level(),
            upload_dir: None,
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl WebConfig {
    /// Load configuration from `.env`, an optional `petstore-web` file and
    /// `PETSTORE_*` environment variables, in increasing priority.
    ///
    /// A missing `.env` is fine, an unreadable one is an error. Missing
    /// upstream settings are not an error here; the gateway reports them on
    /// every call instead.
    pub fn load() -> anyhow::Result<Self> {
        check_dotenv(dotenvy::dotenv())?;

        let builder = config::Config::builder()
            .add_source(config::File::with_name("petstore-web").required(false))
            .add_source(
                config::Environment::with_prefix("PETSTORE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: WebConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get upstream timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max photo size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_mb() -> usize {
    5
}

fn check_dotenv<T>(result: dotenvy::Result<T>) -> anyhow::Result<()> {
    match result {
        Err(err) if !err.not_found() => {
            Err(anyhow::Error::new(err).context("failed to read .env file"))
        }
        _ => Ok(()),
    }
}
