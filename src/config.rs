use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AppError;
use crate::tags::TagMode;

/// Server configuration.
///
/// Sources, lowest precedence first:
/// - built-in defaults
/// - `tagwiki.toml` in the working directory (optional)
/// - `WIKI_*` environment variables (e.g. `WIKI_DATA_DIR`)
/// - `PORT`, which overrides the listen port
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding one `<slug>.md` file per page.
    pub data_dir: PathBuf,
    /// Prebuilt client bundle. Served as a fallback only when it exists; an
    /// empty value turns the fallback off.
    pub static_dir: Option<PathBuf>,
    /// Upper bound on concurrent page reads while scanning for tags.
    pub read_concurrency: usize,
    pub tag_mode: TagMode,
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 5001;

    pub fn load() -> Result<Self, AppError> {
        Self::load_from(
            config::Environment::with_prefix("WIKI"),
            std::env::var("PORT").ok(),
        )
    }

    /// Load from an explicit environment source and `PORT` value.
    pub fn load_from(
        environment: config::Environment,
        port: Option<String>,
    ) -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(Self::DEFAULT_PORT))?
            .set_default("data_dir", "data")?
            .set_default("static_dir", "client/build")?
            .set_default("read_concurrency", 16)?
            .set_default("tag_mode", "strict")?
            .add_source(config::File::with_name("tagwiki").required(false))
            .add_source(environment.try_parsing(true))
            .set_override_option("port", port)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        Ok(config.normalized())
    }

    /// Build with explicit values (useful for testing).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: Self::DEFAULT_PORT,
            data_dir: data_dir.into(),
            static_dir: None,
            read_concurrency: 16,
            tag_mode: TagMode::Strict,
        }
    }

    pub fn with_tag_mode(mut self, tag_mode: TagMode) -> Self {
        self.tag_mode = tag_mode;
        self
    }

    pub fn with_read_concurrency(mut self, read_concurrency: usize) -> Self {
        self.read_concurrency = read_concurrency;
        self
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(static_dir.into());
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))
    }

    fn normalized(mut self) -> Self {
        if self.read_concurrency == 0 {
            tracing::warn!("read_concurrency must be at least 1, using 1");
            self.read_concurrency = 1;
        }
        if self
            .static_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.static_dir = None;
        }
        self
    }
}
