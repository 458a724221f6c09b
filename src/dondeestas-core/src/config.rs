use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    // CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_port() -> u16 {
    8080
}

/// Where and how the service writes its JSON log files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,

    /// Base name of the active log file, rotated files get a numeric suffix
    #[serde(default = "default_log_file_name")]
    pub file_name: String,

    /// Rotate when the active file grows past this size
    #[serde(default = "default_log_max_size_mb")]
    pub max_size_mb: u64,

    /// Rotated files kept besides the active one
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,

    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_log_file_name() -> String {
    "dondeestas.log".to_string()
}

fn default_log_max_size_mb() -> u64 {
    10
}

fn default_log_max_files() -> usize {
    9
}

fn default_log_filter() -> String {
    "dondeestas_server=debug,dondeestas_core=debug,actix_web=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file_name: default_log_file_name(),
            max_size_mb: default_log_max_size_mb(),
            max_files: default_log_max_files(),
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    /// Use "*" to accept any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_cors_enabled() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// DbKind selects the database backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbKind {
    #[default]
    CouchDb,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub kind: DbKind,

    /// Name of the database holding person documents
    #[serde(default = "default_db_name")]
    pub name: String,

    /// Host of the database server, a scheme prefix is allowed and ignored
    #[serde(default = "default_db_hostname")]
    pub hostname: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    /// Per-request transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_db_name() -> String {
    "dondeestas".to_string()
}

fn default_db_hostname() -> String {
    "http://localhost".to_string()
}

fn default_db_port() -> u16 {
    5984
}

fn default_timeout_secs() -> u64 {
    30
}

impl DatabaseConfig {
    pub fn new(kind: DbKind, name: impl Into<String>, hostname: impl Into<String>, port: u16) -> Self {
        Self {
            kind,
            name: name.into(),
            hostname: hostname.into(),
            port,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(
            DbKind::default(),
            default_db_name(),
            default_db_hostname(),
            default_db_port(),
        )
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            logging: LoggingConfig::default(),
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}
