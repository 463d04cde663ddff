//! Configuration
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! file, environment variables (a `.env` file is honoured), and finally
//! whatever a front end sets through the `with_*` builders.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{BibitError, Result, ResultExt};
use crate::explanation::ExplanationStyle;

/// Default directory holding the model artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "pkl";

/// Default web host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default web port
pub const DEFAULT_PORT: u16 = 5000;

/// Environment variable overriding the artifact directory
pub const ENV_ARTIFACTS_DIR: &str = "BIBIT_ARTIFACTS_DIR";
/// Environment variable overriding the web host
pub const ENV_HOST: &str = "BIBIT_HOST";
/// Environment variable overriding the web port
pub const ENV_PORT: &str = "BIBIT_PORT";
/// Environment variable overriding the explanation style
pub const ENV_EXPLANATION_STYLE: &str = "BIBIT_EXPLANATION_STYLE";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibitConfig {
    /// Sentence table used for explanations
    pub explanation_style: ExplanationStyle,

    /// Where the model artifacts live
    pub artifacts: ArtifactPaths,

    /// Web server settings
    pub server: ServerSettings,
}

impl BibitConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the artifact directory
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts.dir = dir.into();
        self
    }

    /// Set the explanation style
    pub fn with_explanation_style(mut self, style: ExplanationStyle) -> Self {
        self.explanation_style = style;
        self
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(BibitError::from)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BibitError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| BibitError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Defaults or `path`, then `.env` and process environment on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(env_file) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", env_file.display());
        }
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Override settings from an environment lookup
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_ARTIFACTS_DIR) {
            self.artifacts.dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| BibitError::Config(format!("{ENV_PORT}='{port}' is not a port")))?;
        }
        if let Some(style) = lookup(ENV_EXPLANATION_STYLE) {
            self.explanation_style = style.parse().map_err(BibitError::Config)?;
        }
        Ok(self)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| BibitError::Config(format!("invalid socket address: {e}")))
    }
}

/// Locations of the three model artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// Directory the file names below are resolved against
    pub dir: PathBuf,

    /// Trained classifier
    pub model_file: String,

    /// Per-feature label encoders
    pub feature_encoders_file: String,

    /// Target class encoder
    pub target_encoder_file: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            model_file: "model_naive_bayes.json".to_string(),
            feature_encoders_file: "feature_encoders.json".to_string(),
            target_encoder_file: "target_encoder.json".to_string(),
        }
    }
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.model_file)
    }

    pub fn feature_encoders_path(&self) -> PathBuf {
        self.dir.join(&self.feature_encoders_file)
    }

    pub fn target_encoder_path(&self) -> PathBuf {
        self.dir.join(&self.target_encoder_file)
    }
}

/// Web server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
