use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DevJobsError, Result};
use crate::fetch::ResolutionOrder;
use crate::models::Session;
use crate::notify::Detail;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "DEVJOBS_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Client configuration, read from `~/.devjobs/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevJobsConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout. Unset means wait as long as the transport does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub resolution: ResolutionOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Append the failure cause to "could not get ..." messages.
    pub detailed: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { detailed: true }
    }
}

impl DevJobsConfig {
    /// Load config from ~/.devjobs/config.toml, falling back to defaults when
    /// the file does not exist. `DEVJOBS_API_URL` wins over the file.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!(url = %url, "api url from environment");
                config.api.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| DevJobsError::toml_parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Get config file path: ~/.devjobs/config.toml
    pub fn config_path() -> PathBuf {
        devjobs_home().join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(DevJobsError::config("api.base_url is empty"));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(DevJobsError::config("api.timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn detail(&self) -> Detail {
        if self.notifications.detailed {
            Detail::Detailed
        } else {
            Detail::Uniform
        }
    }

    /// Dotted lookup (`api.base_url`), rendered as TOML scalars are.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = toml::Value::try_from(self).map_err(|source| DevJobsError::TomlSerialize {
            what: "config",
            source,
        })?;
        let found = key
            .split('.')
            .try_fold(&value, |node, part| node.get(part));
        Ok(found.map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|source| DevJobsError::TomlSerialize {
            what: "config",
            source,
        })
    }

    /// Save config to ~/.devjobs/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// `~/.devjobs`
pub fn devjobs_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".devjobs")
}

/// Where the logged-in session is kept between commands.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(devjobs_home().join("session.toml"))
    }
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session = toml::from_str(&content).map_err(|e| DevJobsError::toml_parse(&self.path, e))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(session).map_err(|source| DevJobsError::TomlSerialize {
            what: "session",
            source,
        })?;
        let mut file = open_private(&self.path)?;
        file.write_all(body.as_bytes())?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the stored session. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open for writing, readable by the owner only before anything is written.
fn open_private(path: &Path) -> Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;
    // mode() only applies on create
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}
