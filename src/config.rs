//! Configuration loading
//!
//! Settings come from `~/.config/approval-sync/config.toml` (or an explicit
//! path), then command-line overrides are applied on top and the result is
//! resolved into a [`RunConfig`] for one run.

use crate::error::{Error, Result};
use crate::types::Transport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the user config directory
const CONFIG_DIR: &str = "approval-sync";

/// Filename of the config file
const CONFIG_FILE: &str = "config.toml";

/// Default Gerrit SSH port
pub const DEFAULT_SSH_PORT: u16 = 29418;

/// Environment variable holding the HTTP password
pub const HTTP_PASSWORD_ENV: &str = "APPROVAL_SYNC_HTTP_PASSWORD";

/// Settings from the config file and command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Review server host name
    pub host: Option<String>,
    /// SSH port of the review server
    pub port: Option<u16>,
    /// Account name used for SSH and pushes
    pub user: Option<String>,
    /// How to query the review service
    pub transport: Option<Transport>,
    /// Base URL of the REST API (http transport)
    pub http_url: Option<String>,
    /// HTTP password for the REST API
    pub http_password: Option<String>,
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--host`
    pub host: Option<String>,
    /// `--port`
    pub port: Option<u16>,
    /// `--user`
    pub user: Option<String>,
    /// `--transport`
    pub transport: Option<Transport>,
    /// `--http-url`
    pub http_url: Option<String>,
}

/// Fully resolved settings for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Review server host name
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Account name
    pub user: String,
    /// Change being synchronized (number or Change-Id)
    pub change_id: String,
    /// Scratch clone location for this run
    pub work_dir: PathBuf,
    /// Query transport
    pub transport: Transport,
    /// REST base URL (http transport only)
    pub http_url: Option<String>,
    /// REST password (http transport only)
    pub http_password: Option<String>,
}

impl RunConfig {
    /// SSH URL of `project` on the review server
    pub fn remote_url(&self, project: &str) -> String {
        format!("ssh://{}@{}:{}/{project}", self.user, self.host, self.port)
    }
}

/// Path of the default config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config file at `path`
///
/// With no explicit path, a missing default file yields an empty `Config`.
/// An explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(Config::default()),
        },
    };

    if !explicit && !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

impl Config {
    /// Apply command-line overrides
    #[must_use]
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if overrides.host.is_some() {
            self.host = overrides.host;
        }
        if overrides.port.is_some() {
            self.port = overrides.port;
        }
        if overrides.user.is_some() {
            self.user = overrides.user;
        }
        if overrides.transport.is_some() {
            self.transport = overrides.transport;
        }
        if overrides.http_url.is_some() {
            self.http_url = overrides.http_url;
        }
        self
    }

    /// Resolve into a [`RunConfig`]
    ///
    /// `env` looks up environment variables; it is a parameter so tests can
    /// supply a fixed environment. The user falls back to `USER`/`LOGNAME`,
    /// the HTTP password to [`HTTP_PASSWORD_ENV`].
    pub fn resolve<F>(self, change_id: &str, work_dir: PathBuf, env: F) -> Result<RunConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let change_id = change_id.trim();
        if change_id.is_empty() {
            return Err(Error::Config("change identifier is empty".to_string()));
        }

        let host = self
            .host
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| Error::Config("no review host configured (use --host)".to_string()))?;

        let user = self
            .user
            .or_else(|| env("USER"))
            .or_else(|| env("LOGNAME"))
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::Config("no user configured (use --user)".to_string()))?;

        let transport = self.transport.unwrap_or_default();
        let http_url = match (transport, self.http_url) {
            (Transport::Http, None) => Some(format!("https://{host}/")),
            (_, url) => url,
        };

        Ok(RunConfig {
            host,
            port: self.port.unwrap_or(DEFAULT_SSH_PORT),
            user,
            change_id: change_id.to_string(),
            work_dir,
            transport,
            http_url,
            http_password: self.http_password.or_else(|| env(HTTP_PASSWORD_ENV)),
        })
    }
}
