use serde::Deserialize;
use tracing::warn;

/// Module the helper is imported from when no `import_sources` are configured.
pub const DEFAULT_IMPORT_SOURCE: &str = "next/dynamic";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid plugin config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Records `"<file> -> <specifier>"` entries under `modules`.
    Development,
    /// Records `require.resolveWeak(<specifier>)` calls under `webpack`.
    Production,
}

impl Mode {
    /// Maps the host's `env` context value onto a mode.
    pub fn from_env(env: Option<&str>) -> Self {
        match env {
            Some("production") => Mode::Production,
            _ => Mode::Development,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `None` defers to the host environment.
    pub mode: Option<Mode>,
    pub import_sources: Vec<String>,
    pub filename: Option<String>,
    pub project_root: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: None,
            import_sources: vec![DEFAULT_IMPORT_SOURCE.to_string()],
            filename: None,
            project_root: None,
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    pub fn is_import_source(&self, src: &str) -> bool {
        self.import_sources.iter().any(|s| s == src)
    }
}

/// Config from the host's raw plugin JSON. A bad config never fails the
/// build; it is logged and replaced by the defaults.
pub fn resolve_config(raw: Option<String>) -> Config {
    let Some(raw) = raw else {
        return Config::default();
    };
    Config::from_json(&raw).unwrap_or_else(|err| {
        warn!("{err}; falling back to the default config");
        Config::default()
    })
}
