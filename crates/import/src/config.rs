//! Import configuration.

use serde::Deserialize;

use crate::ImportError;

/// Environment variable toggling updates of entities that already exist.
pub const ENV_OVERWRITE_EXISTING: &str = "ROLESYNC_OVERWRITE_EXISTING";
/// Environment variable holding the description given to created roles.
pub const ENV_ROLE_DESCRIPTION: &str = "ROLESYNC_ROLE_DESCRIPTION";

/// How an import treats the directory it runs against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Bring pre-existing users and roles in line with the payload.
    ///
    /// When off, a user that already exists is left untouched and a role that
    /// already exists keeps its current bindings.
    pub overwrite_existing: bool,
    /// Description passed to the directory for every role the import creates.
    pub role_description: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            overwrite_existing: true,
            role_description: None,
        }
    }
}

impl ImportConfig {
    pub fn with_overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    pub fn with_role_description(mut self, description: impl Into<String>) -> Self {
        self.role_description = Some(description.into());
        self
    }

    /// Defaults overridden by `ROLESYNC_*` environment variables.
    pub fn from_env() -> Result<Self, ImportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ImportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_OVERWRITE_EXISTING) {
            config.overwrite_existing = parse_bool(&raw).ok_or_else(|| {
                ImportError::config(format!(
                    "{ENV_OVERWRITE_EXISTING} must be true/false, got '{raw}'"
                ))
            })?;
        }

        if let Some(description) = lookup(ENV_ROLE_DESCRIPTION) {
            if !description.trim().is_empty() {
                config.role_description = Some(description);
            }
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
