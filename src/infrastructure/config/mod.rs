use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

const CONFIG_FILE: &str = "backoffice.toml";
const ENV_PREFIX: &str = "BACKOFFICE_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database_path: String,
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: "backoffice.db".to_string(),
            bind_addr: "127.0.0.1:3001".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, overridden by `backoffice.toml`, overridden by
    /// `BACKOFFICE_`-prefixed environment variables.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| AppError::Internal(format!("Failed to load configuration: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr, "127.0.0.1:3001");
        assert_eq!(settings.database_path, "backoffice.db");
    }
}
