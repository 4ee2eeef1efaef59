//! Config model and persistence helpers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Environment variable that overrides `session.access_token`.
pub const TOKEN_ENV: &str = "PRODUCT_FORM_TOKEN";

/// Top-level configuration stored in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog backend location and paging.
    pub backend: BackendCfg,
    /// Session credential used for every request.
    #[serde(default)]
    pub session: SessionCfg,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingCfg,
}

/// Catalog backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendCfg {
    /// Base URL the API paths are appended to.
    pub base_url: String,
    /// Page requested for categories and colors.
    pub page: u32,
    /// Page size for categories and colors.
    pub limit: u32,
    /// Transport timeout for each request.
    pub timeout_secs: u64,
}

/// Session settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCfg {
    /// Bearer token; empty means signed out.
    pub access_token: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingCfg {
    /// File the log is written to (relative to the working directory).
    pub file: String,
}

impl Default for LoggingCfg {
    fn default() -> Self {
        Self {
            file: "product_form.log".into(),
        }
    }
}

impl Config {
    /// Load from disk or create defaults when missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str(&s)?)
        } else {
            let cfg = Self::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Persist the config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }

    /// Token from the environment if set, otherwise from the file.
    pub fn access_token(&self) -> String {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.session.access_token.clone())
    }
}

impl Default for Config {
    /// Defaults match the page size the admin panel requests.
    fn default() -> Self {
        Self {
            backend: BackendCfg {
                base_url: "http://localhost:5000/api/v1".into(),
                page: 1,
                limit: 50,
                timeout_secs: 30,
            },
            session: SessionCfg::default(),
            logging: LoggingCfg::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_or_default_writes_file_then_reads_it_back() {
        let path = std::env::temp_dir().join(format!("product-form-{}.toml", uuid::Uuid::new_v4()));

        let created = Config::load_or_default(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.backend.limit, 50);

        let mut edited = created.clone();
        edited.backend.base_url = "https://api.example.test".into();
        edited.save(&path).unwrap();
        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded.backend.base_url, "https://api.example.test");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_optional_sections_use_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [backend]
            base_url = "http://x"
            page = 2
            limit = 10
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backend.page, 2);
        assert!(cfg.session.access_token.is_empty());
        assert_eq!(cfg.logging.file, "product_form.log");
    }
}
