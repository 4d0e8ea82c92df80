use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog/pricing backend.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Max instance types per pricing request; larger lists are chunked.
    pub price_chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub show_spinner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                timeout_secs: 30,
                price_chunk_size: 40,
            },
            output: OutputConfig {
                format: "text".to_string(),
                show_spinner: true,
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .sizectl.toml in current dir, then ~/.config/sizectl/config.toml
            let local = PathBuf::from(".sizectl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("sizectl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".sizectl.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Incorrect value types");
                err.push_str("\n  Tip: Run 'sizectl init' to create a new config file");
                err
            })?;
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'sizectl init' to create a config file.");
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.price_chunk_size, 40);
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = Config::default();
        config.api.base_url = "http://sizing.internal:9000".to_string();
        assert!(config.save(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.api.base_url, "http://sizing.internal:9000");
        assert_eq!(loaded.api.timeout_secs, config.api.timeout_secs);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let fake_path = temp_dir.path().join("nonexistent.toml");

        // Should return default config
        let config = Config::load(Some(&fake_path)).unwrap();
        assert_eq!(config.api.price_chunk_size, 40);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid toml content {").unwrap();

        let result = Config::load(Some(&config_path));
        assert!(result.is_err());
    }

    #[test]
    fn test_init_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("init_test.toml");

        assert!(init_config(&config_path).is_ok());
        assert!(config_path.exists());

        // Verify it's valid TOML
        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
    }
}
