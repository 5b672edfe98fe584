use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# Resume Tailor default configuration
[server]
host = "127.0.0.1"
port = 8385

[llm]
api_base = "https://api.openai.com/v1"
api_key = "your-api-key-here"
model = "gpt-4o-mini"
temperature = 0.7
timeout_secs = 120

[fetch]
user_agent = "Resume-Tailor/1.0"
timeout_secs = 30

[limits]
max_input_chars = 200000
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub limits: LimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Per-field cap on input length, in characters. 0 disables the cap.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_user_agent() -> String {
    "Resume-Tailor/1.0".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_input_chars() -> usize {
    200_000
}

impl Config {
    /// Loads configuration from `RESUME_TAILOR_CONFIG` if set, otherwise
    /// from the user config file (created with defaults on first run).
    pub fn load_auto() -> Result<Self> {
        if let Ok(path) = env::var("RESUME_TAILOR_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load(&path.to_string_lossy());
            } else {
                tracing::warn!(
                    "RESUME_TAILOR_CONFIG points to non-existent file: {}",
                    path.display()
                );
            }
        }

        Self::load_from_user_config()
    }

    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let mut cfg: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML from {}", path))?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn load_from_user_config() -> Result<Self> {
        let path = Self::ensure_user_config_exists()?;
        Self::load(&path.to_string_lossy())
    }

    /// `OPENAI_API_KEY` always wins over the key written in the config file,
    /// so the file can be committed with a placeholder.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = key;
            }
        }
    }

    fn user_config_path() -> Result<PathBuf> {
        let home = env::var("HOME").context("HOME env var not set")?;
        Ok(Path::new(&home)
            .join(".config")
            .join("resume-tailor")
            .join("config.toml"))
    }

    fn ensure_user_config_exists() -> Result<PathBuf> {
        let path = Self::user_config_path()?;
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
            }
        }
        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write default config to {}", path.display()))?;
            tracing::info!("Wrote default config to {}", path.display());
        }
        Ok(path)
    }
}
