use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

/// Object storage backend holding the uploaded PDF files.
///
/// `backend = "filesystem"` keeps files under `root` (development, tests).
/// `backend = "s3"` fetches from an S3-compatible bucket via presigned
/// URLs; credentials come from the standard AWS environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: String,
    /// Root directory for the filesystem backend.
    pub root: Option<PathBuf>,
    /// Bucket name for the s3 backend.
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, LocalStack).
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Lifetime of presigned GET URLs, in seconds.
    #[serde(default = "default_url_ttl_secs")]
    pub url_ttl_secs: u64,
    /// Hard deadline for fetching one document's bytes.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_region() -> String {
    "us-east-1".to_string()
}
fn default_url_ttl_secs() -> u64 {
    60
}
fn default_fetch_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Maximum segment length produced by the chunker, in characters.
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// Number of top-scoring segments assembled into the prompt context.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            top_k: default_top_k(),
        }
    }
}

fn default_max_chunk_chars() -> usize {
    3000
}
fn default_top_k() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
    /// API key for the provider. Falls back to `OPENAI_API_KEY` at config
    /// load; the provider constructor fails fast if neither is set.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_provider_timeout_secs(),
            api_key: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_max_tokens() -> u32 {
    300
}
fn default_temperature() -> f64 {
    0.7
}
fn default_provider_timeout_secs() -> u64 {
    60
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Secrets are resolved once here, not deep inside a request.
    if config.provider.api_key.is_none() {
        config.provider.api_key = std::env::var("OPENAI_API_KEY").ok();
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.pipeline.max_chunk_chars == 0 {
        anyhow::bail!("pipeline.max_chunk_chars must be > 0");
    }
    if config.pipeline.top_k == 0 {
        anyhow::bail!("pipeline.top_k must be >= 1");
    }

    match config.storage.backend.as_str() {
        "filesystem" => {
            if config.storage.root.is_none() {
                anyhow::bail!("storage.root is required for the filesystem backend");
            }
        }
        "s3" => {
            if config.storage.bucket.is_empty() {
                anyhow::bail!("storage.bucket is required for the s3 backend");
            }
        }
        other => anyhow::bail!(
            "Unknown storage backend: '{}'. Must be filesystem or s3.",
            other
        ),
    }

    if config.provider.max_tokens == 0 {
        anyhow::bail!("provider.max_tokens must be > 0");
    }
    if !(0.0..=2.0).contains(&config.provider.temperature) {
        anyhow::bail!("provider.temperature must be in [0.0, 2.0]");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Config {
        toml::from_str(toml_str).unwrap()
    }

    const MINIMAL: &str = r#"
[db]
path = "./data/pdfchat.sqlite"

[server]
bind = "127.0.0.1:8080"

[storage]
backend = "filesystem"
root = "./data/pdfs"
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse(MINIMAL);
        validate(&config).unwrap();
        assert_eq!(config.pipeline.max_chunk_chars, 3000);
        assert_eq!(config.pipeline.top_k, 3);
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.max_tokens, 300);
        assert_eq!(config.storage.fetch_timeout_secs, 30);
    }

    #[test]
    fn filesystem_backend_requires_root() {
        let mut config = parse(MINIMAL);
        config.storage.root = None;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn s3_backend_requires_bucket() {
        let mut config = parse(MINIMAL);
        config.storage.backend = "s3".to_string();
        config.storage.root = None;
        assert!(validate(&config).is_err());
        config.storage.bucket = "my-pdfs".to_string();
        validate(&config).unwrap();
    }

    #[test]
    fn unknown_backend_rejected() {
        let mut config = parse(MINIMAL);
        config.storage.backend = "gcs".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let mut config = parse(MINIMAL);
        config.pipeline.max_chunk_chars = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn temperature_out_of_range_rejected() {
        let mut config = parse(MINIMAL);
        config.provider.temperature = 3.5;
        assert!(validate(&config).is_err());
    }
}
