use anyhow::Context;
use dbfilter_tenant::DbFilterConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dbfilter: DbFilterConfig,
    /// Public suffix list file; the embedded list is used when unset
    #[serde(default)]
    pub public_suffix_list: Option<PathBuf>,
    #[serde(default)]
    pub tenants: Vec<TenantUpstream>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Trust `X-Forwarded-Host` from a fronting proxy
    #[serde(default)]
    pub proxy_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            proxy_mode: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TenantUpstream {
    pub name: String,
    pub upstream: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl ProxyConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ProxyConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }
}
