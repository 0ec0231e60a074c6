use std::fs;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub catalog_path: Option<String>,
    pub cache_max_age_seconds: u64,
    pub cache_stale_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            catalog_path: None,
            cache_max_age_seconds: 60,
            cache_stale_seconds: 120,
        }
    }
}

impl Settings {
    pub fn cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.cache_max_age_seconds, self.cache_stale_seconds
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    catalog_path: Option<String>,
    cache_max_age_seconds: Option<u64>,
    cache_stale_seconds: Option<u64>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let raw = fs::read_to_string("server.toml").ok();
    settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `server.toml`, then environment. Later layers win.
pub fn settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid server.toml")?;
        if let Some(v) = file_cfg.bind_addr {
            settings.server_bind = v;
        }
        if let Some(v) = file_cfg.catalog_path {
            settings.catalog_path = Some(v);
        }
        if let Some(v) = file_cfg.cache_max_age_seconds {
            settings.cache_max_age_seconds = v;
        }
        if let Some(v) = file_cfg.cache_stale_seconds {
            settings.cache_stale_seconds = v;
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__CATALOG_PATH").filter(|v| !v.trim().is_empty()) {
        settings.catalog_path = Some(v);
    }

    if let Some(v) = env("APP__CACHE_MAX_AGE_SECONDS") {
        settings.cache_max_age_seconds = v
            .parse()
            .with_context(|| format!("APP__CACHE_MAX_AGE_SECONDS must be an integer, got '{v}'"))?;
    }
    if let Some(v) = env("APP__CACHE_STALE_SECONDS") {
        settings.cache_stale_seconds = v
            .parse()
            .with_context(|| format!("APP__CACHE_STALE_SECONDS must be an integer, got '{v}'"))?;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
