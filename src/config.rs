// path: src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BuildConfig {
    #[serde(default = "default_input_path")]
    pub input_path: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub pretty: bool,
}

fn default_input_path() -> String { "data/communes.json".into() }
fn default_output_dir() -> String { "public/search".into() }

impl Default for BuildConfig {
    fn default() -> Self {
        Self { input_path: default_input_path(), output_dir: default_output_dir(), pretty: false }
    }
}

impl BuildConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|k| std::env::var(k).ok())
    }

    /// То же, что from_env, но источник переменных подменяемый (для тестов)
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let input_path = get("CZ_INPUT").unwrap_or_else(default_input_path);
        let output_dir = get("CZ_OUTPUT_DIR").unwrap_or_else(default_output_dir);
        let pretty = get("CZ_PRETTY").map(|s| parse_flag(&s)).unwrap_or(false);
        Self { input_path, output_dir, pretty }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let p = path.as_ref();
        let data = std::fs::read(p).with_context(|| format!("read config {}", p.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("parse config {}", p.display()))
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
