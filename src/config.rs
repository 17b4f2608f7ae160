// Configuration loading module

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tui_tabs_menu::TabsMenuConfigYaml;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub application: ApplicationConfig,
    pub translator: TranslatorConfigYaml,
    pub menus: MenusConfigYaml,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    pub title: String,
    pub bindings: Vec<BindingConfigYaml>,
    pub status_bar: StatusBarConfigYaml,
    /// How long a toast stays on screen
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindingConfigYaml {
    pub key: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusBarConfigYaml {
    pub default_text: String,
    #[serde(default)]
    pub modal_text: Option<String>,
}

/// Languages, personalities and request defaults
#[derive(Debug, Clone, Deserialize)]
pub struct TranslatorConfigYaml {
    #[serde(default = "default_max_source_length")]
    pub max_source_length: usize,
    pub default_target_lang: String,
    pub default_personality: String,
    pub languages: Vec<OptionConfigYaml>,
    pub personalities: Vec<OptionConfigYaml>,
}

/// A `{code, name}` pair as served by the language list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OptionConfigYaml {
    pub code: String,
    pub name: String,
}

/// The three selector menus
#[derive(Debug, Clone, Deserialize)]
pub struct MenusConfigYaml {
    pub source_language: TabsMenuConfigYaml,
    pub target_language: TabsMenuConfigYaml,
    pub personality: TabsMenuConfigYaml,
}

fn default_toast_duration_ms() -> u64 {
    3000
}

fn default_max_source_length() -> usize {
    5000
}

/// `src/config.yaml` inside the crate
pub fn default_config_path() -> PathBuf {
    let mut default_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    default_path.push("src");
    default_path.push("config.yaml");
    default_path
}

pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let path = config_path.unwrap_or_else(default_config_path);

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = serde_yaml::from_str(contents)?;
    Ok(config)
}
