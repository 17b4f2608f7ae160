// Configuration validation module

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};
use tui_tabs_menu::{items_id_for, OpenMode, TabsMenuConfigYaml};

use crate::config::{load_config, AppConfig, OptionConfigYaml};

/// Value of the source-language tab that asks for detection
pub const AUTO_DETECT: &str = "auto";

/// Load and validate configuration
pub fn load_and_validate_config(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = load_config(config_path)?;
    validate_config(&config)?;
    info!(
        languages = config.translator.languages.len(),
        personalities = config.translator.personalities.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Check cross references the YAML schema cannot express
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut problems = Vec::new();
    let translator = &config.translator;

    if translator.max_source_length == 0 {
        problems.push("translator.max_source_length must be greater than 0".to_string());
    }
    if !has_code(&translator.languages, &translator.default_target_lang) {
        problems.push(format!(
            "translator.default_target_lang '{}' is not a configured language",
            translator.default_target_lang
        ));
    }
    if !has_code(&translator.personalities, &translator.default_personality) {
        problems.push(format!(
            "translator.default_personality '{}' is not a configured personality",
            translator.default_personality
        ));
    }

    let menus = [
        ("source_language", &config.menus.source_language),
        ("target_language", &config.menus.target_language),
        ("personality", &config.menus.personality),
    ];

    let mut menu_ids = HashSet::new();
    for (key, menu) in &menus {
        if !menu_ids.insert(menu.id.as_str()) {
            problems.push(format!("menus.{key}: menu id '{}' is used twice", menu.id));
        }
        validate_menu(key, menu, &mut problems);
    }

    let languages = &translator.languages;
    check_values(&menus[0], |value| value == AUTO_DETECT || has_code(languages, value), &mut problems);
    check_values(&menus[1], |value| has_code(languages, value), &mut problems);
    check_values(&menus[2], |value| has_code(&translator.personalities, value), &mut problems);

    if problems.is_empty() {
        return Ok(());
    }
    for problem in &problems {
        warn!(%problem, "invalid configuration");
    }
    bail!("Invalid configuration:\n  {}", problems.join("\n  "))
}

fn validate_menu(key: &str, menu: &TabsMenuConfigYaml, problems: &mut Vec<String>) {
    if menu.tabs.is_empty() {
        problems.push(format!("menus.{key}: at least one tab is required"));
    }

    let items_id = items_id_for(&menu.id);
    let mut ids = HashSet::new();
    let all_ids = menu
        .tabs
        .iter()
        .map(|tab| tab.id.as_str())
        .chain(menu.items.iter().map(|item| item.id.as_str()));
    for id in all_ids {
        if items_id == id {
            problems.push(format!("menus.{key}: id '{id}' is reserved for the popup"));
        } else if !ids.insert(id) {
            problems.push(format!("menus.{key}: id '{id}' is used twice"));
        }
    }

    let modes = menu
        .open_mode
        .iter()
        .chain(menu.tabs.iter().filter_map(|tab| tab.open_mode.as_ref()));
    for mode in modes {
        if let Err(err) = mode.parse::<OpenMode>() {
            problems.push(format!("menus.{key}: {err}"));
        }
    }
}

fn check_values(
    (key, menu): &(&str, &TabsMenuConfigYaml),
    known: impl Fn(&str) -> bool,
    problems: &mut Vec<String>,
) {
    let values = menu
        .tabs
        .iter()
        .filter_map(|tab| tab.value.as_deref())
        .chain(menu.items.iter().filter_map(|item| item.value.as_deref()));
    for value in values {
        if !known(value) {
            problems.push(format!("menus.{key}: unknown value '{value}'"));
        }
    }
}

fn has_code(options: &[OptionConfigYaml], code: &str) -> bool {
    options.iter().any(|option| option.code == code)
}
