// Tabs Menu Configuration
// YAML structures describing a menu and helpers that build a mounted TabsMenu from them

use serde::Deserialize;
use std::time::Duration;

use super::tabs_menu::{TabsMenu, TabsMenuOptions};
use crate::core::{ElementId, OpenMode, Result};
use crate::elements::{Item, ItemListOptions, Tab, DEFAULT_DOUBLE_CLICK_TIMEOUT};

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                    YAML Configuration Structures                               │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

/// Menu configuration from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct TabsMenuConfigYaml {
    /// Menu id, also the prefix of the popup id
    pub id: String,
    /// Accessible label of the tab row
    pub label: Option<String>,
    /// "single_click" (default) or "double_click"
    pub open_mode: Option<String>,
    /// Double click window in milliseconds (defaults to 500)
    pub double_click_timeout_ms: Option<u64>,
    /// Keep the popup in the structure while closed
    #[serde(rename = "static", default)]
    pub always_rendered: bool,
    /// Drop the popup from the structure while closed (defaults to true)
    pub unmount: Option<bool>,
    /// Number of popup columns (defaults to 1)
    pub columns: Option<u16>,
    /// Close on a press outside the menu (defaults to true)
    pub dismiss_on_outside_click: Option<bool>,
    /// Tabs in display order
    pub tabs: Vec<TabConfigYaml>,
    /// Popup items in display order
    #[serde(default)]
    pub items: Vec<ItemConfigYaml>,
}

/// Tab configuration from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct TabConfigYaml {
    /// Tab ID
    pub id: String,
    /// Tab display name
    pub name: String,
    /// Value the owner associates with the tab (none for pure triggers)
    pub value: Option<String>,
    /// Per-tab open mode override
    pub open_mode: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Item configuration from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ItemConfigYaml {
    /// Item ID
    pub id: String,
    /// Item display name
    pub name: String,
    /// Value the owner associates with the item
    pub value: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl TabsMenuConfigYaml {
    /// Value configured for a tab or item id
    pub fn value_of(&self, id: &ElementId) -> Option<&str> {
        self.tabs
            .iter()
            .find(|tab| *id == tab.id.as_str())
            .and_then(|tab| tab.value.as_deref())
            .or_else(|| {
                self.items
                    .iter()
                    .find(|item| *id == item.id.as_str())
                    .and_then(|item| item.value.as_deref())
            })
    }

    /// Display name of the first tab or item carrying `value`
    pub fn name_of_value(&self, value: &str) -> Option<&str> {
        let tabs = self
            .tabs
            .iter()
            .filter(|tab| tab.value.as_deref() == Some(value))
            .map(|tab| tab.name.as_str());
        let items = self
            .items
            .iter()
            .filter(|item| item.value.as_deref() == Some(value))
            .map(|item| item.name.as_str());
        tabs.chain(items).next()
    }
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                    Configuration Conversion Functions                          │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

/// Id of the popup belonging to a configured menu
pub fn items_id_for(menu_id: &str) -> ElementId {
    ElementId::new(format!("{menu_id}-items"))
}

/// Convert YAML menu configuration to construction options
pub fn convert_menu_options(config: &TabsMenuConfigYaml) -> Result<TabsMenuOptions> {
    let open_mode = match &config.open_mode {
        Some(mode) => mode.parse::<OpenMode>()?,
        None => OpenMode::default(),
    };

    Ok(TabsMenuOptions {
        items_id: Some(items_id_for(&config.id)),
        label: config.label.clone(),
        open_mode,
        double_click_timeout: config
            .double_click_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DOUBLE_CLICK_TIMEOUT),
        item_list: ItemListOptions {
            always_rendered: config.always_rendered,
            unmount: config.unmount.unwrap_or(true),
            columns: config.columns.unwrap_or(1),
        },
        dismiss_on_outside_click: config.dismiss_on_outside_click.unwrap_or(true),
    })
}

/// Create the tab descriptors of a configured menu
pub fn create_tabs(config: &TabsMenuConfigYaml) -> Result<Vec<Tab>> {
    config
        .tabs
        .iter()
        .map(|tab| {
            let mut built = Tab::new(tab.name.as_str())
                .with_id(tab.id.as_str())
                .disabled(tab.disabled);
            if let Some(mode) = &tab.open_mode {
                built = built.open_mode(mode.parse()?);
            }
            Ok(built)
        })
        .collect()
}

/// Create the item descriptors of a configured menu
pub fn create_items(config: &TabsMenuConfigYaml) -> Vec<Item> {
    config
        .items
        .iter()
        .map(|item| {
            Item::new(item.name.as_str())
                .with_id(item.id.as_str())
                .disabled(item.disabled)
        })
        .collect()
}

/// Create a menu from YAML configuration with every configured tab and item mounted
pub fn create_tabs_menu_from_config(config: &TabsMenuConfigYaml) -> Result<TabsMenu> {
    let mut menu = TabsMenu::new(convert_menu_options(config)?)?;
    for tab in create_tabs(config)? {
        menu.mount_tab(tab)?;
    }
    for item in create_items(config) {
        menu.add_item(item)?;
    }
    Ok(menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MenuError;

    const YAML: &str = r#"
id: source
label: Source language
open_mode: double_click
double_click_timeout_ms: 350
columns: 2
tabs:
  - id: auto
    name: Detect language
    open_mode: single_click
  - id: en
    name: English
    value: en
  - id: tlh
    name: Klingon
    disabled: true
items:
  - id: en-item
    name: English
    value: en
  - id: de-item
    name: Deutsch
    value: de
"#;

    fn parse(yaml: &str) -> TabsMenuConfigYaml {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_convert_options() {
        let options = convert_menu_options(&parse(YAML)).unwrap();
        assert_eq!(options.items_id, Some(ElementId::new("source-items")));
        assert_eq!(options.label.as_deref(), Some("Source language"));
        assert_eq!(options.open_mode, OpenMode::DoubleClick);
        assert_eq!(options.double_click_timeout, Duration::from_millis(350));
        assert_eq!(options.item_list.columns, 2);
        assert!(options.item_list.unmount);
        assert!(!options.item_list.always_rendered);
        assert!(options.dismiss_on_outside_click);
    }

    #[test]
    fn test_defaults() {
        let config = parse("id: m\ntabs: []\n");
        let options = convert_menu_options(&config).unwrap();
        assert_eq!(options.open_mode, OpenMode::SingleClick);
        assert_eq!(options.double_click_timeout, DEFAULT_DOUBLE_CLICK_TIMEOUT);
        assert_eq!(options.item_list, ItemListOptions::default());
        assert!(config.items.is_empty());
    }

    #[test]
    fn test_static_flag() {
        let config = parse("id: m\nstatic: true\nunmount: false\ntabs: []\n");
        let options = convert_menu_options(&config).unwrap();
        assert!(options.item_list.always_rendered);
        assert!(!options.item_list.unmount);
    }

    #[test]
    fn test_create_menu_from_config() {
        let menu = create_tabs_menu_from_config(&parse(YAML)).unwrap();
        let state = menu.state();
        assert_eq!(state.labelled_by(), "auto en tlh");
        assert_eq!(state.open_mode, OpenMode::DoubleClick);
        assert_eq!(menu.item_list().items().len(), 2);

        let auto = menu.tab_group().tab(&ElementId::new("auto")).unwrap();
        assert_eq!(auto.effective_open_mode().unwrap(), OpenMode::SingleClick);
        assert!(menu.tab_group().tab(&ElementId::new("tlh")).unwrap().is_disabled());
    }

    #[test]
    fn test_values_and_names() {
        let config = parse(YAML);
        assert_eq!(config.value_of(&ElementId::new("en")), Some("en"));
        assert_eq!(config.value_of(&ElementId::new("de-item")), Some("de"));
        assert_eq!(config.value_of(&ElementId::new("auto")), None);
        assert_eq!(config.value_of(&ElementId::new("missing")), None);
        assert_eq!(config.name_of_value("de"), Some("Deutsch"));
        assert_eq!(config.name_of_value("en"), Some("English"));
        assert_eq!(config.name_of_value("xx"), None);
    }

    #[test]
    fn test_invalid_open_mode() {
        let config = parse("id: m\nopen_mode: triple_click\ntabs: []\n");
        assert_eq!(
            convert_menu_options(&config).unwrap_err(),
            MenuError::InvalidOpenMode("triple_click".to_string())
        );

        let config = parse("id: m\ntabs:\n  - id: a\n    name: A\n    open_mode: hover\n");
        assert!(create_tabs_menu_from_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_tab_ids_rejected() {
        let config = parse("id: m\ntabs:\n  - id: a\n    name: A\n  - id: a\n    name: B\n");
        assert_eq!(
            create_tabs_menu_from_config(&config).unwrap_err(),
            MenuError::DuplicateId(ElementId::new("a"))
        );
    }
}
