// Managers module
// Root menu manager and its YAML configuration helpers

pub mod config;
pub mod tabs_menu;

pub use tabs_menu::{MenuEvent, MenuRenderProps, TabsMenu, TabsMenuOptions};

// Re-export YAML configuration types
pub use config::{
    convert_menu_options,
    create_items,
    create_tabs,
    create_tabs_menu_from_config,
    items_id_for,
    ItemConfigYaml,
    TabConfigYaml,
    TabsMenuConfigYaml,
};
