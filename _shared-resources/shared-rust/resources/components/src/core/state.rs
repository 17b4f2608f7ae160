// Menu State
// Shared state of one tabbed menu and its pure transition function

use serde::Deserialize;
use std::str::FromStr;

use super::error::MenuError;
use super::ids::{join_ids, ElementId};

/// How many clicks on a closed tab are needed to open the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    /// One click opens the popup
    #[default]
    SingleClick,
    /// The first click only arms the tab, the second one opens the popup
    DoubleClick,
}

impl FromStr for OpenMode {
    type Err = MenuError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.to_lowercase().replace('-', "_").as_str() {
            "single_click" | "single" => Ok(OpenMode::SingleClick),
            "double_click" | "double" => Ok(OpenMode::DoubleClick),
            _ => Err(MenuError::InvalidOpenMode(mode.to_string())),
        }
    }
}

/// Whether the item list is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    Open,
    #[default]
    Closed,
}

/// Transitions understood by the menu store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    AddTab(ElementId),
    RemoveTab(ElementId),
    ActivateTab(ElementId),
    DeactivateTab,
    ActivateItem(ElementId),
    DeactivateItem,
    Open,
    Close,
    SetOpenMode(OpenMode),
}

/// State shared by every element of one tabbed menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    /// Id of the item list (target of every tab's `controls` reference)
    pub items_id: ElementId,
    /// Mounted tabs, in mount order
    pub tab_ids: Vec<ElementId>,
    /// Tab currently hovered or focused
    pub active_tab_id: Option<ElementId>,
    /// Item currently hovered or focused
    pub active_item_id: Option<ElementId>,
    /// Default open mode for tabs without an override
    pub open_mode: OpenMode,
    /// Whether the item list is open
    pub toggle_state: ToggleState,
}

impl MenuState {
    pub fn new(items_id: ElementId) -> Self {
        Self {
            items_id,
            tab_ids: Vec::new(),
            active_tab_id: None,
            active_item_id: None,
            open_mode: OpenMode::default(),
            toggle_state: ToggleState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.toggle_state == ToggleState::Open
    }

    pub fn has_tab(&self, id: &ElementId) -> bool {
        self.tab_ids.contains(id)
    }

    /// Space separated list of every mounted tab id
    pub fn labelled_by(&self) -> String {
        join_ids(&self.tab_ids)
    }

    /// Apply an action and return the next state. Total: every action is defined for every state.
    pub fn reduce(&self, action: &MenuAction) -> MenuState {
        let mut next = self.clone();
        match action {
            MenuAction::AddTab(id) => {
                if !next.tab_ids.contains(id) {
                    next.tab_ids.push(id.clone());
                }
            }
            MenuAction::RemoveTab(id) => {
                next.tab_ids.retain(|tab| tab != id);
                // An unmounted tab cannot stay the active descendant
                if next.active_tab_id.as_ref() == Some(id) {
                    next.active_tab_id = None;
                }
            }
            MenuAction::ActivateTab(id) => {
                if next.tab_ids.contains(id) {
                    next.active_tab_id = Some(id.clone());
                }
            }
            MenuAction::DeactivateTab => next.active_tab_id = None,
            MenuAction::ActivateItem(id) => next.active_item_id = Some(id.clone()),
            MenuAction::DeactivateItem => next.active_item_id = None,
            MenuAction::Open => next.toggle_state = ToggleState::Open,
            MenuAction::Close => next.toggle_state = ToggleState::Closed,
            MenuAction::SetOpenMode(mode) => next.open_mode = *mode,
        }
        next
    }
}
