// Menu errors
// Usage errors raised by the tabbed menu elements

use super::ids::ElementId;

/// Errors returned by menu operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// A menu element was used without a live `TabsMenu` root
    #[error("<{component}> must be used within a <TabsMenu>")]
    NoMenuRoot { component: &'static str },

    /// An element with this id is already mounted in the same menu
    #[error("element id '{0}' is already mounted")]
    DuplicateId(ElementId),

    /// No tab with this id is mounted
    #[error("no tab with id '{0}' is mounted")]
    UnknownTab(ElementId),

    /// No item with this id is mounted
    #[error("no item with id '{0}' is mounted")]
    UnknownItem(ElementId),

    /// Open mode string could not be parsed
    #[error("invalid open mode '{0}' (expected 'single_click' or 'double_click')")]
    InvalidOpenMode(String),
}

pub type Result<T> = std::result::Result<T, MenuError>;
