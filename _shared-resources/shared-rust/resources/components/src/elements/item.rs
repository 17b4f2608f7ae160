// Item Control
// A selectable entry inside the shared popup

use std::fmt;
use tracing::debug;

use super::attrs::{AriaAttrs, Content, Element, RenderProps, Role};
use crate::core::{ElementId, MenuAction, MenuCloser, MenuState, Result, StoreHandle};
use crate::utilities::item_style;

const COMPONENT: &str = "Item";

/// Passed to the selection callback
#[derive(Debug, Clone)]
pub struct ItemEvent {
    pub id: ElementId,
    /// Closes the popup
    pub close: MenuCloser,
}

type SelectFn = Box<dyn FnMut(&ItemEvent)>;

/// Description of an item to add to the list
pub struct Item {
    pub(crate) id: Option<ElementId>,
    pub(crate) disabled: bool,
    pub(crate) content: Content,
    pub(crate) on_select: Option<SelectFn>,
}

impl Item {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            id: None,
            disabled: false,
            content: content.into(),
            on_select: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Callback run when the item is selected
    pub fn on_select(mut self, callback: impl FnMut(&ItemEvent) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("disabled", &self.disabled)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

/// A mounted item
pub struct ItemControl {
    id: ElementId,
    disabled: bool,
    content: Content,
    on_select: Option<SelectFn>,
    store: StoreHandle,
}

impl ItemControl {
    pub(crate) fn mount(item: Item, store: &StoreHandle) -> Result<Self> {
        store.connect(COMPONENT)?;
        Ok(Self {
            id: item.id.unwrap_or_else(|| ElementId::generate("item")),
            disabled: item.disabled,
            content: item.content,
            on_select: item.on_select,
            store: store.clone(),
        })
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Forward a selection to the callback. Returns whether the item was selectable.
    pub fn click(&mut self) -> Result<bool> {
        self.store.connect(COMPONENT)?;
        if self.disabled {
            return Ok(false);
        }
        debug!(item = %self.id, "item selected");
        if let Some(callback) = self.on_select.as_mut() {
            callback(&ItemEvent {
                id: self.id.clone(),
                close: MenuCloser::new(self.store.clone()),
            });
        }
        Ok(true)
    }

    pub fn focus(&self) -> Result<()> {
        self.activate()
    }

    pub fn blur(&self) -> Result<()> {
        self.deactivate()
    }

    pub fn pointer_enter(&self) -> Result<()> {
        self.activate()
    }

    pub fn pointer_leave(&self) -> Result<()> {
        self.deactivate()
    }

    fn activate(&self) -> Result<()> {
        let live = self.store.connect(COMPONENT)?;
        if !self.disabled {
            live.dispatch(MenuAction::ActivateItem(self.id.clone()));
        }
        Ok(())
    }

    fn deactivate(&self) -> Result<()> {
        let live = self.store.connect(COMPONENT)?;
        if !self.disabled {
            live.dispatch(MenuAction::DeactivateItem);
        }
        Ok(())
    }

    pub fn render_props(&self) -> Result<RenderProps> {
        let live = self.store.connect(COMPONENT)?;
        Ok(live.read(|state| self.props_for(state)))
    }

    fn props_for(&self, state: &MenuState) -> RenderProps {
        RenderProps {
            active: state.active_item_id.as_ref() == Some(&self.id),
            disabled: self.disabled,
            open: state.is_open(),
            close: MenuCloser::new(self.store.clone()),
        }
    }

    pub fn attrs(&self) -> AriaAttrs {
        AriaAttrs {
            id: Some(self.id.clone()),
            role: Some(Role::MenuItem),
            disabled: Some(self.disabled),
            tab_index: Some(if self.disabled { -1 } else { 0 }),
            ..AriaAttrs::default()
        }
    }

    pub fn view(&self) -> Result<Element> {
        let live = self.store.connect(COMPONENT)?;
        let props = live.read(|state| self.props_for(state));
        let style = item_style(props.active, props.disabled);
        Ok(self.content.materialize(&props, self.attrs(), style))
    }
}

impl fmt::Debug for ItemControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemControl")
            .field("id", &self.id)
            .field("disabled", &self.disabled)
            .field("content", &self.content)
            .field("has_on_select", &self.on_select.is_some())
            .finish()
    }
}
