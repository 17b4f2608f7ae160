// Tabs Menu Manager
// Root of a tabbed menu: owns the store, routes pointer and keyboard input, draws tabs and popup

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::cell::Cell;
use std::time::Duration;
use tracing::debug;

use crate::core::{
    ElementId, MenuAction, MenuCloser, MenuError, MenuState, MenuStore, OpenMode, PointerEvent,
    PointerHub, PointerKind, RectMetrics, RectRegistry, Result, SharedRegistry, StoreHandle,
};
use crate::elements::{
    AriaAttrs, ClickOutcome, Element, Item, ItemList, ItemListOptions, Role, Tab, TabGroup,
    DEFAULT_DOUBLE_CLICK_TIMEOUT,
};
use crate::utilities::DimmingContext;

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                    Options and Events                                          │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

/// Construction options of a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsMenuOptions {
    /// Id of the popup (generated when `None`)
    pub items_id: Option<ElementId>,
    /// Accessible label of the tab row
    pub label: Option<String>,
    /// Default open mode of every tab
    pub open_mode: OpenMode,
    /// Maximum gap between the two clicks of a double click
    pub double_click_timeout: Duration,
    pub item_list: ItemListOptions,
    /// Close the popup on a press outside the tabs and the popup
    pub dismiss_on_outside_click: bool,
}

impl Default for TabsMenuOptions {
    fn default() -> Self {
        Self {
            items_id: None,
            label: None,
            open_mode: OpenMode::default(),
            double_click_timeout: DEFAULT_DOUBLE_CLICK_TIMEOUT,
            item_list: ItemListOptions::default(),
            dismiss_on_outside_click: true,
        }
    }
}

/// Values handed to the owner of the menu
#[derive(Debug, Clone)]
pub struct MenuRenderProps {
    pub open: bool,
    pub close: MenuCloser,
}

/// What an input did to the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    None,
    Tab { id: ElementId, outcome: ClickOutcome },
    ItemSelected(ElementId),
    /// Closed by Esc or an outside press
    Dismissed,
    FocusMoved(ElementId),
    /// Focus walked past the first or last control
    FocusLeft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Tab(ElementId),
    Item(ElementId),
    Popup,
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                    Tabs Menu                                                   │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

/// A tab row and its shared popup
#[derive(Debug)]
pub struct TabsMenu {
    // Children are declared first so they drop before the store they deregister from
    tab_group: TabGroup,
    item_list: ItemList,
    hovered: Option<Target>,
    focused: Option<Target>,
    tab_row: Cell<Rect>,
    dismiss_on_outside_click: bool,
    hub: PointerHub,
    regions: SharedRegistry,
    store: MenuStore,
}

impl TabsMenu {
    pub fn new(options: TabsMenuOptions) -> Result<Self> {
        let items_id = options
            .items_id
            .unwrap_or_else(|| ElementId::generate("items"));
        let store = MenuStore::new(items_id);
        let handle = store.handle();
        let hub = PointerHub::new();
        let regions = RectRegistry::shared();

        let mut tab_group = TabGroup::new(
            &handle,
            &hub,
            &regions,
            options.open_mode,
            options.double_click_timeout,
        )?;
        if let Some(label) = options.label {
            tab_group = tab_group.with_label(label);
        }
        let item_list = ItemList::new(&handle, &regions, options.item_list)?;

        Ok(Self {
            tab_group,
            item_list,
            hovered: None,
            focused: None,
            tab_row: Cell::new(Rect::default()),
            dismiss_on_outside_click: options.dismiss_on_outside_click,
            hub,
            regions,
            store,
        })
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // State
    // ────────────────────────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> MenuState {
        self.store.state()
    }

    pub fn items_id(&self) -> ElementId {
        self.store.read(|state| state.items_id.clone())
    }

    pub fn is_open(&self) -> bool {
        self.store.read(|state| state.is_open())
    }

    /// Weak handle for code that needs to reach the store later
    pub fn handle(&self) -> StoreHandle {
        self.store.handle()
    }

    pub fn render_props(&self) -> MenuRenderProps {
        MenuRenderProps {
            open: self.is_open(),
            close: MenuCloser::new(self.store.handle()),
        }
    }

    pub fn open(&self) {
        self.store.dispatch(MenuAction::Open);
    }

    pub fn close(&self) {
        self.store.dispatch(MenuAction::Close);
    }

    pub fn set_open_mode(&mut self, mode: OpenMode) -> Result<()> {
        self.tab_group.set_open_mode(mode)
    }

    pub fn tab_group(&self) -> &TabGroup {
        &self.tab_group
    }

    pub fn item_list(&self) -> &ItemList {
        &self.item_list
    }

    pub fn focused(&self) -> Option<&ElementId> {
        self.focused.as_ref().and_then(Target::id)
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // Structure
    // ────────────────────────────────────────────────────────────────────────────────────────────

    pub fn mount_tab(&mut self, tab: Tab) -> Result<ElementId> {
        self.ensure_unclaimed(tab.id.as_ref())?;
        self.tab_group.mount(tab)
    }

    pub fn unmount_tab(&mut self, id: &ElementId) -> Result<()> {
        self.tab_group.unmount(id)?;
        self.forget(id);
        Ok(())
    }

    pub fn add_item(&mut self, item: Item) -> Result<ElementId> {
        self.ensure_unclaimed(item.id.as_ref())?;
        self.item_list.push(item)
    }

    /// Tabs, items and the popup share one rect registry, so an id may name only one of them
    fn ensure_unclaimed(&self, id: Option<&ElementId>) -> Result<()> {
        let Some(id) = id else {
            return Ok(());
        };
        let taken = *id == self.items_id()
            || self.tab_group.tab(id).is_some()
            || self.item_list.item(id).is_some();
        if taken {
            return Err(MenuError::DuplicateId(id.clone()));
        }
        Ok(())
    }

    pub fn remove_item(&mut self, id: &ElementId) -> Result<()> {
        self.item_list.remove(id)?;
        self.forget(id);
        Ok(())
    }

    fn forget(&mut self, id: &ElementId) {
        if self.hovered.as_ref().and_then(Target::id) == Some(id) {
            self.hovered = None;
        }
        if self.focused.as_ref().and_then(Target::id) == Some(id) {
            self.focused = None;
        }
    }

    /// Whole menu as an element tree: the tab row, then the popup when present
    pub fn view(&self) -> Result<Element> {
        let mut children = vec![self.tab_group.view()?];
        if let Some(items) = self.item_list.view()? {
            children.push(items);
        }
        let attrs = AriaAttrs {
            role: Some(Role::Presentation),
            ..AriaAttrs::default()
        };
        Ok(Element::default().with_attrs(attrs).with_children(children))
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // Activation
    // ────────────────────────────────────────────────────────────────────────────────────────────

    pub fn click_tab(&self, id: &ElementId) -> Result<MenuEvent> {
        let tab = self
            .tab_group
            .tab(id)
            .ok_or_else(|| MenuError::UnknownTab(id.clone()))?;
        let outcome = tab.click()?;
        Ok(MenuEvent::Tab { id: id.clone(), outcome })
    }

    pub fn select_item(&mut self, id: &ElementId) -> Result<MenuEvent> {
        let item = self
            .item_list
            .item_mut(id)
            .ok_or_else(|| MenuError::UnknownItem(id.clone()))?;
        if item.click()? {
            Ok(MenuEvent::ItemSelected(id.clone()))
        } else {
            Ok(MenuEvent::None)
        }
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // Pointer
    // ────────────────────────────────────────────────────────────────────────────────────────────

    /// Route a pointer event: watchers first, then hover, then the pressed control
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<MenuEvent> {
        self.hub.broadcast(&event);
        let target = self.hit_test(event.column, event.row);

        match event.kind {
            PointerKind::Moved => {
                self.set_hover(target)?;
                Ok(MenuEvent::None)
            }
            PointerKind::Up => Ok(MenuEvent::None),
            PointerKind::Down | PointerKind::TouchStart => match target {
                Some(Target::Tab(id)) => self.click_tab(&id),
                Some(Target::Item(id)) => self.select_item(&id),
                Some(Target::Popup) => Ok(MenuEvent::None),
                None if self.dismiss_on_outside_click && self.is_open() => {
                    self.close();
                    debug!(items_id = %self.items_id(), "menu dismissed by outside press");
                    Ok(MenuEvent::Dismissed)
                }
                None => Ok(MenuEvent::None),
            },
        }
    }

    /// Route a pointer event that something drawn above this menu already claimed.
    /// Watchers still see it, hover ends, and a press counts as outside.
    pub fn handle_pointer_outside(&mut self, event: PointerEvent) -> Result<MenuEvent> {
        self.hub.broadcast(&event);
        self.set_hover(None)?;
        if event.is_press() && self.dismiss_on_outside_click && self.is_open() {
            self.close();
            debug!(items_id = %self.items_id(), "menu dismissed by outside press");
            return Ok(MenuEvent::Dismissed);
        }
        Ok(MenuEvent::None)
    }

    /// Whether a tab, or the popup while shown, lies under the cell
    pub fn hits(&self, x: u16, y: u16) -> bool {
        self.hit_test(x, y).is_some()
    }

    /// Whether the shown popup lies under the cell
    pub fn popup_hits(&self, x: u16, y: u16) -> bool {
        matches!(self.hit_test(x, y), Some(Target::Popup | Target::Item(_)))
    }

    /// Where a tab, item or the popup was last drawn
    pub fn bounds(&self, id: &ElementId) -> Option<RectMetrics> {
        self.regions.borrow().get_metrics(id)
    }

    /// Topmost control of this menu under the cell. Items only count while the popup is shown.
    fn hit_test(&self, x: u16, y: u16) -> Option<Target> {
        let state = self.store.state();
        let visible = state.is_open();
        let regions = self.regions.borrow();
        let hit = regions.hit_test_where(x, y, |id| {
            if *id == state.items_id {
                visible
            } else if state.has_tab(id) {
                true
            } else {
                visible && self.item_list.item(id).is_some()
            }
        })?;

        Some(if *hit == state.items_id {
            Target::Popup
        } else if state.has_tab(hit) {
            Target::Tab(hit.clone())
        } else {
            Target::Item(hit.clone())
        })
    }

    fn set_hover(&mut self, target: Option<Target>) -> Result<()> {
        if self.hovered == target {
            return Ok(());
        }
        if let Some(previous) = self.hovered.take() {
            self.leave(&previous)?;
        }
        if let Some(next) = &target {
            self.enter(next)?;
        }
        self.hovered = target;
        Ok(())
    }

    fn enter(&self, target: &Target) -> Result<()> {
        match target {
            Target::Tab(id) => match self.tab_group.tab(id) {
                Some(tab) => tab.pointer_enter(),
                None => Ok(()),
            },
            Target::Item(id) => match self.item_list.item(id) {
                Some(item) => item.pointer_enter(),
                None => Ok(()),
            },
            Target::Popup => Ok(()),
        }
    }

    fn leave(&self, target: &Target) -> Result<()> {
        match target {
            Target::Tab(id) => match self.tab_group.tab(id) {
                Some(tab) => tab.pointer_leave(),
                None => Ok(()),
            },
            Target::Item(id) => match self.item_list.item(id) {
                Some(item) => item.pointer_leave(),
                None => Ok(()),
            },
            Target::Popup => Ok(()),
        }
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // Keyboard
    // ────────────────────────────────────────────────────────────────────────────────────────────

    /// Focusable controls in order: enabled tabs, then enabled items while the popup is shown
    fn focus_order(&self) -> Result<Vec<Target>> {
        let mut order: Vec<Target> = self
            .tab_group
            .tabs()
            .iter()
            .filter(|tab| !tab.is_disabled())
            .map(|tab| Target::Tab(tab.id().clone()))
            .collect();
        if self.item_list.is_visible()? {
            order.extend(
                self.item_list
                    .items()
                    .iter()
                    .filter(|item| !item.is_disabled())
                    .map(|item| Target::Item(item.id().clone())),
            );
        }
        Ok(order)
    }

    pub fn focus_next(&mut self) -> Result<MenuEvent> {
        self.step_focus(true)
    }

    pub fn focus_prev(&mut self) -> Result<MenuEvent> {
        self.step_focus(false)
    }

    fn step_focus(&mut self, forward: bool) -> Result<MenuEvent> {
        let order = self.focus_order()?;
        let current = self
            .focused
            .as_ref()
            .and_then(|focused| order.iter().position(|target| target == focused));
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => order.len().checked_sub(1),
            (Some(index), true) => Some(index + 1),
            (Some(index), false) => index.checked_sub(1),
        };
        self.set_focus(next.and_then(|index| order.get(index).cloned()))?;

        Ok(match self.focused() {
            Some(id) => MenuEvent::FocusMoved(id.clone()),
            None => MenuEvent::FocusLeft,
        })
    }

    /// Drop keyboard focus from the menu
    pub fn blur(&mut self) -> Result<()> {
        self.set_focus(None)
    }

    fn set_focus(&mut self, target: Option<Target>) -> Result<()> {
        if let Some(previous) = self.focused.take() {
            match &previous {
                Target::Tab(id) => {
                    if let Some(tab) = self.tab_group.tab(id) {
                        tab.blur()?;
                    }
                }
                Target::Item(id) => {
                    if let Some(item) = self.item_list.item(id) {
                        item.blur()?;
                    }
                }
                Target::Popup => {}
            }
        }
        if let Some(next) = &target {
            match next {
                Target::Tab(id) => {
                    if let Some(tab) = self.tab_group.tab(id) {
                        tab.focus()?;
                    }
                }
                Target::Item(id) => {
                    if let Some(item) = self.item_list.item(id) {
                        item.focus()?;
                    }
                }
                Target::Popup => {}
            }
        }
        self.focused = target;
        Ok(())
    }

    /// Click the focused control
    pub fn activate_focused(&mut self) -> Result<MenuEvent> {
        match self.focused.clone() {
            Some(Target::Tab(id)) => self.click_tab(&id),
            Some(Target::Item(id)) => self.select_item(&id),
            _ => Ok(MenuEvent::None),
        }
    }

    /// Map a terminal event onto the menu
    pub fn handle_event(&mut self, event: &Event) -> Result<MenuEvent> {
        match event {
            Event::Mouse(mouse) => match PointerEvent::from_mouse(mouse) {
                Some(pointer) => self.handle_pointer(pointer),
                None => Ok(MenuEvent::None),
            },
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc if self.is_open() => {
                    self.close();
                    Ok(MenuEvent::Dismissed)
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.activate_focused(),
                KeyCode::Tab | KeyCode::Right | KeyCode::Down => self.focus_next(),
                KeyCode::BackTab | KeyCode::Left | KeyCode::Up => self.focus_prev(),
                _ => Ok(MenuEvent::None),
            },
            _ => Ok(MenuEvent::None),
        }
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // Rendering
    // ────────────────────────────────────────────────────────────────────────────────────────────

    /// Draw the tab row. Starts a new frame of hit regions for this menu.
    pub fn render_tabs(&self, frame: &mut Frame, area: Rect, dimming: &DimmingContext) -> Result<()> {
        self.regions.borrow_mut().clear();
        self.tab_row.set(area);
        self.tab_group.render(frame, area, dimming)
    }

    /// Draw the popup under the tab row. Call after everything it may overlap.
    pub fn render_items(&self, frame: &mut Frame, dimming: &DimmingContext) -> Result<Option<Rect>> {
        self.item_list.render(frame, self.tab_row.get(), dimming)
    }
}

impl Target {
    fn id(&self) -> Option<&ElementId> {
        match self {
            Target::Tab(id) | Target::Item(id) => Some(id),
            Target::Popup => None,
        }
    }
}
