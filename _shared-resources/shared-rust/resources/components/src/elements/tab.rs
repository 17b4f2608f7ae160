// Tab Control
// An activator in the tab row: selects a value and opens or closes the shared popup

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::attrs::{AriaAttrs, Content, Element, RenderProps, Role};
use crate::core::{
    ElementId, MenuAction, MenuCloser, MenuError, MenuState, OpenMode, PointerHub,
    PointerSubscription, Result, SharedRegistry, StoreHandle,
};
use crate::utilities::tab_style;

const COMPONENT: &str = "Tab";

/// Time after which a pending first click no longer pairs with a second one
pub const DEFAULT_DOUBLE_CLICK_TIMEOUT: Duration = Duration::from_millis(500);

/// Description of a tab to mount
#[derive(Debug)]
pub struct Tab {
    pub(crate) id: Option<ElementId>,
    pub(crate) open_mode: Option<OpenMode>,
    pub(crate) disabled: bool,
    pub(crate) content: Content,
}

impl Tab {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            id: None,
            open_mode: None,
            disabled: false,
            content: content.into(),
        }
    }

    /// Use an explicit id instead of a generated one
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Override the menu's default open mode for this tab only
    pub fn open_mode(mut self, mode: OpenMode) -> Self {
        self.open_mode = Some(mode);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// What a click on a tab did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The popup was opened
    Opened,
    /// The popup was open and got closed
    Closed,
    /// First click of a double-click sequence
    Pending,
    /// Disabled tab, nothing happened
    Ignored,
}

/// A mounted tab
#[derive(Debug)]
pub struct TabControl {
    id: ElementId,
    open_mode: Option<OpenMode>,
    disabled: bool,
    content: Content,
    store: StoreHandle,
    /// Time of the first click of an unfinished double click
    pending_since: Rc<Cell<Option<Instant>>>,
    double_click_timeout: Duration,
    _outside_clicks: PointerSubscription,
}

impl TabControl {
    /// Register the tab with the store and start watching for outside presses
    pub(crate) fn mount(
        tab: Tab,
        store: &StoreHandle,
        hub: &PointerHub,
        regions: &SharedRegistry,
        double_click_timeout: Duration,
    ) -> Result<Self> {
        let live = store.connect(COMPONENT)?;
        let id = tab.id.unwrap_or_else(|| ElementId::generate("tab"));
        if live.read(|state| state.has_tab(&id)) {
            return Err(MenuError::DuplicateId(id));
        }

        let pending_since = Rc::new(Cell::new(None));
        let outside_clicks = watch_outside_presses(hub, regions, &id, &pending_since);

        live.dispatch(MenuAction::AddTab(id.clone()));
        debug!(tab = %id, disabled = tab.disabled, "tab mounted");

        Ok(Self {
            id,
            open_mode: tab.open_mode,
            disabled: tab.disabled,
            content: tab.content,
            store: store.clone(),
            pending_since,
            double_click_timeout,
            _outside_clicks: outside_clicks,
        })
    }

    /// Deregister from the store. The outside-press watcher goes away with `self`.
    pub(crate) fn unmount(self) -> Result<()> {
        let live = self.store.connect(COMPONENT)?;
        live.dispatch(MenuAction::RemoveTab(self.id.clone()));
        debug!(tab = %self.id, "tab unmounted");
        Ok(())
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether a first click is waiting for its second one
    pub fn is_pending(&self) -> bool {
        self.pending_since.get().is_some()
    }

    /// Open mode after applying this tab's override
    pub fn effective_open_mode(&self) -> Result<OpenMode> {
        let live = self.store.connect(COMPONENT)?;
        Ok(self.open_mode.unwrap_or_else(|| live.read(|state| state.open_mode)))
    }

    pub fn click(&self) -> Result<ClickOutcome> {
        self.click_at(Instant::now())
    }

    /// Click handling with an explicit timestamp for the double-click window
    pub fn click_at(&self, now: Instant) -> Result<ClickOutcome> {
        let live = self.store.connect(COMPONENT)?;
        if self.disabled {
            return Ok(ClickOutcome::Ignored);
        }

        let (open, default_mode) = live.read(|state| (state.is_open(), state.open_mode));
        if open {
            self.pending_since.set(None);
            live.dispatch(MenuAction::Close);
            return Ok(ClickOutcome::Closed);
        }

        match self.open_mode.unwrap_or(default_mode) {
            OpenMode::SingleClick => {
                live.dispatch(MenuAction::Open);
                Ok(ClickOutcome::Opened)
            }
            OpenMode::DoubleClick => {
                let armed = self
                    .pending_since
                    .get()
                    .map(|since| now.saturating_duration_since(since) <= self.double_click_timeout)
                    .unwrap_or(false);
                if armed {
                    self.pending_since.set(None);
                    live.dispatch(MenuAction::Open);
                    Ok(ClickOutcome::Opened)
                } else {
                    self.pending_since.set(Some(now));
                    Ok(ClickOutcome::Pending)
                }
            }
        }
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
            live.dispatch(MenuAction::ActivateTab(self.id.clone()));
        }
        Ok(())
    }

    fn deactivate(&self) -> Result<()> {
        let live = self.store.connect(COMPONENT)?;
        if !self.disabled {
            live.dispatch(MenuAction::DeactivateTab);
        }
        Ok(())
    }

    /// Props passed to an interactive render callback
    pub fn render_props(&self) -> Result<RenderProps> {
        let live = self.store.connect(COMPONENT)?;
        Ok(live.read(|state| self.props_for(state)))
    }

    fn props_for(&self, state: &MenuState) -> RenderProps {
        RenderProps {
            active: state.active_tab_id.as_ref() == Some(&self.id),
            disabled: self.disabled,
            open: state.is_open(),
            close: MenuCloser::new(self.store.clone()),
        }
    }

    /// Shared accessibility attributes of a tab
    pub fn attrs(&self, state: &MenuState) -> AriaAttrs {
        AriaAttrs {
            id: Some(self.id.clone()),
            role: Some(Role::MenuItem),
            controls: Some(state.items_id.clone()),
            has_popup: Some(true),
            expanded: Some(state.is_open()),
            disabled: Some(self.disabled),
            tab_index: Some(if self.disabled { -1 } else { 0 }),
            ..AriaAttrs::default()
        }
    }

    pub fn view(&self) -> Result<Element> {
        let live = self.store.connect(COMPONENT)?;
        let state = live.state();
        let props = self.props_for(&state);
        let style = tab_style(props.active, props.disabled, props.open);
        Ok(self.content.materialize(&props, self.attrs(&state), style))
    }
}

/// Clear the pending first click when a press lands outside the tab's drawn bounds
fn watch_outside_presses(
    hub: &PointerHub,
    regions: &SharedRegistry,
    id: &ElementId,
    pending_since: &Rc<Cell<Option<Instant>>>,
) -> PointerSubscription {
    let regions = Rc::downgrade(regions);
    let pending_since = Rc::clone(pending_since);
    let id = id.clone();

    hub.subscribe(move |event| {
        if !event.is_press() || pending_since.get().is_none() {
            return;
        }
        let inside = regions
            .upgrade()
            .map(|regions| regions.borrow().contains(&id, event.column, event.row))
            .unwrap_or(false);
        if !inside {
            pending_since.set(None);
            debug!(tab = %id, "press outside tab, pending double click reset");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MenuStore, PointerEvent, RectRegistry, ToggleState};
    use ratatui::layout::Rect;

    struct Fixture {
        store: MenuStore,
        hub: PointerHub,
        regions: SharedRegistry,
    }

    impl Fixture {
        fn new(mode: OpenMode) -> Self {
            let store = MenuStore::new(ElementId::new("items"));
            store.dispatch(MenuAction::SetOpenMode(mode));
            Self {
                store,
                hub: PointerHub::new(),
                regions: RectRegistry::shared(),
            }
        }

        fn mount(&self, tab: Tab) -> TabControl {
            TabControl::mount(
                tab,
                &self.store.handle(),
                &self.hub,
                &self.regions,
                DEFAULT_DOUBLE_CLICK_TIMEOUT,
            )
            .unwrap()
        }
    }

    #[test]
    fn test_mount_registers_and_unmount_deregisters() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new("English").with_id("t1"));
        assert_eq!(fx.store.state().tab_ids, vec![ElementId::new("t1")]);
        assert_eq!(fx.hub.listener_count(), 1);

        tab.unmount().unwrap();
        assert!(fx.store.state().tab_ids.is_empty());
        assert_eq!(fx.hub.listener_count(), 0);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let _first = fx.mount(Tab::new("A").with_id("t1"));
        let err = TabControl::mount(
            Tab::new("B").with_id("t1"),
            &fx.store.handle(),
            &fx.hub,
            &fx.regions,
            DEFAULT_DOUBLE_CLICK_TIMEOUT,
        )
        .unwrap_err();
        assert_eq!(err, MenuError::DuplicateId(ElementId::new("t1")));
        assert_eq!(fx.store.state().tab_ids.len(), 1);
    }

    #[test]
    fn test_single_click_opens() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new("English"));
        assert_eq!(tab.click().unwrap(), ClickOutcome::Opened);
        assert_eq!(fx.store.state().toggle_state, ToggleState::Open);
    }

    #[test]
    fn test_double_click_needs_two_clicks() {
        let fx = Fixture::new(OpenMode::DoubleClick);
        let tab = fx.mount(Tab::new("English"));
        let t0 = Instant::now();

        assert_eq!(tab.click_at(t0).unwrap(), ClickOutcome::Pending);
        assert!(tab.is_pending());
        assert!(!fx.store.state().is_open());

        assert_eq!(tab.click_at(t0 + Duration::from_millis(120)).unwrap(), ClickOutcome::Opened);
        assert!(!tab.is_pending());
        assert!(fx.store.state().is_open());
    }

    #[test]
    fn test_outside_press_resets_pending() {
        let fx = Fixture::new(OpenMode::DoubleClick);
        let tab = fx.mount(Tab::new("English").with_id("t1"));
        fx.regions
            .borrow_mut()
            .register(tab.id(), Rect { x: 0, y: 0, width: 9, height: 1 });
        let t0 = Instant::now();

        tab.click_at(t0).unwrap();
        fx.hub.broadcast(&PointerEvent::down(3, 0));
        assert!(tab.is_pending(), "press inside the tab keeps the sequence");

        fx.hub.broadcast(&PointerEvent::moved(30, 5));
        assert!(tab.is_pending(), "moves are not presses");

        fx.hub.broadcast(&PointerEvent::down(30, 5));
        assert!(!tab.is_pending());

        assert_eq!(tab.click_at(t0 + Duration::from_millis(50)).unwrap(), ClickOutcome::Pending);
        assert!(!fx.store.state().is_open());
    }

    #[test]
    fn test_unrendered_tab_treats_every_press_as_outside() {
        let fx = Fixture::new(OpenMode::DoubleClick);
        let tab = fx.mount(Tab::new("English"));
        tab.click().unwrap();
        fx.hub.broadcast(&PointerEvent::down(0, 0));
        assert!(!tab.is_pending());
    }

    #[test]
    fn test_double_click_window_expires() {
        let fx = Fixture::new(OpenMode::DoubleClick);
        let tab = fx.mount(Tab::new("English"));
        let t0 = Instant::now();

        tab.click_at(t0).unwrap();
        let late = t0 + DEFAULT_DOUBLE_CLICK_TIMEOUT + Duration::from_millis(1);
        assert_eq!(tab.click_at(late).unwrap(), ClickOutcome::Pending);
        assert!(!fx.store.state().is_open());

        assert_eq!(tab.click_at(late + Duration::from_millis(10)).unwrap(), ClickOutcome::Opened);
    }

    #[test]
    fn test_click_while_open_closes_in_any_mode() {
        for mode in [OpenMode::SingleClick, OpenMode::DoubleClick] {
            let fx = Fixture::new(mode);
            let tab = fx.mount(Tab::new("English"));
            fx.store.dispatch(MenuAction::Open);
            assert_eq!(tab.click().unwrap(), ClickOutcome::Closed);
            assert!(!fx.store.state().is_open());
        }
    }

    #[test]
    fn test_per_tab_override() {
        let fx = Fixture::new(OpenMode::DoubleClick);
        let tab = fx.mount(Tab::new("Quick").open_mode(OpenMode::SingleClick));
        assert_eq!(tab.effective_open_mode().unwrap(), OpenMode::SingleClick);
        assert_eq!(tab.click().unwrap(), ClickOutcome::Opened);
    }

    #[test]
    fn test_disabled_tab_never_toggles() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new("Klingon").with_id("t9").disabled(true));
        assert!(fx.store.state().has_tab(&ElementId::new("t9")));

        assert_eq!(tab.click().unwrap(), ClickOutcome::Ignored);
        assert!(!fx.store.state().is_open());

        fx.store.dispatch(MenuAction::Open);
        assert_eq!(tab.click().unwrap(), ClickOutcome::Ignored);
        assert!(fx.store.state().is_open());

        tab.pointer_enter().unwrap();
        assert_eq!(fx.store.state().active_tab_id, None);
    }

    #[test]
    fn test_hover_and_focus_report_active_tab() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new("English").with_id("t1"));

        tab.pointer_enter().unwrap();
        assert_eq!(fx.store.state().active_tab_id, Some(ElementId::new("t1")));
        tab.pointer_leave().unwrap();
        assert_eq!(fx.store.state().active_tab_id, None);

        tab.focus().unwrap();
        assert!(tab.render_props().unwrap().active);
        tab.blur().unwrap();
        assert!(!tab.render_props().unwrap().active);
    }

    #[test]
    fn test_view_exposes_popup_attributes() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new("English").with_id("t1"));

        let closed = tab.view().unwrap();
        assert_eq!(closed.text(), "English");
        assert_eq!(closed.attrs.id, Some(ElementId::new("t1")));
        assert_eq!(closed.attrs.role, Some(Role::MenuItem));
        assert_eq!(closed.attrs.controls, Some(ElementId::new("items")));
        assert_eq!(closed.attrs.has_popup, Some(true));
        assert_eq!(closed.attrs.expanded, Some(false));
        assert_eq!(closed.attrs.tab_index, Some(0));

        tab.click().unwrap();
        assert_eq!(tab.view().unwrap().attrs.expanded, Some(true));
    }

    #[test]
    fn test_disabled_tab_leaves_focus_order() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new("Klingon").disabled(true));
        let view = tab.view().unwrap();
        assert_eq!(view.attrs.disabled, Some(true));
        assert_eq!(view.attrs.tab_index, Some(-1));
        assert!(!view.attrs.is_focusable());
    }

    #[test]
    fn test_render_callback_receives_close() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new(Content::interactive(|props: &RenderProps| {
            Element::label(if props.open { "EN ▲" } else { "EN ▼" })
        })));

        assert_eq!(tab.view().unwrap().text(), "EN ▼");
        tab.click().unwrap();
        assert_eq!(tab.view().unwrap().text(), "EN ▲");

        tab.render_props().unwrap().close.close().unwrap();
        assert!(!fx.store.state().is_open());
    }

    #[test]
    fn test_tab_fails_fast_without_root() {
        let fx = Fixture::new(OpenMode::SingleClick);
        let tab = fx.mount(Tab::new("English"));
        drop(fx);
        assert_eq!(
            tab.click().unwrap_err(),
            MenuError::NoMenuRoot { component: "Tab" }
        );
        assert!(tab.view().is_err());
    }
}
