// Tab Group
// Horizontal row of tab controls (menubar) that owns the mounted tabs

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::time::Duration;

use super::attrs::{AriaAttrs, Element, Role};
use super::tab::{Tab, TabControl};
use crate::core::{ElementId, MenuAction, MenuError, OpenMode, PointerHub, Result, SharedRegistry, StoreHandle};
use crate::utilities::DimmingContext;

const COMPONENT: &str = "TabGroup";

/// Row of tabs. Tabs are mounted and unmounted explicitly by the owner.
#[derive(Debug)]
pub struct TabGroup {
    tabs: Vec<TabControl>,
    store: StoreHandle,
    hub: PointerHub,
    regions: SharedRegistry,
    open_mode: OpenMode,
    label: Option<String>,
    double_click_timeout: Duration,
}

impl TabGroup {
    /// Create the group and push its open mode into the store
    pub fn new(
        store: &StoreHandle,
        hub: &PointerHub,
        regions: &SharedRegistry,
        open_mode: OpenMode,
        double_click_timeout: Duration,
    ) -> Result<Self> {
        store.connect(COMPONENT)?.dispatch(MenuAction::SetOpenMode(open_mode));
        Ok(Self {
            tabs: Vec::new(),
            store: store.clone(),
            hub: hub.clone(),
            regions: regions.clone(),
            open_mode,
            label: None,
            double_click_timeout,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn open_mode(&self) -> OpenMode {
        self.open_mode
    }

    /// Change the default open mode; the store only hears about actual changes
    pub fn set_open_mode(&mut self, mode: OpenMode) -> Result<()> {
        let live = self.store.connect(COMPONENT)?;
        if mode != self.open_mode {
            self.open_mode = mode;
            live.dispatch(MenuAction::SetOpenMode(mode));
        }
        Ok(())
    }

    /// Mount a tab at the end of the row
    pub fn mount(&mut self, tab: Tab) -> Result<ElementId> {
        let control = TabControl::mount(
            tab,
            &self.store,
            &self.hub,
            &self.regions,
            self.double_click_timeout,
        )?;
        let id = control.id().clone();
        self.tabs.push(control);
        Ok(id)
    }

    pub fn unmount(&mut self, id: &ElementId) -> Result<()> {
        let index = self
            .tabs
            .iter()
            .position(|tab| tab.id() == id)
            .ok_or_else(|| MenuError::UnknownTab(id.clone()))?;
        self.regions.borrow_mut().unregister(id);
        self.tabs.remove(index).unmount()
    }

    pub fn tabs(&self) -> &[TabControl] {
        &self.tabs
    }

    pub fn tab(&self, id: &ElementId) -> Option<&TabControl> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    pub fn view(&self) -> Result<Element> {
        let live = self.store.connect(COMPONENT)?;
        let children = self
            .tabs
            .iter()
            .map(TabControl::view)
            .collect::<Result<Vec<_>>>()?;

        let attrs = AriaAttrs {
            role: Some(Role::MenuBar),
            label: self.label.clone(),
            active_descendant: live.read(|state| state.active_tab_id.clone()),
            ..AriaAttrs::default()
        };
        Ok(Element::default().with_attrs(attrs).with_children(children))
    }

    /// Draw the row left to right and record where each tab landed
    pub fn render(&self, frame: &mut Frame, area: Rect, dimming: &DimmingContext) -> Result<()> {
        let view = self.view()?;
        let mut regions = self.regions.borrow_mut();
        let mut x = area.x;

        for child in &view.children {
            let remaining = area.right().saturating_sub(x);
            let width = (child.line.width() as u16).saturating_add(2).min(remaining);
            if width == 0 || area.height == 0 {
                break;
            }

            let rect = Rect { x, y: area.y, width, height: 1 };
            let mut spans = vec![Span::raw(" ")];
            spans.extend(child.line.spans.iter().cloned());
            spans.push(Span::raw(" "));

            frame.render_widget(
                Paragraph::new(Line::from(spans)).style(dimming.dim_style(child.style)),
                rect,
            );
            if let Some(id) = child.id() {
                regions.register(id, rect);
            }

            x = x.saturating_add(width + 1);
        }
        Ok(())
    }
}

impl Drop for TabGroup {
    fn drop(&mut self) {
        // The root may already be gone; nothing left to deregister from then.
        for tab in self.tabs.drain(..) {
            let _ = tab.unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MenuStore, PointerEvent, RectRegistry};
    use crate::elements::tab::{ClickOutcome, DEFAULT_DOUBLE_CLICK_TIMEOUT};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn setup(mode: OpenMode) -> (MenuStore, PointerHub, SharedRegistry, TabGroup) {
        let store = MenuStore::new(ElementId::new("items"));
        let hub = PointerHub::new();
        let regions = RectRegistry::shared();
        let group = TabGroup::new(&store.handle(), &hub, &regions, mode, DEFAULT_DOUBLE_CLICK_TIMEOUT).unwrap();
        (store, hub, regions, group)
    }

    #[test]
    fn test_open_mode_pushed_on_creation_and_change() {
        let (store, _hub, _regions, mut group) = setup(OpenMode::DoubleClick);
        assert_eq!(store.state().open_mode, OpenMode::DoubleClick);

        group.set_open_mode(OpenMode::SingleClick).unwrap();
        assert_eq!(store.state().open_mode, OpenMode::SingleClick);
        assert_eq!(group.open_mode(), OpenMode::SingleClick);
    }

    #[test]
    fn test_mount_order_and_unmount() {
        let (store, hub, _regions, mut group) = setup(OpenMode::SingleClick);
        group.mount(Tab::new("A").with_id("t1")).unwrap();
        group.mount(Tab::new("B").with_id("t2")).unwrap();
        group.mount(Tab::new("C").with_id("t3")).unwrap();
        assert_eq!(store.state().labelled_by(), "t1 t2 t3");

        group.unmount(&ElementId::new("t2")).unwrap();
        assert_eq!(store.state().labelled_by(), "t1 t3");
        assert_eq!(hub.listener_count(), 2);

        assert_eq!(
            group.unmount(&ElementId::new("t2")).unwrap_err(),
            MenuError::UnknownTab(ElementId::new("t2"))
        );
    }

    #[test]
    fn test_unmount_active_tab_leaves_no_trace() {
        let (store, _hub, _regions, mut group) = setup(OpenMode::SingleClick);
        let before = store.state();
        let id = group.mount(Tab::new("A")).unwrap();
        group.tab(&id).unwrap().pointer_enter().unwrap();
        assert_eq!(store.state().active_tab_id, Some(id.clone()));

        group.unmount(&id).unwrap();
        assert_eq!(store.state(), before);
    }

    #[test]
    fn test_view_reports_active_descendant() {
        let (_store, _hub, _regions, group) = setup(OpenMode::SingleClick);
        let mut group = group.with_label("Target language");
        let id = group.mount(Tab::new("English")).unwrap();
        group.mount(Tab::new("Deutsch")).unwrap();

        let view = group.view().unwrap();
        assert_eq!(view.attrs.role, Some(Role::MenuBar));
        assert_eq!(view.attrs.label.as_deref(), Some("Target language"));
        assert_eq!(view.attrs.active_descendant, None);
        assert_eq!(view.children.len(), 2);

        group.tab(&id).unwrap().focus().unwrap();
        assert_eq!(group.view().unwrap().attrs.active_descendant, Some(id));
    }

    #[test]
    fn test_drop_unmounts_every_tab() {
        let (store, hub, _regions, mut group) = setup(OpenMode::SingleClick);
        group.mount(Tab::new("A")).unwrap();
        group.mount(Tab::new("B")).unwrap();
        drop(group);
        assert!(store.state().tab_ids.is_empty());
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_render_registers_tab_rects() {
        let (_store, hub, regions, mut group) = setup(OpenMode::DoubleClick);
        let en = group.mount(Tab::new("English")).unwrap();
        let de = group.mount(Tab::new("Deutsch")).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|frame| {
                group
                    .render(frame, Rect::new(0, 1, 40, 1), &DimmingContext::default())
                    .unwrap();
            })
            .unwrap();

        let first = regions.borrow().get_metrics(&en).unwrap();
        assert_eq!((first.x, first.y, first.width), (0, 1, 9));
        let second = regions.borrow().get_metrics(&de).unwrap();
        assert_eq!(second.x, 10);

        let buffer = terminal.backend().buffer().clone();
        let row: String = (0..20).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert_eq!(row, " English   Deutsch  ");

        // A press on the rendered tab keeps its pending first click
        let tab = group.tab(&en).unwrap();
        assert_eq!(tab.click().unwrap(), ClickOutcome::Pending);
        hub.broadcast(&PointerEvent::down(4, 1));
        assert!(tab.is_pending());
        hub.broadcast(&PointerEvent::down(12, 1));
        assert!(!tab.is_pending());
    }
}
