// Item List
// The shared popup panel holding every item of a menu

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::attrs::{AriaAttrs, Element, Role};
use super::item::{Item, ItemControl};
use crate::core::{ElementId, MenuAction, MenuError, Result, SharedRegistry, StoreHandle};
use crate::utilities::{popup_background, DimmingContext};

const COMPONENT: &str = "Items";

/// Visibility and layout policy of the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemListOptions {
    /// Always keep the panel in the structure, hidden while closed
    pub always_rendered: bool,
    /// Drop the panel from the structure while closed (ignored when `always_rendered`)
    pub unmount: bool,
    /// Number of item columns in the popup
    pub columns: u16,
}

impl Default for ItemListOptions {
    fn default() -> Self {
        Self {
            always_rendered: false,
            unmount: true,
            columns: 1,
        }
    }
}

/// The popup of a menu and its items
#[derive(Debug)]
pub struct ItemList {
    items: Vec<ItemControl>,
    store: StoreHandle,
    regions: SharedRegistry,
    options: ItemListOptions,
}

impl ItemList {
    pub fn new(store: &StoreHandle, regions: &SharedRegistry, options: ItemListOptions) -> Result<Self> {
        store.connect(COMPONENT)?;
        Ok(Self {
            items: Vec::new(),
            store: store.clone(),
            regions: regions.clone(),
            options: ItemListOptions {
                columns: options.columns.max(1),
                ..options
            },
        })
    }

    pub fn options(&self) -> ItemListOptions {
        self.options
    }

    pub fn push(&mut self, item: Item) -> Result<ElementId> {
        let control = ItemControl::mount(item, &self.store)?;
        if self.item(control.id()).is_some() {
            return Err(MenuError::DuplicateId(control.id().clone()));
        }
        let id = control.id().clone();
        self.items.push(control);
        Ok(id)
    }

    pub fn remove(&mut self, id: &ElementId) -> Result<()> {
        let live = self.store.connect(COMPONENT)?;
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| MenuError::UnknownItem(id.clone()))?;
        self.items.remove(index);
        self.regions.borrow_mut().unregister(id);
        if live.read(|state| state.active_item_id.as_ref() == Some(id)) {
            live.dispatch(MenuAction::DeactivateItem);
        }
        Ok(())
    }

    pub fn items(&self) -> &[ItemControl] {
        &self.items
    }

    pub fn item(&self, id: &ElementId) -> Option<&ItemControl> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: &ElementId) -> Option<&mut ItemControl> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Whether the panel is part of the structure right now
    pub fn is_present(&self) -> Result<bool> {
        let open = self.store.connect(COMPONENT)?.read(|state| state.is_open());
        Ok(open || self.options.always_rendered || !self.options.unmount)
    }

    /// Whether the panel is shown (present and not hidden)
    pub fn is_visible(&self) -> Result<bool> {
        Ok(self.store.connect(COMPONENT)?.read(|state| state.is_open()))
    }

    /// Panel element, or `None` while it is unmounted
    pub fn view(&self) -> Result<Option<Element>> {
        if !self.is_present()? {
            return Ok(None);
        }
        let state = self.store.connect(COMPONENT)?.state();
        let children = self
            .items
            .iter()
            .map(ItemControl::view)
            .collect::<Result<Vec<_>>>()?;

        let attrs = AriaAttrs {
            id: Some(state.items_id.clone()),
            role: Some(Role::Menu),
            tab_index: Some(-1),
            labelled_by: Some(state.labelled_by()),
            active_descendant: state.active_item_id.clone(),
            hidden: Some(!state.is_open()),
            ..AriaAttrs::default()
        };
        Ok(Some(Element::default().with_attrs(attrs).with_children(children)))
    }

    /// Size of the popup including its border
    pub fn popup_size(&self, view: &Element) -> (u16, u16) {
        let columns = self.options.columns.max(1) as usize;
        let rows = view.children.len().div_ceil(columns).max(1);
        let cell = column_width(view);
        let width = cell.saturating_mul(columns.min(view.children.len().max(1)));
        (to_cells(width).saturating_add(2), to_cells(rows).saturating_add(2))
    }

    /// Draw the popup below `anchor` while open; returns where it landed
    pub fn render(&self, frame: &mut Frame, anchor: Rect, dimming: &DimmingContext) -> Result<Option<Rect>> {
        let view = match self.view()? {
            Some(view) if !view.attrs.is_hidden() => view,
            _ => return Ok(None),
        };

        let bounds = frame.area();
        let (width, height) = self.popup_size(&view);
        let width = width.min(bounds.width);
        let height = height.min(bounds.height);
        let y = anchor.bottom().min(bounds.bottom().saturating_sub(height));
        let x = anchor.x.min(bounds.right().saturating_sub(width));
        let popup = Rect { x, y, width, height };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(dimming.dim_style(Style::default().fg(dimming.border_color(true))))
            .style(popup_background());
        let inner = block.inner(popup);
        frame.render_widget(Clear, popup);
        frame.render_widget(block, popup);

        let mut regions = self.regions.borrow_mut();
        if let Some(id) = view.id() {
            regions.register(id, popup);
        }

        let columns = self.options.columns.max(1) as usize;
        let cell = to_cells(column_width(&view));
        for (index, child) in view.children.iter().enumerate() {
            let rect = Rect {
                x: inner.x.saturating_add(to_cells(index % columns).saturating_mul(cell)),
                y: inner.y.saturating_add(to_cells(index / columns)),
                width: cell,
                height: 1,
            }
            .intersection(inner);
            if rect.is_empty() {
                continue;
            }

            let mut spans = vec![Span::raw(" ")];
            spans.extend(child.line.spans.iter().cloned());
            frame.render_widget(
                Paragraph::new(Line::from(spans)).style(dimming.dim_style(child.style)),
                rect,
            );
            if let Some(id) = child.id() {
                regions.register(id, rect);
            }
        }
        Ok(Some(popup))
    }
}

/// Clamp a count to terminal cells
fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Width of one popup column: widest item plus padding
fn column_width(view: &Element) -> usize {
    view.children
        .iter()
        .map(|child| child.line.width())
        .max()
        .unwrap_or(0)
        + 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MenuStore, RectRegistry};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn setup(options: ItemListOptions) -> (MenuStore, SharedRegistry, ItemList) {
        let store = MenuStore::new(ElementId::new("items"));
        let regions = RectRegistry::shared();
        let list = ItemList::new(&store.handle(), &regions, options).unwrap();
        (store, regions, list)
    }

    #[test]
    fn test_unmounted_while_closed_by_default() {
        let (store, _regions, list) = setup(ItemListOptions::default());
        assert!(list.view().unwrap().is_none());

        store.dispatch(MenuAction::AddTab(ElementId::new("t1")));
        store.dispatch(MenuAction::AddTab(ElementId::new("t2")));
        store.dispatch(MenuAction::Open);

        let view = list.view().unwrap().unwrap();
        assert_eq!(view.attrs.id, Some(ElementId::new("items")));
        assert_eq!(view.attrs.role, Some(Role::Menu));
        assert_eq!(view.attrs.tab_index, Some(-1));
        assert_eq!(view.attrs.labelled_by.as_deref(), Some("t1 t2"));
        assert_eq!(view.attrs.hidden, Some(false));
    }

    #[test]
    fn test_static_and_kept_mounted_lists_are_hidden() {
        for options in [
            ItemListOptions { always_rendered: true, ..ItemListOptions::default() },
            ItemListOptions { unmount: false, ..ItemListOptions::default() },
        ] {
            let (store, _regions, list) = setup(options);
            let view = list.view().unwrap().unwrap();
            assert!(view.attrs.is_hidden());

            store.dispatch(MenuAction::Open);
            assert!(!list.view().unwrap().unwrap().attrs.is_hidden());
        }
    }

    #[test]
    fn test_active_descendant_follows_hover() {
        let (store, _regions, mut list) = setup(ItemListOptions::default());
        let id = list.push(Item::new("Pirate")).unwrap();
        store.dispatch(MenuAction::Open);

        list.item(&id).unwrap().pointer_enter().unwrap();
        assert_eq!(list.view().unwrap().unwrap().attrs.active_descendant, Some(id.clone()));

        list.item(&id).unwrap().pointer_leave().unwrap();
        assert_eq!(list.view().unwrap().unwrap().attrs.active_descendant, None);
    }

    #[test]
    fn test_duplicate_and_unknown_items() {
        let (store, _regions, mut list) = setup(ItemListOptions::default());
        list.push(Item::new("Pirate").with_id("pirate")).unwrap();
        assert_eq!(
            list.push(Item::new("Pirate again").with_id("pirate")).unwrap_err(),
            MenuError::DuplicateId(ElementId::new("pirate"))
        );

        list.item(&ElementId::new("pirate")).unwrap().pointer_enter().unwrap();
        list.remove(&ElementId::new("pirate")).unwrap();
        assert!(list.items().is_empty());
        assert_eq!(store.state().active_item_id, None);
        assert_eq!(
            list.remove(&ElementId::new("pirate")).unwrap_err(),
            MenuError::UnknownItem(ElementId::new("pirate"))
        );
    }

    #[test]
    fn test_render_two_columns_below_anchor() {
        let (store, regions, mut list) = setup(ItemListOptions { columns: 2, ..ItemListOptions::default() });
        let ids: Vec<ElementId> = ["English", "Deutsch", "Español"]
            .into_iter()
            .map(|name| list.push(Item::new(name)).unwrap())
            .collect();
        let anchor = Rect::new(2, 0, 20, 1);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();

        terminal
            .draw(|frame| {
                assert_eq!(list.render(frame, anchor, &DimmingContext::default()).unwrap(), None);
            })
            .unwrap();
        assert!(regions.borrow().is_empty());

        store.dispatch(MenuAction::Open);
        let mut popup = None;
        terminal
            .draw(|frame| {
                popup = list.render(frame, anchor, &DimmingContext::default()).unwrap();
            })
            .unwrap();

        // 7 chars + 3 padding per column, 2 columns, 2 rows, plus border
        assert_eq!(popup, Some(Rect::new(2, 1, 22, 4)));
        let regions = regions.borrow();
        assert_eq!(regions.hit_test(4, 2), Some(&ids[0]));
        assert_eq!(regions.hit_test(14, 2), Some(&ids[1]));
        assert_eq!(regions.hit_test(4, 3), Some(&ids[2]));
        assert_eq!(regions.hit_test(14, 3), Some(&ElementId::new("items")));

        let buffer = terminal.backend().buffer().clone();
        let row: String = (3..11).map(|x| buffer[(x, 2)].symbol().to_string()).collect();
        assert_eq!(row, " English");
    }

    #[test]
    fn test_oversized_items_clamp_to_terminal_cells() {
        let (store, regions, mut list) = setup(ItemListOptions { columns: 2, ..ItemListOptions::default() });
        let wide = "x".repeat(70_000);
        let first = list.push(Item::new(wide.as_str())).unwrap();
        list.push(Item::new(wide.as_str())).unwrap();
        store.dispatch(MenuAction::Open);

        let view = list.view().unwrap().unwrap();
        assert_eq!(list.popup_size(&view), (u16::MAX, 3));

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let mut popup = None;
        terminal
            .draw(|frame| {
                popup = list.render(frame, Rect::new(0, 0, 40, 1), &DimmingContext::default()).unwrap();
            })
            .unwrap();

        assert_eq!(popup, Some(Rect::new(0, 1, 40, 3)));
        assert_eq!(regions.borrow().hit_test(5, 2), Some(&first));
    }
}
