// Application State
// Translator state, the three selector menus and the wiring between them

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier};
use ratatui::text::Line;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use tui_tabs_menu::{
    convert_menu_options, item_style, tab_style, ClickOutcome, Content, Element, ElementId, Item,
    MenuEvent, PointerEvent, RectRegistry, RenderProps, SharedRegistry, Tab, TabsMenu,
    TabsMenuConfigYaml,
};

use super::events::{AppEvent, InputMode};
use super::translator::{TranslateRequest, TranslatorAction, TranslatorState};
use crate::config::AppConfig;
use crate::config_validation::AUTO_DETECT;
use crate::ui::Toast;

/// Id of the text box in the layout registry
pub const INPUT_REGION: &str = "input";

/// Which selection a menu drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRole {
    SourceLanguage,
    TargetLanguage,
    Personality,
}

impl MenuRole {
    /// Row caption in the layout
    pub fn caption(self) -> &'static str {
        match self {
            MenuRole::SourceLanguage => "From",
            MenuRole::TargetLanguage => "To",
            MenuRole::Personality => "As",
        }
    }
}

/// Keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusZone {
    Input,
    /// Index into `App::menus`
    Menu(usize),
}

/// A mounted menu together with the config it was built from
#[derive(Debug)]
pub struct MenuBinding {
    pub role: MenuRole,
    pub menu: TabsMenu,
    pub config: TabsMenuConfigYaml,
    selected: Rc<RefCell<String>>,
}

impl MenuBinding {
    /// Build the menu with tabs and items that mark the selected value
    pub fn build(role: MenuRole, config: &TabsMenuConfigYaml, initial: &str) -> Result<Self> {
        let selected = Rc::new(RefCell::new(initial.to_string()));
        let names = Rc::new(config.clone());
        let mut menu = TabsMenu::new(convert_menu_options(config)?)?;

        for tab in &config.tabs {
            let content = match &tab.value {
                Some(value) => selectable_tab(&tab.name, value, &selected),
                None => trigger_tab(&tab.name, &selected, &names),
            };
            let mut built = Tab::new(content).with_id(tab.id.as_str()).disabled(tab.disabled);
            if let Some(mode) = &tab.open_mode {
                built = built.open_mode(mode.parse()?);
            }
            menu.mount_tab(built)?;
        }

        for item in &config.items {
            let content = match &item.value {
                Some(value) => checked_item(&item.name, value, &selected),
                None => Content::label(item.name.as_str()),
            };
            menu.add_item(Item::new(content).with_id(item.id.as_str()).disabled(item.disabled))?;
        }

        debug!(menu = %config.id, tabs = config.tabs.len(), items = config.items.len(), "menu built");
        Ok(Self {
            role,
            menu,
            config: config.clone(),
            selected,
        })
    }

    pub fn selected(&self) -> String {
        self.selected.borrow().clone()
    }

    /// Display name of the selected value
    pub fn selected_name(&self) -> String {
        let selected = self.selected.borrow();
        self.config
            .name_of_value(&selected)
            .unwrap_or(selected.as_str())
            .to_string()
    }

    fn select(&self, value: &str) {
        *self.selected.borrow_mut() = value.to_string();
    }
}

fn selectable_tab(name: &str, value: &str, selected: &Rc<RefCell<String>>) -> Content {
    let name = name.to_string();
    let value = value.to_string();
    let selected = Rc::clone(selected);
    Content::interactive(move |props: &RenderProps| {
        let is_selected = *selected.borrow() == value;
        let mut style = tab_style(props.active, props.disabled, props.open);
        if is_selected && !props.disabled {
            style = style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
        }
        let marker = if is_selected { "● " } else { "" };
        Element::from_line(Line::from(format!("{marker}{name}"))).with_style(style)
    })
}

fn trigger_tab(name: &str, selected: &Rc<RefCell<String>>, names: &Rc<TabsMenuConfigYaml>) -> Content {
    let name = name.to_string();
    let selected = Rc::clone(selected);
    let names = Rc::clone(names);
    Content::interactive(move |props: &RenderProps| {
        let selected = selected.borrow();
        let current = names.name_of_value(&selected).unwrap_or(selected.as_str());
        let arrow = if props.open { "▴" } else { "▾" };
        let style = tab_style(props.active, props.disabled, props.open).add_modifier(Modifier::BOLD);
        Element::from_line(Line::from(format!("{name}: {current} {arrow}"))).with_style(style)
    })
}

fn checked_item(name: &str, value: &str, selected: &Rc<RefCell<String>>) -> Content {
    let name = name.to_string();
    let value = value.to_string();
    let selected = Rc::clone(selected);
    Content::interactive(move |props: &RenderProps| {
        let check = if *selected.borrow() == value { "✓ " } else { "  " };
        Element::from_line(Line::from(format!("{check}{name}")))
            .with_style(item_style(props.active, props.disabled))
    })
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                    Application                                                 │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Validated configuration
    pub config: AppConfig,

    /// Text and selections
    pub translator: TranslatorState,

    /// Source, target and personality menus, top to bottom
    pub menus: Vec<MenuBinding>,

    /// Keyboard focus
    pub focus: FocusZone,

    /// Request shown in the preview popup
    pub preview: Option<TranslateRequest>,

    /// Active notifications
    pub toasts: Vec<Toast>,

    /// Layout regions outside the menus (the text box)
    pub regions: SharedRegistry,

    /// Whether the application should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new application instance
    pub fn new(config: AppConfig) -> Result<Self> {
        let defaults = &config.translator;
        let translator = TranslatorState::new(
            defaults.default_target_lang.as_str(),
            defaults.default_personality.as_str(),
            defaults.max_source_length,
        );

        let menus = vec![
            MenuBinding::build(MenuRole::SourceLanguage, &config.menus.source_language, AUTO_DETECT)?,
            MenuBinding::build(
                MenuRole::TargetLanguage,
                &config.menus.target_language,
                &defaults.default_target_lang,
            )?,
            MenuBinding::build(
                MenuRole::Personality,
                &config.menus.personality,
                &defaults.default_personality,
            )?,
        ];

        Ok(Self {
            config,
            translator,
            menus,
            focus: FocusZone::Input,
            preview: None,
            toasts: Vec::new(),
            regions: RectRegistry::shared(),
            should_quit: false,
        })
    }

    /// Where key presses are routed
    pub fn input_mode(&self) -> InputMode {
        if self.preview.is_some() {
            InputMode::Preview
        } else if matches!(self.focus, FocusZone::Menu(_)) {
            InputMode::Menu
        } else {
            InputMode::Text
        }
    }

    pub fn binding(&self, role: MenuRole) -> Option<&MenuBinding> {
        self.menus.iter().find(|binding| binding.role == role)
    }

    pub fn any_menu_open(&self) -> bool {
        self.menus.iter().any(|binding| binding.menu.is_open())
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn dispatch(&mut self, action: TranslatorAction) {
        self.translator = self.translator.reduce(action);
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // Events
    // ────────────────────────────────────────────────────────────────────────────────────────────

    /// Handle an application event
    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Quit => self.quit(),
            AppEvent::Submit => self.submit(),
            AppEvent::Insert(c) => self.dispatch(TranslatorAction::PushChar(c)),
            AppEvent::Backspace => self.dispatch(TranslatorAction::PopChar),
            AppEvent::ClearText => self.dispatch(TranslatorAction::ClearText),
            AppEvent::FocusNext => self.enter_menus(0, true)?,
            AppEvent::FocusPrev => self.enter_menus(self.menus.len(), false)?,
            AppEvent::Back => self.back()?,
            AppEvent::Menu(event) => self.route_menu_key(&event)?,
            AppEvent::Pointer(event) => self.route_pointer(&event)?,
            AppEvent::None => {}
        }
        Ok(())
    }

    fn back(&mut self) -> Result<()> {
        if self.preview.take().is_some() {
            debug!("request preview closed");
            return Ok(());
        }
        self.close_menus();
        self.focus_input()
    }

    /// Close every open popup
    pub fn close_menus(&mut self) {
        for binding in &self.menus {
            if binding.menu.is_open() {
                binding.menu.close();
            }
        }
    }

    fn focus_input(&mut self) -> Result<()> {
        if let FocusZone::Menu(index) = self.focus {
            if let Some(binding) = self.menus.get_mut(index) {
                binding.menu.blur()?;
            }
        }
        self.focus = FocusZone::Input;
        Ok(())
    }

    /// Move keyboard focus into the menus, starting at `from` and walking in one direction.
    /// Menus without a focusable control are skipped; walking off the end returns to the input.
    fn enter_menus(&mut self, from: usize, forward: bool) -> Result<()> {
        let mut index = from;
        loop {
            let next = if forward {
                Some(index).filter(|&i| i < self.menus.len())
            } else {
                index.checked_sub(1)
            };
            let Some(next) = next else {
                self.focus = FocusZone::Input;
                return Ok(());
            };

            let menu = &mut self.menus[next].menu;
            let event = if forward { menu.focus_next()? } else { menu.focus_prev()? };
            if let MenuEvent::FocusMoved(id) = event {
                debug!(%id, "focus moved into menu");
                self.focus = FocusZone::Menu(next);
                return Ok(());
            }
            index = if forward { next + 1 } else { next };
        }
    }

    fn route_menu_key(&mut self, event: &Event) -> Result<()> {
        let FocusZone::Menu(index) = self.focus else {
            return Ok(());
        };
        let Some(binding) = self.menus.get_mut(index) else {
            return self.focus_input();
        };

        let code = match event {
            Event::Key(key) => key.code,
            _ => return Ok(()),
        };
        let was_open = binding.menu.is_open();
        let outcome = binding.menu.handle_event(event)?;

        match outcome {
            MenuEvent::FocusLeft => {
                binding.menu.close();
                let forward = !matches!(code, KeyCode::BackTab | KeyCode::Left | KeyCode::Up);
                self.enter_menus(if forward { index + 1 } else { index }, forward)
            }
            MenuEvent::None if code == KeyCode::Esc && !was_open => self.focus_input(),
            other => self.apply_menu_event(index, other),
        }
    }

    /// Find the menu a pointer event belongs to: an open popup under the pointer wins over
    /// any tab row it covers. Every other menu sees the event as an outside event.
    fn route_pointer(&mut self, event: &Event) -> Result<()> {
        let Event::Mouse(mouse) = event else {
            return Ok(());
        };
        let Some(pointer) = PointerEvent::from_mouse(mouse) else {
            return Ok(());
        };
        let (x, y) = (pointer.column, pointer.row);

        let owner = self
            .menus
            .iter()
            .position(|binding| binding.menu.is_open() && binding.menu.popup_hits(x, y))
            .or_else(|| self.menus.iter().position(|binding| binding.menu.hits(x, y)));

        for index in 0..self.menus.len() {
            let menu = &mut self.menus[index].menu;
            let outcome = if owner == Some(index) {
                menu.handle_pointer(pointer)?
            } else {
                menu.handle_pointer_outside(pointer)?
            };
            self.apply_menu_event(index, outcome)?;
        }

        let on_input = self.regions.borrow().contains(&ElementId::new(INPUT_REGION), x, y);
        if pointer.is_press() && owner.is_none() && on_input {
            self.focus_input()?;
        }
        Ok(())
    }

    /// Turn what a menu reported into selection changes
    pub fn apply_menu_event(&mut self, index: usize, event: MenuEvent) -> Result<()> {
        let Some(binding) = self.menus.get(index) else {
            return Ok(());
        };
        match event {
            MenuEvent::Tab { id, outcome } if outcome != ClickOutcome::Ignored => {
                debug!(%id, ?outcome, "tab clicked");
                if let Some(value) = binding.config.value_of(&id).map(str::to_string) {
                    self.select(index, &value);
                }
            }
            MenuEvent::ItemSelected(id) => {
                if let Some(value) = binding.config.value_of(&id).map(str::to_string) {
                    self.select(index, &value);
                }
                // Items only report the choice; the owner closes the popup
                self.menus[index].menu.render_props().close.close()?;
            }
            MenuEvent::Dismissed => debug!(menu = %binding.config.id, "menu dismissed"),
            _ => {}
        }
        Ok(())
    }

    fn select(&mut self, index: usize, value: &str) {
        let Some(binding) = self.menus.get(index) else {
            return;
        };
        binding.select(value);
        let action = match binding.role {
            MenuRole::SourceLanguage => {
                TranslatorAction::SetSourceLang((value != AUTO_DETECT).then(|| value.to_string()))
            }
            MenuRole::TargetLanguage => TranslatorAction::SetTargetLang(value.to_string()),
            MenuRole::Personality => TranslatorAction::SetTargetPersonality(value.to_string()),
        };
        info!(role = ?binding.role, %value, "selection changed");
        self.dispatch(action);
    }

    // ────────────────────────────────────────────────────────────────────────────────────────────
    // Submit and notifications
    // ────────────────────────────────────────────────────────────────────────────────────────────

    /// Build the request and show it, or explain why it cannot be built
    pub fn submit(&mut self) {
        self.close_menus();
        match self.translator.build_request() {
            Ok(request) => {
                info!(
                    chars = self.translator.char_count(),
                    target = %request.target_lang,
                    personality = %request.target_personality,
                    "request prepared"
                );
                self.dispatch(TranslatorAction::RequestPrepared);
                self.toasts.push(Toast::success("Request prepared"));
                self.preview = Some(request);
            }
            Err(err) => {
                warn!(%err, "request rejected");
                self.dispatch(TranslatorAction::RequestRejected(err.to_string()));
                self.toasts.push(Toast::error(err.to_string()));
            }
        }
    }

    /// Drop toasts that have been visible for longer than the configured duration
    pub fn prune_toasts(&mut self, now: SystemTime) {
        let lifetime = Duration::from_millis(self.config.application.toast_duration_ms);
        self.toasts.retain(|toast| {
            now.duration_since(toast.shown_at)
                .map(|elapsed| elapsed < lifetime)
                .unwrap_or(true)
        });
    }

    /// Record where the text box was drawn
    pub fn set_input_area(&self, area: Rect) {
        let mut regions = self.regions.borrow_mut();
        let id = ElementId::new(INPUT_REGION);
        if !regions.update(&id, area) {
            regions.register(&id, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_validation::load_and_validate_config;
    use crate::core::translator::RequestStatus;
    use crate::ui::ToastType;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    fn app() -> App {
        App::new(load_and_validate_config(None).unwrap()).unwrap()
    }

    fn menu_index(app: &App, role: MenuRole) -> usize {
        app.menus.iter().position(|binding| binding.role == role).unwrap()
    }

    fn tab(app: &mut App, role: MenuRole, id: &str) -> MenuEvent {
        let index = menu_index(app, role);
        let event = app.menus[index].menu.click_tab(&ElementId::new(id)).unwrap();
        app.apply_menu_event(index, event.clone()).unwrap();
        event
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Menu(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_initial_selection_from_defaults() {
        let app = app();
        assert_eq!(app.translator.source_lang, None);
        assert_eq!(app.translator.target_lang, "en");
        assert_eq!(app.translator.target_personality, "pirate");
        assert_eq!(app.binding(MenuRole::SourceLanguage).unwrap().selected(), AUTO_DETECT);
        assert_eq!(app.binding(MenuRole::Personality).unwrap().selected_name(), "Pirate");
        assert_eq!(app.input_mode(), InputMode::Text);
    }

    #[test]
    fn test_source_tab_selects_then_opens() {
        let mut app = app();
        let source = MenuRole::SourceLanguage;

        let first = tab(&mut app, source, "source-de");
        assert!(matches!(first, MenuEvent::Tab { outcome: ClickOutcome::Pending, .. }));
        assert_eq!(app.translator.source_lang.as_deref(), Some("de"));
        assert!(!app.binding(source).unwrap().menu.is_open());

        tab(&mut app, source, "source-de");
        assert!(app.binding(source).unwrap().menu.is_open());

        // Detection opens on a single click and maps back to no input language
        tab(&mut app, source, "source-auto");
        assert!(!app.binding(source).unwrap().menu.is_open());
        assert_eq!(app.translator.source_lang, None);
    }

    #[test]
    fn test_item_selection_closes_popup() {
        let mut app = app();
        let index = menu_index(&app, MenuRole::Personality);
        tab(&mut app, MenuRole::Personality, "personality-trigger");
        assert!(app.menus[index].menu.is_open());

        let event = app.menus[index]
            .menu
            .select_item(&ElementId::new("personality-item-yoda"))
            .unwrap();
        app.apply_menu_event(index, event).unwrap();

        assert_eq!(app.translator.target_personality, "yoda");
        assert!(!app.menus[index].menu.is_open());
        assert_eq!(app.menus[index].selected_name(), "Yoda");
    }

    #[test]
    fn test_trigger_tab_shows_current_personality() {
        let app = app();
        let view = app.binding(MenuRole::Personality).unwrap().menu.view().unwrap();
        let trigger = view.find(&ElementId::new("personality-trigger")).unwrap();
        assert_eq!(trigger.text(), "Personality: Pirate ▾");
        assert_eq!(trigger.attrs.has_popup, Some(true));
    }

    #[test]
    fn test_submit_builds_preview_or_toast() {
        let mut app = app();
        app.submit();
        assert!(app.preview.is_none());
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].toast_type, ToastType::Error);
        assert_eq!(app.translator.status, RequestStatus::Rejected);

        for c in "Ahoy".chars() {
            app.handle_event(AppEvent::Insert(c)).unwrap();
        }
        app.handle_event(AppEvent::Submit).unwrap();
        let request = app.preview.clone().unwrap();
        assert_eq!(request.text, "Ahoy");
        assert_eq!(request.input_lang, None);
        assert_eq!(app.input_mode(), InputMode::Preview);
        assert_eq!(app.toasts.len(), 2);
        assert_eq!(app.toasts[1].toast_type, ToastType::Success);
        assert_eq!(app.toasts[1].message, "Request prepared");

        app.handle_event(AppEvent::Back).unwrap();
        assert!(app.preview.is_none());
        assert_eq!(app.translator.status, RequestStatus::Prepared);
    }

    #[test]
    fn test_prune_toasts() {
        let mut app = app();
        app.submit();
        let shown = app.toasts[0].shown_at;
        app.prune_toasts(shown + Duration::from_millis(100));
        assert_eq!(app.toasts.len(), 1);
        app.prune_toasts(shown + Duration::from_millis(3000));
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn test_focus_walks_through_menus() {
        let mut app = app();
        app.handle_event(AppEvent::FocusNext).unwrap();
        assert_eq!(app.focus, FocusZone::Menu(0));
        assert_eq!(app.menus[0].menu.focused(), Some(&ElementId::new("source-auto")));

        // Four source tabs, then the target menu
        for _ in 0..4 {
            app.handle_event(key(KeyCode::Tab)).unwrap();
        }
        assert_eq!(app.focus, FocusZone::Menu(1));
        assert_eq!(app.menus[1].menu.focused(), Some(&ElementId::new("target-de")));

        app.handle_event(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.focus, FocusZone::Menu(0));
        assert_eq!(app.menus[0].menu.focused(), Some(&ElementId::new("source-es")));

        app.handle_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.focus, FocusZone::Input);
        assert_eq!(app.menus[0].menu.focused(), None);
    }

    #[test]
    fn test_focus_prev_from_input_enters_last_menu() {
        let mut app = app();
        app.handle_event(AppEvent::FocusPrev).unwrap();
        assert_eq!(app.focus, FocusZone::Menu(2));
        assert_eq!(app.menus[2].menu.focused(), Some(&ElementId::new("personality-trigger")));

        app.handle_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus, FocusZone::Input);
    }

    #[test]
    fn test_keyboard_activation_selects() {
        let mut app = app();
        app.handle_event(AppEvent::FocusNext).unwrap();
        app.handle_event(key(KeyCode::Tab)).unwrap();
        app.handle_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.translator.source_lang.as_deref(), Some("de"));
    }

    #[test]
    fn test_press_on_input_returns_focus() {
        let mut app = app();
        app.set_input_area(Rect::new(0, 4, 40, 5));
        app.handle_event(AppEvent::FocusNext).unwrap();

        let press = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        app.handle_event(AppEvent::Pointer(press)).unwrap();
        assert_eq!(app.focus, FocusZone::Input);
    }

    #[test]
    fn test_open_popup_takes_press_over_tab_row_below() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let source = menu_index(&app, MenuRole::SourceLanguage);
        let target = menu_index(&app, MenuRole::TargetLanguage);
        app.menus[source].menu.open();
        crate::ui::draw(&mut terminal, &app).unwrap();

        // First popup cell sits on top of " German " in the target row
        assert!(app.menus[source].menu.popup_hits(8, 11));
        assert!(app.menus[target].menu.hits(8, 11));

        let press = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 8,
            row: 11,
            modifiers: KeyModifiers::NONE,
        });
        app.handle_event(AppEvent::Pointer(press)).unwrap();

        assert_eq!(app.translator.source_lang.as_deref(), Some("ar"));
        assert!(!app.menus[source].menu.is_open());
        assert_eq!(app.translator.target_lang, "en");
        let target_de = app.menus[target].menu.tab_group().tab(&ElementId::new("target-de")).unwrap();
        assert!(!target_de.is_pending());
        assert!(!app.menus[target].menu.is_open());
    }
}
