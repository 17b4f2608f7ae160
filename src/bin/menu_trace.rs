// Debug script to replay pointer input against a configured menu and show each state
//
// Usage: menu-trace [config.yaml] [source_language|target_language|personality]

use anyhow::{anyhow, Context, Result};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tui_tabs_menu::{
    create_tabs_menu_from_config, DimmingContext, ElementId, MenuEvent, PointerEvent, TabsMenu,
};

use persona_translate::load_and_validate_config;

const WIDTH: u16 = 80;
const HEIGHT: u16 = 16;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().filter(|arg| arg != "-").map(PathBuf::from);
    let which = args.next().unwrap_or_else(|| "source_language".to_string());

    let config = load_and_validate_config(config_path)?;
    let menu_config = match which.as_str() {
        "source_language" => &config.menus.source_language,
        "target_language" => &config.menus.target_language,
        "personality" => &config.menus.personality,
        other => return Err(anyhow!("unknown menu '{other}'")),
    };
    let mut menu = create_tabs_menu_from_config(menu_config)
        .with_context(|| format!("Failed to build menu '{}'", menu_config.id))?;
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT))?;

    println!("=== MENU '{}' ===", menu_config.id);
    draw(&menu, &mut terminal)?;
    print_state(&menu);

    let tabs: Vec<ElementId> = menu
        .tab_group()
        .tabs()
        .iter()
        .filter(|tab| !tab.is_disabled())
        .map(|tab| tab.id().clone())
        .collect();
    let first = tabs.first().ok_or_else(|| anyhow!("menu has no enabled tab"))?;
    let second = tabs.get(1).unwrap_or(first);
    let outside = PointerEvent::down(WIDTH - 1, HEIGHT - 1);

    let ev = press_on(&menu, first)?;

    step(&mut menu, &mut terminal, "press first tab", ev)?;
    step(&mut menu, &mut terminal, "press outside", outside)?;
    let ev = press_on(&menu, first)?;
    step(&mut menu, &mut terminal, "press first tab", ev)?;
    let ev = press_on(&menu, first)?;
    step(&mut menu, &mut terminal, "press first tab again", ev)?;

    if let Some(item) = menu.item_list().items().first().map(|item| item.id().clone()) {
        if menu.is_open() {
            let at = center(&menu, &item)?;
            step(&mut menu, &mut terminal, "hover first item", PointerEvent::moved(at.0, at.1))?;
            step(&mut menu, &mut terminal, "press first item", PointerEvent::down(at.0, at.1))?;
            menu.close();
            println!("  (owner closes the popup)");
            print_state(&menu);
        }
    }

    let ev = press_on(&menu, second)?;

    step(&mut menu, &mut terminal, "press second tab", ev)?;
    let timeout = Duration::from_millis(menu_config.double_click_timeout_ms.unwrap_or(500) + 50);
    println!("  (waiting {} ms)", timeout.as_millis());
    thread::sleep(timeout);
    let ev = press_on(&menu, second)?;
    step(&mut menu, &mut terminal, "press second tab after timeout", ev)?;

    Ok(())
}

fn draw(menu: &TabsMenu, terminal: &mut Terminal<TestBackend>) -> Result<()> {
    let mut outcome = Ok(());
    terminal.draw(|frame| {
        let dimming = DimmingContext::default();
        outcome = menu
            .render_tabs(frame, Rect::new(0, 0, WIDTH, 1), &dimming)
            .and_then(|_| menu.render_items(frame, &dimming).map(|_| ()));
    })?;
    Ok(outcome?)
}

fn center(menu: &TabsMenu, id: &ElementId) -> Result<(u16, u16)> {
    let bounds = menu
        .bounds(id)
        .ok_or_else(|| anyhow!("'{id}' was not drawn"))?;
    Ok((bounds.x + bounds.width / 2, bounds.y))
}

fn press_on(menu: &TabsMenu, id: &ElementId) -> Result<PointerEvent> {
    let (x, y) = center(menu, id)?;
    Ok(PointerEvent::down(x, y))
}

fn step(menu: &mut TabsMenu, terminal: &mut Terminal<TestBackend>, label: &str, event: PointerEvent) -> Result<()> {
    let outcome = menu.handle_pointer(event)?;
    draw(menu, terminal)?;
    println!();
    println!("=== {} at ({}, {}) ===", label.to_uppercase(), event.column, event.row);
    match outcome {
        MenuEvent::None => println!("  event: none"),
        other => println!("  event: {other:?}"),
    }
    print_state(menu);
    Ok(())
}

fn print_state(menu: &TabsMenu) {
    let state = menu.state();
    let show = |id: Option<&ElementId>| id.map(ElementId::to_string).unwrap_or_else(|| "-".to_string());
    println!("  toggle:      {:?}", state.toggle_state);
    println!("  open mode:   {:?}", state.open_mode);
    println!("  active tab:  {}", show(state.active_tab_id.as_ref()));
    println!("  active item: {}", show(state.active_item_id.as_ref()));
    println!("  labelled by: {}", state.labelled_by());

    let pending: Vec<String> = menu
        .tab_group()
        .tabs()
        .iter()
        .filter(|tab| tab.is_pending())
        .map(|tab| tab.id().to_string())
        .collect();
    if !pending.is_empty() {
        println!("  pending:     {}", pending.join(", "));
    }
}
