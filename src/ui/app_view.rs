// Application View
// Main view rendering for Persona Translate

use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use tui_tabs_menu::DimmingContext;

use super::layout::{split_main, BaseLayout};
use super::preview::render_preview;
use super::toast::render_toasts;
use crate::core::{App, FocusZone, MenuRole, RequestStatus};

/// Width of the caption column left of each tab row
const CAPTION_WIDTH: u16 = 6;

/// Render the full application. Popups are drawn after everything they may cover.
pub fn render_app(f: &mut Frame, app: &App) -> Result<()> {
    let area = f.area();
    let dimming = DimmingContext::new(app.preview.is_some());

    let main = BaseLayout::new(&app.config.application, &dimming).render(f, area);
    let areas = split_main(main, app.menus.len());

    render_input(f, areas.input, app, &dimming);
    app.set_input_area(areas.input);

    for (index, (binding, row)) in app.menus.iter().zip(&areas.menu_rows).enumerate() {
        let focused = app.focus == FocusZone::Menu(index);
        let caption_style = Style::default()
            .fg(dimming.text_color(focused))
            .add_modifier(Modifier::BOLD);
        let caption = Rect { width: CAPTION_WIDTH.min(row.width), ..*row };
        f.render_widget(
            Paragraph::new(binding.role.caption()).style(dimming.dim_style(caption_style)),
            caption,
        );

        let tabs = Rect {
            x: row.x + caption.width,
            width: row.width - caption.width,
            ..*row
        };
        binding.menu.render_tabs(f, tabs, &dimming)?;
    }

    render_summary(f, areas.summary, app, &dimming);

    for binding in &app.menus {
        binding.menu.render_items(f, &dimming)?;
    }

    if let Some(request) = &app.preview {
        render_preview(f, area, request);
    }
    render_toasts(f, area, &app.toasts);
    Ok(())
}

fn render_input(f: &mut Frame, area: Rect, app: &App, dimming: &DimmingContext) {
    let focused = app.focus == FocusZone::Input && app.preview.is_none();
    let translator = &app.translator;
    let counter = format!(" {} / {} ", translator.char_count(), translator.max_source_length);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Text ")
        .title_bottom(Line::from(counter).right_aligned())
        .border_style(Style::default().fg(if focused {
            Color::Cyan
        } else {
            dimming.border_color(false)
        }));

    let mut spans = vec![Span::styled(
        translator.source_text.clone(),
        Style::default().fg(dimming.text_color(true)),
    )];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    } else if translator.source_text.is_empty() {
        spans.push(Span::styled(
            "Enter text to translate",
            Style::default().fg(dimming.text_color(false)),
        ));
    }

    let input = Paragraph::new(Line::from(spans))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(input, area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App, dimming: &DimmingContext) {
    let name = |role: MenuRole| {
        app.binding(role)
            .map(|binding| binding.selected_name())
            .unwrap_or_default()
    };
    let label = Style::default().fg(dimming.text_color(false));
    let value = Style::default()
        .fg(dimming.text_color(true))
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(vec![
        Span::styled(name(MenuRole::SourceLanguage), value),
        Span::styled(" → ", label),
        Span::styled(name(MenuRole::TargetLanguage), value),
        Span::styled(", spoken like ", label),
        Span::styled(name(MenuRole::Personality), value),
    ])];

    let translator = &app.translator;
    lines.push(match translator.status {
        RequestStatus::Idle => Line::from(Span::styled("Press Enter to build the request", label)),
        RequestStatus::Prepared => Line::from(Span::styled(
            "Request prepared",
            dimming.dim_style(Style::default().fg(Color::Green)),
        )),
        RequestStatus::Rejected => Line::from(Span::styled(
            translator.last_error.clone().unwrap_or_default(),
            dimming.dim_style(Style::default().fg(Color::Red)),
        )),
    });

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Request ")
        .border_style(Style::default().fg(dimming.border_color(false)));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}
