// Request preview popup
// Centered box showing the payload that would be sent to the translate endpoint
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use tui_tabs_menu::{hex_color, popup_background, wrap_text};

use crate::core::TranslateRequest;

const TITLE: &str = "Translate request";
const MAX_TEXT_WIDTH: usize = 60;

/// Lines of the popup body: the YAML payload, or the serialization error
pub fn preview_lines(request: &TranslateRequest, max_width: usize) -> Vec<String> {
    match request.to_yaml() {
        Ok(yaml) => yaml
            .lines()
            .flat_map(|line| wrap_text(line, max_width))
            .collect(),
        Err(err) => wrap_text(&format!("Could not render request: {err}"), max_width),
    }
}

/// Dim the background and draw the preview centered in `area`
pub fn render_preview(f: &mut Frame, area: Rect, request: &TranslateRequest) {
    if area.width < 8 || area.height < 5 {
        return;
    }

    f.render_widget(
        Paragraph::new("").style(Style::default().bg(hex_color(0x0A0A0A))),
        area,
    );

    let text_width = MAX_TEXT_WIDTH.min(area.width.saturating_sub(8) as usize).max(1);
    let body = preview_lines(request, text_width);
    let content_width = body
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(TITLE.len());

    let popup_width = (content_width as u16 + 6).max(30).min(area.width.saturating_sub(4));
    let popup_height = (body.len() as u16 + 6).min(area.height);
    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(popup_width) / 2,
        y: area.y + area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };
    let inner = popup_width.saturating_sub(2) as usize;
    let border = Style::default().fg(Color::Cyan);

    let framed = |text: &str, style: Style, centered: bool| {
        let len = text.chars().count().min(inner);
        let padding = inner - len;
        let left = if centered { padding / 2 } else { 2.min(padding) };
        let text: String = text.chars().take(inner).collect();
        Line::from(vec![
            Span::styled("┃", border),
            Span::raw(" ".repeat(left)),
            Span::styled(text, style),
            Span::raw(" ".repeat(padding - left)),
            Span::styled("┃", border),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(format!("┏{}┓", "━".repeat(inner)), border)),
        framed(TITLE, border.add_modifier(Modifier::BOLD), true),
        framed("", border, false),
    ];
    for line in &body {
        lines.push(framed(line.as_str(), Style::default().fg(Color::White), false));
    }
    lines.push(framed("", border, false));
    lines.push(framed(
        "Enter / Esc to close",
        Style::default().fg(hex_color(0x777777)),
        true,
    ));
    lines.push(Line::from(Span::styled(format!("┗{}┛", "━".repeat(inner)), border)));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).style(popup_background()), popup_area);
}
