// Base Layout
// Title banner, main container, key bindings line, footer divider and status bar
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_tabs_menu::DimmingContext;

use crate::config::ApplicationConfig;

/// Height of the text box including its border
pub const INPUT_HEIGHT: u16 = 5;

pub struct BaseLayout<'a> {
    config: &'a ApplicationConfig,
    dimming: &'a DimmingContext,
}

impl<'a> BaseLayout<'a> {
    pub fn new(config: &'a ApplicationConfig, dimming: &'a DimmingContext) -> Self {
        Self { config, dimming }
    }

    /// Render the frame around the content and return the main container
    pub fn render(&self, f: &mut Frame, area: Rect) -> Rect {
        // title(3) + main(1) + bindings(1) + divider(1) + status(1)
        if area.width == 0 || area.height < 7 {
            return area;
        }

        // 1. Title banner, anchored to the top
        let title_banner = Rect { height: 3, ..area };
        self.render_title(f, title_banner);

        // 2. Status bar, anchored to the bottom
        let status_bar = Rect {
            y: area.bottom() - 1,
            height: 1,
            ..area
        };
        self.render_status_bar(f, status_bar);

        // 3. Footer divider above the status bar
        let footer_div = Rect { y: status_bar.y - 1, ..status_bar };
        self.render_footer_divider(f, footer_div);

        // 4. Key bindings above the divider
        let bindings = Rect { y: footer_div.y - 1, ..status_bar };
        self.render_bindings(f, bindings);

        // 5. Main container between the banner and the bindings
        let top = title_banner.bottom();
        Rect {
            x: area.x,
            y: top,
            width: area.width,
            height: bindings.y - top,
        }
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let title_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.dimming.border_color(true)));

        let title = Paragraph::new(Line::from(format!(" {}", self.config.title)))
            .block(title_block)
            .style(
                Style::default()
                    .fg(self.dimming.text_color(true))
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        f.render_widget(title, area);
    }

    /// Dim grey; swaps to the modal text while a popup covers the screen
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status = &self.config.status_bar;
        let text = match (&status.modal_text, self.dimming.modal_visible) {
            (Some(modal_text), true) => modal_text.as_str(),
            _ => status.default_text.as_str(),
        };
        let dim_grey = Color::Rgb(0x44, 0x44, 0x44);
        f.render_widget(Paragraph::new(Line::from(text)).style(Style::default().fg(dim_grey)), area);
    }

    fn render_footer_divider(&self, f: &mut Frame, area: Rect) {
        let divider = Paragraph::new(Line::from("─".repeat(area.width as usize)))
            .style(Style::default().fg(self.dimming.border_color(false)));
        f.render_widget(divider, area);
    }

    fn render_bindings(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (idx, binding) in self.config.bindings.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(self.dimming.text_color(false))));
            }
            spans.push(Span::styled(
                binding.key.clone(),
                Style::default()
                    .fg(self.dimming.text_color(true))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", binding.description),
                Style::default().fg(self.dimming.text_color(false)),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Areas inside the main container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainAreas {
    pub input: Rect,
    /// One row per menu: caption on the left, tabs on the right
    pub menu_rows: Vec<Rect>,
    pub summary: Rect,
}

/// Text box, then one menu row per menu separated by blank rows, then the summary box
pub fn split_main(area: Rect, menu_count: usize) -> MainAreas {
    let inset = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };

    let mut constraints = vec![Constraint::Length(INPUT_HEIGHT)];
    for _ in 0..menu_count {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(3));

    let chunks = Layout::vertical(constraints).split(inset);
    MainAreas {
        input: chunks[0],
        menu_rows: (0..menu_count).map(|i| chunks[2 + i * 2]).collect(),
        summary: chunks[chunks.len() - 1],
    }
}
