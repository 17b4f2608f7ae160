// Helper utilities for the menu elements
use ratatui::style::{Color, Modifier, Style};

/// Convert hex color to ratatui Color
pub fn hex_color(hex: u32) -> Color {
    Color::Rgb(
        ((hex >> 16) & 0xFF) as u8,
        ((hex >> 8) & 0xFF) as u8,
        (hex & 0xFF) as u8,
    )
}

/// Dimming context - tracks if a modal is covering the menus
#[derive(Debug, Clone, Copy, Default)]
pub struct DimmingContext {
    pub modal_visible: bool,
}

impl DimmingContext {
    pub fn new(modal_visible: bool) -> Self {
        Self { modal_visible }
    }

    /// Apply dimming to a style based on modal state
    pub fn dim_style(&self, style: Style) -> Style {
        if self.modal_visible {
            style.fg(hex_color(0x444444)).bg(Color::Reset)
        } else {
            style
        }
    }

    /// Get dimmed text color
    pub fn text_color(&self, is_active: bool) -> Color {
        if self.modal_visible {
            hex_color(0x444444)
        } else if is_active {
            hex_color(0xFFFFFF)
        } else {
            hex_color(0x777777)
        }
    }

    /// Get dimmed border color
    pub fn border_color(&self, is_active: bool) -> Color {
        if self.modal_visible {
            hex_color(0x222222)
        } else if is_active {
            Color::White
        } else {
            hex_color(0x333333)
        }
    }
}

/// Default style of a tab label
pub fn tab_style(active: bool, disabled: bool, open: bool) -> Style {
    if disabled {
        Style::default()
            .fg(hex_color(0x444444))
            .add_modifier(Modifier::CROSSED_OUT)
    } else if active {
        Style::default()
            .bg(hex_color(0x1A2A2A)) // Dim cyan background
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if open {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(hex_color(0x777777))
    }
}

/// Default style of a popup item
pub fn item_style(active: bool, disabled: bool) -> Style {
    if disabled {
        Style::default().fg(hex_color(0x444444))
    } else if active {
        Style::default()
            .bg(hex_color(0x1A2A2A))
            .fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Background of the popup panel
pub fn popup_background() -> Style {
    Style::default().bg(hex_color(0x141420))
}

/// Wrap text to fit within max width
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.chars().count() + 1 + word.chars().count() <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(current_line);
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    lines
}
