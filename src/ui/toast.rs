// Toast notifications
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Clear, Paragraph},
    Frame,
};
use std::time::SystemTime;
use tui_tabs_menu::hex_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub toast_type: ToastType,
    pub shown_at: SystemTime, // MUST use SystemTime, not Instant
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            shown_at: SystemTime::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Error)
    }

    fn icon(&self) -> (&'static str, Color) {
        match self.toast_type {
            ToastType::Success => ("✓", Color::Green),
            ToastType::Error => ("✗", Color::Red),
        }
    }
}

/// Render toasts in the bottom-left corner, newest at the bottom, inset by 1 from left and bottom
pub fn render_toasts(f: &mut Frame, area: Rect, toasts: &[Toast]) {
    if toasts.is_empty() || area.width < 4 {
        return;
    }

    let lines: Vec<(String, Color)> = toasts
        .iter()
        .map(|toast| {
            let (icon, color) = toast.icon();
            (format!("{} {}", icon, toast.message), color)
        })
        .collect();

    // 2 columns of padding on the left, 1 on the right
    let width = lines
        .iter()
        .map(|(content, _)| content.chars().count() + 3)
        .max()
        .unwrap_or(0)
        .min(area.width.saturating_sub(2) as usize);

    for (offset, (content, color)) in lines.iter().rev().enumerate() {
        let y_from_bottom = 2 + offset as u16;
        if y_from_bottom > area.height {
            break;
        }

        let toast_area = Rect {
            x: area.x + 1,
            y: area.y + area.height - y_from_bottom,
            width: width as u16,
            height: 1,
        };
        let padded: String = format!("  {content:<width$}", width = width.saturating_sub(2))
            .chars()
            .take(width)
            .collect();

        f.render_widget(Clear, toast_area);
        f.render_widget(
            Paragraph::new(padded).style(
                Style::default()
                    .fg(*color)
                    .bg(hex_color(0x0A0A0A))
                    .add_modifier(Modifier::BOLD),
            ),
            toast_area,
        );
    }
}
