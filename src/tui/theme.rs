use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

// Night-sky palette
pub const NIGHT: Color = Color::Rgb(12, 18, 28);
pub const PANEL: Color = Color::Rgb(20, 28, 42);
pub const LINE: Color = Color::Rgb(48, 62, 84);
pub const INK: Color = Color::Rgb(222, 228, 236);
pub const MUTED: Color = Color::Rgb(118, 132, 152);
pub const CRESCENT: Color = Color::Rgb(226, 190, 96);
pub const DUSK: Color = Color::Rgb(224, 142, 84);
pub const ALERT: Color = Color::Rgb(214, 88, 78);

pub fn base() -> Style {
    Style::new().fg(INK).bg(NIGHT)
}

pub fn surface() -> Style {
    Style::new().fg(INK).bg(PANEL)
}

pub fn dim() -> Style {
    Style::new().fg(MUTED)
}

pub fn bold() -> Style {
    Style::new().fg(INK).add_modifier(Modifier::BOLD)
}

pub fn gold() -> Style {
    Style::new().fg(CRESCENT)
}

pub fn amber() -> Style {
    Style::new().fg(DUSK)
}

pub fn red() -> Style {
    Style::new().fg(ALERT)
}

/// Rounded panel with a crescent-coloured title.
pub fn panel(title: &str) -> Block<'_> {
    Block::new()
        .title(Span::styled(title, gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(LINE))
        .style(surface())
}

/// Bell glyph and its colour for an Adhaan switch.
pub fn bell(enabled: bool) -> (&'static str, Style) {
    if enabled {
        ("🔔", gold())
    } else {
        ("🔕", dim())
    }
}
