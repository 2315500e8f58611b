use chrono::NaiveDateTime;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::location::Coordinates;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    now: NaiveDateTime,
    hijri_str: &str,
    coords: Coordinates,
) {
    let gregorian_str = now.format("%A, %b %d, %Y").to_string();
    let clock_str = now.format("%I:%M:%S %p").to_string();

    let title_line = Line::from(vec![
        Span::styled("  أذان  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("adhaan", theme::gold()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(clock_str, theme::bold()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(hijri_str, theme::amber()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(gregorian_str, theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(format!("📍 {}", coords), theme::dim()),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
