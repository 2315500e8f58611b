use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

/// Key hints, or the result of the last action when there is one.
pub fn render(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let line = match status {
        Some(message) => Line::from(Span::styled(message, theme::amber())),
        None => {
            let hints = [
                ("[1-5]", " adhaan  "),
                ("[f]", " fetch  "),
                ("[t]", " test  "),
                ("[?]", " help  "),
                ("[Esc]", " quit"),
            ];
            let mut spans = Vec::new();
            for (key, label) in &hints {
                spans.push(Span::styled(*key, theme::gold()));
                spans.push(Span::styled(*label, theme::dim()));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
