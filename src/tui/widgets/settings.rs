use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::config::LocationMode;
use crate::controller::Controller;
use crate::tui::theme;

fn row<'a>(key: &'a str, label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  [{}] ", key), theme::gold()),
        Span::styled(format!("{:<10}", label), theme::dim()),
        Span::styled(value, theme::bold()),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, controller: &Controller) {
    let config = &controller.config;
    let mode = match config.location.mode {
        LocationMode::Auto => "automatic".to_string(),
        LocationMode::Manual if config.location.zip.is_empty() => "manual".to_string(),
        LocationMode::Manual => format!("manual ({})", config.location.zip),
    };
    let test_state = if controller.is_testing() {
        Span::styled("playing", theme::amber())
    } else {
        Span::styled("idle", theme::dim())
    };

    let lines = vec![
        Line::from(""),
        row("l", "Location", mode),
        row("m", "Method", config.prayer.calc_method.clone()),
        row("v", "Voice", controller.selection_label()),
        row("i", "Refresh", format!("every {} min", config.prayer.refresh_minutes)),
        Line::from(vec![
            Span::styled("  [t] ", theme::gold()),
            Span::styled(format!("{:<10}", "Test"), theme::dim()),
            test_state,
        ]),
    ];

    let block = theme::panel(" Settings ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
