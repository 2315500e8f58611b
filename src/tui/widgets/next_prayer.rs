use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::config::EnabledSet;
use crate::models::PrayerType;
use crate::prayer_times::PrayerTimeTable;
use crate::tui::theme;
use crate::utils::format::{format_duration_secs, to_12h};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    next_prayer: Option<(PrayerType, i64)>,
    table: &PrayerTimeTable,
    enabled: &EnabledSet,
) {
    let lines = match next_prayer {
        Some((prayer, secs)) => {
            let (glyph, bell_style) = theme::bell(enabled.is_enabled(prayer));
            vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        format!("  {} ", prayer.display_name().to_uppercase()),
                        theme::gold().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(glyph, bell_style),
                ]),
                Line::from(Span::styled(
                    format!("  at {}", to_12h(&table.hhmm(prayer.slot()))),
                    theme::dim(),
                )),
                Line::from(vec![
                    Span::styled("  ⏳ ", theme::dim()),
                    Span::styled(
                        format_duration_secs(secs),
                        theme::amber().add_modifier(Modifier::BOLD),
                    ),
                ]),
            ]
        }
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  Times unavailable", theme::red())),
            Line::from(Span::styled("  press [f] to fetch again", theme::dim())),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(theme::panel(" Next Prayer ")), area);
}
