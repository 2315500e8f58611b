use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::config::EnabledSet;
use crate::models::{PrayerType, TimeSlot};
use crate::prayer_times::PrayerTimeTable;
use crate::tui::theme;
use crate::utils::format::to_12h;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    table: &PrayerTimeTable,
    enabled: &EnabledSet,
    next: Option<PrayerType>,
) {
    let block = theme::panel(" Prayer Times ");

    let items: Vec<ListItem> = TimeSlot::ALL
        .iter()
        .map(|slot| {
            let prayer = slot.prayer();
            let is_next = prayer.is_some() && prayer == next;

            let name_style = match (is_next, prayer) {
                (true, _) => theme::gold().add_modifier(Modifier::BOLD),
                (false, Some(_)) => theme::bold(),
                (false, None) => theme::dim(),
            };

            let mut spans = vec![
                Span::styled(format!("  {:<11}", slot.display_name()), name_style),
                Span::styled(format!("{:<10}", to_12h(&table.hhmm(*slot))), theme::bold()),
            ];

            if let Some(p) = prayer {
                let (glyph, style) = theme::bell(enabled.is_enabled(p));
                let key = PrayerType::all().iter().position(|x| *x == p).unwrap_or(0) + 1;
                spans.push(Span::styled(glyph, style));
                spans.push(Span::styled(format!("  [{}]", key), theme::dim()));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
