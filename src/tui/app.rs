use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use log::{error, info};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
    DefaultTerminal, Frame,
};
use std::time::{Duration, Instant};

use crate::config::REFRESH_CHOICES;
use crate::controller::{Controller, ControllerError, TestPlayback};
use crate::models::PrayerType;
use crate::prayer_times::{next_prayer, PrayerTimeTable, CALC_METHODS};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{header, next_prayer as next_prayer_widget, prayers, settings, statusbar};
use crate::utils::hijri::hijri_string;

const TICK_RATE: Duration = Duration::from_millis(500);
const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

pub struct App {
    pub view: View,
    pub controller: Controller,
    pub should_quit: bool,
    /// Modal warning; any key closes it.
    pub warning: Option<String>,

    // Cached state (refreshed on tick/action)
    pub table: PrayerTimeTable,
    pub hijri_str: String,
    pub next_prayer_info: Option<(PrayerType, i64)>,
    status: Option<(String, Instant)>,
    last_refresh: Instant,
    /// Location update waiting for the next frame, so its status line is
    /// on screen before the lookup blocks.
    pending_locate: bool,
}

/// The entry after `current` in `items`, wrapping around. An unknown
/// `current` starts from the first entry.
pub fn cycle_next<T: PartialEq + Clone>(items: &[T], current: &T) -> Option<T> {
    let idx = items.iter().position(|x| x == current);
    match idx {
        Some(i) => items.get((i + 1) % items.len()).cloned(),
        None => items.first().cloned(),
    }
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let hijri_str = hijri_string(
            controller.now().date(),
            controller.config.prayer.hijri_offset,
        );
        let table = controller.table();
        let mut app = App {
            view: View::Dashboard,
            controller,
            should_quit: false,
            warning: None,
            table,
            hijri_str,
            next_prayer_info: None,
            status: None,
            last_refresh: Instant::now(),
            pending_locate: false,
        };
        app.update_countdown();
        app
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn update_countdown(&mut self) {
        self.next_prayer_info = next_prayer(&self.table, self.controller.now().time());
    }

    /// Recomputes the table and the cached header values.
    pub fn refresh(&mut self) {
        self.table = self.controller.refresh_times();
        self.hijri_str = hijri_string(
            self.controller.now().date(),
            self.controller.config.prayer.hijri_offset,
        );
        self.last_refresh = Instant::now();
        self.update_countdown();
        if self.table.is_empty() {
            self.set_status("Could not calculate prayer times, see the log");
        }
    }

    pub fn tick(&mut self) {
        if self.last_refresh.elapsed() >= self.controller.refresh_interval() {
            self.refresh();
        }
        self.update_countdown();
        let expired = self
            .status
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL);
        if expired {
            self.status = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.warning.is_some() {
            self.warning = None;
            return;
        }
        match self.view {
            View::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                    self.view = View::Dashboard;
                }
            }
            View::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                let prayer = PrayerType::all()[idx];
                match self.controller.toggle_prayer(prayer) {
                    Ok(true) => self.set_status(format!("Adhaan for {} enabled", prayer.display_name())),
                    Ok(false) => self.set_status(format!("Adhaan for {} disabled", prayer.display_name())),
                    Err(e) => self.set_status(format!("Could not save: {:#}", e)),
                }
            }
            KeyCode::Char('f') => {
                self.refresh();
                if !self.table.is_empty() {
                    self.set_status("Prayer times updated");
                }
            }
            KeyCode::Char('l') => {
                self.set_status("Updating location...");
                self.pending_locate = true;
            }
            KeyCode::Char('m') => self.cycle_method(),
            KeyCode::Char('v') => self.cycle_voice(),
            KeyCode::Char('i') => self.cycle_interval(),
            KeyCode::Char('t') => self.toggle_test(),
            _ => {}
        }
    }

    /// Runs work deferred from a key press. Returns whether anything ran.
    pub fn run_pending(&mut self) -> bool {
        if !std::mem::take(&mut self.pending_locate) {
            return false;
        }
        let coords = self.controller.update_location();
        self.table = self.controller.table();
        self.last_refresh = Instant::now();
        self.update_countdown();
        self.set_status(format!("Location: {}", coords));
        true
    }

    fn cycle_method(&mut self) {
        let current = self.controller.config.prayer.calc_method.clone();
        let Some(next) = cycle_next(CALC_METHODS, &current.as_str()) else {
            return;
        };
        match self.controller.set_method(next) {
            Ok(()) => {
                self.table = self.controller.table();
                self.last_refresh = Instant::now();
                self.update_countdown();
                self.set_status(format!("Calculation method: {}", next));
            }
            Err(e) => self.set_status(format!("{:#}", e)),
        }
    }

    fn cycle_voice(&mut self) {
        let names: Vec<String> = self.controller.voices().iter().map(|v| v.name.clone()).collect();
        let current = match &self.controller.config.adhaan.custom_file {
            Some(_) => String::new(),
            None => self.controller.config.adhaan.voice.clone().unwrap_or_default(),
        };
        let Some(next) = cycle_next(&names, &current) else {
            self.warning = Some("The voice database is empty.".to_string());
            return;
        };
        match self.controller.select_voice(&next) {
            Ok(()) => self.set_status(format!("Voice: {}", self.controller.selection_label())),
            Err(e) => self.set_status(format!("{:#}", e)),
        }
    }

    fn cycle_interval(&mut self) {
        let current = self.controller.config.prayer.refresh_minutes;
        let Some(next) = cycle_next(REFRESH_CHOICES, &current) else {
            return;
        };
        match self.controller.set_refresh_minutes(next) {
            Ok(()) => self.set_status(format!("Auto fetch every {} min", next)),
            Err(e) => self.set_status(format!("{:#}", e)),
        }
    }

    fn toggle_test(&mut self) {
        match self.controller.toggle_test() {
            Ok(TestPlayback::Started) => self.set_status("Playing test Adhaan, [t] to stop"),
            Ok(TestPlayback::Stopped) => self.set_status("Test Adhaan stopped"),
            Err(ControllerError::NoAudioSelected) => {
                self.warning = Some(
                    "No Adhaan audio selected.\nPick a voice with [v] or run `adhaan voices file PATH`."
                        .to_string(),
                );
            }
            Err(e) => {
                error!("Test playback failed: {}", e);
                self.warning = Some(format!("Could not play the Adhaan:\n{}", e));
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);
        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
        if let Some(message) = &self.warning {
            self.draw_warning(frame, message);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            self.controller.now(),
            &self.hijri_str,
            self.controller.coords(),
        );
        statusbar::render(
            frame,
            outer_chunks[2],
            self.status.as_ref().map(|(m, _)| m.as_str()),
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[1]);

        let enabled = self.controller.config.adhaan.enabled;
        prayers::render(
            frame,
            columns[0],
            &self.table,
            &enabled,
            self.next_prayer_info.map(|(p, _)| p),
        );

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // next prayer
                Constraint::Min(0),    // settings
            ])
            .split(columns[1]);

        next_prayer_widget::render(
            frame,
            right_chunks[0],
            self.next_prayer_info,
            &self.table,
            &enabled,
        );
        settings::render(frame, right_chunks[1], &self.controller);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered(frame.area(), 50, 16);
        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[1-5]", "Toggle Adhaan for Fajr … Isha"),
            ("[f]", "Fetch prayer times now"),
            ("[l]", "Update location"),
            ("[m]", "Next calculation method"),
            ("[v]", "Next voice"),
            ("[i]", "Next auto fetch interval"),
            ("[t]", "Play / stop test Adhaan"),
            ("[?]", "Toggle help"),
            ("[Esc]", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<8}", key), theme::gold()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = theme::panel(" Help ").border_style(theme::gold());
        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_warning(&self, frame: &mut Frame, message: &str) {
        let popup_area = centered(frame.area(), 56, 8);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![Line::from("")];
        for part in message.lines() {
            lines.push(Line::from(Span::styled(format!("  {}", part), theme::bold())));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  [any key] close", theme::dim())));

        let block = Block::bordered()
            .title(Span::styled(" Warning ", theme::red()))
            .border_type(BorderType::Double)
            .border_style(theme::red())
            .style(theme::surface());

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    let events = EventHandler::new(TICK_RATE);

    loop {
        terminal.draw(|frame| app.draw(frame))?;
        if app.run_pending() {
            continue;
        }

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    break;
                }
            }
            Event::Resize => {}
            Event::Tick => app.tick(),
        }
    }
    Ok(())
}

/// Run the TUI event loop with the monitor in the background.
pub fn run(mut controller: Controller) -> Result<()> {
    let coords = controller.update_location();
    info!("Dashboard starting at {}", coords);
    let mut monitor = controller.start_monitor()?;

    let mut app = App::new(controller);
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);

    monitor.stop();
    app.controller.stop_audio();
    ratatui::restore();
    result
}
