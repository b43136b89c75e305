use chrono::NaiveDate;
use ratatui::widgets::TableState;
use luxas_core::{DayEntry, Event, FileStore, Session, TimesheetError, TimesheetStats};
use luxas_core::model::timesheet::{MAX_DAY_HOURS, MAX_OVERTIME_HOURS};

/// Hours added or removed per keypress.
pub const STEP: f64 = 0.5;

const EMPTY_DAY: DayEntry = DayEntry { hours: 0.0, overtime: 0.0 };

/// Keeps the hours within the bounds the timesheet accepts.
pub fn bump_hours(entry: DayEntry, delta: f64) -> DayEntry {
    DayEntry {
        hours: (entry.hours + delta).clamp(0.0, MAX_DAY_HOURS),
        ..entry
    }
}

pub fn bump_overtime(entry: DayEntry, delta: f64) -> DayEntry {
    DayEntry {
        overtime: (entry.overtime + delta).clamp(0.0, MAX_OVERTIME_HOURS),
        ..entry
    }
}

pub enum InputMode {
    Normal,
    Remarks,
}

pub struct App {
    pub session: Session<FileStore>,
    pub days: Vec<NaiveDate>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
}

impl App {
    pub fn new(session: Session<FileStore>, today: NaiveDate) -> App {
        let mut app = App {
            session,
            days: Vec::new(),
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
        };
        app.reload_days();
        let start = app.days.iter().position(|d| *d == today).unwrap_or(0);
        app.state.select(Some(start));
        app
    }

    pub fn stats(&self) -> TimesheetStats {
        self.session.stats()
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.state.selected().and_then(|i| self.days.get(i).copied())
    }

    fn reload_days(&mut self) {
        self.days = self.session.timesheet().period.days().collect();
    }

    pub fn next(&mut self) {
        if self.days.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) if i >= self.days.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.days.is_empty() { return; }

        let i = match self.state.selected() {
            Some(0) | None => self.days.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn next_month(&mut self) {
        let period = self.session.timesheet().period.next();
        self.switch_period(period);
    }

    pub fn previous_month(&mut self) {
        let period = self.session.timesheet().period.previous();
        self.switch_period(period);
    }

    fn switch_period(&mut self, period: luxas_core::Period) {
        self.session.switch_period(period);
        self.reload_days();
        self.state.select(Some(0));
        self.message = None;
    }

    /// Fills the selected day with a standard day.
    pub fn fill_day(&mut self) {
        self.update_entry(|_| DayEntry::default());
    }

    pub fn adjust_hours(&mut self, delta: f64) {
        self.update_entry(|entry| bump_hours(entry, delta));
    }

    pub fn adjust_overtime(&mut self, delta: f64) {
        self.update_entry(|entry| bump_overtime(entry, delta));
    }

    fn update_entry(&mut self, change: impl FnOnce(DayEntry) -> DayEntry) {
        let Some(day) = self.selected_day() else { return };
        let current = self.session.timesheet().entry(day).copied();
        let result = self.session.record_entry(day, change(current.unwrap_or(EMPTY_DAY)));
        self.report(result);
    }

    pub fn clear_day(&mut self) {
        if let Some(day) = self.selected_day() {
            let result = self.session.clear_entry(day).map(|_| Vec::new());
            self.report(result);
        }
    }

    pub fn save(&mut self) {
        self.session.save();
        self.message = Some(format!("Brouillon {} enregistré", self.session.timesheet().period));
    }

    pub fn submit(&mut self) {
        let result = self.session.submit();
        let submitted = result.is_ok();
        self.report(result);
        if submitted && self.message.is_none() {
            self.message = Some("Timesheet soumis pour approbation".to_string());
        }
    }

    fn report(&mut self, result: Result<Vec<Event>, TimesheetError>) {
        self.message = match result {
            Ok(events) if events.is_empty() => None,
            Ok(events) => Some(
                events
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("  "),
            ),
            Err(e) => Some(e.to_string()),
        };
    }

    // Remarks input

    pub fn enter_remarks_mode(&mut self) {
        if !self.session.timesheet().is_editable() {
            self.message = Some("Timesheet verrouillé".to_string());
            return;
        }
        self.input = self.session.timesheet().remarks.clone();
        self.cursor_position = self.input.chars().count();
        self.input_mode = InputMode::Remarks;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input.chars().take(chars).map(|c| c.len_utf8()).sum()
    }

    pub fn submit_remarks(&mut self) {
        let result = self.session.set_remarks(self.input.trim()).map(|_| Vec::new());
        self.report(result);
        self.exit_input_mode();
    }
}
