use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;
use luxas_core::calendar::{classify, DayKind};
use luxas_core::TimesheetStatus;

use crate::calendar::weekday_fr;
use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Message / remarks input
            Constraint::Length(1), // Help
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .split(main_chunks[1]);

    draw_day_list(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);
    draw_input_line(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Normal => "j/k: Jour | h/l: Mois | Enter: 8h | +/-: Heures | o/O: Sup. | d: Effacer | r: Remarques | w: Enregistrer | s: Soumettre | q: Quitter",
        InputMode::Remarks => "Enter: Valider | Esc: Annuler",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn status_style(status: TimesheetStatus) -> Style {
    let color = match status {
        TimesheetStatus::Draft => Color::Yellow,
        TimesheetStatus::Submitted => Color::Blue,
        TimesheetStatus::Approved => Color::Green,
        TimesheetStatus::Rejected => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let timesheet = app.session.timesheet();
    let user = app
        .session
        .user()
        .map(|u| u.full_name.clone())
        .unwrap_or_else(|| "Invité".to_string());

    let title = Line::from(vec![
        Span::styled("LUX-AS ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("{}  ", user)),
        Span::styled(format!("Timesheet {} ", timesheet.period), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("[{}]", timesheet.status), status_style(timesheet.status)),
    ]);
    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, area);
}

fn draw_day_list(f: &mut Frame, app: &mut App, area: Rect) {
    let timesheet = app.session.timesheet();
    let calendar = app.session.calendar();

    let rows: Vec<Row> = app
        .days
        .iter()
        .map(|day| {
            let entry = timesheet.entry(*day);
            let (kind, kind_style) = match classify(*day, calendar) {
                DayKind::Working => (String::new(), Style::default()),
                DayKind::Weekend => ("Week-end".to_string(), Style::default().fg(Color::DarkGray)),
                DayKind::Holiday(h) => (
                    format!("{} {}", h.emoji.as_deref().unwrap_or(""), h.name),
                    Style::default().fg(Color::Magenta),
                ),
            };
            let hours = entry.map(|e| format!("{:.1}", e.hours)).unwrap_or_default();
            let overtime = entry
                .filter(|e| e.overtime > 0.0)
                .map(|e| format!("+{:.1}", e.overtime))
                .unwrap_or_default();
            let filled = entry.is_some_and(|e| e.is_filled());

            Row::new(vec![
                Span::styled(if filled { "✔" } else { " " }, Style::default().fg(Color::Green)),
                Span::raw(format!("{} {}", weekday_fr(*day), day.format("%d"))),
                Span::styled(hours, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(overtime, Style::default().fg(Color::Red)),
                Span::styled(kind, kind_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),  // Filled
            Constraint::Length(7),  // Day
            Constraint::Length(6),  // Hours
            Constraint::Length(6),  // Overtime
            Constraint::Min(10),    // Holiday
        ],
    )
    .header(Row::new(vec!["", "Jour", "Heures", "Sup.", ""]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Calendrier ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();
    let gamification = app.session.gamification();
    let timesheet = app.session.timesheet();

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Blue));
    let mut detail_text = vec![
        Line::from(vec![
            label("Jours remplis: "),
            Span::raw(format!("{}/{} ({}%)", stats.filled_days, stats.working_days, stats.progress)),
        ]),
        Line::from(vec![
            label("Heures: "),
            Span::raw(format!("{:.1}h / {:.1}h", stats.total_hours, stats.expected_hours)),
        ]),
        Line::from(vec![
            label("Heures sup.: "),
            Span::raw(format!("{:.1}h", stats.overtime_hours)),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Niveau: "),
            Span::styled(app.session.level().to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![label("XP: "), Span::raw(gamification.xp.to_string())]),
        Line::from(vec![
            label("Série: "),
            Span::raw(format!("{} jour(s)", gamification.streak)),
        ]),
        Line::from(""),
    ];

    if !timesheet.remarks.is_empty() {
        detail_text.push(Line::from(label("Remarques:")));
        detail_text.push(Line::from(timesheet.remarks.as_str()));
    }

    let detail_block = Paragraph::new(detail_text)
        .block(Block::default().title(" Résumé ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, area);
}

fn draw_input_line(f: &mut Frame, app: &App, area: Rect) {
    match app.input_mode {
        InputMode::Remarks => {
            let input = Paragraph::new(app.input.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title(" Remarques ").borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(input, area);

            let offset: usize = app
                .input
                .chars()
                .take(app.cursor_position)
                .map(|c| c.width().unwrap_or(0))
                .sum();
            f.set_cursor_position((area.x + 1 + offset as u16, area.y + 1));
        }
        InputMode::Normal => {
            let text = app.message.as_deref().unwrap_or("");
            let message = Paragraph::new(text)
                .style(Style::default().fg(Color::Cyan))
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(message, area);
        }
    }
}
