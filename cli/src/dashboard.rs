use std::{io, time::Duration};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph},
};
use luxas_core::{DashboardDto, HistoryUseCase, KeyValueStore, Session, TimesheetStatus, WeekSummary};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    hours: Color,
    overtime: Color,
    xp: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    hours: Color::Green,
    overtime: Color::Red,
    xp: Color::Magenta,
};

pub struct DashboardApp {
    pub dto: DashboardDto,
    pub weeks: Vec<WeekSummary>,
}

impl DashboardApp {
    pub fn from_session<S: KeyValueStore>(session: &Session<S>) -> Self {
        Self {
            dto: DashboardDto::from_session(session),
            weeks: HistoryUseCase::new(session.timesheet(), session.calendar()).get_weekly_history(),
        }
    }
}

pub fn run<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::from_session(session);

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let period = session.timesheet().period;
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => session.switch_period(period.previous()),
                        KeyCode::Right | KeyCode::Char('l') => session.switch_period(period.next()),
                        _ => continue,
                    }
                    app = DashboardApp::from_session(session);
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let dto = &app.dto;
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + sidebar
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    // --- Header ---
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Min(1),
            Constraint::Length(30),
        ])
        .split(main_layout[0]);

    let user = dto.user_name.clone().unwrap_or_else(|| "Invité".to_string());
    let app_title = Paragraph::new(Line::from(vec![
        Span::styled("LUX-AS ", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)),
        Span::styled(user, Style::default().fg(THEME.text)),
    ]))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let nav = Paragraph::new(Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(
            format!(" {} [{}] ", dto.period, dto.status),
            Style::default().fg(status_color(dto.status)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" > ", Style::default().fg(THEME.text)),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    // --- Content ---
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Length(1),
            Constraint::Percentage(40),
        ])
        .split(main_layout[1]);

    draw_chart(frame, &app.weeks, content_chunks[0]);
    draw_side_panel(frame, dto, content_chunks[2]);

    let help = Line::from(vec![
        Span::styled("MOIS: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

fn status_color(status: TimesheetStatus) -> Color {
    match status {
        TimesheetStatus::Draft => Color::Yellow,
        TimesheetStatus::Submitted => Color::Blue,
        TimesheetStatus::Approved => Color::Green,
        TimesheetStatus::Rejected => Color::Red,
    }
}

fn draw_chart(frame: &mut Frame, weeks: &[WeekSummary], area: Rect) {
    let mut bar_data = Vec::new();

    // Values are tenths of an hour.
    for week in weeks {
        bar_data.push((week.label(), (week.hours * 10.0) as u64, THEME.hours));
        bar_data.push((String::new(), (week.overtime * 10.0) as u64, THEME.overtime));
        bar_data.push((String::new(), 0, Color::Reset));
    }

    let bar_items: Vec<Bar> = bar_data
        .iter()
        .map(|(label, value, color)| {
            Bar::default()
                .label(label.as_str())
                .value(*value)
                .style(Style::default().fg(*color))
                .text_value(if *value > 0 { format!("{:.0}", *value as f64 / 10.0) } else { String::new() })
        })
        .collect();

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" Heures par semaine ");

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(4)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bar_items))
        .max(500);

    frame.render_widget(chart, area);
}

fn draw_side_panel(frame: &mut Frame, dto: &DashboardDto, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Summary
            Constraint::Length(3), // Timesheet progress
            Constraint::Length(3), // XP
            Constraint::Length(3), // Leave
            Constraint::Min(0),
        ])
        .split(area);

    let stats = &dto.stats;
    let summary = vec![
        Line::from(vec![
            Span::styled("Niveau:   ", Style::default().fg(THEME.muted)),
            Span::styled(dto.level.to_string(), Style::default().fg(THEME.xp).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Série:    ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{} jour(s)", dto.streak), Style::default().fg(THEME.text)),
        ]),
        Line::from(vec![
            Span::styled("Badges:   ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{}/{}", dto.badges_unlocked, dto.badges_total), Style::default().fg(THEME.text)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Heures:   ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{:.1}h / {:.1}h", stats.total_hours, stats.expected_hours),
                Style::default().fg(THEME.hours).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Sup.:     ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{:.1}h", stats.overtime_hours), Style::default().fg(THEME.overtime)),
        ]),
    ];
    let summary_block = Paragraph::new(summary).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Résumé "),
    );
    frame.render_widget(summary_block, chunks[0]);

    let progress = Gauge::default()
        .block(gauge_block(" Timesheet "))
        .gauge_style(Style::default().fg(if stats.is_complete() { THEME.hours } else { Color::Yellow }))
        .percent(stats.progress.min(100) as u16)
        .label(format!("{}/{} jours", stats.filled_days, stats.working_days));
    frame.render_widget(progress, chunks[1]);

    let xp_label = if dto.level.is_top() {
        format!("{} XP", dto.xp)
    } else {
        format!("{} XP, encore {}", dto.xp, dto.xp_to_next)
    };
    let xp = Gauge::default()
        .block(gauge_block(" Expérience "))
        .gauge_style(Style::default().fg(THEME.xp))
        .percent(dto.xp_progress.min(100) as u16)
        .label(xp_label);
    frame.render_widget(xp, chunks[2]);

    let leave = &dto.leave;
    let used = if leave.annual > 0.0 {
        ((leave.annual - leave.remaining) / leave.annual).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let leave_gauge = Gauge::default()
        .block(gauge_block(" Congés annuels "))
        .gauge_style(Style::default().fg(THEME.primary))
        .ratio(used)
        .label(format!("{:.0} restants / {:.0}", leave.remaining, leave.annual));
    frame.render_widget(leave_gauge, chunks[3]);
}

fn gauge_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
}
