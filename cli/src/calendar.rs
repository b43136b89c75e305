use chrono::{Datelike, NaiveDate, Weekday};
use luxas_core::calendar::{classify, DayKind};
use luxas_core::service::gamification_service::{level_of, xp_progress, xp_to_next_level};
use luxas_core::{
    DashboardDto, Document, FileStore, GamificationState, HistoryUseCase, LeaveLedger, Session, BADGES,
    LEVELS,
};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

use crate::short_id;

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Heures")]
    hours: String,
    #[tabled(rename = "Sup.")]
    overtime: String,
}

#[derive(Tabled)]
struct BadgeRow {
    #[tabled(rename = "")]
    state: &'static str,
    #[tabled(rename = "Badge")]
    name: String,
    #[tabled(rename = "Description")]
    description: &'static str,
    #[tabled(rename = "Rareté")]
    rarity: String,
    #[tabled(rename = "XP")]
    xp: u32,
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "")]
    current: &'static str,
    #[tabled(rename = "Niveau")]
    name: String,
    #[tabled(rename = "XP")]
    range: String,
}

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "")]
    flag: &'static str,
    #[tabled(rename = "Document")]
    name: String,
    #[tabled(rename = "Catégorie")]
    category: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Taille")]
    size: String,
}

#[derive(Tabled)]
struct LeaveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Du")]
    start: String,
    #[tabled(rename = "Au")]
    end: String,
    #[tabled(rename = "Jours")]
    days: u32,
    #[tabled(rename = "Statut")]
    status: String,
    #[tabled(rename = "Motif")]
    reason: String,
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

pub fn weekday_fr(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Lun",
        Weekday::Tue => "Mar",
        Weekday::Wed => "Mer",
        Weekday::Thu => "Jeu",
        Weekday::Fri => "Ven",
        Weekday::Sat => "Sam",
        Weekday::Sun => "Dim",
    }
}

pub fn show_status(session: &Session<FileStore>) {
    let dto = DashboardDto::from_session(session);

    match (&dto.user_name, dto.role) {
        (Some(name), Some(role)) => println!("\x1b[1;36m{}\x1b[0m ({:?})", name, role),
        _ => println!("\x1b[1;36mNot signed in\x1b[0m"),
    }
    println!();
    println!("Timesheet {} [{}]", dto.period, dto.status);
    println!(
        "  Jours remplis : {}/{} ({}%)",
        dto.stats.filled_days, dto.stats.working_days, dto.stats.progress
    );
    println!(
        "  Heures : {:.1}h / {:.1}h attendues, {:.1}h sup.",
        dto.stats.total_hours, dto.stats.expected_hours, dto.stats.overtime_hours
    );
    println!();
    println!("{}  {} XP ({}%)", dto.level, dto.xp, dto.xp_progress);
    if !dto.level.is_top() {
        println!("  {} XP avant le niveau suivant", dto.xp_to_next);
    }
    println!("  Série : {} jour(s)   Badges : {}/{}", dto.streak, dto.badges_unlocked, dto.badges_total);
    println!();
    println!(
        "Congés annuels : {:.0} restants ({:.0} pris, {:.0} en attente sur {:.0})",
        dto.leave.remaining, dto.leave.taken, dto.leave.pending, dto.leave.annual
    );
}

/// Prints the active month week by week.
pub fn show_calendar(session: &Session<FileStore>) {
    let timesheet = session.timesheet();
    let calendar = session.calendar();
    let weeks = HistoryUseCase::new(timesheet, calendar).get_weekly_history();

    println!("\x1b[1;36mTimesheet {}\x1b[0m [{}]", timesheet.period, timesheet.status);

    for week in weeks {
        println!(
            "\n\x1b[1mSemaine {}\x1b[0m ({:.1}h, {}/{} jours)",
            week.week, week.hours, week.filled_days, week.working_days
        );

        let rows: Vec<DayRow> = week
            .first_day
            .iter_days()
            .take_while(|d| *d <= week.last_day)
            .map(|day| {
                let entry = timesheet.entry(day);
                let kind = match classify(day, calendar) {
                    DayKind::Working => String::new(),
                    DayKind::Weekend => "Week-end".to_string(),
                    DayKind::Holiday(h) => format!("{} {}", h.emoji.as_deref().unwrap_or("🎌"), h.name),
                };
                DayRow {
                    date: format!("{} {}", weekday_fr(day), day.format("%d/%m")),
                    kind,
                    hours: entry.map(|e| format!("{:.1}", e.hours)).unwrap_or_else(|| "-".to_string()),
                    overtime: entry
                        .filter(|e| e.overtime > 0.0)
                        .map(|e| format!("{:.1}", e.overtime))
                        .unwrap_or_default(),
                }
            })
            .collect();
        print_table(rows);
    }

    let stats = session.stats();
    println!(
        "\nTotal : {:.1}h / {:.1}h ({}%)",
        stats.total_hours, stats.expected_hours, stats.progress
    );
    if !timesheet.remarks.is_empty() {
        println!("Remarques : {}", timesheet.remarks);
    }
}

pub fn show_badges(state: &GamificationState) {
    let rows: Vec<BadgeRow> = BADGES
        .iter()
        .map(|badge| BadgeRow {
            state: if state.has_badge(badge.id) { "✔" } else { "🔒" },
            name: format!("{} {}", badge.icon, badge.name),
            description: badge.description,
            rarity: badge.rarity.to_string(),
            xp: badge.xp_reward,
        })
        .collect();
    print_table(rows);
}

pub fn show_levels(xp: u32) {
    let current = level_of(xp);
    let rows: Vec<LevelRow> = LEVELS
        .iter()
        .map(|level| LevelRow {
            current: if level.rank == current.rank { ">>" } else { "" },
            name: format!("{} {}", level.icon, level.name),
            range: match level.max_xp {
                Some(max) => format!("{} - {}", level.min_xp, max),
                None => format!("{}+", level.min_xp),
            },
        })
        .collect();
    print_table(rows);
    println!("{} XP, {}% du niveau, {} XP restants", xp, xp_progress(xp), xp_to_next_level(xp));
}

pub fn show_documents(documents: &[&Document]) {
    if documents.is_empty() {
        println!("Aucun document.");
        return;
    }
    let rows: Vec<DocumentRow> = documents
        .iter()
        .map(|d| DocumentRow {
            flag: match (d.is_new, d.signed) {
                (true, _) => "🆕",
                (_, true) => "✍️",
                _ => "",
            },
            name: d.name.clone(),
            category: d.category.to_string(),
            date: d.date.format("%d/%m/%Y").to_string(),
            size: d.size.clone(),
        })
        .collect();
    print_table(rows);
}

pub fn show_leave(ledger: &LeaveLedger) {
    if ledger.requests.is_empty() {
        println!("No leave requests found.");
    } else {
        let rows: Vec<LeaveRow> = ledger
            .requests
            .iter()
            .map(|r| LeaveRow {
                id: short_id(r.id),
                kind: r.kind.label(),
                start: r.start.to_string(),
                end: r.end.to_string(),
                days: r.days,
                status: r.status.to_string(),
                reason: r.reason.clone(),
            })
            .collect();
        print_table(rows);
    }

    let balance = ledger.balance();
    println!(
        "Congés annuels : {:.0} restants sur {:.0} ({:.0} pris, {:.0} en attente)",
        balance.remaining, balance.annual, balance.taken, balance.pending
    );
}
