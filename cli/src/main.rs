mod calendar;
mod dashboard;
mod tui;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use luxas_core::{
    default_data_dir, demo_documents, demo_users, expand_key, filter_documents, find_demo_user,
    parse_args, parse_day, parse_leave_kind, parse_period, DayEntry, DocumentCategory, Event,
    FileStore, LeaveLedger, PortalConfig, Role, Session, CONFIG_FILE_NAME,
};

#[derive(Parser)]
#[command(name = "luxas")]
#[command(about = "Timesheets, leave and achievements for LUX-AS consultants", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Data directory (defaults to ~/.luxas)
    #[arg(long, global = true, env = "LUXAS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Month to work on: YYYY-MM, current, prev or next
    #[arg(short, long, global = true, default_value = "current")]
    month: String,

    /// Log level
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Write a default config.toml to the data directory
    Init {
        /// Overwrite an existing config.toml
        #[arg(long)]
        force: bool,
    },
    /// Sign in with a demo account (paul@lux-as.com, korian@lux-as.com)
    Login {
        #[arg(long)]
        email: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Swap to the demo account of the other role
    SwitchRole,
    /// Timesheet progress, level and leave balance
    Status,
    /// Month calendar with holidays and entries
    Calendar,
    /// Record hours for a day (usage: fill 14 --hours 7.5 --overtime 1)
    Fill {
        /// YYYY-MM-DD, today, yesterday or a day of the month
        day: String,
        #[arg(long, default_value_t = 8.0)]
        hours: f64,
        #[arg(long, default_value_t = 0.0)]
        overtime: f64,
    },
    /// Remove the entry of a day
    Clear { day: String },
    /// Set the remarks of the month
    Remarks {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Save the draft
    Save,
    /// Submit the month for approval
    Submit,
    /// Approve the submitted month (manager)
    Approve,
    /// Reject the submitted month (manager)
    Reject,
    /// Badge catalog and unlocked badges
    Badges,
    /// Level curve
    Levels,
    /// Payslips, contracts and mission orders
    Documents {
        /// payslips, contracts or missions
        category: Option<String>,
        /// Only names containing this text
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Leave requests
    Leave {
        #[command(subcommand)]
        action: LeaveCommand,
    },
    /// Open the calendar editor
    Tui,
    /// Open the dashboard
    Dashboard,
}

#[derive(clap::Subcommand)]
enum LeaveCommand {
    /// File a request (usage: leave request Vacances ski kind:annual from:2025-02-10 to:2025-02-14)
    Request {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List requests and the annual balance
    List,
    /// Cancel a pending request
    Cancel { id: String },
    /// Approve a pending request (manager)
    Approve { id: String },
    /// Reject a pending request (manager)
    Reject { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let today = Local::now().date_naive();
    if let Some(Commands::Init { force }) = cli.command {
        return init_config(&data_dir(&cli)?, force);
    }
    let mut session = open_session(&cli, today)?;

    match cli.command {
        Some(Commands::Init { .. }) => {}
        Some(Commands::Login { email }) => {
            let profile = find_demo_user(&email).ok_or_else(|| {
                let known: Vec<String> = demo_users().into_iter().map(|u| u.email).collect();
                anyhow!("Unknown account: {}. Demo accounts: {}", email, known.join(", "))
            })?;
            let events = session.login(profile, today);
            if let Some(user) = session.user() {
                println!("Bienvenue, {} ({})", user.full_name, user.title);
            }
            println!("Série de connexion : {} jour(s)", session.gamification().streak);
            print_events(&events);
        }
        Some(Commands::Logout) => {
            session.logout();
            println!("Déconnecté.");
        }
        Some(Commands::Whoami) => match session.user() {
            Some(user) => {
                println!("{} <{}>", user.full_name, user.email);
                println!("  Rôle: {:?}", user.role);
                println!("  Poste: {}", user.title);
                if let Some(dep) = &user.department {
                    println!("  Département: {}", dep);
                }
            }
            None => println!("Not signed in. Use `luxas login --email <email>`."),
        },
        Some(Commands::SwitchRole) => {
            let user = session
                .switch_role()
                .ok_or_else(|| anyhow!("Not signed in"))?;
            println!("Compte actif : {} ({:?})", user.full_name, user.role);
        }
        Some(Commands::Status) => calendar::show_status(&session),
        Some(Commands::Calendar) => calendar::show_calendar(&session),
        Some(Commands::Fill { day, hours, overtime }) => {
            require_user(&session)?;
            let date = parse_day(&day, session.timesheet().period, today)?;
            let events = session.record_entry(date, DayEntry::new(hours, overtime))?;
            println!("{}: {:.1}h (+{:.1}h sup.)", date, hours, overtime);
            println!("Progression : {}%", session.stats().progress);
            print_events(&events);
        }
        Some(Commands::Clear { day }) => {
            require_user(&session)?;
            let date = parse_day(&day, session.timesheet().period, today)?;
            session.clear_entry(date)?;
            println!("{}: entrée supprimée", date);
        }
        Some(Commands::Remarks { text }) => {
            require_user(&session)?;
            session.set_remarks(&text.join(" "))?;
            println!("Remarques enregistrées.");
        }
        Some(Commands::Save) => {
            require_user(&session)?;
            session.save();
            println!("Brouillon {} enregistré.", session.timesheet().period);
        }
        Some(Commands::Submit) => {
            require_user(&session)?;
            let events = session.submit()?;
            println!("Timesheet {} soumis pour approbation.", session.timesheet().period);
            print_events(&events);
        }
        Some(Commands::Approve) => {
            require_manager(&session)?;
            session.approve()?;
            println!("Timesheet {} approuvé.", session.timesheet().period);
        }
        Some(Commands::Reject) => {
            require_manager(&session)?;
            session.reject()?;
            println!("Timesheet {} rejeté.", session.timesheet().period);
        }
        Some(Commands::Badges) => calendar::show_badges(session.gamification()),
        Some(Commands::Levels) => calendar::show_levels(session.gamification().xp),
        Some(Commands::Documents { category, search }) => {
            require_user(&session)?;
            let category = category
                .map(|id| {
                    DocumentCategory::from_id(&id).ok_or_else(|| anyhow!("Unknown document category: {}", id))
                })
                .transpose()?;
            let documents = demo_documents();
            calendar::show_documents(&filter_documents(&documents, category, &search));
        }
        Some(Commands::Leave { action }) => run_leave(&mut session, action, today)?,
        Some(Commands::Tui) | None => {
            tui::run(session)?;
        }
        Some(Commands::Dashboard) => {
            dashboard::run(&mut session)?;
        }
    }
    Ok(())
}

fn data_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_data_dir(),
    }
}

fn init_config(data_dir: &Path, force: bool) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!("{} already exists. Use --force to overwrite it.", path.display());
    }
    PortalConfig::default().save(data_dir)?;
    println!("Configuration écrite dans {}", path.display());
    Ok(())
}

fn open_session(cli: &Cli, today: NaiveDate) -> Result<Session<FileStore>> {
    let data_dir = data_dir(cli)?;
    let config = PortalConfig::load(&data_dir)?;
    let calendar = config.holiday_calendar()?;
    if calendar.is_empty() {
        warn!(jurisdiction = %calendar.jurisdiction, "Holiday calendar is empty, every weekday counts as working");
    }
    let period = parse_period(&cli.month, today)?;
    let store = FileStore::new(data_dir)?;
    info!(dir = %store.base_dir().display(), %period, "Opening session");
    Ok(Session::open(store, calendar, &config, period))
}

fn run_leave(session: &mut Session<FileStore>, action: LeaveCommand, today: NaiveDate) -> Result<()> {
    match action {
        LeaveCommand::Request { args } => {
            require_user(session)?;
            let parsed = parse_args(&args);
            let known_keys = ["kind", "from", "to"];

            let mut kind = None;
            let mut start = None;
            let mut end = None;
            for (key, value) in parsed.options {
                match expand_key(&key, &known_keys)?.as_str() {
                    "kind" => kind = Some(parse_leave_kind(&value)?),
                    "from" => start = Some(parse_day(&value, session.timesheet().period, today)?),
                    "to" => end = Some(parse_day(&value, session.timesheet().period, today)?),
                    _ => {}
                }
            }
            let start = start.ok_or_else(|| anyhow!("Missing from:<date>"))?;
            let end = end.unwrap_or(start);
            let kind = kind.unwrap_or(luxas_core::LeaveKind::Annual);

            let (id, events) = session.request_leave(kind, start, end, &parsed.text)?;
            if let Some(request) = session.leave().find(id) {
                println!(
                    "Demande {} : {} du {} au {} ({} jour(s))",
                    short_id(id),
                    kind.label(),
                    start,
                    end,
                    request.days
                );
            }
            print_events(&events);
        }
        LeaveCommand::List => calendar::show_leave(session.leave()),
        LeaveCommand::Cancel { id } => {
            let id = resolve_leave_id(session.leave(), &id)?;
            session.cancel_leave(id)?;
            println!("Demande {} annulée.", short_id(id));
        }
        LeaveCommand::Approve { id } => {
            require_manager(session)?;
            let id = resolve_leave_id(session.leave(), &id)?;
            session.approve_leave(id)?;
            println!("Demande {} approuvée.", short_id(id));
        }
        LeaveCommand::Reject { id } => {
            require_manager(session)?;
            let id = resolve_leave_id(session.leave(), &id)?;
            session.reject_leave(id)?;
            println!("Demande {} refusée.", short_id(id));
        }
    }
    Ok(())
}

fn require_user(session: &Session<FileStore>) -> Result<()> {
    if session.user().is_none() {
        bail!("Not signed in. Use `luxas login --email <email>`.");
    }
    Ok(())
}

fn require_manager(session: &Session<FileStore>) -> Result<()> {
    match session.user() {
        Some(user) if user.role == Role::Manager => Ok(()),
        Some(_) => bail!("Only managers can review. Use `luxas switch-role`."),
        None => bail!("Not signed in. Use `luxas login --email <email>`."),
    }
}

/// Accepts a full id or an unambiguous prefix, as printed by `leave list`.
fn resolve_leave_id(ledger: &LeaveLedger, input: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }
    let matches: Vec<Uuid> = ledger
        .requests
        .iter()
        .map(|r| r.id)
        .filter(|id| id.to_string().starts_with(input))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No leave request matches '{}'", input),
        _ => bail!("Ambiguous leave id '{}'", input),
    }
}

pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn print_events(events: &[Event]) {
    for event in events {
        println!("  ✨ {}", event);
    }
}
