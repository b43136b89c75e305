pub mod calendar;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{default_data_dir, PortalConfig, Rewards, CONFIG_FILE_NAME};
pub use error::{LeaveError, StoreError, TimesheetError};
pub use input::{expand_key, parse_args, parse_leave_kind, ParsedInput};
pub use model::document::{demo_documents, filter_documents, Document, DocumentCategory};
pub use model::gamification::{Badge, Event, GamificationState, Level, BADGES, LEVELS};
pub use model::holiday::{Holiday, HolidayCalendar};
pub use model::leave::{LeaveBalance, LeaveKind, LeaveLedger, LeaveRequest, LeaveStatus};
pub use model::timesheet::{DayEntry, Period, Timesheet, TimesheetStats, TimesheetStatus};
pub use model::user::{demo_users, find_demo_user, Role, UserProfile};
pub use repository::{FileStore, KeyValueStore, MemoryStore};
pub use service::dto::{DashboardDto, WeekSummary};
pub use time::{parse_day, parse_period};
pub use usecase::history::HistoryUseCase;
pub use usecase::session::Session;
