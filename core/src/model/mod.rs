pub mod document;
pub mod gamification;
pub mod holiday;
pub mod leave;
pub mod timesheet;
pub mod user;
