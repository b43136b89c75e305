pub mod dto;
pub mod gamification_service;
pub mod leave_service;
pub mod timesheet_service;
