pub mod breaks;
pub mod clock;
pub mod monthly_report;
pub mod state_machine;
pub mod time_parser;
pub mod working_time;
