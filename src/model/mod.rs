pub mod attendance;
pub mod permission;
pub mod report;
pub mod task;
