pub mod board;
pub mod calendar;
pub mod dashboard;
pub mod datetime;
pub mod drag;
pub mod due_date;
pub mod permissions;
pub mod records;
pub mod snapshot;
