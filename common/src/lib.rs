// Common library for shared code across the dispatcher binary and tests

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod models;
pub mod schedule;
pub mod scheduler;
pub mod telemetry;
