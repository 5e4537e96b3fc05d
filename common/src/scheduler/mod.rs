// Scheduler module for timer-driven workflow dispatch

pub mod engine;

pub use engine::DispatchScheduler;
