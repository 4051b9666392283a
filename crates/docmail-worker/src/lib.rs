//! Background mail delivery for DocMail.
//!
//! This crate provides:
//! - The [`JobQueue`](queue::JobQueue) / [`JobSource`](queue::JobSource)
//!   seams with an in-process channel and a PostgreSQL implementation
//! - A task registry dispatching jobs to handlers by task name
//! - A worker runner that pulls jobs and executes each exactly once
//! - The mail dispatch task, registered once per target kind

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;

pub use executor::{JobExecutionError, TaskHandler, TaskRegistry};
pub use runner::{DrainReport, WorkerRunner};
