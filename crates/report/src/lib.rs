//! Windowed uptime reporting.
//!
//! This crate is the core of the service:
//! - `aggregate` turns one window of status records plus a boundary probe
//!   into ON/OFF classifications and total uptime hours
//! - `compute_report` runs the two store queries and the aggregation for
//!   an arbitrary window
//! - `ReportWorker` drives `compute_report` on a fixed interval and hands
//!   each result to a report sink, until cancelled

pub mod aggregate;
pub mod pipeline;
pub mod worker;

pub use aggregate::{aggregate, UptimeStats};
pub use pipeline::{compute_report, ReportError};
pub use worker::ReportWorker;
