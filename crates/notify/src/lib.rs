//! Report delivery for the uptime worker.
//!
//! This crate provides:
//! - `ReportSink` trait for pluggable report delivery
//! - SMTP email sink via lettre
//! - Minijinja rendering of the report email subject and body

pub mod email;
pub mod templating;
pub mod traits;

pub use email::EmailReportSink;
pub use traits::{DeliveryError, ReportSink};
