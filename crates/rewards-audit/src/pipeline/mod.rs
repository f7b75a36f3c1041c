//! Audit orchestration.
//!
//! This module provides the audit driver and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{Audit, AuditBuilder};
pub use progress::{AuditStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate};
