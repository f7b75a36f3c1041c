//! Progress reporting for an audit run.
//!
//! # Example
//!
//! ```rust,ignore
//! use rewards_audit::Audit;
//!
//! let report = Audit::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of an audit run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStage {
    /// Reading and flattening the dataset files
    Loading,
    MissingValues,
    Duplicates,
    DataTypes,
    References,
    Outliers,
    Formats,
    Categories,
    /// Run finished successfully
    Complete,
    /// Run aborted with an error
    Failed,
}

impl AuditStage {
    /// Stages that do work, in order.
    pub const SEQUENCE: [AuditStage; 8] = [
        Self::Loading,
        Self::MissingValues,
        Self::Duplicates,
        Self::DataTypes,
        Self::References,
        Self::Outliers,
        Self::Formats,
        Self::Categories,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Datasets",
            Self::MissingValues => "Missing Values",
            Self::Duplicates => "Duplicates",
            Self::DataTypes => "Data Types",
            Self::References => "Foreign Keys",
            Self::Outliers => "Outliers",
            Self::Formats => "Formats",
            Self::Categories => "Categories",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Fraction of the run completed when this stage starts.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            stage => {
                let index = Self::SEQUENCE
                    .iter()
                    .position(|s| s == stage)
                    .unwrap_or_default();
                index as f32 / Self::SEQUENCE.len() as f32
            }
        }
    }
}

/// A progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AuditStage,
    /// Overall progress (0.0 - 1.0)
    pub progress: f32,
    pub message: String,
}

impl ProgressUpdate {
    /// Update marking the start of `stage`.
    pub fn new(stage: AuditStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: stage.base_progress().clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(AuditStage::Complete, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(AuditStage::Failed, message)
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

/// Receives progress updates from an audit run.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
