//! Rewards Data-Quality Audit
//!
//! A one-shot audit over three related JSON exports: brands, receipts and
//! users. Each file is loaded (as one JSON document, or line by line when
//! that fails), nested objects are flattened into dotted columns, and a
//! fixed series of checks runs over the result.
//!
//! # Checks
//!
//! - **Missing values**: null or absent cells per column
//! - **Duplicates**: rows equal to an earlier row
//! - **Data types**: observed kind and storage dtype per column
//! - **References**: receipts naming unknown users, line items naming unknown barcodes
//! - **Outliers**: Tukey fences over numeric receipt and line-item columns
//! - **Formats**: email addresses that do not match a pattern
//! - **Categories**: distinct values of categorical columns
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rewards_audit::{Audit, AuditConfig};
//!
//! let config = AuditConfig::builder().data_dir("exports").build()?;
//! let report = Audit::builder().config(config).build()?.run()?;
//!
//! println!("{report}");
//! ```
//!
//! # Individual checks
//!
//! Every check also works on its own over a [`Dataset`]:
//!
//! ```rust,ignore
//! use rewards_audit::{JsonLoader, MissingValueCheck};
//!
//! let users = JsonLoader::load("users.json".as_ref(), "Users")?.dataset;
//! println!("{}", MissingValueCheck::run(&users)?);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AuditConfig, AuditConfigBuilder, ConfigValidationError};
pub use dataset::Dataset;
pub use error::{AuditError, Result as AuditResult, ResultExt};
pub use loader::{JsonLoader, LoadNotes, LoadOutcome};
pub use pipeline::{
    Audit, AuditBuilder, AuditStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
pub use quality::{
    CategoryCheck, DuplicateCheck, FormatCheck, MissingValueCheck, OutlierCheck, ReferenceCheck,
    TypeSummaryCheck,
};
pub use reporting::AuditReport;
pub use types::{ColumnInfo, ColumnKind, LineError, Record};
