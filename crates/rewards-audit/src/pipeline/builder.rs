//! The audit driver.
//!
//! [`Audit`] loads the three datasets and runs every check in a fixed order,
//! collecting the sections into an [`AuditReport`].

use crate::config::AuditConfig;
use crate::dataset::Dataset;
use crate::error::{AuditError, Result};
use crate::loader::{JsonLoader, LoadNotes};
use crate::pipeline::progress::{
    AuditStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::quality::{
    CategoryCheck, DuplicateCheck, FormatCheck, MissingValueCheck, OutlierCheck, ReferenceCheck,
    ReferenceColumns, TypeSummaryCheck,
};
use crate::reporting::{AuditReport, COMPLETION_MESSAGE};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

const BRANDS: &str = "Brands";
const RECEIPTS: &str = "Receipts";
const USERS: &str = "Users";
const RECEIPT_ITEMS: &str = "Receipt Items";

/// A configured audit run.
///
/// Use [`Audit::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use rewards_audit::{Audit, AuditConfig};
///
/// let report = Audit::builder()
///     .config(AuditConfig::builder().data_dir("exports").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run()?;
///
/// println!("{report}");
/// ```
pub struct Audit {
    config: AuditConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Audit: Send);

impl Audit {
    /// Create a new audit builder.
    pub fn builder() -> AuditBuilder {
        AuditBuilder::default()
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Load the datasets and run every check.
    ///
    /// # Errors
    ///
    /// Fails when a dataset file cannot be read, or when a column the checks
    /// depend on is absent. Malformed JSON is not an error; it is reported.
    pub fn run(&self) -> Result<AuditReport> {
        match self.run_internal() {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete(COMPLETION_MESSAGE));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Audit failed: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage(&self, stage: AuditStage, message: &str) {
        info!("{}", message);
        self.report_progress(ProgressUpdate::new(stage, message));
    }

    fn load(&self, path: &Path, name: &str, notes: &mut Vec<LoadNotes>) -> Result<Dataset> {
        let outcome = JsonLoader::load(path, name)?;
        notes.push(outcome.notes(path.display().to_string()));
        Ok(outcome.dataset)
    }

    fn run_internal(&self) -> Result<AuditReport> {
        let start = Instant::now();
        let config = &self.config;

        self.stage(AuditStage::Loading, "Loading datasets...");
        let mut loads = Vec::with_capacity(3);
        let brands = self.load(&config.brands_path(), BRANDS, &mut loads)?;
        let mut receipts = self.load(&config.receipts_path(), RECEIPTS, &mut loads)?;
        let users = self.load(&config.users_path(), USERS, &mut loads)?;

        self.stage(AuditStage::MissingValues, "Checking for missing values...");
        let missing_values = [&brands, &receipts, &users]
            .into_iter()
            .map(MissingValueCheck::run)
            .collect::<Result<Vec<_>>>()?;

        self.stage(AuditStage::Duplicates, "Checking for duplicate records...");
        let duplicates = [&brands, &receipts, &users]
            .into_iter()
            .map(DuplicateCheck::run)
            .collect::<Result<Vec<_>>>()?;

        self.stage(AuditStage::DataTypes, "Summarizing data types...");
        let data_types = [&brands, &receipts, &users]
            .into_iter()
            .map(TypeSummaryCheck::run)
            .collect::<Result<Vec<_>>>()?;

        self.stage(AuditStage::References, "Checking foreign key references...");
        let reference_columns = ReferenceColumns {
            user_ids: config.user_id_columns.clone(),
            items: config.items_column.clone(),
            ..ReferenceColumns::default()
        };
        let references = ReferenceCheck::run(&receipts, &users, &brands, &reference_columns)?;

        let mut report = AuditReport::new(loads, references);
        report.missing_values = missing_values;
        report.duplicates = duplicates;
        report.data_types = data_types;

        self.stage(AuditStage::Outliers, "Detecting outliers...");
        let k = config.iqr_multiplier;
        report.outliers.push(OutlierCheck::run(
            &mut receipts,
            &config.receipt_numeric_columns,
            k,
        )?);
        let mut items = receipts.explode(&config.items_column, RECEIPT_ITEMS)?;
        report
            .outliers
            .push(OutlierCheck::run(&mut items, &config.item_numeric_columns, k)?);

        self.stage(AuditStage::Formats, "Checking value formats...");
        if users.has_column(&config.email_column) {
            report.formats.push(FormatCheck::run(
                &users,
                &config.email_column,
                &config.email_pattern,
                "email",
            )?);
        } else {
            info!(
                "{} has no '{}' column; skipping format check",
                USERS, config.email_column
            );
        }

        self.stage(AuditStage::Categories, "Listing categorical values...");
        report
            .categories
            .push(CategoryCheck::run(&users, &config.user_category_column)?);
        report
            .categories
            .push(CategoryCheck::run(&receipts, &config.receipt_category_column)?);

        info!(
            "Audit finished in {:.2}s ({} skipped lines)",
            start.elapsed().as_secs_f64(),
            report.skipped_lines()
        );
        Ok(report)
    }
}

/// Builder for [`Audit`].
#[derive(Default)]
pub struct AuditBuilder {
    config: Option<AuditConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl AuditBuilder {
    /// Set the audit configuration.
    pub fn config(mut self, config: AuditConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback using a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the audit.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Audit> {
        let config = self.config.unwrap_or_default();
        config.validate().map_err(AuditError::from)?;

        Ok(Audit {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
