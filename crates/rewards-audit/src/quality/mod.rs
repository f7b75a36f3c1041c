//! Data-quality checks.
//!
//! Each check reads one or more [`Dataset`](crate::dataset::Dataset)s and
//! returns a report value that renders as text through `Display` and as
//! JSON through `Serialize`. Bad data is what the checks measure, so it
//! never produces an error; only a missing column or an unusable pattern does.

mod categories;
mod dtypes;
mod duplicates;
mod formats;
mod missing;
mod outliers;
mod references;

pub use categories::{CategoryCheck, CategoryReport, MISSING_SENTINEL};
pub use dtypes::{ColumnType, TypeSummaryCheck, TypeSummaryReport};
pub use duplicates::{DuplicateCheck, DuplicateReport};
pub use formats::{FormatCheck, FormatReport};
pub use missing::{ColumnCount, MissingValueCheck, MissingValueReport};
pub use outliers::{ColumnOutliers, OutlierCheck, OutlierOutcome, OutlierReport, TukeyFences};
pub use references::{ReferenceCheck, ReferenceColumns, ReferenceReport};
