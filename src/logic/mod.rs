//! Display logic shared by the matrix views and the forms.
//!
//! Everything here is pure: no I/O, "now" is always injected.

pub mod dates;
pub mod status;
pub mod matrix;
pub mod progress;
pub mod summary;
pub mod validation;

pub use dates::{days_until, Clock, FixedClock, SystemClock};
pub use status::{ExpirationStatus, Priority, StatusInfo};
pub use matrix::{group_by_category, CategoryGroup, CategoryMatrix, Categorized, MatrixFilter};
pub use progress::{ComplianceProgress, ProgressLevel};
pub use summary::ExpirationSummary;
pub use validation::{FieldError, FormErrors};
