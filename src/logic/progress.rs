//! Compliance Progress Calculator

use serde::{Deserialize, Serialize};

use crate::constants::{PROGRESS_EXCELLENT, PROGRESS_GOOD, PROGRESS_WARNING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLevel {
    Excellent,
    Good,
    Warning,
    Danger,
}

impl ProgressLevel {
    /// Lower bounds are inclusive: exactly 90 is excellent, exactly 70 good
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= PROGRESS_EXCELLENT {
            Self::Excellent
        } else if percentage >= PROGRESS_GOOD {
            Self::Good
        } else if percentage >= PROGRESS_WARNING {
            Self::Warning
        } else {
            Self::Danger
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceProgress {
    pub percentage: u32,
    pub level: ProgressLevel,
}

impl ComplianceProgress {
    /// `round(implemented / total * 100)`; `total == 0` is 0% / danger.
    ///
    /// Not clamped: `implemented > total` yields more than 100.
    pub fn compute(implemented: u64, total: u64) -> Self {
        if total == 0 {
            return Self { percentage: 0, level: ProgressLevel::Danger };
        }
        let percentage = ((implemented as f64 / total as f64) * 100.0).round() as u32;
        Self {
            percentage,
            level: ProgressLevel::from_percentage(percentage),
        }
    }
}
