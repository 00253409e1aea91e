//! Status Classifier
//!
//! Maps days remaining to one of four expiration states.
//! Input: days remaining (see `dates::days_until`)
//! Output: ExpirationStatus

use serde::{Deserialize, Serialize};

use crate::constants::{CRITICAL_DAYS, UPCOMING_DAYS};

/// Expiration state of a normativa, from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpirationStatus {
    /// Past its expiration date
    #[serde(rename = "vencida")]
    Expired,
    /// Due within a week (today included)
    #[serde(rename = "critica")]
    Critical,
    /// Due within a month
    #[serde(rename = "proxima")]
    Upcoming,
    /// More than a month left
    #[serde(rename = "vigente")]
    Current,
}

impl ExpirationStatus {
    pub const ALL: [ExpirationStatus; 4] = [
        Self::Expired,
        Self::Critical,
        Self::Upcoming,
        Self::Current,
    ];

    /// `<0` expired, `0..=7` critical, `8..=30` upcoming, `>30` current
    pub fn classify(days_remaining: i64) -> Self {
        if days_remaining < 0 {
            Self::Expired
        } else if days_remaining <= CRITICAL_DAYS {
            Self::Critical
        } else if days_remaining <= UPCOMING_DAYS {
            Self::Upcoming
        } else {
            Self::Current
        }
    }

    /// Backend/UI label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "vencida",
            Self::Critical => "critica",
            Self::Upcoming => "proxima",
            Self::Current => "vigente",
        }
    }

    /// 3 = most severe
    pub fn severity_level(&self) -> u8 {
        match self {
            Self::Expired => 3,
            Self::Critical => 2,
            Self::Upcoming => 1,
            Self::Current => 0,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Self::Expired | Self::Critical => Priority::High,
            Self::Upcoming => Priority::Medium,
            Self::Current => Priority::Low,
        }
    }

    /// Readable text, e.g. "Vence en 5 días (CRÍTICO)"
    pub fn describe(&self, days_remaining: i64) -> String {
        match self {
            Self::Expired => format!("Vencida hace {} días", days_remaining.abs()),
            Self::Critical => format!("Vence en {} días (CRÍTICO)", days_remaining),
            Self::Upcoming => format!("Vence en {} días", days_remaining),
            Self::Current => format!("{} días restantes", days_remaining),
        }
    }
}

impl std::fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Review priority derived from the status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "alta",
            Self::Medium => "media",
            Self::Low => "baja",
        }
    }
}

/// Status plus the day count it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub status: ExpirationStatus,
    pub days_remaining: i64,
}

impl StatusInfo {
    pub fn from_days(days_remaining: i64) -> Self {
        Self {
            status: ExpirationStatus::classify(days_remaining),
            days_remaining,
        }
    }

    pub fn describe(&self) -> String {
        self.status.describe(self.days_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(ExpirationStatus::classify(-1), ExpirationStatus::Expired);
        assert_eq!(ExpirationStatus::classify(0), ExpirationStatus::Critical);
        assert_eq!(ExpirationStatus::classify(7), ExpirationStatus::Critical);
        assert_eq!(ExpirationStatus::classify(8), ExpirationStatus::Upcoming);
        assert_eq!(ExpirationStatus::classify(30), ExpirationStatus::Upcoming);
        assert_eq!(ExpirationStatus::classify(31), ExpirationStatus::Current);
        assert_eq!(ExpirationStatus::classify(i64::MIN), ExpirationStatus::Expired);
        assert_eq!(ExpirationStatus::classify(i64::MAX), ExpirationStatus::Current);
    }

    #[test]
    fn test_severity_never_increases_with_more_days() {
        let mut previous = ExpirationStatus::classify(-60).severity_level();
        for days in -59..=120 {
            let current = ExpirationStatus::classify(days).severity_level();
            assert!(current <= previous, "severity went up at {} days", days);
            previous = current;
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(ExpirationStatus::Expired.describe(-3), "Vencida hace 3 días");
        assert_eq!(ExpirationStatus::Critical.describe(5), "Vence en 5 días (CRÍTICO)");
        assert_eq!(ExpirationStatus::Upcoming.describe(12), "Vence en 12 días");
        assert_eq!(ExpirationStatus::Current.describe(90), "90 días restantes");
    }

    #[test]
    fn test_priority() {
        assert_eq!(ExpirationStatus::Expired.priority(), Priority::High);
        assert_eq!(ExpirationStatus::Critical.priority(), Priority::High);
        assert_eq!(ExpirationStatus::Upcoming.priority(), Priority::Medium);
        assert_eq!(ExpirationStatus::Current.priority().label(), "baja");
    }

    #[test]
    fn test_serializes_backend_labels() {
        let json = serde_json::to_string(&ExpirationStatus::Upcoming).unwrap();
        assert_eq!(json, "\"proxima\"");
    }
}
