//! Expiration summary shown above the normativas matrix

use serde::{Deserialize, Serialize};

use super::dates::Clock;
use super::status::ExpirationStatus;
use crate::models::Normativa;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationSummary {
    pub total: usize,
    pub expired: usize,
    pub critical: usize,
    pub upcoming: usize,
    pub current: usize,
    /// Critical records whose expiration day is today
    pub due_today: usize,
}

impl ExpirationSummary {
    pub fn from_records(records: &[Normativa], clock: &dyn Clock) -> Self {
        records.iter().fold(Self::default(), |mut summary, normativa| {
            summary.total += 1;
            let info = normativa.status_at(clock);
            if info.days_remaining == 0 {
                summary.due_today += 1;
            }
            match info.status {
                ExpirationStatus::Expired => summary.expired += 1,
                ExpirationStatus::Critical => summary.critical += 1,
                ExpirationStatus::Upcoming => summary.upcoming += 1,
                ExpirationStatus::Current => summary.current += 1,
            }
            summary
        })
    }

    /// Due in 1..=30 days; a record due today is not "soon"
    pub fn expiring_soon(&self) -> usize {
        self.critical + self.upcoming - self.due_today
    }

    pub fn count(&self, status: ExpirationStatus) -> usize {
        match status {
            ExpirationStatus::Expired => self.expired,
            ExpirationStatus::Critical => self.critical,
            ExpirationStatus::Upcoming => self.upcoming,
            ExpirationStatus::Current => self.current,
        }
    }
}
