use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use crate::storage::models::Donor;
use tracing::debug;

/// Minimum whole days between two donations
pub const DEFAULT_MIN_DONATION_INTERVAL_DAYS: i64 = 90;

/// Decides whether donors may give blood again and which donors satisfy a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityMatcher {
    min_interval_days: i64,
}

impl Default for EligibilityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DONATION_INTERVAL_DAYS)
    }
}

impl EligibilityMatcher {
    pub fn new(min_interval_days: i64) -> Self {
        Self { min_interval_days }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.matching.min_donation_interval_days)
    }

    pub fn min_interval_days(&self) -> i64 {
        self.min_interval_days
    }

    /// Days since the last donation, counted from UTC midnight of that date
    /// and rounded up when part of a day remains. `None` when the donor has
    /// no usable last-donation date.
    pub fn days_since_last_donation(&self, donor: &Donor, as_of: DateTime<Utc>) -> Option<i64> {
        let last = donor.last_donation()?;
        Some(elapsed_days(last, as_of))
    }

    /// A donor with no usable last-donation date is treated as never having
    /// donated and is eligible.
    pub fn is_eligible_to_donate(&self, donor: &Donor, as_of: DateTime<Utc>) -> bool {
        match self.days_since_last_donation(donor, as_of) {
            Some(days) => {
                let eligible = days >= self.min_interval_days;
                debug!(
                    "Donor {} last donated {} days ago, eligible: {}",
                    donor.donor_id, days, eligible
                );
                eligible
            }
            None => {
                debug!(
                    "Donor {} has no usable last donation date ({:?}), treating as eligible",
                    donor.donor_id, donor.last_donation_date
                );
                true
            }
        }
    }

    /// First calendar date on which the donor becomes eligible again.
    /// `None` without a usable last-donation date or when the date would
    /// fall outside the calendar range.
    pub fn next_eligible_date(&self, donor: &Donor) -> Option<NaiveDate> {
        let last = donor.last_donation()?;
        let interval = Duration::try_days(self.min_interval_days)?;
        last.checked_add_signed(interval)
    }

    /// Human-readable explanation of the eligibility decision
    pub fn eligibility_reason(&self, donor: &Donor, as_of: DateTime<Utc>) -> String {
        match self.days_since_last_donation(donor, as_of) {
            None if donor.last_donation_date.trim().is_empty() => {
                "No previous donation on record (eligible)".to_string()
            }
            None => format!(
                "Unreadable last donation date '{}' (treated as eligible)",
                donor.last_donation_date
            ),
            Some(days) if days < 0 => {
                format!("Last donation date is {} days in the future (not eligible)", -days)
            }
            Some(days) if days >= self.min_interval_days => {
                format!("Last donated {} days ago (eligible)", days)
            }
            Some(days) => format!(
                "Last donated {} days ago, needs {} more days",
                days,
                self.min_interval_days.saturating_sub(days)
            ),
        }
    }
}

/// `ceil((as_of - midnight(last)) / 1 day)`
fn elapsed_days(last: NaiveDate, as_of: DateTime<Utc>) -> i64 {
    let last_midnight = last.and_time(NaiveTime::MIN).and_utc();
    let elapsed = as_of - last_midnight;

    // num_days truncates toward zero, which is already the ceiling for
    // negative spans.
    let days = elapsed.num_days();
    if elapsed > Duration::days(days) {
        days + 1
    } else {
        days
    }
}
