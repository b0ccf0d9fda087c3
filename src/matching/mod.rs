pub mod eligibility;
pub mod engine;

pub use eligibility::{EligibilityMatcher, DEFAULT_MIN_DONATION_INTERVAL_DAYS};
pub use engine::{find_blood_banks, find_inventory_by_location, is_city_match};
