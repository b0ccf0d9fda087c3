pub mod blood;
pub mod matching;
pub mod registry;
pub mod storage;
pub mod config;
pub mod error;
pub mod utils;

pub use blood::{is_compatible, BloodGroup};
pub use config::Config;
pub use error::{DonorError, Result};
pub use matching::{find_inventory_by_location, is_city_match, EligibilityMatcher};
