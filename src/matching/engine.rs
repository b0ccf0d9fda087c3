use chrono::{DateTime, Utc};
use crate::{
    blood::{is_compatible, BloodGroup},
    matching::eligibility::EligibilityMatcher,
    storage::models::{Donor, EmergencyRequest, InventoryItem},
};
use tracing::debug;

/// Case-insensitive exact comparison of trimmed city names
pub fn is_city_match(donor_city: &str, requested_city: &str) -> bool {
    donor_city.trim().to_lowercase() == requested_city.trim().to_lowercase()
}

impl EligibilityMatcher {
    pub fn is_compatible(&self, donor_group: &str, requested_group: &str) -> bool {
        is_compatible(donor_group, requested_group)
    }

    pub fn is_city_match(&self, donor_city: &str, requested_city: &str) -> bool {
        is_city_match(donor_city, requested_city)
    }

    /// Donors that are blood-compatible, in the requested city and eligible
    /// as of `as_of`. Input order is preserved.
    pub fn find_matching_donors<'a>(
        &self,
        donors: &'a [Donor],
        requested_group: &str,
        requested_city: &str,
        as_of: DateTime<Utc>,
    ) -> Vec<&'a Donor> {
        let matches: Vec<&Donor> = donors
            .iter()
            .filter(|donor| {
                is_compatible(&donor.blood_group, requested_group)
                    && is_city_match(&donor.city, requested_city)
                    && self.is_eligible_to_donate(donor, as_of)
            })
            .collect();

        debug!(
            "{} of {} donors match {} in {}",
            matches.len(),
            donors.len(),
            requested_group,
            requested_city
        );

        matches
    }

    pub fn match_request<'a>(
        &self,
        donors: &'a [Donor],
        request: &EmergencyRequest,
        as_of: DateTime<Utc>,
    ) -> Vec<&'a Donor> {
        self.find_matching_donors(donors, &request.blood_group, &request.city, as_of)
    }
}

/// Case-insensitive substring search on the inventory location. An empty
/// query matches everything.
pub fn find_inventory_by_location<'a>(
    inventory: &'a [InventoryItem],
    location_query: &str,
) -> Vec<&'a InventoryItem> {
    let query = location_query.trim().to_lowercase();
    inventory
        .iter()
        .filter(|item| query.is_empty() || item.location.to_lowercase().contains(&query))
        .collect()
}

/// Location search narrowed to a preferred blood group, if any
pub fn find_blood_banks<'a>(
    inventory: &'a [InventoryItem],
    location_query: &str,
    preferred_group: Option<BloodGroup>,
) -> Vec<&'a InventoryItem> {
    find_inventory_by_location(inventory, location_query)
        .into_iter()
        .filter(|item| match preferred_group {
            Some(group) => item.blood_group == group.as_str(),
            None => true,
        })
        .collect()
}
