use crate::{blood::BloodGroup, storage::models::Donor};

/// Registry search over donors. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct DonorFilter {
    /// Matched against name or email (case-insensitive) or phone (verbatim)
    pub search: Option<String>,
    pub blood_group: Option<BloodGroup>,
    /// Case-insensitive substring of the donor's city
    pub city: Option<String>,
}

impl DonorFilter {
    pub fn matches(&self, donor: &Donor) -> bool {
        self.matches_search(donor) && self.matches_group(donor) && self.matches_city(donor)
    }

    pub fn apply<'a>(&self, donors: &'a [Donor]) -> Vec<&'a Donor> {
        donors.iter().filter(|d| self.matches(d)).collect()
    }

    fn matches_search(&self, donor: &Donor) -> bool {
        let Some(term) = non_empty(&self.search) else {
            return true;
        };
        let lowered = term.to_lowercase();
        donor.name.to_lowercase().contains(&lowered)
            || donor.phone.contains(term)
            || donor.email.to_lowercase().contains(&lowered)
    }

    fn matches_group(&self, donor: &Donor) -> bool {
        match self.blood_group {
            Some(group) => donor.blood_group == group.as_str(),
            None => true,
        }
    }

    fn matches_city(&self, donor: &Donor) -> bool {
        match non_empty(&self.city) {
            Some(city) => donor.city.to_lowercase().contains(&city.to_lowercase()),
            None => true,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
