use serde::Serialize;
use crate::{
    blood::BloodGroup,
    storage::models::{Camp, Donor, EmergencyRequest, InventoryItem, RequestStatus},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupUnits {
    pub blood_group: BloodGroup,
    pub units: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_donors: usize,
    pub total_camps: usize,
    pub total_units: u64,
    /// Pending emergency requests
    pub urgent_requests: usize,
    /// Canonical group order, zero-filled
    pub units_by_group: Vec<GroupUnits>,
}

impl DashboardStats {
    pub fn compute(
        donors: &[Donor],
        camps: &[Camp],
        inventory: &[InventoryItem],
        requests: &[EmergencyRequest],
    ) -> Self {
        let units_by_group = BloodGroup::ALL
            .iter()
            .map(|group| GroupUnits {
                blood_group: *group,
                units: inventory
                    .iter()
                    .filter(|item| item.blood_group == group.as_str())
                    .map(|item| item.units_available as u64)
                    .sum(),
            })
            .collect();

        Self {
            total_donors: donors.len(),
            total_camps: camps.len(),
            total_units: inventory.iter().map(|item| item.units_available as u64).sum(),
            urgent_requests: requests
                .iter()
                .filter(|r| r.status == RequestStatus::Pending)
                .count(),
            units_by_group,
        }
    }
}
