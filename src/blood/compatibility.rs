use crate::blood::BloodGroup;

impl BloodGroup {
    /// Whether a donor of this group satisfies a request for `requested`.
    ///
    /// The rule set is the network's simplified one, not transfusion medicine:
    /// 1. same group
    /// 2. AB+ requests accept any donor
    /// 3. AB- requests accept any Rh-negative donor
    /// 4. O- donors satisfy any request
    pub fn can_donate_to(self, requested: BloodGroup) -> bool {
        self == requested
            || requested == BloodGroup::AbPositive
            || (requested == BloodGroup::AbNegative && self.is_rh_negative())
            || self == BloodGroup::ONegative
    }
}

/// String-level compatibility check. Unrecognized groups on either side never match.
pub fn is_compatible(donor_group: &str, requested_group: &str) -> bool {
    match (BloodGroup::parse(donor_group), BloodGroup::parse(requested_group)) {
        (Some(donor), Some(requested)) => donor.can_donate_to(requested),
        _ => false,
    }
}
