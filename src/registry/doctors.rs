use crate::storage::models::Doctor;

/// Doctor directory lookup. Both terms are case-insensitive substrings.
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    pub specialty: Option<String>,
    pub city: Option<String>,
}

impl DoctorFilter {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        contains(&doctor.specialty, &self.specialty) && contains(&doctor.city, &self.city)
    }

    pub fn apply<'a>(&self, doctors: &'a [Doctor]) -> Vec<&'a Doctor> {
        doctors.iter().filter(|d| self.matches(d)).collect()
    }
}

fn contains(field: &str, term: &Option<String>) -> bool {
    match term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => field.to_lowercase().contains(&term.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(name: &str, specialty: &str, city: &str) -> Doctor {
        Doctor {
            doctor_id: String::new(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            phone: String::new(),
            email: String::new(),
            city: city.to_string(),
        }
    }

    fn directory() -> Vec<Doctor> {
        vec![
            doctor("Dr. Rao", "Hematology", "Pune"),
            doctor("Dr. Sen", "Cardiology", "Mumbai"),
            doctor("Dr. Pillai", "Pediatric Hematology", "Mumbai"),
        ]
    }

    #[test]
    fn test_empty_filter_lists_everyone() {
        let all = directory();
        assert_eq!(DoctorFilter::default().apply(&all).len(), 3);
    }

    #[test]
    fn test_specialty_and_city_combine() {
        let all = directory();
        let filter = DoctorFilter {
            specialty: Some("hematology".into()),
            city: Some("MUMBAI".into()),
        };
        let names: Vec<&str> = filter.apply(&all).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. Pillai"]);
    }
}
