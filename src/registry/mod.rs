pub mod donors;
pub mod doctors;
pub mod camps;
pub mod appointments;
pub mod dashboard;

pub use donors::DonorFilter;
pub use doctors::DoctorFilter;
pub use camps::{camp_status, partition_camps, CampSchedule, CampStatus};
pub use appointments::{agenda, Agenda};
pub use dashboard::{DashboardStats, GroupUnits};
