pub mod db;
pub mod models;

pub use db::Database;
pub use models::{
    Appointment, AppointmentStatus, Camp, Doctor, Donor, EmergencyRequest, InventoryItem,
    Lifecycle, Record, RequestStatus, Resource,
};
