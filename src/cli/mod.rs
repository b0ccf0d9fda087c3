pub mod commands;

pub use commands::{
    AppointmentAction, CampAction, Cli, Commands, DoctorAction, DonorAction, RequestAction,
};
