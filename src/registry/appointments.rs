use chrono::NaiveDate;
use serde::Serialize;
use crate::storage::models::{Appointment, AppointmentStatus};

/// Scheduled appointments split into today's and later ones
#[derive(Debug, Default, Serialize)]
pub struct Agenda<'a> {
    pub today: Vec<&'a Appointment>,
    pub upcoming: Vec<&'a Appointment>,
}

/// Dates are compared as `YYYY-MM-DD` strings
pub fn agenda(appointments: &[Appointment], today: NaiveDate) -> Agenda<'_> {
    let today = today.format("%Y-%m-%d").to_string();
    let mut agenda = Agenda::default();

    for apt in appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled)
    {
        if apt.date == today {
            agenda.today.push(apt);
        } else if apt.date > today {
            agenda.upcoming.push(apt);
        }
    }

    agenda
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(patient: &str, date: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            appointment_id: String::new(),
            patient_name: patient.to_string(),
            doctor_name: "Dr. Rao".to_string(),
            specialty: "Hematology".to_string(),
            date: date.to_string(),
            time: "10:00".to_string(),
            status,
            reason: "Pre-donation screening".to_string(),
            phone: String::new(),
        }
    }

    #[test]
    fn test_agenda_only_scheduled() {
        let appointments = vec![
            appointment("a", "2026-05-20", AppointmentStatus::Scheduled),
            appointment("b", "2026-05-20", AppointmentStatus::Cancelled),
            appointment("c", "2026-05-22", AppointmentStatus::Scheduled),
            appointment("d", "2026-05-22", AppointmentStatus::Completed),
            appointment("e", "2026-05-01", AppointmentStatus::Scheduled),
        ];
        let agenda = agenda(&appointments, NaiveDate::from_ymd_opt(2026, 5, 20).unwrap());

        assert_eq!(agenda.today.len(), 1);
        assert_eq!(agenda.today[0].patient_name, "a");
        assert_eq!(agenda.upcoming.len(), 1);
        assert_eq!(agenda.upcoming[0].patient_name, "c");
    }
}
