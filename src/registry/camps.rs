use chrono::NaiveDate;
use serde::Serialize;
use crate::storage::models::{parse_calendar_date, Camp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CampStatus {
    Upcoming,
    Today,
    Completed,
}

impl std::fmt::Display for CampStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampStatus::Upcoming => write!(f, "upcoming"),
            CampStatus::Today => write!(f, "today"),
            CampStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Compares calendar dates only. A camp whose date cannot be read counts as completed.
pub fn camp_status(camp: &Camp, today: NaiveDate) -> CampStatus {
    match parse_calendar_date(&camp.date) {
        Some(date) if date > today => CampStatus::Upcoming,
        Some(date) if date == today => CampStatus::Today,
        _ => CampStatus::Completed,
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CampSchedule<'a> {
    pub upcoming: Vec<&'a Camp>,
    pub today: Vec<&'a Camp>,
    pub completed: Vec<&'a Camp>,
}

pub fn partition_camps(camps: &[Camp], today: NaiveDate) -> CampSchedule<'_> {
    let mut schedule = CampSchedule::default();
    for camp in camps {
        match camp_status(camp, today) {
            CampStatus::Upcoming => schedule.upcoming.push(camp),
            CampStatus::Today => schedule.today.push(camp),
            CampStatus::Completed => schedule.completed.push(camp),
        }
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camp(title: &str, date: &str) -> Camp {
        Camp {
            camp_id: String::new(),
            title: title.to_string(),
            venue: "Community Hall".to_string(),
            city: "Pune".to_string(),
            date: date.to_string(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            organizer: "Rotary".to_string(),
            capacity: 100,
            registered: 0,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
    }

    #[test]
    fn test_camp_status() {
        assert_eq!(camp_status(&camp("a", "2026-05-21"), today()), CampStatus::Upcoming);
        assert_eq!(camp_status(&camp("b", "2026-05-20"), today()), CampStatus::Today);
        assert_eq!(camp_status(&camp("c", "2026-05-19"), today()), CampStatus::Completed);
        assert_eq!(camp_status(&camp("d", "TBD"), today()), CampStatus::Completed);
    }

    #[test]
    fn test_partition_preserves_order() {
        let camps = vec![
            camp("later", "2026-06-01"),
            camp("past", "2026-01-01"),
            camp("sooner", "2026-05-25"),
            camp("now", "2026-05-20"),
        ];
        let schedule = partition_camps(&camps, today());

        let upcoming: Vec<&str> = schedule.upcoming.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(upcoming, vec!["later", "sooner"]);
        assert_eq!(schedule.today.len(), 1);
        assert_eq!(schedule.completed.len(), 1);
    }
}
