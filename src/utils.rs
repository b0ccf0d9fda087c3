use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;
use crate::{
    error::{DonorError, Result},
    storage::models::{AppointmentStatus, RequestStatus},
};

/// `YYYY-MM-DD` as midnight UTC; `None` means now
pub fn parse_as_of(value: Option<&str>) -> Result<DateTime<Utc>> {
    match value {
        None => Ok(Utc::now()),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
            .map_err(|e| DonorError::InvalidDate(format!("{}: {}", raw, e))),
    }
}

/// Format timestamp in human-readable format
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_request_status(status: RequestStatus) -> String {
    match status {
        RequestStatus::Pending => status.to_string().red().bold().to_string(),
        RequestStatus::Fulfilled => status.to_string().green().to_string(),
        RequestStatus::Cancelled => status.to_string().dimmed().to_string(),
    }
}

pub fn format_appointment_status(status: AppointmentStatus) -> String {
    match status {
        AppointmentStatus::Scheduled => status.to_string().yellow().to_string(),
        AppointmentStatus::Completed => status.to_string().green().to_string(),
        AppointmentStatus::Cancelled => status.to_string().dimmed().to_string(),
    }
}

pub fn format_eligible(eligible: bool) -> String {
    if eligible {
        "Eligible".green().to_string()
    } else {
        "Waiting".yellow().to_string()
    }
}

/// Prompt user for yes/no confirmation
pub fn confirm_action(prompt: &str) -> Result<bool> {
    use std::io::{self, Write};

    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Print a table row with columns
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    let mut row = String::new();
    for (i, col) in columns.iter().enumerate() {
        if i < widths.len() {
            row.push_str(&format!("{:<width$}  ", col, width = widths[i]));
        }
    }
    println!("{}", row.trim_end());
}
