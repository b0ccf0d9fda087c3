use serde::{de::DeserializeOwned, Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::{
    blood::BloodGroup,
    error::{DonorError, Result},
};

/// Named resources of the donor network, each backed by one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Donors,
    Camps,
    Inventory,
    EmergencyRequests,
    Appointments,
    Doctors,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Donors,
        Resource::Camps,
        Resource::Inventory,
        Resource::EmergencyRequests,
        Resource::Appointments,
        Resource::Doctors,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Resource::Donors => "donors",
            Resource::Camps => "camps",
            Resource::Inventory => "blood_inventory",
            Resource::EmergencyRequests => "emergency_requests",
            Resource::Appointments => "appointments",
            Resource::Doctors => "doctors",
        }
    }

    /// Prefix of sequential ids (`D001`, `C001`, ...)
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Resource::Donors => "D",
            Resource::Camps => "C",
            Resource::Inventory => "I",
            Resource::EmergencyRequests => "R",
            Resource::Appointments => "A",
            Resource::Doctors => "T",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Donors => "donors",
            Resource::Camps => "camps",
            Resource::Inventory => "inventory",
            Resource::EmergencyRequests => "emergency-requests",
            Resource::Appointments => "appointments",
            Resource::Doctors => "doctors",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Resource {
    type Err = DonorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "donors" => Ok(Resource::Donors),
            "camps" => Ok(Resource::Camps),
            "inventory" => Ok(Resource::Inventory),
            "emergency-requests" => Ok(Resource::EmergencyRequests),
            "appointments" => Ok(Resource::Appointments),
            "doctors" => Ok(Resource::Doctors),
            _ => Err(DonorError::NotFound(format!("resource '{}'", s))),
        }
    }
}

/// A record persisted under one [`Resource`]
pub trait Record: Serialize + DeserializeOwned {
    const RESOURCE: Resource;

    fn id(&self) -> &str;

    fn assign_id(&mut self, id: String);

    /// Status column value, for resources that have a lifecycle
    fn status_label(&self) -> Option<String> {
        None
    }

    /// Reset server-owned fields before first insert
    fn prepare_for_create(&mut self) {}

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Records whose status moves once from an initial state to a terminal one
pub trait Lifecycle: Record {
    type Status: Copy + PartialEq + std::fmt::Display + std::fmt::Debug;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    fn can_transition(from: Self::Status, to: Self::Status) -> bool;

    fn transition(&mut self, to: Self::Status) -> Result<()> {
        let from = self.status();
        if !Self::can_transition(from, to) {
            return Err(DonorError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.set_status(to);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Donor {
    #[serde(default)]
    pub donor_id: String,
    pub name: String,
    pub blood_group: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub city: String,
    /// Kept as received; may be empty or unparsable
    #[serde(default)]
    pub last_donation_date: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: u32,
}

impl Donor {
    pub fn blood_group(&self) -> Option<BloodGroup> {
        BloodGroup::parse(&self.blood_group)
    }

    /// Calendar date of the last donation, if the stored value is usable.
    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its UTC date).
    pub fn last_donation(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.last_donation_date)
    }
}

impl Record for Donor {
    const RESOURCE: Resource = Resource::Donors;

    fn id(&self) -> &str {
        &self.donor_id
    }

    fn assign_id(&mut self, id: String) {
        self.donor_id = id;
    }

    fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("city", &self.city)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Camp {
    #[serde(default)]
    pub camp_id: String,
    pub title: String,
    pub venue: String,
    pub city: String,
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub registered: u32,
}

impl Record for Camp {
    const RESOURCE: Resource = Resource::Camps;

    fn id(&self) -> &str {
        &self.camp_id
    }

    fn assign_id(&mut self, id: String) {
        self.camp_id = id;
    }

    fn prepare_for_create(&mut self) {
        self.registered = 0;
    }

    fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        require_date("date", &self.date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    #[serde(default)]
    pub inventory_id: String,
    pub blood_group: String,
    pub units_available: u32,
    /// Free text, used as a proxy for the city
    pub location: String,
    #[serde(default)]
    pub camp_id: Option<String>,
    #[serde(default)]
    pub expiry_date: String,
}

impl Record for InventoryItem {
    const RESOURCE: Resource = Resource::Inventory;

    fn id(&self) -> &str {
        &self.inventory_id
    }

    fn assign_id(&mut self, id: String) {
        self.inventory_id = id;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Fulfilled => write!(f, "fulfilled"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = DonorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "fulfilled" => Ok(RequestStatus::Fulfilled),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(DonorError::InvalidStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyRequest {
    #[serde(default)]
    pub request_id: String,
    pub hospital_name: String,
    /// The group needed
    pub blood_group: String,
    pub units_needed: u32,
    pub city: String,
    #[serde(default = "pending")]
    pub status: RequestStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

fn pending() -> RequestStatus {
    RequestStatus::Pending
}

impl EmergencyRequest {
    pub fn new(hospital_name: &str, blood_group: BloodGroup, units_needed: u32, city: &str) -> Self {
        Self {
            request_id: String::new(),
            hospital_name: hospital_name.to_string(),
            blood_group: blood_group.to_string(),
            units_needed,
            city: city.to_string(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            contact_phone: None,
            contact_email: None,
        }
    }

    pub fn with_contact(mut self, phone: Option<String>, email: Option<String>) -> Self {
        self.contact_phone = phone.filter(|p| !p.trim().is_empty());
        self.contact_email = email.filter(|e| !e.trim().is_empty());
        self
    }

    /// Whole minutes since the request was raised
    pub fn minutes_open(&self, as_of: DateTime<Utc>) -> i64 {
        (as_of - self.created_at).num_minutes()
    }
}

impl Record for EmergencyRequest {
    const RESOURCE: Resource = Resource::EmergencyRequests;

    fn id(&self) -> &str {
        &self.request_id
    }

    fn assign_id(&mut self, id: String) {
        self.request_id = id;
    }

    fn status_label(&self) -> Option<String> {
        Some(self.status.to_string())
    }

    fn prepare_for_create(&mut self) {
        self.status = RequestStatus::Pending;
    }

    fn validate(&self) -> Result<()> {
        if self.units_needed == 0 {
            return Err(DonorError::InvalidRecord(
                "units_needed must be a positive integer".to_string(),
            ));
        }
        self.blood_group.parse::<BloodGroup>()?;
        require("hospital_name", &self.hospital_name)?;
        require("city", &self.city)
    }
}

impl Lifecycle for EmergencyRequest {
    type Status = RequestStatus;

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    fn can_transition(from: RequestStatus, to: RequestStatus) -> bool {
        from == RequestStatus::Pending && to.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    #[serde(default)]
    pub appointment_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    #[serde(default)]
    pub specialty: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default = "scheduled")]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub phone: String,
}

fn scheduled() -> AppointmentStatus {
    AppointmentStatus::Scheduled
}

impl Record for Appointment {
    const RESOURCE: Resource = Resource::Appointments;

    fn id(&self) -> &str {
        &self.appointment_id
    }

    fn assign_id(&mut self, id: String) {
        self.appointment_id = id;
    }

    fn status_label(&self) -> Option<String> {
        Some(self.status.to_string())
    }

    fn prepare_for_create(&mut self) {
        self.status = AppointmentStatus::Scheduled;
    }

    fn validate(&self) -> Result<()> {
        require("patient_name", &self.patient_name)?;
        require("doctor_name", &self.doctor_name)?;
        require_date("date", &self.date)
    }
}

impl Lifecycle for Appointment {
    type Status = AppointmentStatus;

    fn status(&self) -> AppointmentStatus {
        self.status
    }

    fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
    }

    fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
        from == AppointmentStatus::Scheduled && to != AppointmentStatus::Scheduled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    #[serde(default)]
    pub doctor_id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
}

impl Record for Doctor {
    const RESOURCE: Resource = Resource::Doctors;

    fn id(&self) -> &str {
        &self.doctor_id
    }

    fn assign_id(&mut self, id: String) {
        self.doctor_id = id;
    }

    fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("specialty", &self.specialty)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DonorError::InvalidRecord(format!("{} is required", field)));
    }
    Ok(())
}

fn require_date(field: &str, value: &str) -> Result<()> {
    parse_calendar_date(value)
        .map(|_| ())
        .ok_or_else(|| DonorError::InvalidDate(format!("{} '{}'", field, value)))
}

/// `YYYY-MM-DD`, or the UTC date of an RFC 3339 timestamp
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EmergencyRequest {
        EmergencyRequest::new("City Hospital", BloodGroup::BPositive, 3, "Pune")
    }

    #[test]
    fn test_request_starts_pending() {
        assert_eq!(request().status, RequestStatus::Pending);
    }

    #[test]
    fn test_request_terminal_transitions() {
        let mut fulfilled = request();
        fulfilled.transition(RequestStatus::Fulfilled).unwrap();
        assert_eq!(fulfilled.status, RequestStatus::Fulfilled);

        let mut cancelled = request();
        cancelled.transition(RequestStatus::Cancelled).unwrap();
        assert_eq!(cancelled.status, RequestStatus::Cancelled);
    }

    #[test]
    fn test_request_rejects_mutation_after_terminal() {
        let mut req = request();
        req.transition(RequestStatus::Fulfilled).unwrap();

        let err = req.transition(RequestStatus::Cancelled).unwrap_err();
        assert!(matches!(err, DonorError::InvalidTransition { .. }));
        assert!(req.transition(RequestStatus::Pending).is_err());
        assert_eq!(req.status, RequestStatus::Fulfilled);
    }

    #[test]
    fn test_request_pending_to_pending_rejected() {
        let mut req = request();
        assert!(req.transition(RequestStatus::Pending).is_err());
    }

    #[test]
    fn test_request_validation() {
        let mut req = request();
        assert!(req.validate().is_ok());

        req.units_needed = 0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.blood_group = "Z+".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unknown_request_status_is_typed() {
        assert_eq!("cancelled".parse::<RequestStatus>().unwrap(), RequestStatus::Cancelled);
        let err = "closed".parse::<RequestStatus>().unwrap_err();
        assert!(matches!(err, DonorError::InvalidStatus(ref s) if s == "closed"));
    }

    #[test]
    fn test_record_validation_requires_core_fields() {
        let doctor = Doctor {
            doctor_id: String::new(),
            name: "Dr. Rao".to_string(),
            specialty: " ".to_string(),
            phone: String::new(),
            email: String::new(),
            city: "Pune".to_string(),
        };
        assert!(matches!(doctor.validate(), Err(DonorError::InvalidRecord(_))));

        let camp: Camp = serde_json::from_value(serde_json::json!({
            "title": "Spring Drive",
            "venue": "Town Hall",
            "city": "Pune",
            "date": "next Sunday"
        }))
        .unwrap();
        assert!(matches!(camp.validate(), Err(DonorError::InvalidDate(_))));
    }

    #[test]
    fn test_with_contact_drops_blank_fields() {
        let req = request().with_contact(Some("  ".to_string()), Some("er@city.org".to_string()));
        assert_eq!(req.contact_phone, None);
        assert_eq!(req.contact_email.as_deref(), Some("er@city.org"));
    }

    #[test]
    fn test_appointment_lifecycle() {
        let mut apt: Appointment = serde_json::from_value(serde_json::json!({
            "patient_name": "R. Iyer",
            "doctor_name": "Dr. Rao",
            "date": "2026-01-10"
        }))
        .unwrap();
        assert_eq!(apt.status, AppointmentStatus::Scheduled);

        apt.transition(AppointmentStatus::Completed).unwrap();
        assert!(apt.transition(AppointmentStatus::Cancelled).is_err());
    }

    #[test]
    fn test_parse_calendar_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_calendar_date("2025-03-14"), Some(expected));
        assert_eq!(parse_calendar_date("2025-03-14T22:30:00Z"), Some(expected));
        assert_eq!(parse_calendar_date("2025-03-15T01:00:00+05:30"), Some(expected));
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("last spring"), None);
        assert_eq!(parse_calendar_date("2025-02-30"), None);
    }

    #[test]
    fn test_resource_names_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(resource.to_string().parse::<Resource>().unwrap(), resource);
        }
        assert!("patients".parse::<Resource>().is_err());
    }

    #[test]
    fn test_donor_deserializes_with_missing_optional_fields() {
        let donor: Donor = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "blood_group": "O-",
            "city": "Pune"
        }))
        .unwrap();
        assert_eq!(donor.last_donation(), None);
        assert_eq!(donor.blood_group(), Some(BloodGroup::ONegative));
    }
}
