use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use crate::{
    error::{DonorError, Result},
    storage::models::{Lifecycle, Record, Resource},
};
use tracing::{debug, info};

/// Largest sequence number accepted from an imported id
pub const MAX_SEQ: i64 = 999_999_999;

/// SQLite-backed store exposing list / create / update-status over each resource
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        for resource in Resource::ALL {
            self.conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {} (
                        id TEXT PRIMARY KEY,
                        seq INTEGER NOT NULL,
                        status TEXT,
                        payload TEXT NOT NULL
                    )",
                    resource.table()
                ),
                [],
            )?;
        }

        // Status queries on requests and appointments
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_request_status ON emergency_requests(status)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_appointment_status ON appointments(status)",
            [],
        )?;

        Ok(())
    }

    /// All records of a resource, in id order
    pub fn list<T: Record>(&self) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT payload FROM {} ORDER BY seq",
            T::RESOURCE.table()
        ))?;

        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        payloads
            .iter()
            .map(|payload| serde_json::from_str(payload).map_err(DonorError::from))
            .collect()
    }

    pub fn get<T: Record>(&self, id: &str) -> Result<Option<T>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT payload FROM {} WHERE id = ?1", T::RESOURCE.table()),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(p) => Ok(Some(serde_json::from_str(&p)?)),
            None => Ok(None),
        }
    }

    /// Insert a new record under the next sequential id and return that id
    pub fn create<T: Record>(&self, mut record: T) -> Result<String> {
        record.prepare_for_create();
        record.validate()?;

        let seq = self.next_seq(T::RESOURCE)?;
        let id = format_id(T::RESOURCE, seq);
        record.assign_id(id.clone());

        self.insert(&record, seq)?;
        info!("Created {} record {}", T::RESOURCE, id);
        Ok(id)
    }

    /// Bulk-load records in one transaction. Ids in this resource's format
    /// are kept in their canonical form (`D7` is stored as `D007`), anything
    /// else gets a fresh sequential id. An id that is already taken aborts
    /// the whole import.
    pub fn import<T: Record>(&self, records: Vec<T>) -> Result<Vec<String>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(records.len());

        for mut record in records {
            record.validate()?;
            let seq = match parse_seq(T::RESOURCE, record.id()) {
                Some(seq) => seq,
                None => self.next_seq(T::RESOURCE)?,
            };
            record.assign_id(format_id(T::RESOURCE, seq));
            self.insert(&record, seq)?;
            ids.push(record.id().to_string());
        }

        tx.commit()?;
        info!("Imported {} {} records", ids.len(), T::RESOURCE);
        Ok(ids)
    }

    /// Move a record along its lifecycle; terminal states reject further changes
    pub fn update_status<T: Lifecycle>(&self, id: &str, status: T::Status) -> Result<T> {
        let mut record: T = self
            .get(id)?
            .ok_or_else(|| DonorError::NotFound(format!("{} {}", T::RESOURCE, id)))?;

        record.transition(status)?;

        let payload = serde_json::to_string(&record)?;
        self.conn.execute(
            &format!(
                "UPDATE {} SET status = ?1, payload = ?2 WHERE id = ?3",
                T::RESOURCE.table()
            ),
            params![record.status_label(), payload, id],
        )?;

        info!("{} {} -> {}", T::RESOURCE, id, status);
        Ok(record)
    }

    pub fn count(&self, resource: Resource) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", resource.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn insert<T: Record>(&self, record: &T, seq: i64) -> Result<()> {
        let payload = serde_json::to_string(record)?;
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (id, seq, status, payload) VALUES (?1, ?2, ?3, ?4)",
                    T::RESOURCE.table()
                ),
                params![record.id(), seq, record.status_label(), payload],
            )
            .map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => {
                    DonorError::Duplicate(format!("{} {}", T::RESOURCE, record.id()))
                }
                _ => DonorError::from(e),
            })?;
        debug!("Stored {} {}", T::RESOURCE, record.id());
        Ok(())
    }

    fn next_seq(&self, resource: Resource) -> Result<i64> {
        let max: Option<i64> = self.conn.query_row(
            &format!("SELECT MAX(seq) FROM {}", resource.table()),
            [],
            |row| row.get(0),
        )?;
        max.unwrap_or(0)
            .checked_add(1)
            .filter(|seq| *seq <= MAX_SEQ)
            .ok_or_else(|| DonorError::InvalidRecord(format!("{} id space exhausted", resource)))
    }
}

/// `D` + 7 -> `D007`; numbers past 999 simply grow (`D1000`)
pub fn format_id(resource: Resource, seq: i64) -> String {
    format!("{}{:03}", resource.id_prefix(), seq)
}

fn parse_seq(resource: Resource, id: &str) -> Option<i64> {
    let digits = id.strip_prefix(resource.id_prefix())?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n: &i64| (1..=MAX_SEQ).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blood::BloodGroup;
    use crate::storage::models::{
        Appointment, AppointmentStatus, Camp, Doctor, Donor, EmergencyRequest, RequestStatus,
    };
    use tempfile::TempDir;

    fn open() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    fn donor(name: &str) -> Donor {
        Donor {
            donor_id: String::new(),
            name: name.to_string(),
            blood_group: "O-".to_string(),
            phone: "9800000000".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            city: "Pune".to_string(),
            last_donation_date: "2025-01-01".to_string(),
            gender: "F".to_string(),
            age: 30,
        }
    }

    #[test]
    fn test_sequential_ids_per_resource() {
        let (_dir, db) = open();

        assert_eq!(db.create(donor("Asha")).unwrap(), "D001");
        assert_eq!(db.create(donor("Ravi")).unwrap(), "D002");

        let req = EmergencyRequest::new("City Hospital", BloodGroup::APositive, 2, "Pune");
        assert_eq!(db.create(req.clone()).unwrap(), "R001");
        assert_eq!(db.create(req).unwrap(), "R002");
    }

    #[test]
    fn test_list_preserves_creation_order() {
        let (_dir, db) = open();
        for name in ["Asha", "Ravi", "Meera"] {
            db.create(donor(name)).unwrap();
        }

        let names: Vec<String> = db.list::<Donor>().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Asha", "Ravi", "Meera"]);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (_dir, db) = open();
        assert!(db.get::<Donor>("D404").unwrap().is_none());
    }

    #[test]
    fn test_create_forces_server_owned_fields() {
        let (_dir, db) = open();

        let mut req = EmergencyRequest::new("City Hospital", BloodGroup::APositive, 2, "Pune");
        req.status = RequestStatus::Fulfilled;
        let id = db.create(req).unwrap();
        let stored: EmergencyRequest = db.get(&id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Pending);

        let camp: Camp = serde_json::from_value(serde_json::json!({
            "title": "Spring Drive",
            "venue": "Town Hall",
            "city": "Pune",
            "date": "2026-03-01",
            "capacity": 50,
            "registered": 12
        }))
        .unwrap();
        let id = db.create(camp).unwrap();
        assert_eq!(db.get::<Camp>(&id).unwrap().unwrap().registered, 0);
    }

    #[test]
    fn test_create_rejects_invalid_request() {
        let (_dir, db) = open();
        let req = EmergencyRequest::new("City Hospital", BloodGroup::APositive, 0, "Pune");
        assert!(db.create(req).is_err());
        assert_eq!(db.count(Resource::EmergencyRequests).unwrap(), 0);
    }

    #[test]
    fn test_update_status_persists() {
        let (_dir, db) = open();
        let id = db
            .create(EmergencyRequest::new("City Hospital", BloodGroup::APositive, 2, "Pune"))
            .unwrap();

        let updated: EmergencyRequest = db.update_status(&id, RequestStatus::Fulfilled).unwrap();
        assert_eq!(updated.status, RequestStatus::Fulfilled);

        let stored: EmergencyRequest = db.get(&id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Fulfilled);
    }

    #[test]
    fn test_update_status_rejects_terminal_change() {
        let (_dir, db) = open();
        let id = db
            .create(EmergencyRequest::new("City Hospital", BloodGroup::APositive, 2, "Pune"))
            .unwrap();
        db.update_status::<EmergencyRequest>(&id, RequestStatus::Cancelled).unwrap();

        let err = db
            .update_status::<EmergencyRequest>(&id, RequestStatus::Fulfilled)
            .unwrap_err();
        assert!(matches!(err, DonorError::InvalidTransition { .. }));

        let stored: EmergencyRequest = db.get(&id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Cancelled);
    }

    #[test]
    fn test_update_status_missing_record() {
        let (_dir, db) = open();
        let err = db
            .update_status::<Appointment>("A999", AppointmentStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, DonorError::NotFound(_)));
    }

    #[test]
    fn test_import_keeps_well_formed_ids() {
        let (_dir, db) = open();

        let mut first = donor("Asha");
        first.donor_id = "D010".to_string();
        let mut second = donor("Ravi");
        second.donor_id = "legacy-7".to_string();

        let ids = db.import(vec![first, second]).unwrap();
        assert_eq!(ids, vec!["D010", "D011"]);
        assert_eq!(db.create(donor("Meera")).unwrap(), "D012");
    }

    #[test]
    fn test_import_rejects_taken_id() {
        let (_dir, db) = open();
        db.create(donor("Asha")).unwrap();

        let mut clash = donor("Ravi");
        clash.donor_id = "D001".to_string();
        let err = db.import(vec![clash]).unwrap_err();
        assert!(matches!(err, DonorError::Duplicate(_)));

        let names: Vec<String> = db.list::<Donor>().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Asha"]);
    }

    #[test]
    fn test_import_stores_canonical_ids() {
        let (_dir, db) = open();

        let mut short = donor("Asha");
        short.donor_id = "D7".to_string();
        assert_eq!(db.import(vec![short]).unwrap(), vec!["D007"]);
        assert_eq!(db.get::<Donor>("D007").unwrap().unwrap().donor_id, "D007");
        assert!(db.get::<Donor>("D7").unwrap().is_none());
    }

    #[test]
    fn test_import_rolls_back_on_same_seq_twice() {
        let (_dir, db) = open();

        let mut first = donor("Asha");
        first.donor_id = "D1".to_string();
        let mut second = donor("Ravi");
        second.donor_id = "D001".to_string();

        let err = db.import(vec![first, second]).unwrap_err();
        assert!(matches!(err, DonorError::Duplicate(_)));
        assert_eq!(db.count(Resource::Donors).unwrap(), 0);
    }

    #[test]
    fn test_oversized_imported_id_gets_fresh_seq() {
        let (_dir, db) = open();

        let mut huge = donor("Asha");
        huge.donor_id = format!("D{}", i64::MAX);
        assert_eq!(db.import(vec![huge]).unwrap(), vec!["D001"]);
        assert_eq!(db.create(donor("Ravi")).unwrap(), "D002");
    }

    #[test]
    fn test_create_fails_when_id_space_exhausted() {
        let (_dir, db) = open();

        let mut last = donor("Asha");
        last.donor_id = format_id(Resource::Donors, MAX_SEQ);
        db.import(vec![last]).unwrap();

        let err = db.create(donor("Ravi")).unwrap_err();
        assert!(matches!(err, DonorError::InvalidRecord(_)));
    }

    #[test]
    fn test_create_single_records_per_resource() {
        let (_dir, db) = open();

        let doctor = Doctor {
            doctor_id: String::new(),
            name: "Dr. Rao".to_string(),
            specialty: "Hematology".to_string(),
            phone: "9811111111".to_string(),
            email: "rao@clinic.org".to_string(),
            city: "Pune".to_string(),
        };
        assert_eq!(db.create(doctor).unwrap(), "T001");

        let apt: Appointment = serde_json::from_value(serde_json::json!({
            "patient_name": "R. Iyer",
            "doctor_name": "Dr. Rao",
            "date": "2026-01-10",
            "status": "completed"
        }))
        .unwrap();
        let id = db.create(apt).unwrap();
        assert_eq!(id, "A001");
        assert_eq!(
            db.get::<Appointment>(&id).unwrap().unwrap().status,
            AppointmentStatus::Scheduled
        );

        let mut nameless = donor("Asha");
        nameless.name = String::new();
        assert!(matches!(db.create(nameless), Err(DonorError::InvalidRecord(_))));
        assert_eq!(db.count(Resource::Donors).unwrap(), 0);
    }

    #[test]
    fn test_format_and_parse_ids() {
        assert_eq!(format_id(Resource::Doctors, 7), "T007");
        assert_eq!(format_id(Resource::Donors, 1000), "D1000");
        assert_eq!(parse_seq(Resource::Donors, "D042"), Some(42));
        assert_eq!(parse_seq(Resource::Donors, "C042"), None);
        assert_eq!(parse_seq(Resource::Donors, "D"), None);
        assert_eq!(parse_seq(Resource::Donors, "D000"), None);
        assert_eq!(parse_seq(Resource::Donors, "D7"), Some(7));
        assert_eq!(parse_seq(Resource::Donors, &format!("D{}", MAX_SEQ + 1)), None);
    }
}
