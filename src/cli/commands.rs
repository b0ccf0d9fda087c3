use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "donor-match")]
#[command(about = "Donor matching and record keeping for a blood-donation network")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = donor_match::config::DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database and show configuration
    Init,

    /// Bulk-load records from a JSON array
    Import {
        /// donors, camps, inventory, emergency-requests, appointments, doctors
        resource: String,

        /// JSON file holding an array of records
        file: String,
    },

    /// List donors in the registry, or register one
    Donors {
        #[command(subcommand)]
        action: Option<DonorAction>,

        /// Search name, email or phone
        #[arg(short, long)]
        search: Option<String>,

        /// Exact blood group (e.g. O-)
        #[arg(short, long)]
        group: Option<String>,

        /// City substring
        #[arg(long)]
        city: Option<String>,

        /// Reference date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Find eligible, compatible donors in a city
    Match {
        /// Requested blood group
        #[arg(short, long)]
        group: String,

        /// Requested city (exact, case-insensitive)
        #[arg(long)]
        city: String,

        /// Reference date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        as_of: Option<String>,

        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Emergency request operations
    Request {
        #[command(subcommand)]
        action: RequestAction,
    },

    /// Explain a donor's donation eligibility
    Eligibility {
        donor_id: String,

        /// Reference date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Search blood bank inventory by location
    Banks {
        /// Location substring (empty matches all)
        #[arg(short, long, default_value = "")]
        location: String,

        /// Preferred blood group
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Show camps grouped by status, or schedule one
    Camps {
        #[command(subcommand)]
        action: Option<CampAction>,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Appointment agenda and status changes
    Appointments {
        #[command(subcommand)]
        action: Option<AppointmentAction>,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Doctor directory
    Doctors {
        #[command(subcommand)]
        action: Option<DoctorAction>,

        /// Specialty substring
        #[arg(long)]
        specialty: Option<String>,

        /// City substring
        #[arg(long)]
        city: Option<String>,
    },

    /// Show dashboard statistics
    Stats {
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum DonorAction {
    /// Register a donor
    Add {
        #[arg(long)]
        name: String,

        /// Blood group (A+, A-, B+, B-, AB+, AB-, O+, O-)
        #[arg(short, long)]
        group: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        email: Option<String>,

        /// Last donation date (YYYY-MM-DD)
        #[arg(long)]
        last_donation: Option<String>,

        #[arg(long)]
        gender: Option<String>,

        #[arg(long)]
        age: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum CampAction {
    /// Schedule a donation camp
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        venue: String,

        #[arg(long)]
        city: String,

        /// Camp date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        start: String,

        /// End time (HH:MM)
        #[arg(long)]
        end: String,

        #[arg(long)]
        organizer: String,

        #[arg(long)]
        capacity: u32,
    },
}

#[derive(Subcommand)]
pub enum DoctorAction {
    /// Add a doctor to the directory
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        specialty: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        city: String,
    },
}

#[derive(Subcommand)]
pub enum RequestAction {
    /// Raise a new emergency request
    Create {
        #[arg(long)]
        hospital: String,

        #[arg(short, long)]
        group: String,

        #[arg(short, long)]
        units: u32,

        #[arg(long)]
        city: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// List requests with matching-donor counts
    List {
        /// Filter by status (pending, fulfilled, cancelled)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Mark a pending request fulfilled
    Fulfil { id: String },

    /// Cancel a pending request
    Cancel {
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show matching donors for a stored request
    Matches {
        id: String,

        /// Reference date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AppointmentAction {
    /// Book an appointment
    Book {
        #[arg(long)]
        patient: String,

        #[arg(long)]
        doctor: String,

        #[arg(long)]
        specialty: Option<String>,

        /// Appointment date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Appointment time (HH:MM)
        #[arg(long)]
        time: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        reason: Option<String>,
    },

    /// Mark a scheduled appointment completed
    Complete { id: String },

    /// Cancel a scheduled appointment
    Cancel { id: String },
}
