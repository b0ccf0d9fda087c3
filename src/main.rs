mod cli;

use clap::Parser;
use cli::{
    AppointmentAction, CampAction, Cli, Commands, DoctorAction, DonorAction, RequestAction,
};
use colored::*;
use donor_match::{
    blood::BloodGroup,
    config::Config,
    error::{self, DonorError},
    matching::{find_blood_banks, EligibilityMatcher},
    registry::{agenda, partition_camps, DashboardStats, DoctorFilter, DonorFilter},
    storage::{
        Appointment, AppointmentStatus, Camp, Database, Doctor, Donor, EmergencyRequest,
        InventoryItem, Record, RequestStatus, Resource,
    },
    utils,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("donor_match=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load_from(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Init => {
            info!("Initializing...");
            initialize(&config)
        }

        Commands::Import { resource, file } => {
            info!("Importing {} from {}", resource, file);
            import_records(&config, &resource, &file)
        }

        Commands::Donors { action: Some(action), .. } => add_donor(&config, action),

        Commands::Donors { action: None, search, group, city, as_of } => {
            list_donors(&config, search, group.as_deref(), city, as_of.as_deref())
        }

        Commands::Match { group, city, as_of, format } => {
            info!("Matching donors for {} in {}", group, city);
            match_donors(&config, &group, &city, as_of.as_deref(), &format)
        }

        Commands::Request { action } => run_request_action(&config, action),

        Commands::Eligibility { donor_id, as_of } => {
            show_eligibility(&config, &donor_id, as_of.as_deref())
        }

        Commands::Banks { location, group } => show_banks(&config, &location, group.as_deref()),

        Commands::Camps { action: Some(action), .. } => add_camp(&config, action),

        Commands::Camps { action: None, as_of } => show_camps(&config, as_of.as_deref()),

        Commands::Appointments { action, as_of } => {
            run_appointments(&config, action, as_of.as_deref())
        }

        Commands::Doctors { action: Some(action), .. } => add_doctor(&config, action),

        Commands::Doctors { action: None, specialty, city } => {
            list_doctors(&config, DoctorFilter { specialty, city })
        }

        Commands::Stats { format } => {
            info!("Generating statistics...");
            show_stats(&config, &format)
        }
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn open_database(config: &Config) -> error::Result<Database> {
    Database::new(&config.database.path)
}

fn parse_group(raw: &str) -> error::Result<BloodGroup> {
    raw.parse()
}

fn initialize(config: &Config) -> error::Result<()> {
    println!("{}", "Initializing donor registry...".green());
    let db = open_database(config)?;
    println!("{}", "✓ Database initialized".green());
    println!("{}", "✓ Configuration loaded".green());

    println!("\n{}", "Configuration:".cyan());
    println!("  Database:          {}", config.database.path);
    println!(
        "  Donation interval: {} days",
        config.matching.min_donation_interval_days
    );

    println!("\n{}", "Records:".cyan());
    for resource in Resource::ALL {
        println!("  {:<20} {}", resource.to_string(), db.count(resource)?);
    }

    println!("\n{}", "Ready to use! Try running:".cyan());
    println!("  {} to seed donors", "donor-match import donors donors.json".yellow());
    println!("  {} to find donors", "donor-match match --group B+ --city Pune".yellow());
    Ok(())
}

fn import_records(config: &Config, resource: &str, file: &str) -> error::Result<()> {
    let resource: Resource = resource.parse()?;
    let raw = std::fs::read_to_string(file)?;
    let db = open_database(config)?;

    let imported = match resource {
        Resource::Donors => import_as::<Donor>(&db, &raw)?,
        Resource::Camps => import_as::<Camp>(&db, &raw)?,
        Resource::Inventory => import_as::<InventoryItem>(&db, &raw)?,
        Resource::EmergencyRequests => import_as::<EmergencyRequest>(&db, &raw)?,
        Resource::Appointments => import_as::<Appointment>(&db, &raw)?,
        Resource::Doctors => import_as::<Doctor>(&db, &raw)?,
    };

    println!("✓ Imported {} {} records", imported.to_string().green(), resource);
    Ok(())
}

fn import_as<T: Record>(db: &Database, raw: &str) -> error::Result<usize> {
    let records: Vec<T> = serde_json::from_str(raw)?;
    Ok(db.import(records)?.len())
}

fn add_donor(config: &Config, action: DonorAction) -> error::Result<()> {
    let DonorAction::Add { name, group, phone, city, email, last_donation, gender, age } = action;

    let last_donation_date = last_donation.unwrap_or_default();
    if !last_donation_date.is_empty()
        && donor_match::storage::models::parse_calendar_date(&last_donation_date).is_none()
    {
        return Err(DonorError::InvalidDate(last_donation_date));
    }

    let donor = Donor {
        donor_id: String::new(),
        name,
        blood_group: parse_group(&group)?.to_string(),
        phone,
        email: email.unwrap_or_default(),
        city,
        last_donation_date,
        gender: gender.unwrap_or_default(),
        age: age.unwrap_or_default(),
    };

    let db = open_database(config)?;
    let id = db.create(donor)?;
    println!("✓ Donor {} registered", id.green());
    Ok(())
}

fn list_donors(
    config: &Config,
    search: Option<String>,
    group: Option<&str>,
    city: Option<String>,
    as_of: Option<&str>,
) -> error::Result<()> {
    let as_of = utils::parse_as_of(as_of)?;
    let filter = DonorFilter {
        search,
        blood_group: group.map(parse_group).transpose()?,
        city,
    };

    let db = open_database(config)?;
    let donors = db.list::<Donor>()?;
    let matcher = EligibilityMatcher::from_config(config);
    let found = filter.apply(&donors);

    println!("{}", format!("=== Donors ({} of {}) ===", found.len(), donors.len()).cyan().bold());
    let widths = [6, 24, 6, 16, 14, 14, 10];
    utils::print_table_border(100);
    utils::print_table_row(
        &["ID", "Name", "Group", "City", "Phone", "Last Donated", "Status"],
        &widths,
    );
    utils::print_table_border(100);
    for donor in found {
        let status = utils::format_eligible(matcher.is_eligible_to_donate(donor, as_of));
        utils::print_table_row(
            &[
                &donor.donor_id,
                &donor.name,
                &donor.blood_group,
                &donor.city,
                &donor.phone,
                &donor.last_donation_date,
                &status,
            ],
            &widths,
        );
    }
    utils::print_table_border(100);
    Ok(())
}

fn match_donors(
    config: &Config,
    group: &str,
    city: &str,
    as_of: Option<&str>,
    format: &str,
) -> error::Result<()> {
    // Reject typos up front instead of silently matching nobody
    parse_group(group)?;
    let as_of = utils::parse_as_of(as_of)?;

    let db = open_database(config)?;
    let donors = db.list::<Donor>()?;
    let matcher = EligibilityMatcher::from_config(config);
    let matches = matcher.find_matching_donors(&donors, group, city, as_of);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    print_donor_matches(&matches, group, city);
    Ok(())
}

fn print_donor_matches(matches: &[&Donor], group: &str, city: &str) {
    println!(
        "\n{}",
        format!("=== Matching Donors for {} in {} ===", group, city).cyan().bold()
    );
    if matches.is_empty() {
        println!("{}", "No eligible donors found in this city".yellow());
        return;
    }

    let widths = [6, 24, 6, 16, 28];
    utils::print_table_border(90);
    utils::print_table_row(&["ID", "Name", "Group", "Phone", "Email"], &widths);
    utils::print_table_border(90);
    for donor in matches {
        utils::print_table_row(
            &[&donor.donor_id, &donor.name, &donor.blood_group, &donor.phone, &donor.email],
            &widths,
        );
    }
    utils::print_table_border(90);
    println!("Matching donors: {}", matches.len().to_string().green());
}

fn run_request_action(config: &Config, action: RequestAction) -> error::Result<()> {
    let db = open_database(config)?;

    match action {
        RequestAction::Create { hospital, group, units, city, phone, email } => {
            let request = EmergencyRequest::new(&hospital, parse_group(&group)?, units, &city)
                .with_contact(phone, email);
            let id = db.create(request)?;
            println!("✓ Emergency request {} raised", id.green());

            let donors = db.list::<Donor>()?;
            let matches = EligibilityMatcher::from_config(config).find_matching_donors(
                &donors,
                &group,
                &city,
                chrono::Utc::now(),
            );
            println!("Matching donors right now: {}", matches.len());
            Ok(())
        }

        RequestAction::List { status } => {
            let status: Option<RequestStatus> = status.as_deref().map(str::parse::<RequestStatus>).transpose()?;
            let requests = db.list::<EmergencyRequest>()?;
            let donors = db.list::<Donor>()?;
            let matcher = EligibilityMatcher::from_config(config);
            let now = chrono::Utc::now();

            let widths = [6, 24, 6, 6, 14, 10, 8, 22];
            utils::print_table_border(110);
            utils::print_table_row(
                &["ID", "Hospital", "Group", "Units", "City", "Status", "Donors", "Created"],
                &widths,
            );
            utils::print_table_border(110);
            for request in requests
                .iter()
                .filter(|r| status.map_or(true, |s| r.status == s))
            {
                let donor_count = if request.status == RequestStatus::Pending {
                    matcher.match_request(&donors, request, now).len().to_string()
                } else {
                    "-".to_string()
                };
                utils::print_table_row(
                    &[
                        &request.request_id,
                        &request.hospital_name,
                        &request.blood_group,
                        &request.units_needed.to_string(),
                        &request.city,
                        &utils::format_request_status(request.status),
                        &donor_count,
                        &utils::format_timestamp(&request.created_at),
                    ],
                    &widths,
                );
            }
            utils::print_table_border(110);
            Ok(())
        }

        RequestAction::Fulfil { id } => {
            let request: EmergencyRequest = db.update_status(&id, RequestStatus::Fulfilled)?;
            println!("✓ Request {} {}", request.request_id, utils::format_request_status(request.status));
            Ok(())
        }

        RequestAction::Cancel { id, yes } => {
            if !yes && !utils::confirm_action(&format!("Cancel emergency request {}?", id))? {
                println!("Cancelled");
                return Ok(());
            }
            let request: EmergencyRequest = db.update_status(&id, RequestStatus::Cancelled)?;
            println!("✓ Request {} {}", request.request_id, utils::format_request_status(request.status));
            Ok(())
        }

        RequestAction::Matches { id, as_of } => {
            let as_of = utils::parse_as_of(as_of.as_deref())?;
            let request: EmergencyRequest = db
                .get(&id)?
                .ok_or_else(|| DonorError::NotFound(format!("emergency request {}", id)))?;
            if request.status != RequestStatus::Pending {
                warn!("Request {} is already {}", id, request.status);
            }

            let donors = db.list::<Donor>()?;
            let matches = EligibilityMatcher::from_config(config).match_request(&donors, &request, as_of);
            println!(
                "{} needs {} units ({} minutes open)",
                request.hospital_name.bold(),
                request.units_needed,
                request.minutes_open(chrono::Utc::now())
            );
            print_donor_matches(&matches, &request.blood_group, &request.city);
            Ok(())
        }
    }
}

fn show_eligibility(config: &Config, donor_id: &str, as_of: Option<&str>) -> error::Result<()> {
    let as_of = utils::parse_as_of(as_of)?;
    let db = open_database(config)?;
    let donor: Donor = db
        .get(donor_id)?
        .ok_or_else(|| DonorError::NotFound(format!("donor {}", donor_id)))?;

    let matcher = EligibilityMatcher::from_config(config);
    let eligible = matcher.is_eligible_to_donate(&donor, as_of);

    println!("{} ({}, {})", donor.name.bold(), donor.blood_group, donor.city);
    println!("Status:       {}", utils::format_eligible(eligible));
    println!("Reason:       {}", matcher.eligibility_reason(&donor, as_of));
    if let Some(days) = matcher.days_since_last_donation(&donor, as_of) {
        println!("Days since:   {}", days);
    }
    if let Some(next) = matcher.next_eligible_date(&donor) {
        println!("Eligible on:  {}", next.format("%Y-%m-%d"));
    }
    Ok(())
}

fn show_banks(config: &Config, location: &str, group: Option<&str>) -> error::Result<()> {
    let preferred = group.map(parse_group).transpose()?;
    let db = open_database(config)?;
    let inventory = db.list::<InventoryItem>()?;
    let banks = find_blood_banks(&inventory, location, preferred);

    if banks.is_empty() {
        println!("{}", "No blood banks matched. Try a broader location.".yellow());
        return Ok(());
    }

    let widths = [6, 36, 6, 6, 12];
    utils::print_table_border(80);
    utils::print_table_row(&["ID", "Location", "Group", "Units", "Expires"], &widths);
    utils::print_table_border(80);
    for item in banks {
        utils::print_table_row(
            &[
                &item.inventory_id,
                &item.location,
                &item.blood_group,
                &item.units_available.to_string(),
                &item.expiry_date,
            ],
            &widths,
        );
    }
    utils::print_table_border(80);
    Ok(())
}

fn add_camp(config: &Config, action: CampAction) -> error::Result<()> {
    let CampAction::Add { title, venue, city, date, start, end, organizer, capacity } = action;

    let camp = Camp {
        camp_id: String::new(),
        title,
        venue,
        city,
        date,
        start_time: start,
        end_time: end,
        organizer,
        capacity,
        registered: 0,
    };

    let db = open_database(config)?;
    let id = db.create(camp)?;
    println!("✓ Camp {} scheduled", id.green());
    Ok(())
}

fn show_camps(config: &Config, as_of: Option<&str>) -> error::Result<()> {
    let today = utils::parse_as_of(as_of)?.date_naive();
    let db = open_database(config)?;
    let camps = db.list::<Camp>()?;
    let schedule = partition_camps(&camps, today);

    for (title, group) in [
        ("Today", &schedule.today),
        ("Upcoming", &schedule.upcoming),
        ("Completed", &schedule.completed),
    ] {
        println!("\n{}", format!("{} ({})", title, group.len()).cyan().bold());
        for camp in group.iter() {
            println!(
                "  {} {} @ {}, {} on {} {}-{} ({}/{} registered)",
                camp.camp_id,
                camp.title,
                camp.venue,
                camp.city,
                camp.date,
                camp.start_time,
                camp.end_time,
                camp.registered,
                camp.capacity
            );
        }
    }
    Ok(())
}

fn run_appointments(
    config: &Config,
    action: Option<AppointmentAction>,
    as_of: Option<&str>,
) -> error::Result<()> {
    let db = open_database(config)?;

    let (id, status) = match action {
        Some(AppointmentAction::Book { patient, doctor, specialty, date, time, phone, reason }) => {
            let appointment = Appointment {
                appointment_id: String::new(),
                patient_name: patient,
                doctor_name: doctor,
                specialty: specialty.unwrap_or_default(),
                date,
                time,
                status: AppointmentStatus::Scheduled,
                reason: reason.unwrap_or_default(),
                phone,
            };
            let id = db.create(appointment)?;
            println!("✓ Appointment {} booked", id.green());
            return Ok(());
        }
        Some(AppointmentAction::Complete { id }) => (id, AppointmentStatus::Completed),
        Some(AppointmentAction::Cancel { id }) => (id, AppointmentStatus::Cancelled),
        None => {
            let today = utils::parse_as_of(as_of)?.date_naive();
            let appointments = db.list::<Appointment>()?;
            let agenda = agenda(&appointments, today);

            for (title, group) in [("Today", &agenda.today), ("Upcoming", &agenda.upcoming)] {
                println!("\n{}", format!("{} ({})", title, group.len()).cyan().bold());
                for apt in group.iter() {
                    println!(
                        "  {} {} {} {} with {} ({}) - {}",
                        apt.appointment_id,
                        apt.date,
                        apt.time,
                        apt.patient_name,
                        apt.doctor_name,
                        apt.specialty,
                        apt.reason
                    );
                }
            }
            return Ok(());
        }
    };

    let apt: Appointment = db.update_status(&id, status)?;
    println!(
        "✓ Appointment {} {}",
        apt.appointment_id,
        utils::format_appointment_status(apt.status)
    );
    Ok(())
}

fn add_doctor(config: &Config, action: DoctorAction) -> error::Result<()> {
    let DoctorAction::Add { name, specialty, phone, email, city } = action;

    let doctor = Doctor { doctor_id: String::new(), name, specialty, phone, email, city };

    let db = open_database(config)?;
    let id = db.create(doctor)?;
    println!("✓ Doctor {} added", id.green());
    Ok(())
}

fn list_doctors(config: &Config, filter: DoctorFilter) -> error::Result<()> {
    let db = open_database(config)?;
    let doctors = db.list::<Doctor>()?;
    let found = filter.apply(&doctors);

    println!("{}", format!("=== Doctors ({} of {}) ===", found.len(), doctors.len()).cyan().bold());
    let widths = [6, 24, 20, 14, 28, 14];
    utils::print_table_border(110);
    utils::print_table_row(&["ID", "Name", "Specialty", "Phone", "Email", "City"], &widths);
    utils::print_table_border(110);
    for doctor in found {
        utils::print_table_row(
            &[
                &doctor.doctor_id,
                &doctor.name,
                &doctor.specialty,
                &doctor.phone,
                &doctor.email,
                &doctor.city,
            ],
            &widths,
        );
    }
    utils::print_table_border(110);
    Ok(())
}

fn show_stats(config: &Config, format: &str) -> error::Result<()> {
    let db = open_database(config)?;
    let stats = DashboardStats::compute(
        &db.list::<Donor>()?,
        &db.list::<Camp>()?,
        &db.list::<InventoryItem>()?,
        &db.list::<EmergencyRequest>()?,
    );

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "=== Donor Network Statistics ===".cyan().bold());
    println!("  Donors:           {}", stats.total_donors);
    println!("  Camps:            {}", stats.total_camps);
    println!("  Units in stock:   {}", stats.total_units.to_string().green());
    println!("  Urgent requests:  {}", stats.urgent_requests.to_string().red());

    println!("\n{}", "Units by blood group:".yellow());
    for entry in &stats.units_by_group {
        println!("  {:<4} {}", entry.blood_group.as_str(), entry.units);
    }
    Ok(())
}
