use abode_core::filters;

use crate::cli::ParkingCommands;
use crate::commands::common::{
    format_parking_lines, open_session, parse_listing_id, print_json, read_record_file,
};
use crate::error::CliError;

pub async fn run_parking(
    command: ParkingCommands,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let context = open_session(global_profile)?;
    let store = &context.session.parking;

    match command {
        ParkingCommands::List {
            city,
            vehicle_type,
            json,
        } => {
            store.ensure_loaded().await?;
            let mut spots = match city.as_deref() {
                Some(city) => store.by_city(city),
                None => store.spots(),
            }
            .unwrap_or_default();
            if let Some(vehicle_type) = vehicle_type.as_deref() {
                spots = filters::by_vehicle_type(&spots, vehicle_type);
            }

            if json {
                print_json(&spots)?;
            } else {
                for line in format_parking_lines(&spots) {
                    println!("{line}");
                }
            }
        }
        ParkingCommands::Add { record } => {
            let body = read_record_file(&record.file)?;
            let created = store.add(&body).await?;
            println!("{}", created.id);
        }
        ParkingCommands::Update { id, record } => {
            let id = parse_listing_id(&id)?;
            let body = read_record_file(&record.file)?;
            let updated = store.update(&id, &body).await?;
            println!("{}", updated.id);
        }
        ParkingCommands::Delete { id } => {
            let id = parse_listing_id(&id)?;
            store.delete(&id).await?;
            println!("{id}");
        }
    }

    Ok(())
}
