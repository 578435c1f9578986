use crate::cli::GymCommands;
use crate::commands::common::{
    format_gym_lines, open_session, parse_listing_id, print_json, read_record_file,
};
use crate::error::CliError;

pub async fn run_gyms(command: GymCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let context = open_session(global_profile)?;
    let store = &context.session.gyms;

    match command {
        GymCommands::List { city, json } => {
            store.ensure_loaded().await?;
            let gyms = match city.as_deref() {
                Some(city) => store.by_city(city),
                None => store.gyms(),
            }
            .unwrap_or_default();

            if json {
                print_json(&gyms)?;
            } else {
                for line in format_gym_lines(&gyms) {
                    println!("{line}");
                }
            }
        }
        GymCommands::Add { record } => {
            let body = read_record_file(&record.file)?;
            let created = store.add(&body).await?;
            println!("{}", created.id);
        }
        GymCommands::Update { id, record } => {
            let id = parse_listing_id(&id)?;
            let body = read_record_file(&record.file)?;
            let updated = store.update(&id, &body).await?;
            println!("{}", updated.id);
        }
        GymCommands::Delete { id } => {
            let id = parse_listing_id(&id)?;
            store.delete(&id).await?;
            println!("{id}");
        }
    }

    Ok(())
}
