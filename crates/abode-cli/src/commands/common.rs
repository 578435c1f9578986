use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use abode_core::models::{BlogPost, Gym, Owner, ParkingSpot, Pricing, Property};
use abode_core::{ListingId, Session};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::KeyringTokenStore;
use crate::config_profiles::{resolve_client_config, CliProfilesConfig};
use crate::error::CliError;

/// A connected session plus the profile it was resolved from.
pub struct CommandContext {
    pub profile_name: String,
    pub session: Session,
}

pub fn open_session(global_profile: Option<&str>) -> Result<CommandContext, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let client_config = resolve_client_config(config.profile(&profile_name))?;

    let tokens = Arc::new(KeyringTokenStore::new(&profile_name));
    let session = Session::connect(&client_config, tokens)?;
    let expired_profile = profile_name.clone();
    session.on_sign_out(move || {
        tracing::warn!(
            "Stored token for profile '{}' was rejected; run `abode auth login` again",
            expired_profile
        );
    });

    Ok(CommandContext {
        profile_name,
        session,
    })
}

pub fn parse_listing_id(raw: &str) -> Result<ListingId, CliError> {
    Ok(raw.parse::<ListingId>()?)
}

/// Read a JSON object from `path`, or from stdin when `path` is `-`.
pub fn read_record_file(path: &Path) -> Result<Map<String, Value>, CliError> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().lock().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    parse_record(&raw, path)
}

pub fn parse_record(raw: &str, path: &Path) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(record) => Ok(record),
        _ => Err(CliError::InvalidRecordFile {
            path: path.display().to_string(),
        }),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn price_label(pricing: &Pricing) -> String {
    pricing
        .primary()
        .map_or_else(|| "-".to_string(), |price| price.to_string())
}

fn owner_label(owner: Option<&Owner>) -> &str {
    owner.map_or("", Owner::display_name)
}

pub fn format_property_lines(properties: &[Property]) -> Vec<String> {
    properties
        .iter()
        .map(|property| {
            format!(
                "{:<24}  {:<12}  {:<6}  {:>12}  {}",
                property.id,
                preview(&property.category, 12),
                preview(&property.posting_type, 6),
                price_label(&property.pricing),
                property.title
            )
        })
        .collect()
}

pub fn format_property_details(property: &Property, is_favorite: bool) -> Vec<String> {
    let mut lines = vec![
        property.title.clone(),
        format!("id:        {}", property.id),
        format!("category:  {}", property.category),
        format!("posting:   {}", property.posting_type),
        format!("price:     {}", price_label(&property.pricing)),
    ];
    if let Some(bedrooms) = property.bedrooms {
        lines.push(format!("bedrooms:  {bedrooms}"));
    }
    if let Some(bathrooms) = property.bathrooms {
        lines.push(format!("bathrooms: {bathrooms}"));
    }
    if !property.amenities.is_empty() {
        lines.push(format!("amenities: {}", property.amenities.join(", ")));
    }
    let owner = owner_label(property.user.as_ref());
    if !owner.is_empty() {
        lines.push(format!("owner:     {owner}"));
    }
    if is_favorite {
        lines.push("wishlisted".to_string());
    }
    lines
}

pub fn format_gym_lines(gyms: &[Gym]) -> Vec<String> {
    gyms.iter()
        .map(|gym| {
            format!(
                "{:<24}  {:<30}  {:<14}  {:>10}",
                gym.id,
                preview(&gym.name, 30),
                preview(&gym.location.city, 14),
                price_label(&gym.pricing)
            )
        })
        .collect()
}

pub fn format_parking_lines(spots: &[ParkingSpot]) -> Vec<String> {
    spots
        .iter()
        .map(|spot| {
            format!(
                "{:<24}  {:<30}  {:<8}  {:<14}  {:>10}",
                spot.id,
                preview(&spot.title, 30),
                preview(&spot.vehicle_type, 8),
                preview(&spot.location.city, 14),
                price_label(&spot.pricing)
            )
        })
        .collect()
}

pub fn format_blog_lines(posts: &[BlogPost]) -> Vec<String> {
    let now = Utc::now();
    posts
        .iter()
        .map(|post| {
            let age = post
                .created_at
                .map_or_else(String::new, |created_at| format_relative_time(created_at, now));
            format!(
                "{:<24}  {:<40}  {:<12}  {}",
                post.id,
                preview(&post.title, 40),
                preview(&post.category, 12),
                age
            )
        })
        .collect()
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now
        .signed_duration_since(timestamp)
        .num_milliseconds()
        .max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
