use abode_core::filters;
use abode_core::models::Property;

use crate::cli::PropertyCommands;
use crate::commands::common::{
    format_property_details, format_property_lines, open_session, parse_listing_id, print_json,
    read_record_file,
};
use crate::error::CliError;

/// Filters from `properties list`; every one that is set must match.
#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    pub category: Option<String>,
    pub city: Option<String>,
    pub price_range: Option<(f64, f64)>,
    pub posting_type: Option<String>,
}

impl PropertyFilter {
    pub fn apply(&self, mut properties: Vec<Property>) -> Vec<Property> {
        if let Some(category) = self.category.as_deref() {
            properties = filters::by_category(&properties, category);
        }
        if let Some(city) = self.city.as_deref() {
            properties = filters::by_city(&properties, city);
        }
        if let Some((min, max)) = self.price_range {
            properties = filters::by_price_range(&properties, min, max);
        }
        if let Some(posting_type) = self.posting_type.as_deref() {
            properties = filters::by_posting_type(&properties, posting_type);
        }
        properties
    }
}

pub async fn run_properties(
    command: PropertyCommands,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let context = open_session(global_profile)?;
    let store = &context.session.properties;

    match command {
        PropertyCommands::List {
            mine,
            category,
            city,
            min_price,
            max_price,
            posting_type,
            json,
        } => {
            let filter = PropertyFilter {
                category,
                city,
                price_range: min_price.zip(max_price),
                posting_type,
            };
            let properties = if mine {
                store.refresh_user_properties().await?;
                store.user_properties()
            } else {
                store.ensure_loaded().await?;
                store.properties()
            };
            let properties = filter.apply(properties.unwrap_or_default());

            if json {
                print_json(&properties)?;
            } else {
                for line in format_property_lines(&properties) {
                    println!("{line}");
                }
            }
        }
        PropertyCommands::Show { id, json } => {
            let id = parse_listing_id(&id)?;
            store.ensure_loaded().await?;
            let property = match store.property(&id) {
                Some(property) => property,
                None => {
                    // Own listings are not always part of the public feed.
                    store.ensure_user_properties_loaded().await?;
                    store
                        .property(&id)
                        .ok_or_else(|| CliError::NotFound(format!("property {id}")))?
                }
            };

            if json {
                print_json(&property)?;
            } else {
                let is_favorite = if context.session.auth.is_signed_in()? {
                    store.load_wishlist().await?;
                    store.is_favorite(&id)
                } else {
                    false
                };
                for line in format_property_details(&property, is_favorite) {
                    println!("{line}");
                }
            }
        }
        PropertyCommands::Add { record } => {
            let body = read_record_file(&record.file)?;
            let created = store.add(&body).await?;
            println!("{}", created.id);
        }
        PropertyCommands::Update { id, record } => {
            let id = parse_listing_id(&id)?;
            let body = read_record_file(&record.file)?;
            let updated = store.update(&id, &body).await?;
            println!("{}", updated.id);
        }
        PropertyCommands::Delete { id } => {
            let id = parse_listing_id(&id)?;
            store.delete(&id).await?;
            println!("{id}");
        }
        PropertyCommands::Favorite { id } => {
            let id = parse_listing_id(&id)?;
            store.load_wishlist().await?;
            if store.toggle_favorite(&id).await? {
                println!("Added {id} to wishlist");
            } else {
                println!("Removed {id} from wishlist");
            }
        }
        PropertyCommands::Wishlist { json } => {
            let favorites = store.load_wishlist().await?;
            let ids = favorites
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            if json {
                print_json(&ids)?;
            } else {
                for id in ids {
                    println!("{id}");
                }
            }
        }
    }

    Ok(())
}
