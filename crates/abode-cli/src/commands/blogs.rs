use abode_core::{BlogStore, LoadMore};

use crate::cli::BlogCommands;
use crate::commands::common::{
    format_blog_lines, open_session, parse_listing_id, print_json, read_record_file,
};
use crate::error::CliError;

/// Load up to `pages` pages, stopping early once the feed is exhausted.
///
/// Returns the number of pages actually fetched.
pub async fn load_pages(store: &BlogStore, pages: usize) -> Result<usize, CliError> {
    let mut loaded = 0;
    while loaded < pages {
        match store.load_more_posts().await? {
            LoadMore::Loaded(_) => loaded += 1,
            LoadMore::Exhausted | LoadMore::Busy => break,
        }
    }
    Ok(loaded)
}

pub async fn run_blogs(
    command: BlogCommands,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let context = open_session(global_profile)?;
    let store = &context.session.blogs;

    match command {
        BlogCommands::List {
            pages,
            category,
            json,
        } => {
            let loaded = load_pages(store, pages.max(1)).await?;
            tracing::debug!(loaded, more = store.has_more(), "Fetched blog pages");
            let posts = match category.as_deref() {
                Some(category) => store.by_category(category),
                None => store.posts(),
            }
            .unwrap_or_default();

            if json {
                print_json(&posts)?;
            } else {
                for line in format_blog_lines(&posts) {
                    println!("{line}");
                }
                if store.has_more() {
                    println!("(more posts available; use --pages {})", loaded + 1);
                }
            }
        }
        BlogCommands::Add { record } => {
            let body = read_record_file(&record.file)?;
            let created = store.add(&body).await?;
            println!("{}", created.id);
        }
        BlogCommands::Update { id, record } => {
            let id = parse_listing_id(&id)?;
            let body = read_record_file(&record.file)?;
            let updated = store.update(&id, &body).await?;
            println!("{}", updated.id);
        }
        BlogCommands::Delete { id } => {
            let id = parse_listing_id(&id)?;
            store.delete(&id).await?;
            println!("{id}");
        }
    }

    Ok(())
}
