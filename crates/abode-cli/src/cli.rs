use std::path::PathBuf;

use abode_core::AuthScheme;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "abode")]
#[command(about = "Browse and manage Abode listings from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name (API base URL and stored token)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign in, inspect, or clear the stored token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Property listings and the wishlist
    #[command(alias = "property")]
    Properties {
        #[command(subcommand)]
        command: PropertyCommands,
    },
    /// Gym listings
    #[command(alias = "gym")]
    Gyms {
        #[command(subcommand)]
        command: GymCommands,
    },
    /// Parking spots
    Parking {
        #[command(subcommand)]
        command: ParkingCommands,
    },
    /// Blog posts
    #[command(alias = "blog")]
    Blogs {
        #[command(subcommand)]
        command: BlogCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum AuthSchemeArg {
    Raw,
    Bearer,
}

impl From<AuthSchemeArg> for AuthScheme {
    fn from(value: AuthSchemeArg) -> Self {
        match value {
            AuthSchemeArg::Raw => Self::Raw,
            AuthSchemeArg::Bearer => Self::Bearer,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Listings API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// How the token is sent in the Authorization header
        #[arg(long, value_enum)]
        auth_scheme: Option<AuthSchemeArg>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Login with email/password and store the token in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Store an existing API token for the profile
    Token {
        /// Token issued by the backend
        token: String,
    },
    /// Show auth status for profile
    Status,
    /// Clear the stored token
    Logout,
}

/// Path to a JSON record used as a create/update request body.
#[derive(Args, Debug)]
pub struct RecordFile {
    /// JSON file with the record fields (`-` for stdin)
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum PropertyCommands {
    /// List properties, optionally filtered
    List {
        /// List your own properties instead of the public feed
        #[arg(long)]
        mine: bool,
        /// Exact category (e.g. Residential)
        #[arg(long)]
        category: Option<String>,
        /// City, case-insensitive
        #[arg(long)]
        city: Option<String>,
        /// Minimum expected price (inclusive)
        #[arg(long, requires = "max_price")]
        min_price: Option<f64>,
        /// Maximum expected price (inclusive)
        #[arg(long, requires = "min_price")]
        max_price: Option<f64>,
        /// Exact posting type (e.g. Sell, Rent)
        #[arg(long)]
        posting_type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one property
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a property
    Add {
        #[command(flatten)]
        record: RecordFile,
    },
    /// Update a property
    Update {
        id: String,
        #[command(flatten)]
        record: RecordFile,
    },
    /// Delete a property
    Delete { id: String },
    /// Add or remove a property from the wishlist
    Favorite { id: String },
    /// List wishlisted property ids
    Wishlist {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum GymCommands {
    /// List gyms
    List {
        /// City, case-insensitive
        #[arg(long)]
        city: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a gym
    Add {
        #[command(flatten)]
        record: RecordFile,
    },
    /// Update a gym
    Update {
        id: String,
        #[command(flatten)]
        record: RecordFile,
    },
    /// Delete a gym
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ParkingCommands {
    /// List parking spots
    List {
        /// City, case-insensitive
        #[arg(long)]
        city: Option<String>,
        /// Vehicle type, case-insensitive
        #[arg(long)]
        vehicle_type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a parking spot
    Add {
        #[command(flatten)]
        record: RecordFile,
    },
    /// Update a parking spot
    Update {
        id: String,
        #[command(flatten)]
        record: RecordFile,
    },
    /// Delete a parking spot
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum BlogCommands {
    /// List blog posts page by page
    List {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,
        /// Exact category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a blog post
    Add {
        #[command(flatten)]
        record: RecordFile,
    },
    /// Update a blog post
    Update {
        id: String,
        #[command(flatten)]
        record: RecordFile,
    },
    /// Delete a blog post
    Delete { id: String },
}
