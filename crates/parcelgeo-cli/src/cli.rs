use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// parcelgeo - Query and measure real-estate parcels
#[derive(Parser, Debug)]
#[command(name = "parcelgeo")]
#[command(about = "Query and measure real-estate parcels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage backend to use (memory or postgres)
    #[arg(long, global = true, default_value = "memory")]
    pub storage: StorageBackend,

    /// Property fixture loaded into the in-memory store (or PARCELGEO_FIXTURE)
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// TOML configuration file (or PARCELGEO_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for downloaded property images
    #[arg(long, global = true)]
    pub image_dir: Option<PathBuf>,

    /// Upper bound in seconds on a single geometry store call
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub query_timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageBackend {
    /// In-memory store, optionally seeded from --fixture
    Memory,
    /// PostGIS database named by DATABASE_URL
    Postgres,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List property ids one page at a time
    List(ListArgs),

    /// Show the full record of one property
    Show(ShowArgs),

    /// Find properties near a point
    Find(FindArgs),

    /// Compute statistics for one property
    Stats(StatsArgs),

    /// Download a property image into the local cache
    Image(ImageArgs),

    /// Show effective configuration and where each value came from
    Config,

    /// Manage the PostGIS schema
    Db(DbArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Number of ids per page (1-1000)
    #[arg(long, default_value = "10")]
    pub size: i64,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: i64,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Property id
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct FindArgs {
    /// Longitude of the search center (WGS84)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Latitude of the search center (WGS84)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Search radius in meters
    #[arg(long, allow_negative_numbers = true)]
    pub distance: f64,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Property id
    pub id: String,

    /// Zone radius in whole meters (defaults to the configured zone size)
    #[arg(long)]
    pub zone_size: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct ImageArgs {
    /// Property id
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Show applied and pending migrations
    Status,

    /// Apply pending migrations
    Migrate,
}
