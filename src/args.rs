//! Command-line argument definition and processing.

use clap::Parser;
use std::path::PathBuf;

/// Tripsea - headless client for place search, list filtering, group views and shared routes
#[derive(Parser, Debug)]
#[command(name = "tripsea")]
#[command(version)]
#[command(about = "Search places, filter lists, inspect group views and edit shared routes", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Reference latitude for radius/nearest searches and list distances
    #[arg(long)]
    pub lat: Option<f64>,

    /// Reference longitude for radius/nearest searches and list distances
    #[arg(long)]
    pub lon: Option<f64>,

    /// Search radius in kilometers (defaults to the configured radius)
    #[arg(long)]
    pub km: Option<f64>,

    /// Bounding-box search as north,south,east,west
    #[arg(long)]
    pub bbox: Option<String>,

    /// K-nearest search with the given k (requires --lat/--lon)
    #[arg(long)]
    pub nearest: Option<usize>,

    /// Show a personal list instead of searching (visited, wishlist, liked)
    #[arg(short, long)]
    pub list: Option<String>,

    /// Add a place to a personal list: visited, wishlist, liked (with --place)
    #[arg(long)]
    pub mark: Option<String>,

    /// Remove a place from a personal list (with --place)
    #[arg(long)]
    pub unmark: Option<String>,

    /// Place id for --mark/--unmark
    #[arg(long)]
    pub place: Option<i64>,

    /// List the groups you belong to
    #[arg(long)]
    pub groups: bool,

    /// Restrict to place types (comma-separated: brewery,restaurant,tourist_place,hotel)
    #[arg(long = "type", value_delimiter = ',')]
    pub place_types: Vec<String>,

    /// Minimum rating (places without a rating are hidden while set)
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Maximum distance in kilometers (location-relative results only)
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Restrict to states (comma-separated, verbatim match)
    #[arg(long, value_delimiter = ',')]
    pub state: Vec<String>,

    /// Free-text filter over name/city/state/country
    #[arg(short, long)]
    pub query: Option<String>,

    /// Cuisine filter text (comma/semicolon-delimited, fuzzy match)
    #[arg(long)]
    pub cuisine: Option<String>,

    /// Accepted price tiers 1-4 (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub price: Vec<u8>,

    /// Required dietary options (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub dietary: Vec<String>,

    /// Only restaurants offering delivery (no data passes)
    #[arg(long)]
    pub delivery: bool,

    /// Only restaurants offering takeout (no data passes)
    #[arg(long)]
    pub takeout: bool,

    /// Only restaurants taking reservations (no data passes)
    #[arg(long)]
    pub reservations: bool,

    /// Substring to look for in restaurant opening hours
    #[arg(long)]
    pub restaurant_hours: Option<String>,

    /// Restaurant rating thresholds, keep when rating >= any (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub restaurant_rating: Vec<f64>,

    /// Accepted tourist place kinds (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tourist_type: Vec<String>,

    /// Accepted entry-fee buckets: free, 1-10, 11-25, 25+ (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub entry_fee: Vec<String>,

    /// Only tourist places positively marked family friendly
    #[arg(long)]
    pub family_friendly: bool,

    /// Only tourist places positively marked accessible
    #[arg(long)]
    pub accessibility: bool,

    /// Only tourist places positively marked pet friendly
    #[arg(long)]
    pub pet_friendly: bool,

    /// Only tourist places positively offering guided tours
    #[arg(long)]
    pub guided_tours: bool,

    /// Substring to look for in tourist place opening hours
    #[arg(long)]
    pub tourist_hours: Option<String>,

    /// Tourist rating thresholds, keep when rating >= any (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tourist_rating: Vec<f64>,

    /// Group id: show the group's places, or the route with --route
    #[arg(short, long)]
    pub group: Option<i64>,

    /// Member user ids to include in the group view (default: every member)
    #[arg(long, value_delimiter = ',')]
    pub members: Vec<i64>,

    /// Statuses to match per member: visited, wishlist, liked, none
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<String>,

    /// Show the group's route (with --group)
    #[arg(long)]
    pub route: bool,

    /// Append places to the route by place id (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub route_add: Vec<i64>,

    /// Remove places from the route by place id (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub route_remove: Vec<i64>,

    /// Move a route stop: FROM,TO (splice move, 0-based)
    #[arg(long)]
    pub route_move: Option<String>,

    /// Insert a place at a position: PLACE_ID,INDEX
    #[arg(long)]
    pub route_insert: Option<String>,

    /// Persist route edits to the backend (edits are lost otherwise)
    #[arg(long)]
    pub route_save: bool,

    /// Write the filtered results as CSV to this path ("-" for stdout)
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Write the filtered results as GeoJSON to this path ("-" for stdout)
    #[arg(long)]
    pub export_geojson: Option<PathBuf>,

    /// Backend base URL (overrides settings.toml)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
}

/// What: Resolve the effective log level from the parsed arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - `"debug"` when `--verbose` is set, otherwise the `--log-level` value.
#[must_use]
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}
