use parcelgeo_core::config::ConfigSource;
use parcelgeo_core::models::{Property, Statistics};
use serde::Serialize;
use tabled::Tabled;

/// One row of `find` output
#[derive(Debug, Serialize, Tabled)]
pub struct FoundPropertyRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Longitude")]
    pub lon: f64,
    #[tabled(rename = "Latitude")]
    pub lat: f64,
    #[tabled(rename = "Distance (m)", display_with = "format_meters")]
    pub distance_m: f64,
}

impl FoundPropertyRow {
    pub fn new(property: &Property, distance_m: f64) -> Self {
        let [lon, lat] = property.geocode.coordinates();
        Self {
            id: property.id.to_string(),
            lon,
            lat,
            distance_m,
        }
    }
}

/// Output for the `stats` command
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub zone_size_m: f64,
    #[serde(flatten)]
    pub statistics: Statistics,
}

/// Output for the `image` command
#[derive(Debug, Serialize)]
pub struct ImageOutput {
    pub id: String,
    pub path: String,
}

/// One row of `config` output
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source", display_with = "format_source")]
    pub source: ConfigSource,
}

/// One row of `db status` output
#[derive(Debug, Serialize, Tabled)]
pub struct MigrationRow {
    #[tabled(rename = "Version")]
    pub version: i64,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Applied")]
    pub applied: bool,
}

fn format_meters(value: &f64) -> String {
    format!("{:.1}", value)
}

fn format_source(source: &ConfigSource) -> String {
    format!("{:?}", source).to_lowercase()
}
