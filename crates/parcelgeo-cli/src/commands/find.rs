//! Find command implementation

use crate::cli::FindArgs;
use crate::output::OutputWriter;
use crate::output_types::FoundPropertyRow;
use anyhow::Result;
use parcelgeo_catalog::Catalog;
use parcelgeo_core::models::{GeoPoint, RadiusQuery};
use parcelgeo_geo::geodesic_distance;

pub async fn execute(args: FindArgs, catalog: &Catalog, output: &OutputWriter) -> Result<()> {
    let center = GeoPoint::new(args.lon, args.lat);
    let query = RadiusQuery::new(center, args.distance)?;
    let properties = catalog.repository.find_within_radius(&query).await?;

    if output.is_json() {
        return output.result(properties);
    }

    output.section(format!(
        "Properties within {} m of ({}, {})",
        args.distance, args.lon, args.lat
    ));
    let rows: Vec<FoundPropertyRow> = properties
        .iter()
        .map(|property| FoundPropertyRow::new(property, geodesic_distance(center, property.geocode)))
        .collect();
    output.table(rows)
}
