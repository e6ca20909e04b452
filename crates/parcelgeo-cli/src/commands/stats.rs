//! Stats command implementation

use crate::cli::StatsArgs;
use crate::output::OutputWriter;
use crate::output_types::StatsOutput;
use anyhow::Result;
use parcelgeo_catalog::{validate_zone_radius, Catalog, PropertyFacade};
use parcelgeo_core::config::LayeredConfig;
use parcelgeo_core::models::PropertyId;

pub async fn execute(
    args: StatsArgs,
    catalog: &Catalog,
    settings: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    // --zone-size is layered into the settings as a CLI override
    let zone_size_m = settings.zone_size_m.value;
    validate_zone_radius(zone_size_m)?;

    let facade = PropertyFacade::open(catalog, PropertyId::new(args.id)).await?;
    let statistics = facade.statistics(zone_size_m).await?;

    if output.is_json() {
        return output.result(StatsOutput {
            zone_size_m,
            statistics,
        });
    }

    output.section(format!("Statistics for {}", statistics.property_id));
    output.kv("Zone radius", format!("{} m", zone_size_m));
    output.kv("Parcel area", format!("{:.2} m²", statistics.parcel_area_sqm));
    output.kv("Building area", format!("{:.2} m²", statistics.building_area_sqm));
    output.kv("Building distance", format!("{:.2} m", statistics.building_distance_m));
    output.kv("Zone density", format!("{:.4}", statistics.zone_density));
    Ok(())
}
