//! Show command implementation

use crate::cli::ShowArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use parcelgeo_catalog::Catalog;
use parcelgeo_core::models::PropertyId;

pub async fn execute(args: ShowArgs, catalog: &Catalog, output: &OutputWriter) -> Result<()> {
    let property = catalog.repository.get_by_id(&PropertyId::new(args.id)).await?;

    if output.is_json() {
        return output.result(property);
    }

    let [lon, lat] = property.geocode.coordinates();
    let bounds = property.image_bounds;

    output.section(format!("Property {}", property.id));
    output.kv("Geocode", format!("{:.7}, {:.7}", lon, lat));
    output.kv(
        "Image bounds",
        format!(
            "W {:.7}  S {:.7}  E {:.7}  N {:.7}",
            bounds.west, bounds.south, bounds.east, bounds.north
        ),
    );
    output.kv("Image URL", property.image_url.as_deref().unwrap_or("-"));

    output.section("Parcel");
    output.result(property.parcel_geometry.to_geojson())?;
    output.section("Building");
    output.result(property.building_geometry.to_geojson())?;
    Ok(())
}
