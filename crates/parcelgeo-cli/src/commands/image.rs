//! Image command implementation

use crate::cli::ImageArgs;
use crate::output::OutputWriter;
use crate::output_types::ImageOutput;
use anyhow::{Context, Result};
use parcelgeo_catalog::{Catalog, PropertyFacade};
use parcelgeo_core::models::PropertyId;

pub async fn execute(args: ImageArgs, catalog: &Catalog, output: &OutputWriter) -> Result<()> {
    let facade = PropertyFacade::open(catalog, PropertyId::new(args.id)).await?;
    let path = facade
        .ensure_image_downloaded()
        .await
        .with_context(|| format!("Image not found for property {}", facade.id()))?;

    if output.is_json() {
        return output.result(ImageOutput {
            id: facade.id().to_string(),
            path: path.display().to_string(),
        });
    }

    output.success(format!("Image for {} at {}", facade.id(), path.display()));
    Ok(())
}
