//! List command implementation

use crate::cli::ListArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use parcelgeo_catalog::Catalog;
use parcelgeo_core::models::PageRequest;

pub async fn execute(args: ListArgs, catalog: &Catalog, output: &OutputWriter) -> Result<()> {
    let page = PageRequest::new(args.size, args.page)?;
    let ids = catalog.repository.list_ids(&page).await?;

    if output.is_json() {
        return output.result(ids);
    }

    output.section(format!("Properties (page {}, size {})", page.page(), page.size()));
    for id in &ids {
        println!("{}", id);
    }
    output.info(format!("{} id(s)", ids.len()));
    Ok(())
}
