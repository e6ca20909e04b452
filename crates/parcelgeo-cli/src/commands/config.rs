//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use parcelgeo_core::config::LayeredConfig;

pub fn execute(settings: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut rows: Vec<ConfigRow> = settings
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    output.section("Effective Configuration");
    output.table(rows)
}
