//! Command implementations

mod config;
mod db;
mod find;
mod image;
mod list;
mod show;
mod stats;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_settings;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::Result;
use parcelgeo_catalog::{Catalog, HttpImageSource, ImageCache};
use parcelgeo_core::config::{CliConfigOverrides, LayeredConfig};
use std::sync::Arc;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let zone_size_m = match &cli.command {
        Commands::Stats(args) => args.zone_size.map(f64::from),
        _ => None,
    };
    let settings = load_settings(
        cli.config.as_deref(),
        CliConfigOverrides {
            zone_size_m,
            image_dir: cli.image_dir.clone(),
            query_timeout_secs: cli.query_timeout_secs,
        },
    )?;

    match cli.command {
        Commands::Config => config::execute(&settings, &output),
        Commands::Db(args) => db::execute(args, &settings, &output).await,
        command => {
            let storage = Storage::new(cli.storage, cli.fixture, settings.query_timeout()).await?;
            let catalog = build_catalog(&storage, &settings)?;

            let result = match command {
                Commands::List(args) => list::execute(args, &catalog, &output).await,
                Commands::Show(args) => show::execute(args, &catalog, &output).await,
                Commands::Find(args) => find::execute(args, &catalog, &output).await,
                Commands::Stats(args) => stats::execute(args, &catalog, &settings, &output).await,
                Commands::Image(args) => image::execute(args, &catalog, &output).await,
                Commands::Config | Commands::Db(_) => Ok(()),
            };

            storage.close().await;
            result
        }
    }
}

fn build_catalog(storage: &Storage, settings: &LayeredConfig) -> Result<Catalog> {
    let images = ImageCache::new(
        settings.image_dir.value.clone(),
        Arc::new(HttpImageSource::new(settings.image_timeout())?),
    );
    Ok(Catalog::new(storage.store.clone(), images))
}
