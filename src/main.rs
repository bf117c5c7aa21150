//! Covid Atlas - COVID-19 Case Data Dashboard
//!
//! Loads the pre-aggregated case/death tables at startup and renders eight
//! linked charts driven by the control panel.

mod charts;
mod data;
mod geo;
mod gui;
mod theme;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use data::DataStore;
use eframe::egui;
use geo::Basemap;
use gui::DashboardApp;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "COVID-19 case data dashboard", long_about = None)]
struct Cli {
    /// Directory holding the dashboard CSV files
    #[arg(long, default_value = "data", value_hint = ValueHint::DirPath)]
    data_dir: PathBuf,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("covid_atlas=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = DataStore::load(&cli.data_dir)
        .with_context(|| format!("loading dashboard tables from {}", cli.data_dir.display()))?;
    info!(
        countries = store.countries().len(),
        dates = store.slider_dates().len(),
        "dashboard tables loaded"
    );

    // The basemap is optional: without it the maps degrade to markers only.
    let basemap_path = cli.data_dir.join("world_countries.geojson");
    let basemap = match Basemap::load(&basemap_path) {
        Ok(basemap) => {
            info!(countries = basemap.country_count(), "basemap loaded");
            basemap
        }
        Err(e) => {
            warn!("basemap unavailable: {e:#}");
            Basemap::empty()
        }
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("Covid Atlas"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Covid Atlas",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, store, basemap)))),
    )
    .map_err(|e| anyhow!("failed to start UI: {e}"))
}
