//! Chart Data Model
//! The eight chart payloads produced by one rebuild. Pure data: the plotter
//! turns these into egui_plot items.

use crate::data::{CountryValue, MapPoint, RegionSeries};
use crate::geo::MapFrame;

/// Fixed color range of the choropleth, matching the upstream dashboard.
pub const CHOROPLETH_RANGE: (f64, f64) = (0.0, 5_000_000.0);

/// One summary indicator tile.
#[derive(Debug, Clone)]
pub struct IndicatorData {
    pub title: &'static str,
    pub value: f64,
}

/// Daily new cases/deaths over the reporting period.
#[derive(Debug, Clone)]
pub struct TrendChart {
    pub title: String,
    pub dates: Vec<String>,
    pub confirmed: Vec<f64>,
    pub deaths: Vec<f64>,
}

/// One line per selected sub-region.
#[derive(Debug, Clone)]
pub struct RegionChart {
    pub title: String,
    pub series: Vec<RegionSeries>,
}

/// Scatter-geo markers at the slider date.
#[derive(Debug, Clone)]
pub struct MapChart {
    pub title: String,
    pub date: String,
    pub frame: MapFrame,
    pub points: Vec<MapPoint>,
}

/// Country fills at the slider date.
#[derive(Debug, Clone)]
pub struct ChoroplethChart {
    pub title: String,
    pub date: String,
    pub values: Vec<CountryValue>,
}

/// Everything one rebuild produces.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub indicators: [IndicatorData; 4],
    pub trend: TrendChart,
    pub regions: RegionChart,
    pub map: MapChart,
    pub choropleth: ChoroplethChart,
}
