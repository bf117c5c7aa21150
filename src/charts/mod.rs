//! Charts module - chart data model, rebuild pipeline and drawing

mod builder;
mod format;
mod model;
mod plotter;

pub use builder::{build_charts, ViewQuery};
pub use format::{human_format, slider_label, thousands};
pub use model::{
    ChartSet, ChoroplethChart, IndicatorData, MapChart, RegionChart, TrendChart,
    CHOROPLETH_RANGE,
};
pub use plotter::ChartPlotter;
