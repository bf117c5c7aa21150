//! Data module - CSV loading and filter/group transforms

mod loader;
mod processor;

pub use loader::{DataStore, LoaderError, Table};
pub use processor::{
    choropleth_values, daily_new_series, latest_totals, map_points, order_by_latest_confirmed,
    region_series, CountryValue, MapPoint, Metric, ProcessorError, RegionSeries, Scaling, Totals,
};
