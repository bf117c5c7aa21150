//! Geo module - region views, country codes and the map basemap

mod basemap;
mod codes;
mod region;

pub use basemap::Basemap;
pub use codes::country_code;
pub use region::{MapFrame, RegionView};
