//! Basemap Loader
//! Natural Earth country polygons for the map charts, read from a GeoJSON
//! FeatureCollection. The basemap is optional: without it the scatter-geo
//! chart draws markers only and the choropleth has nothing to fill.

use anyhow::{Context, Result};
use geojson::{GeoJson, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Property keys that carry the alpha-3 code in Natural Earth exports.
const ISO_KEYS: [&str; 3] = ["ISO_A3", "ADM0_A3", "iso_a3"];

/// Country polygon rings keyed by ISO alpha-3, plus a flat outline list for
/// the map backdrop.
pub struct Basemap {
    countries: HashMap<String, Vec<Vec<[f64; 2]>>>,
    outlines: Vec<Vec<[f64; 2]>>,
}

impl Basemap {
    pub fn empty() -> Self {
        Self {
            countries: HashMap::new(),
            outlines: Vec::new(),
        }
    }

    /// Load country polygons from a GeoJSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading basemap {}", path.display()))?;
        let geojson: GeoJson = content
            .parse()
            .with_context(|| format!("parsing basemap {}", path.display()))?;
        Ok(Self::from_geojson(&geojson))
    }

    fn from_geojson(geojson: &GeoJson) -> Self {
        let mut basemap = Self::empty();

        let GeoJson::FeatureCollection(collection) = geojson else {
            return basemap;
        };

        for feature in &collection.features {
            let iso = feature.properties.as_ref().and_then(|props| {
                ISO_KEYS.iter().find_map(|key| {
                    props
                        .get(*key)
                        .and_then(|v| v.as_str())
                        .filter(|code| code.len() == 3 && *code != "-99")
                        .map(|code| code.to_string())
                })
            });

            let Some(geometry) = &feature.geometry else {
                continue;
            };

            let mut rings: Vec<Vec<[f64; 2]>> = Vec::new();
            match &geometry.value {
                Value::Polygon(polygon) => {
                    if let Some(ring) = polygon.first() {
                        rings.push(to_ring(ring));
                    }
                }
                Value::MultiPolygon(polygons) => {
                    for polygon in polygons {
                        if let Some(ring) = polygon.first() {
                            rings.push(to_ring(ring));
                        }
                    }
                }
                _ => continue,
            }

            basemap.outlines.extend(rings.iter().cloned());
            if let Some(iso) = iso {
                basemap.countries.entry(iso).or_default().extend(rings);
            }
        }

        basemap
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    /// Every exterior ring, for drawing the map backdrop.
    pub fn outlines(&self) -> &[Vec<[f64; 2]>] {
        &self.outlines
    }

    /// Polygon rings for one country.
    pub fn rings_for(&self, iso3: &str) -> Option<&Vec<Vec<[f64; 2]>>> {
        self.countries.get(iso3)
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }
}

/// Exterior ring positions as [lon, lat] pairs.
fn to_ring(ring: &[Vec<f64>]) -> Vec<[f64; 2]> {
    ring.iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| [pos[0], pos[1]])
        .collect()
}
