//! Data Processor Module
//! The filter/group transforms behind each chart. Every function re-runs
//! from scratch over the in-memory tables; there is no caching.

use crate::data::loader::Table;
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Metric selectable in the sub-region comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Metric {
    Confirmed,
    Deaths,
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Confirmed
    }
}

impl Metric {
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed",
            Metric::Deaths => "Deaths",
        }
    }

    pub fn label(&self) -> &'static str {
        self.column()
    }
}

/// Population scaling for the sub-region comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Scaling {
    /// Total values.
    Absolute,
    /// Values per 100,000 of population.
    PerCapita,
}

impl Default for Scaling {
    fn default() -> Self {
        Scaling::Absolute
    }
}

/// Latest-date totals backing the four indicator tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub cumulative_cases: f64,
    pub new_cases: f64,
    pub cumulative_deaths: f64,
    pub new_deaths: f64,
}

/// Date-ordered series for one sub-region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    pub name: String,
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

/// One marker of the scatter-geo map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub confirmed: f64,
    pub share_of_last_week: f64,
    /// Week-over-week change, carried as text for the hover label.
    pub percentage: String,
}

/// One country of the choropleth.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryValue {
    pub iso_alpha_3: String,
    pub name: String,
    pub value: f64,
}

/// Sum the indicator columns of the master table at its latest date,
/// worldwide or for one focus country.
pub fn latest_totals(master: &Table, focus: Option<&str>) -> Result<Totals, ProcessorError> {
    let mut lazy = master
        .df()
        .clone()
        .lazy()
        .filter(col("Date_reported").eq(lit(master.latest_date())));
    if let Some(country) = focus {
        lazy = lazy.filter(col("Country").eq(lit(country)));
    }
    let df = lazy.collect()?;

    Ok(Totals {
        cumulative_cases: column_sum(&df, "Cumulative_cases")?,
        new_cases: column_sum(&df, "New_cases")?,
        cumulative_deaths: column_sum(&df, "Cumulative_deaths")?,
        new_deaths: column_sum(&df, "New_deaths")?,
    })
}

/// Daily new cases and deaths over the whole reporting period, worldwide or
/// for one focus country. Output is date-ordered.
pub fn daily_new_series(
    master: &Table,
    focus: Option<&str>,
) -> Result<(Vec<String>, Vec<f64>, Vec<f64>), ProcessorError> {
    let df = match focus {
        Some(country) => master
            .df()
            .clone()
            .lazy()
            .filter(col("Country").eq(lit(country)))
            .collect()?,
        None => master.df().clone(),
    };

    let date_series = df.column("Date_reported")?;
    let cases = float_column(&df, "New_cases")?;
    let deaths = float_column(&df, "New_deaths")?;

    let mut by_date: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for i in 0..df.height() {
        let date = date_series.get(i)?;
        if date.is_null() {
            continue;
        }
        let key = date.to_string().trim_matches('"').to_string();
        let entry = by_date.entry(key).or_insert((0.0, 0.0));
        entry.0 += cases[i].unwrap_or(0.0);
        entry.1 += deaths[i].unwrap_or(0.0);
    }

    let mut dates = Vec::with_capacity(by_date.len());
    let mut case_values = Vec::with_capacity(by_date.len());
    let mut death_values = Vec::with_capacity(by_date.len());
    for (date, (c, d)) in by_date {
        dates.push(date);
        case_values.push(c);
        death_values.push(d);
    }
    Ok((dates, case_values, death_values))
}

/// Order a sub-region selection by its latest-date Confirmed total,
/// descending. Regions without a latest-date row drop out, matching the
/// comparison chart's trace set.
pub fn order_by_latest_confirmed(
    table: &Table,
    regions: &[String],
) -> Result<Vec<String>, ProcessorError> {
    let wanted: HashSet<&str> = regions.iter().map(String::as_str).collect();
    let df = table
        .df()
        .clone()
        .lazy()
        .filter(col("date").eq(lit(table.latest_date())))
        .collect()?;

    let names = df.column("Country/Region")?;
    let confirmed = float_column(&df, "Confirmed")?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for i in 0..df.height() {
        let name = names.get(i)?;
        if name.is_null() {
            continue;
        }
        let name = name.to_string().trim_matches('"').to_string();
        if !wanted.contains(name.as_str()) {
            continue;
        }
        *totals.entry(name).or_insert(0.0) += confirmed[i].unwrap_or(0.0);
    }

    let mut ordered: Vec<(String, f64)> = totals.into_iter().collect();
    ordered.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    Ok(ordered.into_iter().map(|(name, _)| name).collect())
}

/// Build one date-ordered series per region for the chosen metric. Regions
/// are extracted in parallel; the input order (see
/// [`order_by_latest_confirmed`]) is preserved in the output. Per-capita
/// scaling divides by the region's stored population divisor and drops
/// regions without one.
pub fn region_series(
    table: &Table,
    regions: &[String],
    metric: Metric,
    scaling: Scaling,
) -> Result<Vec<RegionSeries>, ProcessorError> {
    let extracted: Result<Vec<Option<RegionSeries>>, ProcessorError> = regions
        .par_iter()
        .map(|region| single_region_series(table, region, metric, scaling))
        .collect();
    Ok(extracted?.into_iter().flatten().collect())
}

fn single_region_series(
    table: &Table,
    region: &str,
    metric: Metric,
    scaling: Scaling,
) -> Result<Option<RegionSeries>, ProcessorError> {
    let df = table
        .df()
        .clone()
        .lazy()
        .filter(col("Country/Region").eq(lit(region)))
        .collect()?;
    if df.height() == 0 {
        return Ok(None);
    }

    let population = match scaling {
        Scaling::Absolute => None,
        Scaling::PerCapita => {
            let population = float_column(&df, "population")?
                .into_iter()
                .flatten()
                .find(|p| *p > 0.0);
            match population {
                Some(p) => Some(p),
                // No population on record: the per-capita chart drops the
                // region rather than plotting absolute values mislabelled.
                None => return Ok(None),
            }
        }
    };

    let date_series = df.column("date")?;
    let values = float_column(&df, metric.column())?;

    let mut by_date: BTreeMap<String, f64> = BTreeMap::new();
    for i in 0..df.height() {
        let date = date_series.get(i)?;
        if date.is_null() {
            continue;
        }
        let key = date.to_string().trim_matches('"').to_string();
        *by_date.entry(key).or_insert(0.0) += values[i].unwrap_or(0.0);
    }

    let mut dates = Vec::with_capacity(by_date.len());
    let mut series = Vec::with_capacity(by_date.len());
    for (date, total) in by_date {
        dates.push(date);
        series.push(match population {
            Some(p) => total / p,
            None => total,
        });
    }

    Ok(Some(RegionSeries {
        name: region.to_string(),
        dates,
        values: series,
    }))
}

/// Markers of the scatter-geo map at one date: every location with a
/// positive Confirmed count and usable coordinates.
pub fn map_points(table: &Table, date: &str) -> Result<Vec<MapPoint>, ProcessorError> {
    let df = table
        .df()
        .clone()
        .lazy()
        .filter(col("date").eq(lit(date)).and(col("Confirmed").gt(lit(0))))
        .collect()?;

    let names = df.column("Country/Region")?;
    let lats = float_column(&df, "Latitude")?;
    let lons = float_column(&df, "Longitude")?;
    let confirmed = float_column(&df, "Confirmed")?;
    let share = float_column(&df, "share_of_last_week")?;
    let percentage = df.column("percentage")?;

    let mut points = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(lat), Some(lon)) = (lats[i], lons[i]) else {
            continue;
        };
        let name = names.get(i)?;
        if name.is_null() {
            continue;
        }
        let pct = percentage.get(i)?;
        points.push(MapPoint {
            name: name.to_string().trim_matches('"').to_string(),
            lon,
            lat,
            confirmed: confirmed[i].unwrap_or(0.0),
            share_of_last_week: share[i].unwrap_or(0.0),
            percentage: if pct.is_null() {
                String::new()
            } else {
                pct.to_string().trim_matches('"').to_string()
            },
        });
    }
    Ok(points)
}

/// Cumulative confirmed cases per resolvable country at one date, for the
/// choropleth. Rows with a null `iso_alpha_3` are skipped silently.
pub fn choropleth_values(master: &Table, date: &str) -> Result<Vec<CountryValue>, ProcessorError> {
    let df = master
        .df()
        .clone()
        .lazy()
        .filter(col("Date_reported").eq(lit(date)))
        .collect()?;

    let isos = df.column("iso_alpha_3")?;
    let names = df.column("Country")?;
    let values = float_column(&df, "Cumulative_cases")?;

    let mut by_iso: BTreeMap<String, (String, f64)> = BTreeMap::new();
    for i in 0..df.height() {
        let iso = isos.get(i)?;
        if iso.is_null() {
            continue;
        }
        let iso = iso.to_string().trim_matches('"').to_string();
        let name = names.get(i)?;
        let name = if name.is_null() {
            String::new()
        } else {
            name.to_string().trim_matches('"').to_string()
        };
        let entry = by_iso.entry(iso).or_insert((name, 0.0));
        entry.1 += values[i].unwrap_or(0.0);
    }

    Ok(by_iso
        .into_iter()
        .map(|(iso, (name, value))| CountryValue {
            iso_alpha_3: iso,
            name,
            value,
        })
        .collect())
}

/// Column as nullable f64 values, whatever its inferred dtype.
fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(ca.into_iter().collect())
}

/// Sum of a column cast to f64; nulls count as zero.
fn column_sum(df: &DataFrame, name: &str) -> Result<f64, ProcessorError> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    Ok(cast.f64()?.sum().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master_table() -> Table {
        let df = DataFrame::new(vec![
            Column::new(
                "Date_reported".into(),
                vec![
                    "2020-03-01",
                    "2020-03-01",
                    "2020-03-02",
                    "2020-03-02",
                ],
            ),
            Column::new("Country".into(), vec!["France", "Spain", "France", "Spain"]),
            Column::new("New_cases".into(), vec![10i64, 20, 30, 40]),
            Column::new("Cumulative_cases".into(), vec![10i64, 20, 40, 60]),
            Column::new("New_deaths".into(), vec![1i64, 2, 3, 4]),
            Column::new("Cumulative_deaths".into(), vec![1i64, 2, 4, 6]),
            Column::new(
                "iso_alpha_3".into(),
                vec![
                    Some("FRA".to_string()),
                    None,
                    Some("FRA".to_string()),
                    None,
                ],
            ),
        ])
        .unwrap();
        Table::new(df, "Date_reported", "master").unwrap()
    }

    fn view_table() -> Table {
        let df = DataFrame::new(vec![
            Column::new(
                "date".into(),
                vec![
                    "2020-03-01",
                    "2020-03-02",
                    "2020-03-01",
                    "2020-03-02",
                    "2020-03-02",
                ],
            ),
            Column::new(
                "Country/Region".into(),
                vec!["France", "France", "Spain", "Spain", "Andorra"],
            ),
            Column::new("Confirmed".into(), vec![100i64, 200, 400, 800, 0]),
            Column::new("Deaths".into(), vec![5i64, 10, 20, 40, 0]),
            Column::new(
                "population".into(),
                vec![Some(670.0), Some(670.0), Some(470.0), Some(470.0), None],
            ),
            Column::new(
                "Latitude".into(),
                vec![Some(46.2), Some(46.2), Some(40.4), Some(40.4), None],
            ),
            Column::new(
                "Longitude".into(),
                vec![Some(2.2), Some(2.2), Some(-3.7), Some(-3.7), None],
            ),
            Column::new(
                "percentage".into(),
                vec!["12.5", "13.0", "7.5", "8.0", "0.0"],
            ),
            Column::new(
                "share_of_last_week".into(),
                vec![40.0f64, 45.0, 20.0, 25.0, 0.0],
            ),
        ])
        .unwrap();
        Table::new(df, "date", "view").unwrap()
    }

    #[test]
    fn worldwide_totals_sum_every_country() {
        let totals = latest_totals(&master_table(), None).unwrap();
        assert_eq!(totals.cumulative_cases, 100.0);
        assert_eq!(totals.new_cases, 70.0);
        assert_eq!(totals.cumulative_deaths, 10.0);
        assert_eq!(totals.new_deaths, 7.0);
    }

    #[test]
    fn focus_totals_keep_one_country() {
        let totals = latest_totals(&master_table(), Some("France")).unwrap();
        assert_eq!(totals.cumulative_cases, 40.0);
        assert_eq!(totals.new_cases, 30.0);
    }

    #[test]
    fn daily_series_group_by_date() {
        let (dates, cases, deaths) = daily_new_series(&master_table(), None).unwrap();
        assert_eq!(dates, ["2020-03-01", "2020-03-02"]);
        assert_eq!(cases, [30.0, 70.0]);
        assert_eq!(deaths, [3.0, 7.0]);

        let (_, cases, _) = daily_new_series(&master_table(), Some("Spain")).unwrap();
        assert_eq!(cases, [20.0, 40.0]);
    }

    #[test]
    fn regions_order_by_latest_confirmed_descending() {
        let regions = vec!["France".to_string(), "Spain".to_string()];
        let ordered = order_by_latest_confirmed(&view_table(), &regions).unwrap();
        assert_eq!(ordered, ["Spain", "France"]);
    }

    #[test]
    fn absolute_series_sum_per_date() {
        let regions = vec!["Spain".to_string(), "France".to_string()];
        let series =
            region_series(&view_table(), &regions, Metric::Confirmed, Scaling::Absolute).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Spain");
        assert_eq!(series[0].values, [400.0, 800.0]);
        assert_eq!(series[1].values, [100.0, 200.0]);
    }

    #[test]
    fn per_capita_series_divide_by_population() {
        let regions = vec!["France".to_string()];
        let series =
            region_series(&view_table(), &regions, Metric::Deaths, Scaling::PerCapita).unwrap();
        assert_eq!(series[0].values, [5.0 / 670.0, 10.0 / 670.0]);
    }

    #[test]
    fn per_capita_drops_regions_without_population() {
        let regions = vec!["Andorra".to_string()];
        let series =
            region_series(&view_table(), &regions, Metric::Confirmed, Scaling::PerCapita).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn map_points_require_positive_confirmed_and_coordinates() {
        let points = map_points(&view_table(), "2020-03-02").unwrap();
        // Andorra reports zero confirmed and no coordinates at this date.
        assert_eq!(points.len(), 2);
        let spain = points.iter().find(|p| p.name == "Spain").unwrap();
        assert_eq!(spain.confirmed, 800.0);
        assert_eq!(spain.percentage, "8.0");
        assert_eq!(spain.share_of_last_week, 25.0);
    }

    #[test]
    fn choropleth_skips_unresolved_countries() {
        let values = choropleth_values(&master_table(), "2020-03-02").unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].iso_alpha_3, "FRA");
        assert_eq!(values[0].name, "France");
        assert_eq!(values[0].value, 40.0);
    }
}
