//! CSV Data Loader Module
//! Loads the pre-aggregated dashboard tables once at startup using Polars.
//! All tables are read-only for the remainder of the process.

use crate::geo::country_code;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("{file}: unparseable date {value:?}")]
    BadDate { file: String, value: String },
    #[error("{0}: no rows")]
    EmptyTable(String),
}

/// A loaded table plus its sorted unique date axis.
#[derive(Debug)]
pub struct Table {
    df: DataFrame,
    dates: Vec<String>,
}

impl Table {
    /// Wrap a frame, extracting and validating its date axis.
    pub fn new(df: DataFrame, date_col: &str, file: &str) -> Result<Self, LoaderError> {
        let dates = unique_strings(&df, date_col)?;
        if dates.is_empty() {
            return Err(LoaderError::EmptyTable(file.to_string()));
        }
        for date in &dates {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Err(LoaderError::BadDate {
                    file: file.to_string(),
                    value: date.clone(),
                });
            }
        }
        Ok(Self { df, dates })
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    /// Sorted unique dates; ISO strings sort chronologically.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn latest_date(&self) -> &str {
        self.dates.last().map(String::as_str).unwrap_or_default()
    }

    /// Date addressed by a slider index, clamped to the axis.
    pub fn date_at(&self, index: usize) -> &str {
        let idx = index.min(self.dates.len().saturating_sub(1));
        &self.dates[idx]
    }
}

/// All dashboard tables, loaded once and shared read-only.
pub struct DataStore {
    master: Table,
    worldwide: Table,
    us: Table,
    eu: Table,
    china: Table,
    us_counties: Table,
    countries: Vec<String>,
    worldwide_regions: Vec<String>,
}

impl DataStore {
    /// Load every table from the data directory.
    pub fn load(data_dir: &Path) -> Result<Self, LoaderError> {
        let mut master = read_csv(&data_dir.join("WHO-COVID-19-global-data.csv"))?;
        attach_iso_alpha_3(&mut master)?;

        let worldwide = read_csv(&data_dir.join("df_worldwide.csv"))?;
        let us = read_csv(&data_dir.join("df_us.csv"))?;
        let eu = read_csv(&data_dir.join("df_eu.csv"))?;
        let china = read_csv(&data_dir.join("df_china.csv"))?;

        // The county table is split into four files upstream for hosting
        // limits; reassemble it here.
        let mut us_counties = read_csv(&data_dir.join("df_us_county1.csv"))?;
        for name in ["df_us_county2.csv", "df_us_county3.csv", "df_us_county4.csv"] {
            let part = read_csv(&data_dir.join(name))?;
            us_counties = us_counties.vstack(&part)?;
        }

        Self::from_frames(master, worldwide, us, eu, china, us_counties)
    }

    /// Assemble a store from already-built frames. Used by `load` and by
    /// tests that synthesize small tables.
    pub fn from_frames(
        master: DataFrame,
        worldwide: DataFrame,
        us: DataFrame,
        eu: DataFrame,
        china: DataFrame,
        us_counties: DataFrame,
    ) -> Result<Self, LoaderError> {
        let countries = unique_strings(&master, "Country")?;
        let worldwide_regions = unique_strings(&worldwide, "Country/Region")?;

        Ok(Self {
            master: Table::new(master, "Date_reported", "WHO-COVID-19-global-data.csv")?,
            worldwide: Table::new(worldwide, "date", "df_worldwide.csv")?,
            us: Table::new(us, "date", "df_us.csv")?,
            eu: Table::new(eu, "date", "df_eu.csv")?,
            china: Table::new(china, "date", "df_china.csv")?,
            us_counties: Table::new(us_counties, "date", "df_us_county*.csv")?,
            countries,
            worldwide_regions,
        })
    }

    pub fn master(&self) -> &Table {
        &self.master
    }

    /// Sub-region table backing the comparison chart for a view.
    pub fn view_table(&self, view: crate::geo::RegionView) -> &Table {
        use crate::geo::RegionView::*;
        match view {
            Worldwide => &self.worldwide,
            UnitedStates => &self.us,
            Europe => &self.eu,
            China => &self.china,
        }
    }

    /// Table backing the scatter-geo map for a view. The United States view
    /// maps counties rather than states.
    pub fn map_table(&self, view: crate::geo::RegionView) -> &Table {
        match view {
            crate::geo::RegionView::UnitedStates => &self.us_counties,
            _ => self.view_table(view),
        }
    }

    /// Distinct reported countries, for the focus dropdown.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Distinct worldwide sub-regions, the Worldwide view's member list.
    pub fn worldwide_regions(&self) -> &[String] {
        &self.worldwide_regions
    }

    /// The slider axis: the worldwide table's date list.
    pub fn slider_dates(&self) -> &[String] {
        self.worldwide.dates()
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path.to_string_lossy().to_string())
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// Attach the derived `iso_alpha_3` column to the master table. Lookups are
/// best-effort; unresolved names stay null.
fn attach_iso_alpha_3(df: &mut DataFrame) -> Result<(), LoaderError> {
    let country = df.column("Country")?.clone();
    let mut cache: HashMap<String, Option<&'static str>> = HashMap::new();
    let mut codes: Vec<Option<String>> = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let value = country.get(i)?;
        if value.is_null() {
            codes.push(None);
            continue;
        }
        let name = value.to_string().trim_matches('"').to_string();
        let code = *cache.entry(name.clone()).or_insert_with(|| country_code(&name));
        codes.push(code.map(str::to_string));
    }

    df.with_column(Column::new("iso_alpha_3".into(), codes))?;
    Ok(())
}

/// Sorted distinct non-null values of a string column.
pub(crate) fn unique_strings(df: &DataFrame, column: &str) -> Result<Vec<String>, LoaderError> {
    let unique = df.column(column)?.unique()?;
    let series = unique.as_materialized_series();
    let values: BTreeSet<String> = (0..series.len())
        .filter_map(|i| {
            let val = series.get(i).ok()?;
            if val.is_null() {
                None
            } else {
                Some(val.to_string().trim_matches('"').to_string())
            }
        })
        .collect();
    Ok(values.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(dates: &[&str], names: &[&str]) -> DataFrame {
        DataFrame::new(vec![
            Column::new("date".into(), dates.to_vec()),
            Column::new("Country/Region".into(), names.to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn table_sorts_and_dedups_dates() {
        let df = frame(
            &["2020-03-02", "2020-03-01", "2020-03-02"],
            &["France", "France", "Spain"],
        );
        let table = Table::new(df, "date", "test.csv").unwrap();
        assert_eq!(table.dates(), ["2020-03-01", "2020-03-02"]);
        assert_eq!(table.latest_date(), "2020-03-02");
    }

    #[test]
    fn date_at_clamps_out_of_range_indices() {
        let df = frame(&["2020-03-01", "2020-03-02"], &["France", "Spain"]);
        let table = Table::new(df, "date", "test.csv").unwrap();
        assert_eq!(table.date_at(0), "2020-03-01");
        assert_eq!(table.date_at(99), "2020-03-02");
    }

    #[test]
    fn malformed_dates_fail_loading() {
        let df = frame(&["2020-03-01", "03/02/2020"], &["France", "Spain"]);
        let err = Table::new(df, "date", "test.csv").unwrap_err();
        assert!(matches!(err, LoaderError::BadDate { .. }));
    }

    #[test]
    fn unique_strings_are_sorted_and_non_null() {
        let df = DataFrame::new(vec![Column::new(
            "Country/Region".into(),
            vec![
                Some("Spain".to_string()),
                Some("France".to_string()),
                None,
                Some("Spain".to_string()),
            ],
        )])
        .unwrap();
        assert_eq!(
            unique_strings(&df, "Country/Region").unwrap(),
            ["France", "Spain"]
        );
    }

    #[test]
    fn iso_codes_attach_best_effort() {
        let mut df = DataFrame::new(vec![
            Column::new("Date_reported".into(), vec!["2020-03-01", "2020-03-01"]),
            Column::new("Country".into(), vec!["France", "Atlantis"]),
        ])
        .unwrap();
        attach_iso_alpha_3(&mut df).unwrap();

        let iso = df.column("iso_alpha_3").unwrap();
        assert_eq!(iso.get(0).unwrap().to_string().trim_matches('"'), "FRA");
        assert!(iso.get(1).unwrap().is_null());
    }
}
