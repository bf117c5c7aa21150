//! Chart Builder
//! Rebuilds the full chart set from the loaded tables and the current
//! control-panel state. Runs on the background thread; the result is handed
//! to the viewer as-is.

use crate::charts::model::{
    ChartSet, ChoroplethChart, IndicatorData, MapChart, RegionChart, TrendChart,
};
use crate::data::{
    choropleth_values, daily_new_series, latest_totals, map_points, order_by_latest_confirmed,
    region_series, DataStore, Metric, ProcessorError, Scaling,
};
use crate::geo::RegionView;

/// Snapshot of the control-panel state a rebuild runs against.
#[derive(Debug, Clone)]
pub struct ViewQuery {
    pub view: RegionView,
    /// None means Worldwide.
    pub focus: Option<String>,
    pub regions: Vec<String>,
    pub metric: Metric,
    pub scaling: Scaling,
    pub date_index: usize,
}

/// Build all eight charts for one query.
pub fn build_charts(store: &DataStore, query: &ViewQuery) -> Result<ChartSet, ProcessorError> {
    let focus = query.focus.as_deref();

    let totals = latest_totals(store.master(), focus)?;
    let indicators = [
        IndicatorData {
            title: "CUMULATIVE CONFIRMED CASES",
            value: totals.cumulative_cases,
        },
        IndicatorData {
            title: "New Cases (24hrs)",
            value: totals.new_cases,
        },
        IndicatorData {
            title: "CUMULATIVE DEATHS",
            value: totals.cumulative_deaths,
        },
        IndicatorData {
            title: "New Deaths (24hrs)",
            value: totals.new_deaths,
        },
    ];

    let (dates, confirmed, deaths) = daily_new_series(store.master(), focus)?;
    let trend = TrendChart {
        title: format!("{} Infections", focus.unwrap_or("Worldwide")),
        dates,
        confirmed,
        deaths,
    };

    let view_table = store.view_table(query.view);
    let ordered = order_by_latest_confirmed(view_table, &query.regions)?;
    let series = region_series(view_table, &ordered, query.metric, query.scaling)?;
    let column_label = match query.scaling {
        Scaling::Absolute => query.metric.label().to_string(),
        Scaling::PerCapita => format!("{} per 100,000", query.metric.label()),
    };
    let regions = RegionChart {
        title: format!("{column_label} by Region"),
        series,
    };

    let map_table = store.map_table(query.view);
    let map_date = map_table.date_at(query.date_index).to_string();
    let map = MapChart {
        title: "Cumulative Confirmed Cases (marker size) and Share of New Cases \
                from the Previous Week (color)"
            .to_string(),
        points: map_points(map_table, &map_date)?,
        date: map_date,
        frame: query.view.map_frame(),
    };

    let choropleth_date = store.master().date_at(query.date_index).to_string();
    let choropleth = ChoroplethChart {
        title: "Cumulative Confirmed Cases by Country".to_string(),
        values: choropleth_values(store.master(), &choropleth_date)?,
        date: choropleth_date,
    };

    Ok(ChartSet {
        indicators,
        trend,
        regions,
        map,
        choropleth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sub_table(date_col: &str) -> DataFrame {
        DataFrame::new(vec![
            Column::new(date_col.into(), vec!["2020-03-01", "2020-03-02"]),
            Column::new("Country/Region".into(), vec!["France", "France"]),
            Column::new("Confirmed".into(), vec![100i64, 200]),
            Column::new("Deaths".into(), vec![5i64, 10]),
            Column::new("population".into(), vec![670.0f64, 670.0]),
            Column::new("Latitude".into(), vec![46.2f64, 46.2]),
            Column::new("Longitude".into(), vec![2.2f64, 2.2]),
            Column::new("percentage".into(), vec!["12.5", "13.0"]),
            Column::new("share_of_last_week".into(), vec![40.0f64, 45.0]),
        ])
        .unwrap()
    }

    fn store() -> DataStore {
        let master = DataFrame::new(vec![
            Column::new("Date_reported".into(), vec!["2020-03-01", "2020-03-02"]),
            Column::new("Country".into(), vec!["France", "France"]),
            Column::new("New_cases".into(), vec![10i64, 30]),
            Column::new("Cumulative_cases".into(), vec![10i64, 40]),
            Column::new("New_deaths".into(), vec![1i64, 3]),
            Column::new("Cumulative_deaths".into(), vec![1i64, 4]),
            Column::new(
                "iso_alpha_3".into(),
                vec![Some("FRA".to_string()), Some("FRA".to_string())],
            ),
        ])
        .unwrap();

        DataStore::from_frames(
            master,
            sub_table("date"),
            sub_table("date"),
            sub_table("date"),
            sub_table("date"),
            sub_table("date"),
        )
        .unwrap()
    }

    fn query() -> ViewQuery {
        ViewQuery {
            view: RegionView::Worldwide,
            focus: None,
            regions: vec!["France".to_string()],
            metric: Metric::Confirmed,
            scaling: Scaling::Absolute,
            date_index: 1,
        }
    }

    #[test]
    fn builds_all_eight_charts() {
        let charts = build_charts(&store(), &query()).unwrap();

        assert_eq!(charts.indicators[0].value, 40.0);
        assert_eq!(charts.indicators[1].value, 30.0);
        assert_eq!(charts.indicators[2].value, 4.0);
        assert_eq!(charts.indicators[3].value, 3.0);
        assert_eq!(charts.trend.title, "Worldwide Infections");
        assert_eq!(charts.trend.confirmed, [10.0, 30.0]);
        assert_eq!(charts.regions.series.len(), 1);
        assert_eq!(charts.map.date, "2020-03-02");
        assert_eq!(charts.map.points.len(), 1);
        assert_eq!(charts.choropleth.values[0].value, 40.0);
    }

    #[test]
    fn focus_changes_trend_title_and_indicator_scope() {
        let mut q = query();
        q.focus = Some("France".to_string());
        let charts = build_charts(&store(), &q).unwrap();
        assert_eq!(charts.trend.title, "France Infections");
        assert_eq!(charts.indicators[0].value, 40.0);
    }

    #[test]
    fn per_capita_query_relabels_region_chart() {
        let mut q = query();
        q.scaling = Scaling::PerCapita;
        q.metric = Metric::Deaths;
        let charts = build_charts(&store(), &q).unwrap();
        assert_eq!(charts.regions.title, "Deaths per 100,000 by Region");
    }

    #[test]
    fn us_view_maps_counties_table() {
        let mut q = query();
        q.view = RegionView::UnitedStates;
        // The synthetic county table matches the state table here; the point
        // is that the build succeeds against the counties path.
        let charts = build_charts(&store(), &q).unwrap();
        assert_eq!(charts.map.points.len(), 1);
    }
}
