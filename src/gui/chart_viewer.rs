//! Chart Viewer Widget
//! Central scrollable panel laying out the eight linked charts: the
//! indicator row, the two trend charts and the two maps.

use crate::charts::{ChartPlotter, ChartSet};
use crate::geo::Basemap;
use egui::{RichText, ScrollArea};

const ROW_SPACING: f32 = 15.0;

/// Scrollable chart display area.
pub struct ChartViewer {
    charts: Option<ChartSet>,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self { charts: None }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed chart set.
    pub fn set_charts(&mut self, charts: ChartSet) {
        self.charts = Some(charts);
    }

    /// Draw the chart grid.
    pub fn show(&mut self, ui: &mut egui::Ui, basemap: &Basemap) {
        let Some(charts) = &self.charts else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // Indicator row
                ui.columns(4, |columns| {
                    for (column, indicator) in columns.iter_mut().zip(charts.indicators.iter()) {
                        ChartPlotter::draw_indicator(column, indicator);
                    }
                });

                ui.add_space(ROW_SPACING);

                // Trend row: aggregate trend left, sub-region comparison right
                ui.columns(2, |columns| {
                    ChartPlotter::draw_trend_chart(&mut columns[0], &charts.trend);
                    ChartPlotter::draw_region_chart(&mut columns[1], &charts.regions);
                });

                ui.add_space(ROW_SPACING);

                // Map row: scatter-geo left, choropleth right
                ui.columns(2, |columns| {
                    ChartPlotter::draw_map_chart(&mut columns[0], &charts.map, basemap);
                    ChartPlotter::draw_choropleth(&mut columns[1], &charts.choropleth, basemap);
                });

                ui.add_space(ROW_SPACING);
            });
    }
}
