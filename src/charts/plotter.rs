//! Chart Plotter Module
//! Turns chart payloads into egui_plot items: trend lines, the scatter-geo
//! map and the country choropleth.

use crate::charts::format::{human_format, thousands};
use crate::charts::model::{
    ChoroplethChart, IndicatorData, MapChart, RegionChart, TrendChart, CHOROPLETH_RANGE,
};
use crate::geo::Basemap;
use crate::theme;
use chrono::NaiveDate;
use egui::{Color32, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, Polygon};

/// Land outline color of the map backdrop.
const LAND: Color32 = Color32::from_rgb(100, 125, 100);
/// Fill for mapped countries without a value at the selected date.
const NO_DATA_FILL: Color32 = Color32::from_rgb(0x45, 0x43, 0x42);

/// Creates the dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw one summary indicator tile.
    pub fn draw_indicator(ui: &mut egui::Ui, indicator: &IndicatorData) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(indicator.title).size(13.0).color(theme::RED));
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(thousands(indicator.value))
                            .size(34.0)
                            .strong()
                            .color(theme::RED),
                    );
                    ui.label(
                        RichText::new(human_format(indicator.value))
                            .size(12.0)
                            .color(theme::TEXT),
                    );
                });
            });
    }

    /// Draw the daily new cases/deaths trend chart.
    pub fn draw_trend_chart(ui: &mut egui::Ui, chart: &TrendChart) {
        ui.label(RichText::new(&chart.title).size(14.0).strong());

        let confirmed = date_line(&chart.dates, &chart.confirmed);
        let deaths = date_line(&chart.dates, &chart.deaths);

        Plot::new("worldwide_trend")
            .height(300.0)
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label("Number of Cases")
            .x_axis_formatter(|mark, _range| axis_date_label(mark.value))
            .label_formatter(|name, point| {
                format!(
                    "{name}\n{}: {}",
                    hover_date_label(point.x),
                    thousands(point.y)
                )
            })
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(confirmed)
                        .color(theme::BLUE)
                        .width(1.5)
                        .name("Confirmed"),
                );
                plot_ui.line(
                    Line::new(deaths)
                        .color(theme::GREEN)
                        .width(1.5)
                        .name("Deaths"),
                );
            });
    }

    /// Draw the sub-region comparison chart, one line per region in the
    /// order the builder produced (latest confirmed, descending).
    pub fn draw_region_chart(ui: &mut egui::Ui, chart: &RegionChart) {
        ui.label(RichText::new(&chart.title).size(14.0).strong());

        let lines: Vec<(String, PlotPoints)> = chart
            .series
            .iter()
            .map(|series| (series.name.clone(), date_line(&series.dates, &series.values)))
            .collect();

        Plot::new("active_regions")
            .height(300.0)
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label("Number of Cases")
            .x_axis_formatter(|mark, _range| axis_date_label(mark.value))
            .label_formatter(|name, point| {
                format!(
                    "{name}\n{}: {}",
                    hover_date_label(point.x),
                    thousands(point.y)
                )
            })
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, (name, points)) in lines.into_iter().enumerate() {
                    plot_ui.line(
                        Line::new(points)
                            .color(theme::series_color(i))
                            .width(1.5)
                            .name(name),
                    );
                }
            });
    }

    /// Draw the scatter-geo map: marker area follows sqrt(confirmed), marker
    /// color the share of cases from the previous week.
    pub fn draw_map_chart(ui: &mut egui::Ui, chart: &MapChart, basemap: &Basemap) {
        ui.label(RichText::new(&chart.title).size(14.0).strong());
        ui.label(
            RichText::new(format!("as of {}", chart.date))
                .size(11.0)
                .color(theme::TEXT),
        );

        let frame = chart.frame;
        Plot::new("world_map")
            .height(380.0)
            .allow_scroll(false)
            .data_aspect(1.0)
            .show_grid(false)
            .include_x(frame.center_lon - frame.lon_span)
            .include_x(frame.center_lon + frame.lon_span)
            .include_y(frame.center_lat - frame.lat_span)
            .include_y(frame.center_lat + frame.lat_span)
            .label_formatter(|name, _point| name.to_string())
            .show(ui, |plot_ui| {
                for ring in basemap.outlines() {
                    plot_ui.line(
                        Line::new(ring_points(ring)).color(LAND).width(0.5),
                    );
                }

                for point in &chart.points {
                    let radius =
                        (point.confirmed.max(0.0).sqrt() / frame.sizeref).clamp(1.5, 30.0) as f32;
                    let share = point.share_of_last_week.clamp(0.0, 100.0);
                    let hover = format!(
                        "{}: {} total cases, {}% from previous week",
                        point.name,
                        thousands(point.confirmed),
                        point.percentage
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[point.lon, point.lat]]))
                            .radius(radius)
                            .color(theme::reds_scale(share).gamma_multiply(0.85))
                            .name(hover),
                    );
                }
            });

        Self::draw_colorbar(ui, "Share of cases from the previous week", |t| {
            theme::reds_scale(t * 100.0)
        });
    }

    /// Draw the choropleth: countries filled by cumulative confirmed cases
    /// on the fixed 0..5M range.
    pub fn draw_choropleth(ui: &mut egui::Ui, chart: &ChoroplethChart, basemap: &Basemap) {
        ui.label(RichText::new(&chart.title).size(14.0).strong());
        ui.label(
            RichText::new(format!("as of {}", chart.date))
                .size(11.0)
                .color(theme::TEXT),
        );

        if basemap.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Basemap not loaded - choropleth unavailable")
                        .size(13.0)
                        .color(theme::TEXT),
                );
            });
            return;
        }

        let (min, max) = CHOROPLETH_RANGE;
        Plot::new("trajectory")
            .height(380.0)
            .allow_scroll(false)
            .data_aspect(1.0)
            .show_grid(false)
            .include_x(-180.0)
            .include_x(180.0)
            .include_y(-60.0)
            .include_y(85.0)
            .label_formatter(|name, _point| name.to_string())
            .show(ui, |plot_ui| {
                for ring in basemap.outlines() {
                    plot_ui.polygon(
                        Polygon::new(ring_points(ring))
                            .fill_color(NO_DATA_FILL)
                            .stroke(egui::Stroke::new(0.5, theme::GRID)),
                    );
                }

                for country in &chart.values {
                    let Some(rings) = basemap.rings_for(&country.iso_alpha_3) else {
                        continue;
                    };
                    let fill = theme::peach_scale(country.value, min, max);
                    let hover =
                        format!("{}: {}", country.name, thousands(country.value));
                    for ring in rings {
                        plot_ui.polygon(
                            Polygon::new(ring_points(ring))
                                .fill_color(fill)
                                .stroke(egui::Stroke::new(0.5, theme::GRID))
                                .name(hover.clone()),
                        );
                    }
                }
            });

        Self::draw_colorbar(ui, "Cumulative confirmed cases (0 - 5M)", |t| {
            theme::peach_scale(t * max, min, max)
        });
    }

    /// Horizontal gradient legend under the map charts.
    fn draw_colorbar(ui: &mut egui::Ui, label: &str, sample: impl Fn(f64) -> Color32) {
        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(160.0, 12.0), egui::Sense::hover());
            let painter = ui.painter();
            const STEPS: usize = 32;
            let step_width = rect.width() / STEPS as f32;
            for i in 0..STEPS {
                let t = i as f64 / (STEPS - 1) as f64;
                let slice = egui::Rect::from_min_size(
                    egui::pos2(rect.min.x + i as f32 * step_width, rect.min.y),
                    egui::vec2(step_width + 0.5, rect.height()),
                );
                painter.rect_filled(slice, 0.0, sample(t));
            }
            ui.add_space(6.0);
            ui.label(RichText::new(label).size(11.0).color(theme::TEXT));
        });
    }
}

/// Series as plot points with the date axis in days.
fn date_line(dates: &[String], values: &[f64]) -> PlotPoints {
    dates
        .iter()
        .zip(values.iter())
        .filter_map(|(date, &value)| date_to_x(date).map(|x| [x, value]))
        .collect()
}

fn ring_points(ring: &[[f64; 2]]) -> PlotPoints {
    ring.iter().map(|p| [p[0], p[1]]).collect()
}

/// Chart x coordinate for an ISO date: days since the common era.
fn date_to_x(date: &str) -> Option<f64> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| chrono::Datelike::num_days_from_ce(&d) as f64)
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

fn axis_date_label(x: f64) -> String {
    x_to_date(x)
        .map(|d| d.format("%m-%d").to_string())
        .unwrap_or_default()
}

fn hover_date_label(x: f64) -> String {
    x_to_date(x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let x = date_to_x("2020-04-15").unwrap();
        assert_eq!(hover_date_label(x), "2020-04-15");
        assert_eq!(axis_date_label(x), "04-15");
    }

    #[test]
    fn consecutive_dates_are_one_unit_apart() {
        let a = date_to_x("2020-02-28").unwrap();
        let b = date_to_x("2020-02-29").unwrap();
        let c = date_to_x("2020-03-01").unwrap();
        assert_eq!(b - a, 1.0);
        assert_eq!(c - b, 1.0);
    }

    #[test]
    fn malformed_dates_drop_out_of_the_line() {
        let dates = vec!["2020-03-01".to_string(), "garbage".to_string()];
        let values = vec![1.0, 2.0];
        let points = date_line(&dates, &values);
        assert_eq!(points.points().len(), 1);
    }
}
