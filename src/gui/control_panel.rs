//! Control Panel Widget
//! Left side panel with the view, focus, metric, scaling, sub-region and
//! date controls. Emits an action when the selection changes; the app turns
//! that into a chart rebuild.

use crate::charts::slider_label;
use crate::data::{Metric, Scaling};
use crate::geo::RegionView;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use serde::{Deserialize, Serialize};

/// Focus dropdown entry meaning "no single country".
pub const WORLDWIDE: &str = "Worldwide";

/// Everything the charts are parameterized on. Persisted across runs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub view: RegionView,
    /// Focus country for the indicators and trend chart, or [`WORLDWIDE`].
    pub focus: String,
    pub regions: Vec<String>,
    pub metric: Metric,
    pub scaling: Scaling,
    pub date_index: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: RegionView::default(),
            focus: WORLDWIDE.to_string(),
            regions: Vec::new(),
            metric: Metric::default(),
            scaling: Scaling::default(),
            date_index: 0,
        }
    }
}

/// Actions triggered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    None,
    /// The geographic view changed; the region list must be repopulated.
    ViewChanged,
    /// Any other control changed.
    SelectionChanged,
}

/// Left side control panel.
pub struct ControlPanel {
    pub state: ViewState,
    countries: Vec<String>,
    region_options: Vec<String>,
    region_checked: Vec<bool>,
    slider_dates: Vec<String>,
    pub progress: f32,
    pub status: String,
}

impl ControlPanel {
    pub fn new(countries: Vec<String>, slider_dates: Vec<String>) -> Self {
        Self {
            state: ViewState::default(),
            countries,
            region_options: Vec::new(),
            region_checked: Vec::new(),
            slider_dates,
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }

    /// Replace the sub-region list, marking `selected` entries as checked,
    /// and mirror the result into the state.
    pub fn set_region_options(&mut self, options: Vec<String>, selected: &[String]) {
        self.region_checked = options
            .iter()
            .map(|option| selected.iter().any(|s| s == option))
            .collect();
        self.region_options = options;
        self.sync_checked_regions();
    }

    fn sync_checked_regions(&mut self) {
        self.state.regions = self
            .region_options
            .iter()
            .zip(self.region_checked.iter())
            .filter(|(_, &checked)| checked)
            .map(|(option, _)| option.clone())
            .collect();
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlAction {
        let before = self.state.clone();

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🦠 Covid Atlas")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("COVID-19 Analysis Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== View Section =====
        ui.label(RichText::new("🌍 View").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal_wrapped(|ui| {
            for view in RegionView::ALL {
                ui.radio_value(&mut self.state.view, view, view.label());
            }
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Focus Section =====
        ui.label(RichText::new("📌 Focus Country").size(14.0).strong());
        ui.add_space(5.0);
        ComboBox::from_id_salt("focus_country")
            .width(220.0)
            .selected_text(&self.state.focus)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(self.state.focus == WORLDWIDE, WORLDWIDE)
                    .clicked()
                {
                    self.state.focus = WORLDWIDE.to_string();
                }
                for country in &self.countries {
                    if ui
                        .selectable_label(self.state.focus == *country, country)
                        .clicked()
                    {
                        self.state.focus = country.clone();
                    }
                }
            });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Metric Section =====
        ui.label(RichText::new("📈 Metric").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.radio_value(&mut self.state.metric, Metric::Confirmed, "Confirmed");
            ui.radio_value(&mut self.state.metric, Metric::Deaths, "Deaths");
        });
        ui.horizontal(|ui| {
            ui.radio_value(&mut self.state.scaling, Scaling::Absolute, "Total values");
            ui.radio_value(
                &mut self.state.scaling,
                Scaling::PerCapita,
                "Per 100,000 of population",
            );
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Region Section =====
        ui.label(RichText::new("🗺 Sub-regions").size(14.0).strong());
        ui.add_space(5.0);
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("region_list")
                    .max_height(140.0)
                    .show(ui, |ui| {
                        for (i, option) in self.region_options.iter().enumerate() {
                            if i < self.region_checked.len() {
                                ui.checkbox(&mut self.region_checked[i], option);
                            }
                        }
                    });
            });
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Defaults").clicked() {
                let defaults = self.state.view.default_selection();
                for (i, option) in self.region_options.iter().enumerate() {
                    self.region_checked[i] = defaults.contains(&option.as_str());
                }
            }
            if ui.small_button("Clear All").clicked() {
                self.region_checked.iter_mut().for_each(|v| *v = false);
            }
        });
        self.sync_checked_regions();

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Date Section =====
        ui.label(RichText::new("📅 Date").size(14.0).strong());
        ui.add_space(5.0);
        if !self.slider_dates.is_empty() {
            let max_index = self.slider_dates.len() - 1;
            self.state.date_index = self.state.date_index.min(max_index);
            ui.add(
                egui::Slider::new(&mut self.state.date_index, 0..=max_index).show_value(false),
            );
            let date = &self.slider_dates[self.state.date_index];
            ui.label(RichText::new(slider_label(date)).size(12.0));
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);
        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );
        ui.add_space(5.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if self.state.view != before.view {
            ControlAction::ViewChanged
        } else if self.state != before {
            ControlAction::SelectionChanged
        } else {
            ControlAction::None
        }
    }
}
