//! Dashboard Application
//! Main window: control panel on the left, chart grid in the center.
//! Chart rebuilds run on a background thread so the frame loop never blocks
//! on Polars.

use crate::charts::{build_charts, ChartSet, ViewQuery};
use crate::data::DataStore;
use crate::geo::Basemap;
use crate::gui::{ChartViewer, ControlAction, ControlPanel, ViewState, WORLDWIDE};
use crate::theme;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

const STATE_KEY: &str = "covid_atlas_view_state";

/// Rebuild result from the background thread.
enum CalcResult {
    Progress(f32, String),
    Complete(Box<ChartSet>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    store: Arc<DataStore>,
    basemap: Arc<Basemap>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async rebuild
    calc_rx: Option<Receiver<CalcResult>>,
    is_calculating: bool,
    /// A control changed while a rebuild was in flight; run again after.
    rebuild_queued: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, store: DataStore, basemap: Basemap) -> Self {
        theme::apply(&cc.egui_ctx);

        let store = Arc::new(store);
        let mut control_panel =
            ControlPanel::new(store.countries().to_vec(), store.slider_dates().to_vec());

        // Restore the last session's controls; otherwise start at the most
        // recent date, worldwide.
        let restored: Option<ViewState> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, STATE_KEY));
        let keep_selection = restored.is_some();
        match restored {
            Some(state) => control_panel.state = state,
            None => {
                control_panel.state.date_index = store.slider_dates().len().saturating_sub(1);
            }
        }

        let mut app = Self {
            store,
            basemap: Arc::new(basemap),
            control_panel,
            chart_viewer: ChartViewer::new(),
            calc_rx: None,
            is_calculating: false,
            rebuild_queued: false,
        };
        app.refresh_region_options(keep_selection);
        app.start_rebuild();
        app
    }

    /// Repopulate the sub-region list for the current view. `keep_selection`
    /// preserves a restored selection instead of applying the view defaults.
    fn refresh_region_options(&mut self, keep_selection: bool) {
        let view = self.control_panel.state.view;
        let options: Vec<String> = match view.members() {
            Some(members) => members.iter().map(|m| m.to_string()).collect(),
            None => self.store.worldwide_regions().to_vec(),
        };

        let selected: Vec<String> = if keep_selection && !self.control_panel.state.regions.is_empty()
        {
            self.control_panel.state.regions.clone()
        } else {
            view.default_selection()
                .iter()
                .map(|s| s.to_string())
                .collect()
        };

        self.control_panel.set_region_options(options, &selected);
    }

    /// Snapshot the controls and rebuild the chart set on a background
    /// thread. A change arriving mid-rebuild is coalesced into one follow-up
    /// run.
    fn start_rebuild(&mut self) {
        if self.is_calculating {
            self.rebuild_queued = true;
            return;
        }

        let state = &self.control_panel.state;
        let query = ViewQuery {
            view: state.view,
            focus: if state.focus == WORLDWIDE {
                None
            } else {
                Some(state.focus.clone())
            },
            regions: state.regions.clone(),
            metric: state.metric,
            scaling: state.scaling,
            date_index: state.date_index,
        };

        let (tx, rx) = channel();
        self.calc_rx = Some(rx);
        self.is_calculating = true;
        self.control_panel.set_progress(5.0, "Rebuilding charts...");

        let store = Arc::clone(&self.store);
        thread::spawn(move || {
            Self::run_rebuild(tx, store, query);
        });
    }

    /// Run one rebuild (called from the background thread).
    fn run_rebuild(tx: Sender<CalcResult>, store: Arc<DataStore>, query: ViewQuery) {
        let _ = tx.send(CalcResult::Progress(
            25.0,
            "Filtering and grouping...".to_string(),
        ));

        match build_charts(&store, &query) {
            Ok(charts) => {
                let _ = tx.send(CalcResult::Complete(Box::new(charts)));
            }
            Err(e) => {
                let _ = tx.send(CalcResult::Error(e.to_string()));
            }
        }
    }

    /// Check for rebuild results
    fn check_rebuild_results(&mut self) {
        let rx = self.calc_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    CalcResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    CalcResult::Complete(charts) => {
                        self.chart_viewer.set_charts(*charts);
                        self.control_panel
                            .set_progress(100.0, "Complete! 8 charts ready");
                        self.is_calculating = false;
                        should_keep_receiver = false;
                    }
                    CalcResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_calculating = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.calc_rx = Some(rx);
            }
        }

        if !self.is_calculating && self.rebuild_queued {
            self.rebuild_queued = false;
            self.start_rebuild();
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_rebuild_results();

        // Request repaint while rebuilding
        if self.is_calculating {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlAction::ViewChanged => {
                            self.refresh_region_options(false);
                            self.start_rebuild();
                        }
                        ControlAction::SelectionChanged => {
                            self.start_rebuild();
                        }
                        ControlAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        let basemap = Arc::clone(&self.basemap);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &basemap);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, STATE_KEY, &self.control_panel.state);
    }
}
