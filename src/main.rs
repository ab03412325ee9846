#![warn(clippy::all)]

//! Detonation Atlas - an interactive map and table of historical nuclear detonations.
//!
//! The application fetches a static JSON dataset once at startup, pages through
//! it in a table, and shows the current page as clustered markers on a map.

mod config;
mod data;
mod geo;
mod map;
mod state;
mod ui;

use config::{AppConfig, BasemapKind};
use data::{load_records, DataSource, DetonationRecord, LoadChannel, LoadResult};
use eframe::egui;
use geo::VectorBackend;
use state::AppState;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Detonation Atlas")
            .with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Detonation Atlas",
        native_options,
        Box::new(|cc| Ok(Box::new(AtlasApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(AtlasApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct AtlasApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Map panel state (markers, clusters, basemap)
    map_view: ui::MapView,

    /// One-shot dataset load
    records_channel: LoadChannel<Vec<DetonationRecord>>,

    /// One-shot basemap outline load (vector basemap only)
    basemap_channel: LoadChannel<String>,
}

impl AtlasApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let config = AppConfig::load();
        log::info!(
            "Starting with data from {}, page size {}, clustering {}",
            config.data_url,
            config.page_size,
            if config.cluster.enabled { "on" } else { "off" }
        );

        let mut app = Self {
            state: AppState::new(&config),
            map_view: ui::MapView::new(config.cluster),
            records_channel: LoadChannel::new("Detonation data"),
            basemap_channel: LoadChannel::new("Basemap"),
        };

        let source = DataSource::resolve(&config.data_url);
        app.records_channel
            .start(cc.egui_ctx.clone(), move || load_records(source));

        if config.basemap == BasemapKind::Vector {
            let source = DataSource::resolve(&config.basemap_url);
            app.basemap_channel
                .start(cc.egui_ctx.clone(), move || async move {
                    source.fetch_text().await
                });
        }

        app
    }

    fn poll_loads(&mut self) {
        match self.records_channel.try_recv() {
            Some(LoadResult::Loaded { value, elapsed_ms }) => {
                self.state.publish_records(value, elapsed_ms);
            }
            Some(LoadResult::Failed(e)) => {
                log::error!("Failed to load detonation data: {}", e);
                self.state.record_load_failure(&e);
                notify_load_failure(&e.to_string());
            }
            None => {}
        }

        // The basemap is optional: on failure the graticule stays in place
        match self.basemap_channel.try_recv() {
            Some(LoadResult::Loaded { value, .. }) => match VectorBackend::from_geojson(&value) {
                Ok(backend) => {
                    log::info!("Loaded {} basemap outline feature(s)", backend.feature_count());
                    self.map_view.set_backend(Box::new(backend));
                }
                Err(e) => log::warn!("Ignoring basemap outlines: {}", e),
            },
            Some(LoadResult::Failed(e)) => log::warn!("Failed to load basemap outlines: {}", e),
            None => {}
        }
    }

    fn render_error_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.load_error.clone() else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("load_error_modal")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.heading("Could not load detonation data");
            ui.add_space(8.0);
            ui.label(&message);
            ui.add_space(12.0);
            ui.button("OK").clicked()
        });

        if modal.inner || modal.should_close() {
            self.state.load_error = None;
        }
    }
}

/// Surfaces a load failure through the browser's blocking alert.
#[cfg(target_arch = "wasm32")]
fn notify_load_failure(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&format!("Could not load detonation data: {message}"));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn notify_load_failure(_message: &str) {}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loads();

        // Page index stays valid even if the collection was replaced
        self.state.pager.clamp(self.state.records.len());
        self.map_view.sync(&mut self.state);

        // Render UI panels in the correct order for egui layout
        // Top/bottom panels must be rendered before CentralPanel
        ui::render_top_bar(ctx, &self.state);
        ui::render_bottom_panel(ctx, &mut self.state);
        self.map_view.show(ctx, &mut self.state);

        self.render_error_modal(ctx);
    }
}
