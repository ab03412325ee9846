//! Central canvas UI: the detonation map.
//!
//! `MapView` owns the map-side state (live markers, cluster cache, basemap).
//! Each frame it mirrors the visible page into markers, regroups them when
//! needed, and draws pins, cluster badges, and the detail popup.

use super::colors;
use crate::data::RecordId;
use crate::geo::{GraticuleBackend, MapBackend};
use crate::map::{ClusterCache, ClusterConfig, ClusterItem, MarkerRegistry, PopupContent};
use crate::state::AppState;
use eframe::egui::{self, Align2, FontId, Painter, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use egui_phosphor::regular as icons;
use geo_types::Coord;

const PIN_RADIUS: f32 = 5.0;
const SELECTED_PIN_RADIUS: f32 = 7.0;

/// Screen margin within which items are still drawn.
const CULL_MARGIN: f32 = 40.0;

/// What a click on the canvas landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum HitTarget {
    Marker(RecordId),
    Cluster {
        position: Coord<f64>,
        min: Coord<f64>,
        max: Coord<f64>,
        count: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    center: Pos2,
    radius: f32,
    target: HitTarget,
}

/// Map-side state owned by the map panel.
pub struct MapView {
    markers: MarkerRegistry,
    clusters: ClusterCache,
    cluster_config: ClusterConfig,
    backend: Box<dyn MapBackend>,
}

impl MapView {
    pub fn new(cluster_config: ClusterConfig) -> Self {
        Self {
            markers: MarkerRegistry::new(),
            clusters: ClusterCache::new(),
            cluster_config,
            backend: Box::new(GraticuleBackend),
        }
    }

    /// Swaps the basemap drawn beneath the markers.
    pub fn set_backend(&mut self, backend: Box<dyn MapBackend>) {
        log::info!("Basemap switched to {}", backend.name());
        self.backend = backend;
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Brings markers, selection, and clusters in line with the visible page.
    pub fn sync(&mut self, state: &mut AppState) {
        let delta = self
            .markers
            .sync(state.records.iter_range(state.visible_range()));
        if !delta.is_empty() {
            log::debug!(
                "Markers: {} added, {} removed, {} live",
                delta.added.len(),
                delta.removed.len(),
                self.markers.len()
            );
        }

        if let Some(dropped) = state.selection.retain_visible(&self.markers) {
            log::debug!("Selection {:?} left the visible page, popup closed", dropped);
        }

        self.clusters
            .refresh(&self.markers, state.view.zoom, &self.cluster_config);
    }

    /// Renders the map into the central panel.
    pub fn show(&mut self, ctx: &egui::Context, state: &mut AppState) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available_size = ui.available_size();
                let (response, painter) =
                    ui.allocate_painter(available_size, Sense::click_and_drag());
                let rect = response.rect;

                painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);
                state.view.update(rect);

                let painter = painter.with_clip_rect(rect);
                self.backend.paint(&painter, &state.view);

                let hits = self.paint_items(&painter, state);
                if state.records.is_empty() {
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        "No detonations loaded",
                        FontId::proportional(14.0),
                        colors::canvas::OVERLAY_TEXT,
                    );
                }
                let hovered = response.hover_pos().and_then(|pos| hit_test(&hits, pos));

                if response.clicked() {
                    match hovered.map(|hit| hit.target) {
                        Some(HitTarget::Marker(id)) => {
                            if let Some(previous) = state.selection.select(id) {
                                log::debug!("Selection moved from {:?} to {:?}", previous, id);
                            }
                        }
                        Some(HitTarget::Cluster {
                            position,
                            min,
                            max,
                            count,
                        }) => {
                            // Always zoom in at least one level so the group can split
                            let zoom = state
                                .view
                                .fit_zoom(min, max)
                                .max(state.view.zoom.floor() + 1.0);
                            log::debug!("Expanding cluster of {} to zoom {:.1}", count, zoom);
                            state.view.zoom_to(position, zoom);
                        }
                        None => {}
                    }
                }

                if response.double_clicked() && hovered.is_none() {
                    state.reset_view();
                }

                handle_canvas_interaction(&response, state);
                draw_overlay_info(ui, &rect, state, self);
                show_popup(ctx, state);

                if let Some(hit) = hovered {
                    ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                    if let Some(text) = self.hover_text(hit.target) {
                        response.on_hover_text_at_pointer(text);
                    }
                }
            });
    }

    fn hover_text(&self, target: HitTarget) -> Option<String> {
        match target {
            HitTarget::Marker(id) => self.markers.get(id).map(|marker| marker.title.clone()),
            HitTarget::Cluster { count, .. } => Some(format!("{} detonations", count)),
        }
    }

    /// Draws pins and badges and returns their hit areas in draw order.
    fn paint_items(&self, painter: &Painter, state: &AppState) -> Vec<Hit> {
        let mut hits = Vec::with_capacity(self.clusters.items().len());
        let mut selected_pin = None;

        for item in self.clusters.items() {
            let position = item.position();
            if !state.view.is_visible(position, CULL_MARGIN) {
                continue;
            }
            let center = state.view.geo_to_screen(position);

            match item {
                ClusterItem::Single { id, .. } => {
                    // Selected pin is drawn last so it sits on top
                    if state.selection.is_selected(*id) {
                        selected_pin = Some((*id, center));
                        continue;
                    }
                    draw_pin(painter, center, false);
                    hits.push(Hit {
                        center,
                        radius: PIN_RADIUS + 2.0,
                        target: HitTarget::Marker(*id),
                    });
                }
                ClusterItem::Group(cluster) => {
                    let radius = badge_radius(cluster.count());
                    draw_badge(painter, center, radius, cluster.count());
                    hits.push(Hit {
                        center,
                        radius,
                        target: HitTarget::Cluster {
                            position,
                            min: cluster.min,
                            max: cluster.max,
                            count: cluster.count(),
                        },
                    });
                }
            }
        }

        if let Some((id, center)) = selected_pin {
            draw_pin(painter, center, true);
            hits.push(Hit {
                center,
                radius: SELECTED_PIN_RADIUS + 2.0,
                target: HitTarget::Marker(id),
            });
        }

        hits
    }
}

/// Badge radius grows with the log of the member count.
fn badge_radius(count: usize) -> f32 {
    let digits = (count.max(1) as f32).log10().floor();
    12.0 + digits * 4.0
}

/// Topmost hit under `pos`. Later entries are drawn over earlier ones.
fn hit_test(hits: &[Hit], pos: Pos2) -> Option<Hit> {
    hits.iter()
        .rev()
        .find(|hit| hit.center.distance(pos) <= hit.radius)
        .copied()
}

fn draw_pin(painter: &Painter, center: Pos2, selected: bool) {
    let (radius, fill) = if selected {
        (SELECTED_PIN_RADIUS, colors::markers::PIN_SELECTED)
    } else {
        (PIN_RADIUS, colors::markers::PIN)
    };
    painter.circle_filled(center, radius, fill);
    painter.circle_stroke(center, radius, Stroke::new(1.0, colors::markers::PIN_STROKE));
}

fn draw_badge(painter: &Painter, center: Pos2, radius: f32, count: usize) {
    painter.circle_filled(center, radius + 4.0, colors::markers::cluster_halo());
    painter.circle_filled(center, radius, colors::markers::CLUSTER);
    painter.text(
        center,
        Align2::CENTER_CENTER,
        count.to_string(),
        FontId::proportional(12.0),
        colors::markers::CLUSTER_TEXT,
    );
}

fn handle_canvas_interaction(response: &egui::Response, state: &mut AppState) {
    // Handle dragging for panning
    if response.dragged() {
        state.view.pan_by(response.drag_delta());
    }

    // Handle scroll and pinch for zooming relative to cursor position
    if response.hovered() {
        let (scroll_delta, pinch) = response
            .ctx
            .input(|i| (i.raw_scroll_delta, i.zoom_delta()));
        let mut zoom_delta = scroll_delta.y * 0.005;
        if pinch != 1.0 {
            zoom_delta += pinch.log2();
        }

        if zoom_delta != 0.0 {
            let cursor = response
                .hover_pos()
                .unwrap_or_else(|| state.view.screen_rect.center());
            state.view.zoom_at(cursor, zoom_delta);
        }
    }
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, state: &AppState, view: &MapView) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(160.0, 80.0));

    let lines = [
        format!("Markers:  {}", view.marker_count()),
        format!("Clusters: {}", view.clusters.group_count()),
        format!("Zoom:     {:.1}", state.view.zoom),
        format!("Map:      {}", view.backend.name()),
    ];

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            for line in lines {
                ui.label(
                    RichText::new(line)
                        .monospace()
                        .size(12.0)
                        .color(colors::canvas::OVERLAY_TEXT),
                );
            }
        });
    });
}

/// Detail overlay anchored above the selected marker.
fn show_popup(ctx: &egui::Context, state: &mut AppState) {
    let Some(id) = state.selection.selected() else {
        return;
    };
    let Some(record) = state.records.get(id) else {
        state.selection.clear();
        return;
    };

    let anchor = state.view.geo_to_screen(record.position());
    if !state.view.screen_rect.contains(anchor) {
        return;
    }

    let content = PopupContent::from_record(record);
    let mut close = false;

    egui::Area::new(egui::Id::new("detonation_popup"))
        .order(egui::Order::Foreground)
        .pivot(Align2::CENTER_BOTTOM)
        .fixed_pos(anchor - Vec2::new(0.0, SELECTED_PIN_RADIUS + 6.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(260.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&content.title).strong().size(14.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(icons::X).on_hover_text("Close").clicked() {
                            close = true;
                        }
                    });
                });
                ui.separator();

                egui::Grid::new("detonation_popup_rows")
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        for (label, value) in &content.rows {
                            ui.label(RichText::new(*label).size(11.0).color(colors::ui::LABEL));
                            ui.label(RichText::new(value).size(12.0));
                            ui.end_row();
                        }
                    });
            });
        });

    if close {
        state.selection.clear();
    }
}
