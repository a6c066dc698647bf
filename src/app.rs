use std::time::Instant;

use eframe::egui;

use crate::config::ReviewConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SignalReviewerApp {
    pub state: AppState,
}

impl SignalReviewerApp {
    pub fn new(config: ReviewConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SignalReviewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Playback timer: run a due tick before drawing ----
        self.state.poll_playback(Instant::now());

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: review buttons ----
        egui::TopBottomPanel::bottom("button_bar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                panels::button_bar(ui, &mut self.state);
            });

        // ---- Left side panel: responses ----
        egui::SidePanel::left("response_panel")
            .default_width(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::response_panel(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::signal_plot(ui, &mut self.state);
        });

        // Wake up for the next tick even without input.
        if let Some(delay) = self.state.playback.time_until_next(Instant::now()) {
            ctx.request_repaint_after(delay);
        }
    }
}
