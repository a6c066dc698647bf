use std::path::PathBuf;

use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::review::{Label, Phase};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Save responses"))
                .clicked()
            {
                save_responses(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows × {} samples",
                ds.len(),
                ds.sample_columns()
            ));
            if let Some(path) = state.gateway.output_path() {
                ui.separator();
                ui.label(format!("Saving to {}", path.display()));
            }
        }

        if let Some(msg) = &state.status {
            ui.separator();
            let color = if msg.is_error { Color32::RED } else { Color32::GRAY };
            ui.label(RichText::new(&msg.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom bar – review buttons
// ---------------------------------------------------------------------------

/// Render the review controls. Everything but Load is disabled until a
/// dataset is loaded.
pub fn button_bar(ui: &mut Ui, state: &mut AppState) {
    let loaded = state.review.phase() != Phase::Empty;
    let has_rows = loaded && state.review.row_count() > 0;

    ui.horizontal(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing.x = 10.0;

        if ui.button("Load CSV").clicked() {
            open_file_dialog(state);
        }

        if ui
            .add_enabled(
                loaded,
                egui::SelectableLabel::new(state.review.preprocessing_enabled, "Preprocessing"),
            )
            .clicked()
        {
            state.toggle_preprocessing();
        }

        let play_text = if state.review.is_playing() {
            "Pause"
        } else {
            "Play"
        };
        if ui
            .add_enabled(has_rows, egui::Button::new(play_text))
            .clicked()
        {
            state.toggle_playback();
        }

        if ui.add_enabled(has_rows, egui::Button::new("Yes")).clicked() {
            state.label_current(Label::Yes);
        }
        if ui.add_enabled(has_rows, egui::Button::new("No")).clicked() {
            state.label_current(Label::No);
        }
        if ui
            .add_enabled(state.review.has_previous(), egui::Button::new("Previous"))
            .clicked()
        {
            state.previous();
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            if ui
                .add_enabled(state.review.has_next(), egui::Button::new("Next"))
                .clicked()
            {
                state.next();
            }
            if ui
                .add_enabled(loaded, egui::Button::new("Save Responses"))
                .clicked()
            {
                save_responses(state);
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Left side panel – response overview
// ---------------------------------------------------------------------------

/// Render the per-row label table.
pub fn response_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Responses");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let (yes, no, open) = state.review.tally();
    ui.label(format!("Yes: {yes}   No: {no}   Open: {open}"));
    ui.separator();

    let current = state.review.index();
    let responses = state.review.responses();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(50.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Signal");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Response");
            });
        })
        .body(|body| {
            body.rows(18.0, responses.len(), |mut row| {
                let i = row.index();
                row.set_selected(i == current);
                row.col(|ui: &mut Ui| {
                    ui.label((i + 1).to_string());
                });
                row.col(|ui: &mut Ui| {
                    let label = responses[i];
                    let color = match label {
                        Label::Yes => Color32::from_rgb(60, 170, 90),
                        Label::No => Color32::from_rgb(210, 70, 60),
                        Label::Unlabeled => Color32::GRAY,
                    };
                    let text = if label == Label::Unlabeled { "–" } else { label.as_str() };
                    ui.label(RichText::new(text).color(color));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open signal data")
        .add_filter("Supported files", &["csv", "txt", "tsv", "parquet", "pq"])
        .add_filter("CSV Files", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are already logged and shown in the status line.
        let _ = state.load(&path);
    }
}

/// Save, asking for a destination only on the first save of the session.
pub fn save_responses(state: &mut AppState) {
    let _ = state.save(pick_destination);
}

fn pick_destination() -> Option<PathBuf> {
    let mut path = rfd::FileDialog::new()
        .set_title("Save responses")
        .add_filter("CSV Files", &["csv"])
        .set_file_name("responses.csv")
        .save_file()?;
    if path.extension().is_none() {
        path.set_extension("csv");
    }
    Some(path)
}
