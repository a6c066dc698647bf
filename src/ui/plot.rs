use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Signal plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current row, clipped to the trailing playback window.
pub fn signal_plot(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a file to start reviewing  (File → Open…)");
        });
        return;
    }

    let index = state.review.index();
    let series = match state.current_render() {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("The loaded file has no rows.");
            });
            return;
        }
        Some(Err(e)) => {
            let text = format!("Cannot display signal {}: {e}", index + 1);
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new(text).color(Color32::RED));
            });
            return;
        }
        Some(Ok(series)) => series,
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(format!("Signal {}", index + 1));
    });

    let bounds = PlotBounds::from_min_max(
        [*series.x_range.start(), *series.y_range.start()],
        [*series.x_range.end(), *series.y_range.end()],
    );
    let color = if series.filtered {
        Color32::from_rgb(255, 140, 0)
    } else {
        Color32::LIGHT_BLUE
    };

    // The window is driven by playback, not by the mouse.
    Plot::new("signal_plot")
        .legend(Legend::default())
        .x_axis_label("Time (seconds)")
        .y_axis_label("Amplitude")
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(bounds);
            let line = Line::new(PlotPoints::from(series.points.clone()))
                .name(series.legend())
                .color(color)
                .width(1.5);
            plot_ui.line(line);
        });
}
