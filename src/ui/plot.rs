use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::{plotted_powers, ViewerState};

// ---------------------------------------------------------------------------
// Emission spectra plot (central panel)
// ---------------------------------------------------------------------------

/// Render the overlay of all visible curves in the central panel.
pub fn spectral_plot(ui: &mut Ui, state: &ViewerState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Emission Spectra");
    });

    if state.series().is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No spectra to plot.");
        });
        return;
    }

    let y_label = if state.minmax_scaling {
        "Normalised Radiant Flux"
    } else {
        "Radiant Flux (W/nm)"
    };

    Plot::new("emission_spectra")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in state.visible_series() {
                let powers = plotted_powers(series, state.minmax_scaling);
                let points: PlotPoints = series
                    .wavelengths
                    .iter()
                    .zip(powers.iter())
                    .map(|(&x, &y)| [x, y])
                    .collect();

                let line = Line::new(points)
                    .name(&series.legend)
                    .color(state.color_map.color_for(&series.label))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
