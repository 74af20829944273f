use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{SpectraSet, ViewerState};

// ---------------------------------------------------------------------------
// Left side panel – curve visibility
// ---------------------------------------------------------------------------

/// Render the left panel listing every curve of the current set.
pub fn side_panel(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Spectra");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.show_all();
        }
        if ui.small_button("None").clicked() {
            state.hide_all();
        }
    });

    let curves: Vec<(String, String)> = state
        .series()
        .iter()
        .map(|s| (s.label.clone(), s.legend.clone()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (label, legend) in &curves {
                let text = RichText::new(legend).color(state.color_map.color_for(label));
                let mut checked = state.is_visible(label);
                if ui.checkbox(&mut checked, text).on_hover_text(label.as_str()).changed() {
                    state.toggle(label);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(&state.title);
        ui.separator();

        let mut set = state.set;
        ui.radio_value(&mut set, SpectraSet::Chosen, "Chosen spectra");
        ui.radio_value(&mut set, SpectraSet::All, "All spectra");
        state.set_spectra_set(set);

        ui.separator();
        ui.label(format!(
            "{} of {} curves shown",
            state.visible_series().count(),
            state.series().len()
        ));

        ui.separator();

        if ui
            .selectable_label(state.minmax_scaling, "Min-Max Scaling")
            .clicked()
        {
            state.minmax_scaling = !state.minmax_scaling;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
