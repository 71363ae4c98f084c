use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::color_for;
use crate::data::model::Department;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one collapsible section per filter category.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the value lists so we can mutate state inside the loop.
    let years: Vec<i64> = dataset.years.iter().copied().collect();
    let terms: Vec<String> = dataset.terms.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Years ----
            let header = format!("Years  ({}/{})", state.selection.years.len(), years.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("years")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_years();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_years();
                        }
                    });
                    for &year in &years {
                        let mut checked = state.selection.years.contains(&year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(year);
                        }
                    }
                });

            // ---- Terms ----
            let header = format!("Terms  ({}/{})", state.selection.terms.len(), terms.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("terms")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_terms();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_terms();
                        }
                    });
                    for term in &terms {
                        let mut checked = state.selection.terms.contains(term);
                        if ui.checkbox(&mut checked, term).changed() {
                            state.toggle_term(term);
                        }
                    }
                });

            // ---- Departments ----
            let header = format!(
                "Departments  ({}/{})",
                state.selection.departments.len(),
                Department::ALL.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("departments")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_departments();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_departments();
                        }
                    });
                    for dept in Department::ALL {
                        let mut checked = state.selection.departments.contains(&dept);
                        let text = RichText::new(dept.label())
                            .color(color_for(&state.dept_colors, dept));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_department(dept);
                        }
                    }
                    ui.small("Narrows the department breakdown only.");
                });
        });
}

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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} in view",
                ds.len(),
                state.aggregates.record_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open enrollment data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records covering {} years",
                    dataset.len(),
                    dataset.years.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                // Keep whatever dataset was already loaded; never install a
                // partial one.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
