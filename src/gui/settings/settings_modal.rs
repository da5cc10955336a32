use eframe::egui;

use super::data::{
    SettingsData,
    MAX_PARALLELISM,
};
use crate::{
    analysis::ModelSize,
    core::models::MAX_KEYWORDS,
};

pub struct SettingsModal {
    open: bool,
    temp_settings: SettingsData,
    original_settings: SettingsData,
}

impl SettingsModal {
    pub fn new() -> Self {
        Self {
            open: false,
            temp_settings: SettingsData::default(),
            original_settings: SettingsData::default(),
        }
    }

    pub fn open_settings(&mut self, current_settings: SettingsData) {
        self.temp_settings = current_settings.clone();
        self.original_settings = current_settings;
        self.open = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.temp_settings != self.original_settings
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<SettingsData> {
        if !self.open {
            return None;
        }

        let mut result: Option<SettingsData> = None;

        let modal = egui::Modal::new(egui::Id::new("settings_modal")).show(ctx, |ui| {
            ui.set_width(380.0);
            ui.heading("Settings");
            ui.add_space(10.0);

            self.ui_model(ui);
            ui.add_space(6.0);
            self.ui_analysis(ui);
            ui.add_space(6.0);
            ui.checkbox(&mut self.temp_settings.dark_mode, "Dark mode");

            ui.add_space(10.0);
            ui.separator();

            let is_dirty = self.is_dirty();

            ui.horizontal(|ui| {
                if is_dirty {
                    ui.colored_label(egui::Color32::YELLOW, "⚠");
                    ui.label("Settings have been modified");
                } else {
                    ui.colored_label(egui::Color32::TRANSPARENT, "⚠");
                    ui.label("");
                }
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                if ui.add_enabled(is_dirty, egui::Button::new("Save Settings")).clicked() {
                    let settings = self.temp_settings.clone().sanitized();
                    self.original_settings = settings.clone();
                    result = Some(settings);
                    ui.close();
                }

                if ui.button("Cancel").clicked() {
                    self.temp_settings = self.original_settings.clone();
                    ui.close();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Restore Default").clicked() {
                        self.temp_settings = SettingsData {
                            last_export_dir: self.original_settings.last_export_dir.clone(),
                            ..SettingsData::default()
                        };
                    }
                });
            });
        });

        if modal.should_close() {
            self.open = false;
        }

        result
    }

    fn ui_model(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Sentiment model:");
            egui::ComboBox::from_id_salt("model_size_combo")
                .selected_text(self.temp_settings.model_size.to_string())
                .show_ui(ui, |ui| {
                    for size in [ModelSize::Base, ModelSize::Large] {
                        ui.selectable_value(
                            &mut self.temp_settings.model_size,
                            size,
                            size.to_string(),
                        );
                    }
                });
        });

        if self.temp_settings.model_size != self.original_settings.model_size {
            ui.weak("The model is downloaded and reloaded after saving.");
        }
    }

    fn ui_analysis(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("settings_analysis_grid").num_columns(2).spacing([10.0, 4.0]).show(
            ui,
            |ui| {
                ui.label("Keywords per text:");
                ui.add(
                    egui::DragValue::new(&mut self.temp_settings.keyword_count)
                        .speed(0.1)
                        .range(1..=MAX_KEYWORDS),
                );
                ui.end_row();

                ui.label("Worker threads:");
                ui.add(
                    egui::DragValue::new(&mut self.temp_settings.max_parallelism)
                        .speed(0.1)
                        .range(1..=MAX_PARALLELISM),
                )
                .on_hover_text("Number of texts analysed at the same time");
                ui.end_row();
            },
        );
    }
}

impl Default for SettingsModal {
    fn default() -> Self {
        Self::new()
    }
}
