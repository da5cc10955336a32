use eframe::egui;

use crate::{
    gui::actions::{
        ActionQueue,
        UiAction,
    },
    report::ExportFormat,
};

pub struct ExportFormWidget;

impl ExportFormWidget {
    pub fn show(ui: &mut egui::Ui, actions: &mut ActionQueue, enabled: bool) {
        ui.horizontal(|ui| {
            for format in ExportFormat::ALL {
                let button = egui::Button::new(format!("⬇ Download {}", format));
                if ui
                    .add_enabled(enabled, button)
                    .on_hover_text(format.default_file_name())
                    .clicked()
                {
                    actions.push(UiAction::Export(format));
                }
            }
        });
    }
}
