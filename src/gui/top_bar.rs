use eframe::egui::{
    self,
    containers,
};

use super::actions::{
    ActionQueue,
    UiAction,
};
use crate::analysis::ModelSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolsStatus {
    Loading,
    Ready,
    Failed,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        actions: &mut ActionQueue,
        model_size: ModelSize,
        tools_status: ToolsStatus,
        busy: bool,
    ) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add_enabled(!busy, egui::Button::new("Add Files…")).clicked() {
                        actions.push(UiAction::PickFiles);
                    }
                    if ui.add_enabled(!busy, egui::Button::new("Clear Files")).clicked() {
                        actions.push(UiAction::ClearFiles);
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Settings", |ui| {
                    if ui.add_enabled(!busy, egui::Button::new("Preferences…")).clicked() {
                        actions.push(UiAction::OpenSettings);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    Self::show_status_indicator(ui, model_size, tools_status);
                });
            });
        });
    }

    fn show_status_indicator(ui: &mut egui::Ui, model_size: ModelSize, status: ToolsStatus) {
        let (color, tooltip) = match status {
            ToolsStatus::Ready => (egui::Color32::from_rgb(0, 200, 0), "Model loaded"),
            ToolsStatus::Loading => (egui::Color32::from_rgb(220, 180, 0), "Model loading"),
            ToolsStatus::Failed => (egui::Color32::from_rgb(200, 80, 80), "Model failed to load"),
        };

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            ui.small(model_size.to_string()).on_hover_text(tooltip);
            ui.small(egui::RichText::new("●").color(color)).on_hover_text(tooltip);
        });
    }
}
