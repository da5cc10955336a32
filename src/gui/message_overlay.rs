use eframe::egui;

use crate::gui::theme::Theme;

/// Dims the window and shows a spinner while tools load or a run is in progress.
pub struct MessageOverlay {
    message: Option<String>,
}

impl MessageOverlay {
    pub fn new() -> Self {
        Self { message: Some("Loading analysis tools...".to_string()) }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn show(&self, ctx: &egui::Context, theme: &Theme) {
        let Some(message) = &self.message else {
            return;
        };

        egui::Area::new(egui::Id::new("message_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ui.ctx().screen_rect();
                ui.allocate_space(screen_rect.size());
                ui.painter().rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(120));
            });

        egui::Window::new("message_box")
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .title_bar(false)
            .fixed_size(egui::Vec2::new(260.0, 100.0))
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.style_mut().visuals.window_stroke =
                    egui::Stroke::new(2.0, theme.cyan(ui.ctx()));

                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.add(egui::Spinner::new().size(24.0));
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                });
            });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

impl Default for MessageOverlay {
    fn default() -> Self {
        Self::new()
    }
}
