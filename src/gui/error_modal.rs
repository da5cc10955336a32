use std::collections::VecDeque;

use eframe::egui;

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorData {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

/// Failures the user has to acknowledge, shown one at a time in arrival order.
pub struct ErrorModal {
    queue: VecDeque<ErrorData>,
}

impl ErrorModal {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    pub fn show_error(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        details: Option<impl Into<String>>,
    ) {
        let error = ErrorData {
            title: title.into(),
            message: message.into(),
            details: details.map(|d| d.into()),
        };

        // The same failure reported twice in a row is shown once
        if self.queue.back() != Some(&error) {
            self.queue.push_back(error);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let remaining = self.pending().saturating_sub(1);
        let Some(error) = self.queue.front() else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("error_modal")).show(ctx, |ui| {
            ui.set_width(450.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("⚠").size(24.0).color(ui.visuals().error_fg_color));
                ui.label(egui::RichText::new(error.title.as_str()).size(18.0).strong());
            });

            ui.add_space(10.0);
            ui.label(error.message.as_str());

            if let Some(details) = &error.details {
                ui.add_space(10.0);
                ui.collapsing("Details", |ui| {
                    egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut details.as_str())
                                .desired_width(f32::INFINITY)
                                .desired_rows(4)
                                .code_editor(),
                        );
                    });
                    if ui.small_button("📋 Copy").clicked() {
                        ui.ctx().copy_text(details.clone());
                    }
                });
            }

            ui.add_space(15.0);

            ui.horizontal(|ui| {
                if remaining > 0 {
                    ui.weak(format!("{} more", remaining));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if remaining > 0 { "Next" } else { "OK" };
                    if ui.button(label).clicked() {
                        ui.close();
                    }
                });
            });
        });

        if modal.should_close() {
            self.queue.pop_front();
        }
    }
}

impl Default for ErrorModal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_queue_in_order_without_repeats() {
        let mut modal = ErrorModal::new();
        assert_eq!(modal.pending(), 0);

        modal.show_error("Model Error", "Failed to load", Some("offline"));
        modal.show_error("Model Error", "Failed to load", Some("offline"));
        modal.show_error("File Error", "Some files could not be read", None::<String>);

        assert_eq!(modal.pending(), 2);
        assert_eq!(modal.queue.front().map(|e| e.title.as_str()), Some("Model Error"));
    }
}
