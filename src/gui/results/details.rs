use eframe::egui;

use crate::{
    core::{
        AnalysisResult,
        ResultSet,
    },
    gui::theme::Theme,
};

fn field(ui: &mut egui::Ui, name: &str, value: impl Into<egui::WidgetText>) {
    ui.horizontal_wrapped(|ui| {
        ui.strong(format!("{}:", name));
        ui.label(value);
    });
}

pub fn result_fields(ui: &mut egui::Ui, theme: &Theme, result: &AnalysisResult) {
    let ctx = ui.ctx().clone();
    field(ui, "Text", result.text.as_str());
    field(ui, "Sentiment", theme.sentiment_text(&ctx, result.sentiment));
    field(ui, "Confidence", result.confidence_display());
    field(ui, "Keywords", result.keywords_joined());
    field(ui, "Explanation", result.explanation.as_str());
}

/// One collapsible "Text i – Label" entry per result.
pub fn show_details(ui: &mut egui::Ui, theme: &Theme, results: &ResultSet) {
    let ctx = ui.ctx().clone();
    for (index, result) in results.iter().enumerate() {
        egui::CollapsingHeader::new(format!("Text {} – {}", index + 1, result.sentiment))
            .id_salt(("result_detail", index))
            .show(ui, |ui| {
                result_fields(ui, theme, result);
                ui.label(theme.muted(&ctx, &format!("Source: {}", result.source)));
            });
    }
}

/// Summary card for the free-text input.
pub fn show_single_text(ui: &mut egui::Ui, theme: &Theme, result: &AnalysisResult) {
    let ctx = ui.ctx().clone();
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(theme.heading(&ctx, "Single Text Analysis"));
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.strong("Sentiment:");
            ui.label(theme.sentiment_text(&ctx, result.sentiment));
            ui.separator();
            ui.strong("Confidence:");
            ui.label(result.confidence_display());
        });
        field(ui, "Keywords", result.keywords_joined());
    });
}
