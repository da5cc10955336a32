use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

use crate::{
    core::ResultSet,
    gui::theme::Theme,
};

const RESULTS_TABLE_HEIGHT: f32 = 320.0;
const TABLE_HEADER_HEIGHT: f32 = 22.0;
const TABLE_ROW_HEIGHT: f32 = 20.0;

pub struct ResultsTableWidget;

impl ResultsTableWidget {
    pub fn show(ui: &mut egui::Ui, theme: &Theme, results: &ResultSet) {
        let ctx = ui.ctx().clone();

        ui.push_id("results_table", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(RESULTS_TABLE_HEIGHT)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(30.0))
                .column(Column::initial(110.0).at_least(60.0).clip(true))
                .column(Column::initial(260.0).at_least(80.0).clip(true))
                .column(Column::auto().at_least(90.0))
                .column(Column::auto().at_least(70.0))
                .column(Column::initial(180.0).at_least(60.0).clip(true))
                .column(Column::remainder().at_least(120.0).clip(true))
                .header(TABLE_HEADER_HEIGHT, |mut header| {
                    for title in
                        ["#", "Source", "Text", "Sentiment", "Confidence", "Keywords", "Explanation"]
                    {
                        header.col(|ui| {
                            ui.label(theme.heading(&ctx, title));
                        });
                    }
                })
                .body(|body| {
                    body.rows(TABLE_ROW_HEIGHT, results.len(), |mut row| {
                        let index = row.index();
                        let result = &results.results[index];

                        row.col(|ui| {
                            ui.label((index + 1).to_string());
                        });
                        row.col(|ui| {
                            ui.label(theme.muted(&ctx, &result.source));
                        });
                        row.col(|ui| {
                            ui.add(egui::Label::new(result.text.as_str()).truncate())
                                .on_hover_text(result.text.as_str());
                        });
                        row.col(|ui| {
                            ui.label(theme.sentiment_text(&ctx, result.sentiment));
                        });
                        row.col(|ui| {
                            ui.label(result.confidence_display());
                        });
                        row.col(|ui| {
                            let keywords = result.keywords_joined();
                            ui.add(egui::Label::new(keywords.as_str()).truncate()).on_hover_text(keywords.as_str());
                        });
                        row.col(|ui| {
                            ui.add(egui::Label::new(result.explanation.as_str()).truncate())
                                .on_hover_text(result.explanation.as_str());
                        });
                    });
                });
        });
    }
}
