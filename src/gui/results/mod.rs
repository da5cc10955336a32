mod charts;
mod details;
mod export_form;
mod table;

use eframe::egui;
use export_form::ExportFormWidget;
use table::ResultsTableWidget;

use super::{
    actions::ActionQueue,
    theme::Theme,
};
use crate::core::{
    FileFailure,
    RunOutcome,
};

const SECTION_SPACING: f32 = 14.0;

/// What the central panel shows: the last run and any warning raised by the last click.
#[derive(Default)]
pub struct ResultsState {
    pub outcome: Option<RunOutcome>,
    pub notice: Option<String>,
}

impl ResultsState {
    /// Drops the previous run before a new one starts.
    pub fn clear(&mut self) {
        self.outcome = None;
        self.notice = None;
    }

    pub fn set_outcome(&mut self, outcome: RunOutcome) {
        self.outcome = Some(outcome);
        self.notice = None;
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.outcome = None;
        self.notice = Some(notice.into());
    }

    pub fn has_exportable_results(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| !o.results.is_empty())
    }
}

pub struct ResultsPanel;

impl ResultsPanel {
    pub fn show(
        ctx: &egui::Context,
        theme: &Theme,
        state: &ResultsState,
        actions: &mut ActionQueue,
        busy: bool,
    ) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_salt("results_scroll").show(ui, |ui| {
                if let Some(notice) = &state.notice {
                    ui.colored_label(theme.orange(ctx), format!("⚠ {}", notice));
                    ui.add_space(SECTION_SPACING);
                }

                let Some(outcome) = &state.outcome else {
                    if state.notice.is_none() {
                        Self::ui_placeholder(ui, theme);
                    }
                    return;
                };

                Self::ui_failures(ui, theme, &outcome.failures);

                if let Some(single) = &outcome.single_text {
                    details::show_single_text(ui, theme, single);
                    ui.add_space(SECTION_SPACING);
                }

                let results = &outcome.results;
                if results.is_empty() {
                    if outcome.single_text.is_none() {
                        ui.label(theme.muted(ctx, "No results were produced."));
                    }
                    return;
                }

                ui.label(theme.heading(ctx, "🔍 Analysis Results"));
                ui.add_space(4.0);
                ResultsTableWidget::show(ui, theme, results);

                ui.add_space(SECTION_SPACING);
                ui.label(theme.heading(ctx, "📤 Export Results"));
                ExportFormWidget::show(ui, actions, !busy);

                ui.add_space(SECTION_SPACING);
                ui.label(theme.heading(ctx, "Sentiment Distribution"));
                charts::distribution_chart(ui, theme, &results.label_counts());

                if results.has_multiple_sources() {
                    ui.add_space(SECTION_SPACING);
                    ui.label(theme.heading(ctx, "Sentiment Comparison by File"));
                    charts::comparison_chart(ui, theme, &results.counts_by_source());
                }

                ui.add_space(SECTION_SPACING);
                ui.label(theme.heading(ctx, "🔎 Detailed Sentiment Explanations"));
                details::show_details(ui, theme, results);
            });
        });
    }

    fn ui_placeholder(ui: &mut egui::Ui, theme: &Theme) {
        let ctx = ui.ctx().clone();
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("Sentiment Dashboard");
            ui.add_space(6.0);
            ui.label(theme.muted(&ctx, "Add files or enter text on the left, then press Analyze."));
        });
    }

    fn ui_failures(ui: &mut egui::Ui, theme: &Theme, failures: &[FileFailure]) {
        if failures.is_empty() {
            return;
        }

        let color = theme.orange(ui.ctx());
        for failure in failures {
            ui.colored_label(color, format!("⚠ {}: {}", failure.reason, failure.filename));
        }
        ui.add_space(SECTION_SPACING);
    }
}
