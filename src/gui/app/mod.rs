mod modals;
mod tools;

use std::{
    mem,
    path::PathBuf,
};

use eframe::egui::{
    self,
    Id,
};
use log::{
    debug,
    error,
    info,
    warn,
};
use modals::Modals;
use tools::ToolsState;

use super::{
    actions::{
        ActionQueue,
        UiAction,
    },
    input_panel::{
        InputPanel,
        InputState,
    },
    message_overlay::MessageOverlay,
    results::{
        ResultsPanel,
        ResultsState,
    },
    settings::{
        data::SETTINGS_FILE,
        SettingsData,
    },
    theme::{
        apply_dark_mode,
        set_theme,
        Theme,
    },
    top_bar::{
        ToolsStatus,
        TopBar,
    },
};
use crate::{
    analysis::AnalysisTools,
    core::{
        tasks::{
            TaskManager,
            TaskResult,
        },
        DashboardError,
        FileFormat,
        UploadedDocument,
    },
    persistence::{
        load_json_or_default,
        save_json,
    },
    report::{
        self,
        ExportFormat,
    },
};

pub struct DashboardApp {
    // Input
    pub input: InputState,

    // Results
    pub results: ResultsState,

    // Configuration
    pub settings_data: SettingsData,

    // UI State
    pub theme: Theme,
    pub message_overlay: MessageOverlay,
    pub modals: Modals,
    actions: ActionQueue,

    // Analysis
    tools: ToolsState,
    analysis_running: bool,
    task_manager: TaskManager,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_data = load_json_or_default::<SettingsData>(SETTINGS_FILE).sanitized();

        let task_manager = TaskManager::new();
        task_manager.load_tools(settings_data.model_size);
        let tools = ToolsState::loading(settings_data.model_size);

        let app = Self {
            // Input
            input: InputState::default(),

            // Results
            results: ResultsState::default(),

            // Configuration
            settings_data,

            // UI State
            theme: Theme::default(),
            message_overlay: MessageOverlay::new(),
            modals: Modals::default(),
            actions: ActionQueue::new(),

            // Analysis
            tools,
            analysis_running: false,
            task_manager,
        };

        set_theme(&cc.egui_ctx, &app.theme);
        apply_dark_mode(&cc.egui_ctx, app.settings_data.dark_mode);

        app
    }

    fn busy(&self) -> bool {
        self.analysis_running || self.tools.status() == ToolsStatus::Loading
    }
}

fn configured_tools(settings: &SettingsData, tools: AnalysisTools) -> AnalysisTools {
    tools.with_keyword_count(settings.keyword_count).with_max_parallelism(settings.max_parallelism)
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for result in self.task_manager.poll_results() {
            self.handle_task_result(result);
        }

        self.handle_file_drops(ctx);
        self.draw_file_drop_overlay(ctx);

        let busy = self.busy();
        let can_analyze = !busy && self.tools.tools().is_some();

        TopBar::show(
            ctx,
            &mut self.actions,
            self.settings_data.model_size,
            self.tools.status(),
            busy,
        );
        InputPanel::show(ctx, &self.theme, &mut self.input, &mut self.actions, can_analyze);
        ResultsPanel::show(ctx, &self.theme, &self.results, &mut self.actions, busy);

        self.message_overlay.show(ctx, &self.theme);
        self.modals.error.show(ctx);

        if let Some(settings) = self.modals.settings.show(ctx) {
            self.apply_settings(settings, ctx);
        }

        let had_actions = !self.actions.is_empty();
        self.execute_actions();
        if had_actions {
            ctx.request_repaint();
        }
    }
}

impl DashboardApp {
    fn execute_actions(&mut self) {
        let actions: Vec<UiAction> = self.actions.drain().collect();
        for action in actions {
            match action {
                UiAction::PickFiles => self.pick_files(),
                UiAction::AddPaths(paths) => self.add_paths(paths),
                UiAction::RemoveFile(index) => self.input.remove_document(index),
                UiAction::ClearFiles => self.input.documents.clear(),
                UiAction::Analyze => self.start_analysis(),
                UiAction::Export(format) => self.export_results(format),
                UiAction::OpenSettings if !self.busy() => {
                    self.modals.settings.open_settings(self.settings_data.clone());
                }
                UiAction::OpenSettings => debug!("Settings are locked while busy"),
            }
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        debug!("Task result: {}", result.task_type());

        match result {
            TaskResult::LoadingMessage(message) => {
                self.message_overlay.set_message(message);
            }

            TaskResult::ToolsLoaded { model_size, result } => {
                let result = result.map(|tools| configured_tools(&self.settings_data, tools));
                let Some(result) = self.tools.finish(model_size, result) else {
                    return;
                };
                self.message_overlay.clear_message();
                if let Err(e) = result {
                    self.modals.error.show_error(
                        "Model Error",
                        "Failed to load the sentiment model. Check your network connection and restart, or pick another model in Settings.",
                        Some(e),
                    );
                }
            }

            TaskResult::AnalysisComplete(result) => {
                self.analysis_running = false;
                self.message_overlay.clear_message();
                match result {
                    Ok(outcome) => {
                        for failure in &outcome.failures {
                            warn!("{}: {}", failure.filename, failure.reason);
                        }
                        self.results.set_outcome(outcome);
                    }
                    Err(e) => {
                        error!("Analysis failed: {}", e);
                        self.modals.error.show_error(
                            "Analysis Error",
                            "Unable to analyse the input",
                            Some(e),
                        );
                    }
                }
            }
        }
    }

    fn start_analysis(&mut self) {
        let request = self.input.to_request();

        if request.is_empty() {
            self.results.set_notice(DashboardError::NoInput.to_string());
            return;
        }

        let Some(tools) = self.tools.tools().cloned() else {
            self.modals.error.show_error(
                "Not Ready",
                "The sentiment model is not loaded yet.",
                None::<String>,
            );
            return;
        };

        info!(
            "Starting analysis of {} files{}",
            request.documents.len(),
            if request.text.trim().is_empty() { "" } else { " and free text" }
        );

        self.results.clear();
        self.analysis_running = true;
        self.message_overlay.set_message("Analyzing...");
        self.task_manager.run_analysis(request, tools);
    }

    fn apply_settings(&mut self, settings: SettingsData, ctx: &egui::Context) {
        let reload_model = settings.model_size != self.settings_data.model_size;
        self.settings_data = settings;

        apply_dark_mode(ctx, self.settings_data.dark_mode);

        if reload_model {
            self.tools.reload(self.settings_data.model_size);
            self.message_overlay.set_message("Loading analysis tools...");
            self.task_manager.load_tools(self.settings_data.model_size);
        } else {
            let settings = &self.settings_data;
            self.tools.reconfigure(|tools| configured_tools(settings, tools));
        }

        self.save_settings();
    }

    fn save_settings(&self) {
        if let Err(e) = save_json(&self.settings_data, SETTINGS_FILE) {
            error!("Failed to save settings: {}", e);
        }
    }

    fn pick_files(&mut self) {
        let paths = rfd::FileDialog::new()
            .set_title("Add documents")
            .add_filter("Documents", FileFormat::supported_extensions())
            .pick_files();

        if let Some(paths) = paths {
            self.add_paths(paths);
        }
    }

    fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let mut unreadable = Vec::new();

        for path in paths {
            match UploadedDocument::from_path(&path) {
                Ok(document) => {
                    debug!("Queued {} ({})", document.filename, document.format);
                    self.input.add_document(document);
                }
                Err(e) => {
                    warn!("Could not read {}: {}", path.display(), e);
                    unreadable.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        if !unreadable.is_empty() {
            self.modals.error.show_error(
                "File Error",
                "Some files could not be read",
                Some(unreadable.join("\n")),
            );
        }
    }

    fn export_results(&mut self, format: ExportFormat) {
        if !self.results.has_exportable_results() {
            return;
        }
        let Some(outcome) = &self.results.outcome else {
            return;
        };

        let mut dialog = rfd::FileDialog::new()
            .set_title(format!("Export {}", format))
            .set_file_name(format.default_file_name())
            .add_filter(format.to_string(), &[format.extension()]);
        if let Some(dir) = &self.settings_data.last_export_dir {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            return;
        };

        match report::export(&outcome.results, format, &path) {
            Ok(written) => {
                if let Some(dir) = written.parent() {
                    self.settings_data.last_export_dir = Some(dir.to_path_buf());
                    self.save_settings();
                }
            }
            Err(e) => {
                error!("{}", e);
                self.modals.error.show_error(
                    "Export Error",
                    format!("Unable to export results as {}", format),
                    Some(e.to_string()),
                );
            }
        }
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input_mut(|i| mem::take(&mut i.raw.dropped_files));
        if dropped.is_empty() || self.busy() {
            return;
        }

        let paths: Vec<PathBuf> = dropped.into_iter().filter_map(|f| f.path).collect();
        if !paths.is_empty() {
            self.actions.push(UiAction::AddPaths(paths));
        }
    }

    fn draw_file_drop_overlay(&self, ctx: &egui::Context) {
        let hovering_any = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if !hovering_any || self.busy() {
            return;
        }

        let any_supported = ctx.input(|i| {
            i.raw
                .hovered_files
                .iter()
                .filter_map(|f| f.path.as_deref())
                .any(|p| FileFormat::from_extension(&p.to_string_lossy()).is_supported())
        });

        let size = egui::vec2(300.0, 120.0);

        egui::Modal::new(Id::new("file_drop_overlay")).show(ctx, |ui| {
            ui.set_max_size(size);
            ui.set_min_size(size);

            ui.centered_and_justified(|ui| {
                if any_supported {
                    ui.heading("📥  Drop to add");
                } else {
                    ui.heading("Unsupported file type");
                }
            });
        });
    }
}
