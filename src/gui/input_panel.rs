use eframe::egui;

use super::{
    actions::{
        ActionQueue,
        UiAction,
    },
    theme::Theme,
};
use crate::{
    analysis::AnalysisRequest,
    core::UploadedDocument,
};

const PANEL_WIDTH: f32 = 320.0;
const TEXT_ROWS: usize = 8;

/// Files queued for the next run plus the contents of the free-text box.
#[derive(Default)]
pub struct InputState {
    pub documents: Vec<UploadedDocument>,
    pub text: String,
}

impl InputState {
    /// Adds a document. Picking the same file path again refreshes the queued copy;
    /// files that only share a name are all kept.
    pub fn add_document(&mut self, document: UploadedDocument) {
        let existing = document
            .path
            .as_ref()
            .and_then(|path| self.documents.iter_mut().find(|d| d.path.as_ref() == Some(path)));
        match existing {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    pub fn remove_document(&mut self, index: usize) {
        if index < self.documents.len() {
            self.documents.remove(index);
        }
    }

    pub fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest::new(self.documents.clone(), self.text.clone())
    }
}

pub struct InputPanel;

impl InputPanel {
    pub fn show(
        ctx: &egui::Context,
        theme: &Theme,
        input: &mut InputState,
        actions: &mut ActionQueue,
        can_analyze: bool,
    ) {
        egui::SidePanel::left("input_panel").resizable(true).default_width(PANEL_WIDTH).show(
            ctx,
            |ui| {
                ui.add_space(6.0);
                ui.label(theme.heading(ctx, "Upload Files"));
                ui.weak("CSV (with a 'text' column), TXT, PDF or DOCX. Drag files onto the window or:");
                ui.add_space(4.0);

                if ui.button("📂 Add Files…").clicked() {
                    actions.push(UiAction::PickFiles);
                }

                ui.add_space(6.0);
                Self::ui_file_list(ui, ctx, theme, input, actions);

                ui.add_space(10.0);
                ui.separator();
                ui.label(theme.heading(ctx, "Or Enter Text"));
                ui.add(
                    egui::TextEdit::multiline(&mut input.text)
                        .hint_text("Type or paste a text to analyse…")
                        .desired_rows(TEXT_ROWS)
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(10.0);
                let analyze = ui.add_enabled(
                    can_analyze,
                    egui::Button::new(egui::RichText::new("Analyze").strong())
                        .min_size(egui::vec2(ui.available_width(), 32.0)),
                );
                if analyze.clicked() {
                    actions.push(UiAction::Analyze);
                }
            },
        );
    }

    fn ui_file_list(
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        theme: &Theme,
        input: &InputState,
        actions: &mut ActionQueue,
    ) {
        if input.documents.is_empty() {
            ui.label(theme.muted(ctx, "No files added"));
            return;
        }

        egui::ScrollArea::vertical().id_salt("queued_files").max_height(180.0).show(ui, |ui| {
            for (index, document) in input.documents.iter().enumerate() {
                ui.horizontal(|ui| {
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        actions.push(UiAction::RemoveFile(index));
                    }

                    let format_color = if document.format.is_supported() {
                        theme.cyan(ctx)
                    } else {
                        theme.red(ctx)
                    };
                    ui.small(egui::RichText::new(document.format.to_string()).color(format_color));
                    let hover = match &document.path {
                        Some(path) => format!("{}\n{} bytes", path.display(), document.bytes.len()),
                        None => format!("{} bytes", document.bytes.len()),
                    };
                    ui.label(document.filename.as_str()).on_hover_text(hover);
                });
            }
        });

        if ui.small_button("Clear all").clicked() {
            actions.push(UiAction::ClearFiles);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_from_different_folders_is_kept() {
        let dir = std::env::temp_dir().join(format!("sentiment_dashboard_input_{}", std::process::id()));
        let first = dir.join("january");
        let second = dir.join("february");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(first.join("reviews.txt"), b"old").unwrap();
        std::fs::write(second.join("reviews.txt"), b"other").unwrap();

        let mut input = InputState::default();
        input.add_document(UploadedDocument::from_path(&first.join("reviews.txt")).unwrap());
        input.add_document(UploadedDocument::from_path(&second.join("reviews.txt")).unwrap());
        assert_eq!(input.documents.len(), 2);

        std::fs::write(first.join("reviews.txt"), b"new").unwrap();
        input.add_document(UploadedDocument::from_path(&first.join("reviews.txt")).unwrap());
        assert_eq!(input.documents.len(), 2);
        assert_eq!(input.documents[0].bytes, b"new");
        assert_eq!(input.documents[1].bytes, b"other");

        input.add_document(UploadedDocument::new("reviews.txt", b"pasted".to_vec()));
        input.add_document(UploadedDocument::new("reviews.txt", b"pasted".to_vec()));
        assert_eq!(input.documents.len(), 4);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_remove_ignores_out_of_range() {
        let mut input = InputState::default();
        input.add_document(UploadedDocument::new("a.txt", b"x".to_vec()));
        input.remove_document(5);
        assert_eq!(input.documents.len(), 1);
        input.remove_document(0);
        assert!(input.documents.is_empty());
    }

    #[test]
    fn test_request_carries_documents_and_text() {
        let mut input = InputState::default();
        assert!(input.to_request().is_empty());

        input.text = "hello".to_string();
        input.add_document(UploadedDocument::new("a.txt", b"x".to_vec()));
        let request = input.to_request();
        assert_eq!(request.documents.len(), 1);
        assert_eq!(request.text, "hello");
    }
}
