use std::path::PathBuf;

use crate::report::ExportFormat;

// Widgets push actions here instead of mutating the app while it is borrowed for drawing
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    // Input
    PickFiles,
    AddPaths(Vec<PathBuf>),
    RemoveFile(usize),
    ClearFiles,
    Analyze,

    // Results
    Export(ExportFormat),

    // Modals
    OpenSettings,
}

pub struct ActionQueue {
    actions: Vec<UiAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn push(&mut self, action: UiAction) {
        self.actions.push(action);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, UiAction> {
        self.actions.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}
