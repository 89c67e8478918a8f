use crate::model::Note;
use std::path::Path;

pub mod add;
pub mod auth;
pub mod delete;
pub mod due;
pub mod export;
pub mod get;
pub mod import;
pub mod list;
pub mod update;

pub use due::Reminders;
pub use import::ImportEntry;
pub use list::NoteFilter;

/// External flat-file formats understood by import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteFormat {
    Json,
    Text,
}

impl NoteFormat {
    /// `.json` files are JSON, everything else is the legacy line format.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => NoteFormat::Json,
            _ => NoteFormat::Text,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            NoteFormat::Json => "json",
            NoteFormat::Text => "txt",
        }
    }
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_notes: Vec<Note>,
    pub listed_notes: Vec<Note>,
    pub import_entries: Vec<ImportEntry>,
    pub reminders: Option<Reminders>,
    /// Serialized export document
    pub document: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_notes(mut self, notes: Vec<Note>) -> Self {
        self.affected_notes = notes;
        self
    }

    pub fn with_listed_notes(mut self, notes: Vec<Note>) -> Self {
        self.listed_notes = notes;
        self
    }

    pub fn with_import_entries(mut self, entries: Vec<ImportEntry>) -> Self {
        self.import_entries = entries;
        self
    }

    pub fn with_reminders(mut self, reminders: Reminders) -> Self {
        self.reminders = Some(reminders);
        self
    }

    pub fn with_document(mut self, document: String) -> Self {
        self.document = Some(document);
        self
    }
}
