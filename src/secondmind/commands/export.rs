use super::import::is_legacy_marker;
use crate::error::Result;
use crate::model::{Note, NoteId, DATE_FORMAT};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// One element of the JSON export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: NoteId,
    pub body: String,
    pub tags: Vec<String>,
    pub due_date: Option<String>,
    pub created_at: String,
}

impl From<&Note> for ExportRecord {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            body: note.body.clone(),
            tags: note.tags.clone(),
            due_date: note.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
            created_at: note.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

pub fn export_json(notes: &[Note]) -> Result<String> {
    let records: Vec<ExportRecord> = notes.iter().map(ExportRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// A note in the legacy line syntax: `body #tag1 #tag2 [due:YYYY-MM-DD]`.
///
/// Body words that read as markers get a `\` prefix. The format is one note
/// per line with single spaces between words, so line breaks and runs of
/// whitespace in the body come back as single spaces.
pub fn legacy_line(note: &Note) -> String {
    let words: Vec<&str> = note.body.split_whitespace().collect();
    let mut parts: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let next = words.get(i + 1).copied();
            if is_legacy_marker(word.trim_start_matches('\\'), next) {
                format!("\\{}", word)
            } else {
                word.to_string()
            }
        })
        .collect();
    parts.extend(note.tags.iter().map(|t| format!("#{}", t)));
    if let Some(due) = note.due_date {
        parts.push(format!("[due:{}]", due.format(DATE_FORMAT)));
    }
    parts.join(" ")
}

pub fn export_text(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| format!("{}\n", legacy_line(n)))
        .collect()
}
