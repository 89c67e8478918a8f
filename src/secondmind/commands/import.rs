//! Bulk import from JSON exports and legacy text files.
//!
//! Each record is parsed and stored on its own: a bad record yields a
//! `ValidationError` entry and the rest of the batch carries on. Storage
//! failures (the database going away) still abort the whole call.
//!
//! Legacy line syntax:
//!
//! ```text
//! Buy milk #errand #home [due:2099-01-01]
//! Buy milk #errand due 2099-01-01
//! Buy milk due:2099-01-01
//! Issue \#42 is \due 2099-01-01 in the body
//! ```
//!
//! A body word that would otherwise read as a tag or due marker is written
//! with a leading `\`, which the parser strips again.

use crate::error::{Result, ValidationError};
use crate::model::{looks_like_date, parse_due_date, Note, NoteDraft, Session};
use crate::store::NoteStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::add;

pub type ImportEntry = std::result::Result<Note, ValidationError>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Reject records whose body, tags and due date match an existing note
    pub skip_duplicates: bool,
}

/// Accepts both the current export shape and the older `{note, tags, due_date}` one.
/// Unknown keys, `id` included, are ignored.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(alias = "note")]
    body: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

pub fn parse_json_record(
    value: serde_json::Value,
) -> std::result::Result<NoteDraft, ValidationError> {
    let record: JsonRecord = serde_json::from_value(value)
        .map_err(|e| ValidationError::MalformedRecord(e.to_string()))?;

    let tags = record.tags.unwrap_or_default();
    let due = record.due_date.as_deref().filter(|d| !d.trim().is_empty());
    let draft = NoteDraft::new(&record.body, &tags, due)?;

    match record.created_at {
        Some(raw) => {
            let created_at = DateTime::parse_from_rfc3339(&raw).map_err(|_| {
                ValidationError::MalformedRecord(format!("invalid created_at {:?}", raw))
            })?;
            Ok(draft.with_created_at(created_at.with_timezone(&Utc)))
        }
        None => Ok(draft),
    }
}

/// True when `word` would be taken as a tag or due marker by [`parse_legacy_line`].
/// `next` is the word after it, which decides the `due YYYY-MM-DD` form.
pub fn is_legacy_marker(word: &str, next: Option<&str>) -> bool {
    word.starts_with("[due:")
        || word.strip_prefix("due:").is_some_and(looks_like_date)
        || (word.eq_ignore_ascii_case("due") && next.is_some_and(looks_like_date))
        || word.strip_prefix('#').is_some_and(|t| !t.is_empty())
}

pub fn parse_legacy_line(line: &str) -> std::result::Result<NoteDraft, ValidationError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let mut body = Vec::with_capacity(words.len());
    let mut tags = Vec::new();
    let mut due = None;

    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        let next = words.get(i + 1).copied();
        if let Some(escaped) = word
            .strip_prefix('\\')
            .filter(|_| is_legacy_marker(word.trim_start_matches('\\'), next))
        {
            body.push(escaped);
        } else if let Some(rest) = word.strip_prefix("[due:") {
            // `[due: 2099-01-01]` splits into two words
            let mut raw = rest;
            if raw.is_empty() {
                if let Some(next) = next {
                    raw = next;
                    i += 1;
                }
            }
            // Text after the closing bracket belongs to the body
            let (date, trailing) = raw.split_once(']').unwrap_or((raw, ""));
            due = Some(parse_due_date(date)?);
            if !trailing.is_empty() {
                body.push(trailing);
            }
        } else if let Some(raw) = word.strip_prefix("due:").filter(|r| looks_like_date(r)) {
            due = Some(parse_due_date(raw)?);
        } else if word.eq_ignore_ascii_case("due")
            && words.get(i + 1).is_some_and(|w| looks_like_date(w))
        {
            due = Some(parse_due_date(words[i + 1])?);
            i += 1;
        } else if let Some(tag) = word.strip_prefix('#').filter(|t| !t.is_empty()) {
            tags.push(tag);
        } else {
            body.push(word);
        }
        i += 1;
    }

    let mut draft = NoteDraft::new(&body.join(" "), &tags, None)?;
    draft.due_date = due;
    Ok(draft)
}

struct Importer<'a, S: NoteStore> {
    store: &'a mut S,
    session: &'a Session,
    /// Present only when duplicates are skipped; grows as the batch is stored.
    existing: Option<Vec<Note>>,
}

impl<'a, S: NoteStore> Importer<'a, S> {
    fn new(store: &'a mut S, session: &'a Session, options: ImportOptions) -> Result<Self> {
        let existing = if options.skip_duplicates {
            Some(store.list_notes(session.username())?)
        } else {
            None
        };
        Ok(Self {
            store,
            session,
            existing,
        })
    }

    fn import(
        &mut self,
        position: usize,
        parsed: std::result::Result<NoteDraft, ValidationError>,
    ) -> Result<ImportEntry> {
        let draft = match parsed {
            Ok(draft) => draft,
            Err(e) => {
                warn!(position, error = %e, "skipping import record");
                return Ok(Err(e));
            }
        };

        if let Some(existing) = &self.existing {
            if existing.iter().any(|n| n.same_content_as(&draft)) {
                warn!(position, "skipping duplicate import record");
                return Ok(Err(ValidationError::DuplicateNote));
            }
        }

        let note = add::insert(&mut *self.store, self.session, &draft)?;
        if let Some(existing) = &mut self.existing {
            existing.push(note.clone());
        }
        Ok(Ok(note))
    }
}

/// Imports a JSON array document. Anything other than an array fails as a whole.
pub fn import_json<S: NoteStore>(
    store: &mut S,
    session: &Session,
    document: &str,
    options: ImportOptions,
) -> Result<Vec<ImportEntry>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(document)?;
    let mut importer = Importer::new(store, session, options)?;

    let mut entries = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        entries.push(importer.import(idx + 1, parse_json_record(value))?);
    }

    info!(
        user = session.username(),
        imported = entries.iter().filter(|e| e.is_ok()).count(),
        total = entries.len(),
        "json import finished"
    );
    Ok(entries)
}

/// Imports legacy text, one note per non-empty line.
pub fn import_text<S: NoteStore>(
    store: &mut S,
    session: &Session,
    text: &str,
    options: ImportOptions,
) -> Result<Vec<ImportEntry>> {
    let mut importer = Importer::new(store, session, options)?;

    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        entries.push(importer.import(idx + 1, parse_legacy_line(line))?);
    }

    info!(
        user = session.username(),
        imported = entries.iter().filter(|e| e.is_ok()).count(),
        total = entries.len(),
        "text import finished"
    );
    Ok(entries)
}
