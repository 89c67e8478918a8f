use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};

pub type NoteId = i64;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest accepted note body, in characters.
pub const MAX_BODY_CHARS: usize = 500;

/// The identity under which note operations run.
///
/// Sessions are only handed out by `commands::auth`, after a successful
/// registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub owner: String,
    pub body: String,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Case-insensitive tag membership. A leading `#` on the query is ignored.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().trim_start_matches('#').to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
    }

    /// Same content as a draft: body, tags (ignoring case) and due date.
    pub fn same_content_as(&self, draft: &NoteDraft) -> bool {
        self.body == draft.body
            && self.due_date == draft.due_date
            && self.tags.len() == draft.tags.len()
            && self
                .tags
                .iter()
                .zip(&draft.tags)
                .all(|(a, b)| a.to_lowercase() == b.to_lowercase())
    }
}

/// A validated note that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub body: String,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    /// Preserved by imports; `None` means "now" at insert time.
    pub created_at: Option<DateTime<Utc>>,
}

impl NoteDraft {
    pub fn new<T: AsRef<str>>(
        body: &str,
        tags: &[T],
        due_date: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let body = validate_body(body)?;
        let due_date = due_date.map(parse_due_date).transpose()?;
        Ok(Self {
            body,
            tags: normalize_tags(tags),
            due_date,
            created_at: None,
        })
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DueDateChange {
    #[default]
    Keep,
    Clear,
    Set(String),
}

/// A partial update. Fields left at their default keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
    pub due_date: DueDateChange,
}

impl NotePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn tags<T: Into<String>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn due_date(mut self, due: impl Into<String>) -> Self {
        self.due_date = DueDateChange::Set(due.into());
        self
    }

    pub fn clear_due_date(mut self) -> Self {
        self.due_date = DueDateChange::Clear;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.tags.is_none() && self.due_date == DueDateChange::Keep
    }

    /// Applies the patch to a copy of `note`, validating every field first.
    pub fn apply(&self, note: &Note) -> Result<Note, ValidationError> {
        let mut updated = note.clone();
        if let Some(body) = &self.body {
            updated.body = validate_body(body)?;
        }
        match &self.due_date {
            DueDateChange::Keep => {}
            DueDateChange::Clear => updated.due_date = None,
            DueDateChange::Set(raw) => updated.due_date = Some(parse_due_date(raw)?),
        }
        if let Some(tags) = &self.tags {
            updated.tags = normalize_tags(tags);
        }
        Ok(updated)
    }
}

fn validate_body(body: &str) -> Result<String, ValidationError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(ValidationError::BodyTooLong(MAX_BODY_CHARS));
    }
    Ok(body.to_string())
}

/// True for tokens shaped like `YYYY-MM-DD`, whether or not the date exists.
pub fn looks_like_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn parse_due_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if !looks_like_date(raw) {
        return Err(ValidationError::BadDateFormat(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::BadDateFormat(raw.to_string()))
}

/// Strips `#` markers and whitespace, drops empties, and collapses tags that
/// differ only in case (first spelling wins).
pub fn normalize_tags<T: AsRef<str>>(tags: &[T]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref().trim().trim_start_matches('#').trim();
        if tag.is_empty() {
            continue;
        }
        let lower = tag.to_lowercase();
        if !out.iter().any(|t| t.to_lowercase() == lower) {
            out.push(tag.to_string());
        }
    }
    out
}
