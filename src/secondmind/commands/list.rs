use crate::error::Result;
use crate::model::{Note, Session};
use crate::store::NoteStore;
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::debug;

/// Filter options for listing notes. Every option that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Case-insensitive substring of the body
    pub keyword: Option<String>,
    /// Case-insensitive exact match against any tag
    pub tag: Option<String>,
    /// Due strictly before this date
    pub due_before: Option<NaiveDate>,
    /// Due strictly after this date
    pub due_after: Option<NaiveDate>,
    /// Due exactly on this date
    pub due_on: Option<NaiveDate>,
    /// Due strictly before the evaluation date
    pub overdue: bool,
}

impl NoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn due_before(mut self, date: NaiveDate) -> Self {
        self.due_before = Some(date);
        self
    }

    pub fn due_after(mut self, date: NaiveDate) -> Self {
        self.due_after = Some(date);
        self
    }

    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }

    pub fn overdue(mut self) -> Self {
        self.overdue = true;
        self
    }

    pub fn matches(&self, note: &Note, today: NaiveDate) -> bool {
        if let Some(keyword) = &self.keyword {
            if !note.body.to_lowercase().contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !note.has_tag(tag) {
                return false;
            }
        }

        // Any date criterion rules out undated notes.
        let date_bounds = [
            self.due_before.map(|d| (d, Ordering::Less)),
            self.due_after.map(|d| (d, Ordering::Greater)),
            self.due_on.map(|d| (d, Ordering::Equal)),
            self.overdue.then_some((today, Ordering::Less)),
        ];
        date_bounds
            .into_iter()
            .flatten()
            .all(|(bound, wanted)| note.due_date.is_some_and(|due| due.cmp(&bound) == wanted))
    }
}

/// Lists the session's notes matching `filter`, ascending by id.
///
/// Each call reads the store afresh; the returned iterator filters lazily.
pub fn run<S: NoteStore>(
    store: &S,
    session: &Session,
    filter: NoteFilter,
    today: NaiveDate,
) -> Result<impl Iterator<Item = Note>> {
    let notes = store.list_notes(session.username())?;
    debug!(user = session.username(), total = notes.len(), ?filter, "listing notes");
    Ok(notes.into_iter().filter(move |note| filter.matches(note, today)))
}
