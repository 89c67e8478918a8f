//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for every UI.
//!
//! It:
//! - **Owns** the note store, the credential store and the configuration
//! - **Supplies "today"** (the system date unless pinned with [`SecondmindApi::with_today`])
//! - **Returns structured types** (`Result<CmdResult>`) with user-facing messages
//!
//! It does no I/O of its own: no stdout, no prompts, no file paths beyond what the
//! stores were built with. Export returns the document; the caller decides where
//! it goes.
//!
//! `SecondmindApi<S: NoteStore, C: CredentialStore>` is generic over both stores:
//! - Production: `SecondmindApi<SqliteStore, CredentialFile>`
//! - Testing: `SecondmindApi<InMemoryStore, InMemoryCredentials>`

use crate::commands::{
    self, add, auth, delete, due, export, get, import, list, update, CmdMessage, CmdResult,
    NoteFilter, NoteFormat,
};
use crate::config::SecondmindConfig;
use crate::error::Result;
use crate::model::{NoteId, NotePatch, Session};
use crate::store::{CredentialStore, NoteStore};
use chrono::{Local, NaiveDate};

/// Preset due-date views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueView {
    Today,
    Overdue,
    /// Due within the configured reminder window
    Week,
}

pub struct SecondmindApi<S: NoteStore, C: CredentialStore> {
    notes: S,
    credentials: C,
    config: SecondmindConfig,
    today: Option<NaiveDate>,
}

impl<S: NoteStore, C: CredentialStore> SecondmindApi<S, C> {
    pub fn new(notes: S, credentials: C, config: SecondmindConfig) -> Self {
        Self {
            notes,
            credentials,
            config,
            today: None,
        }
    }

    /// Pins the evaluation date used for overdue and due-soon logic.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn config(&self) -> &SecondmindConfig {
        &self.config
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<Session> {
        auth::register(
            &mut self.credentials,
            username,
            password,
            self.config.salt_passwords,
        )
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        auth::authenticate(&self.credentials, username, password)
    }

    /// Overdue / due-today counts, as shown after login.
    pub fn reminders(&self, session: &Session) -> Result<CmdResult> {
        let reminders = due::reminders(&self.notes, session, self.today())?;
        let mut result = CmdResult::default().with_reminders(reminders);
        if reminders.is_clear() {
            result.add_message(CmdMessage::success("No due tasks today. All clear."));
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Reminders: {} overdue | {} due today",
                reminders.overdue, reminders.due_today
            )));
        }
        Ok(result)
    }

    pub fn add_note<T: AsRef<str>>(
        &mut self,
        session: &Session,
        body: &str,
        tags: &[T],
        due_date: Option<&str>,
    ) -> Result<CmdResult> {
        let note = add::run(&mut self.notes, session, body, tags, due_date)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Note {} added.", note.id)));
        Ok(result.with_affected_notes(vec![note]))
    }

    pub fn get_note(&self, session: &Session, id: NoteId) -> Result<CmdResult> {
        let note = get::run(&self.notes, session, id)?;
        Ok(CmdResult::default().with_listed_notes(vec![note]))
    }

    pub fn update_note(
        &mut self,
        session: &Session,
        id: NoteId,
        patch: &NotePatch,
    ) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        if patch.is_empty() {
            result.add_message(CmdMessage::info("Nothing to update."));
            return Ok(result);
        }
        let note = update::run(&mut self.notes, session, id, patch)?;
        result.add_message(CmdMessage::success(format!("Note {} updated.", note.id)));
        Ok(result.with_affected_notes(vec![note]))
    }

    pub fn delete_note(&mut self, session: &Session, id: NoteId) -> Result<CmdResult> {
        delete::run(&mut self.notes, session, id)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Deleted note {}.", id)));
        Ok(result)
    }

    pub fn list_notes(&self, session: &Session, filter: NoteFilter) -> Result<CmdResult> {
        let notes = list::run(&self.notes, session, filter, self.today())?.collect();
        Ok(CmdResult::default().with_listed_notes(notes))
    }

    pub fn due_notes(&self, session: &Session, view: DueView) -> Result<CmdResult> {
        let today = self.today();
        let notes = match view {
            DueView::Today => {
                list::run(&self.notes, session, NoteFilter::new().due_on(today), today)?.collect()
            }
            DueView::Overdue => {
                list::run(&self.notes, session, NoteFilter::new().overdue(), today)?.collect()
            }
            DueView::Week => {
                due::due_soon(&self.notes, session, self.config.reminder_window_days, today)?
                    .collect()
            }
        };
        Ok(CmdResult::default().with_listed_notes(notes))
    }

    pub fn export_notes(&self, session: &Session, format: NoteFormat) -> Result<CmdResult> {
        let notes: Vec<_> =
            list::run(&self.notes, session, NoteFilter::new(), self.today())?.collect();
        let document = match format {
            NoteFormat::Json => export::export_json(&notes)?,
            NoteFormat::Text => export::export_text(&notes),
        };
        let mut result = CmdResult::default().with_document(document);
        result.add_message(CmdMessage::success(format!("Exported {} notes.", notes.len())));
        Ok(result)
    }

    pub fn import_notes(
        &mut self,
        session: &Session,
        content: &str,
        format: NoteFormat,
    ) -> Result<CmdResult> {
        let options = import::ImportOptions {
            skip_duplicates: self.config.skip_duplicate_imports,
        };
        let entries = match format {
            NoteFormat::Json => import::import_json(&mut self.notes, session, content, options)?,
            NoteFormat::Text => import::import_text(&mut self.notes, session, content, options)?,
        };

        let mut result = CmdResult::default();
        for (idx, entry) in entries.iter().enumerate() {
            if let Err(e) = entry {
                result.add_message(CmdMessage::warning(format!("Record {}: {}", idx + 1, e)));
            }
        }
        let imported = entries.iter().filter(|e| e.is_ok()).count();
        result.add_message(CmdMessage::success(format!(
            "Imported {} of {} records.",
            imported,
            entries.len()
        )));
        Ok(result.with_import_entries(entries))
    }
}

pub use commands::{MessageLevel, Reminders};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, SecondmindError};
    use crate::model::parse_due_date;
    use crate::store::credentials::InMemoryCredentials;
    use crate::store::memory::InMemoryStore;

    fn api() -> SecondmindApi<InMemoryStore, InMemoryCredentials> {
        SecondmindApi::new(
            InMemoryStore::new(),
            InMemoryCredentials::new(),
            SecondmindConfig::default(),
        )
        .with_today(parse_due_date("2099-01-01").unwrap())
    }

    #[test]
    fn register_and_login_dispatch() {
        let mut api = api();
        api.register("alice", "secret1").unwrap();
        assert_eq!(api.login("alice", "secret1").unwrap().username(), "alice");
        assert!(matches!(
            api.login("alice", "nope").unwrap_err(),
            SecondmindError::Auth(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn notes_flow_through_the_facade() {
        let mut api = api();
        let session = api.register("alice", "pw").unwrap();
        let added = api
            .add_note(&session, "Buy milk", &["errand"], Some("2098-12-31"))
            .unwrap();
        let id = added.affected_notes[0].id;

        assert_eq!(api.get_note(&session, id).unwrap().listed_notes[0].body, "Buy milk");
        assert_eq!(
            api.due_notes(&session, DueView::Overdue).unwrap().listed_notes.len(),
            1
        );
        assert_eq!(
            api.reminders(&session).unwrap().reminders,
            Some(Reminders {
                overdue: 1,
                due_today: 0
            })
        );

        let patch = NotePatch::new().due_date("2099-01-01");
        api.update_note(&session, id, &patch).unwrap();
        assert_eq!(api.due_notes(&session, DueView::Today).unwrap().listed_notes.len(), 1);

        api.delete_note(&session, id).unwrap();
        assert!(api.list_notes(&session, NoteFilter::new()).unwrap().listed_notes.is_empty());
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut api = api();
        let session = api.register("alice", "pw").unwrap();
        let result = api.update_note(&session, 99, &NotePatch::new()).unwrap();
        assert!(result.affected_notes.is_empty());
    }

    #[test]
    fn export_then_import_reports_per_record() {
        let mut api = api();
        let session = api.register("alice", "pw").unwrap();
        api.add_note::<&str>(&session, "one", &[], None).unwrap();
        let doc = api
            .export_notes(&session, NoteFormat::Text)
            .unwrap()
            .document
            .unwrap();
        assert_eq!(doc, "one\n");

        let result = api
            .import_notes(&session, "one\ntwo\n#x\n", NoteFormat::Text)
            .unwrap();
        assert_eq!(result.import_entries.len(), 3);
        // "one" already exists and duplicates are skipped by default
        assert_eq!(result.import_entries.iter().filter(|e| e.is_ok()).count(), 1);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Imported 1 of 3 records."));
    }

    #[test]
    fn users_do_not_see_each_other() {
        let mut api = api();
        let alice = api.register("alice", "pw").unwrap();
        let bob = api.register("bob", "pw").unwrap();
        let id = api
            .add_note::<&str>(&alice, "secret", &[], None)
            .unwrap()
            .affected_notes[0]
            .id;

        assert!(matches!(
            api.get_note(&bob, id).unwrap_err(),
            SecondmindError::NotFound(_)
        ));
        assert!(api.delete_note(&bob, id).is_err());
        assert_eq!(api.list_notes(&alice, NoteFilter::new()).unwrap().listed_notes.len(), 1);
    }
}
