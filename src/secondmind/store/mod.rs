//! # Storage Layer
//!
//! Two independent stores back the application, each behind a trait so the
//! command layer never touches files or SQL directly:
//!
//! - [`NoteStore`]: note persistence.
//!   - [`sqlite::SqliteStore`]: production store (`secondmind.db`)
//!   - [`memory::InMemoryStore`]: tests
//! - [`CredentialStore`]: the flat `username:digest` credential file.
//!   - [`credentials::CredentialFile`]: production, append-only text file
//!   - [`credentials::InMemoryCredentials`]: tests
//!
//! ## Schema
//!
//! ```text
//! notes      (id INTEGER PRIMARY KEY AUTOINCREMENT, owner, body, due_date, created_at)
//! note_tags  (note_id → notes.id ON DELETE CASCADE, position, tag)
//! ```
//!
//! `AUTOINCREMENT` keeps ids from being reused after deletes; the in-memory
//! store mirrors that with a counter that only goes up.
//!
//! Every store method is scoped by owner. A note that exists but belongs to
//! someone else is indistinguishable from a missing one.

use crate::error::Result;
use crate::model::{Note, NoteDraft, NoteId};

pub mod credentials;
pub mod memory;
pub mod sqlite;

pub use credentials::{Credential, CredentialStore};

/// Abstract interface for note storage.
pub trait NoteStore {
    /// Store a new note and return it with its assigned id.
    fn insert_note(&mut self, owner: &str, draft: &NoteDraft) -> Result<Note>;

    /// Fetch a note, `None` if absent or owned by someone else.
    fn get_note(&self, owner: &str, id: NoteId) -> Result<Option<Note>>;

    /// Replace body, tags and due date of an existing note.
    /// Returns `false` when there was nothing to update.
    fn update_note(&mut self, note: &Note) -> Result<bool>;

    /// Delete permanently. Returns `false` when there was nothing to delete.
    fn delete_note(&mut self, owner: &str, id: NoteId) -> Result<bool>;

    /// All notes of `owner`, ascending by id.
    fn list_notes(&self, owner: &str) -> Result<Vec<Note>>;
}
