use super::NoteStore;
use crate::error::Result;
use crate::model::{Note, NoteDraft, NoteId};
use chrono::Utc;
use std::collections::BTreeMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    notes: BTreeMap<NoteId, Note>,
    last_id: NoteId,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for InMemoryStore {
    fn insert_note(&mut self, owner: &str, draft: &NoteDraft) -> Result<Note> {
        self.last_id += 1;
        let note = Note {
            id: self.last_id,
            owner: owner.to_string(),
            body: draft.body.clone(),
            tags: draft.tags.clone(),
            due_date: draft.due_date,
            created_at: draft.created_at.unwrap_or_else(Utc::now),
        };
        self.notes.insert(note.id, note.clone());
        Ok(note)
    }

    fn get_note(&self, owner: &str, id: NoteId) -> Result<Option<Note>> {
        Ok(self.notes.get(&id).filter(|n| n.owner == owner).cloned())
    }

    fn update_note(&mut self, note: &Note) -> Result<bool> {
        match self.notes.get_mut(&note.id) {
            Some(existing) if existing.owner == note.owner => {
                existing.body = note.body.clone();
                existing.tags = note.tags.clone();
                existing.due_date = note.due_date;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete_note(&mut self, owner: &str, id: NoteId) -> Result<bool> {
        if self.notes.get(&id).is_some_and(|n| n.owner == owner) {
            self.notes.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    fn list_notes(&self, owner: &str) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .values()
            .filter(|n| n.owner == owner)
            .cloned()
            .collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Session;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub session: Session,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                session: Session::new("alice"),
            }
        }

        pub fn with_note(mut self, body: &str, tags: &[&str], due: Option<&str>) -> Self {
            let draft = NoteDraft::new(body, tags, due).unwrap();
            self.store
                .insert_note(self.session.username(), &draft)
                .unwrap();
            self
        }

        pub fn with_notes(mut self, count: usize) -> Self {
            for i in 0..count {
                self = self.with_note(&format!("Note {}", i + 1), &[], None);
            }
            self
        }

        /// A note owned by someone other than the fixture session.
        pub fn with_foreign_note(mut self, owner: &str, body: &str) -> Self {
            let draft = NoteDraft::new::<&str>(body, &[], None).unwrap();
            self.store.insert_note(owner, &draft).unwrap();
            self
        }
    }
}
