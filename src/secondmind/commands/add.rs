use crate::error::Result;
use crate::model::{Note, NoteDraft, Session};
use crate::store::NoteStore;
use tracing::info;

pub fn run<S: NoteStore, T: AsRef<str>>(
    store: &mut S,
    session: &Session,
    body: &str,
    tags: &[T],
    due_date: Option<&str>,
) -> Result<Note> {
    let draft = NoteDraft::new(body, tags, due_date)?;
    insert(store, session, &draft)
}

/// Stores an already validated draft for the session owner.
pub fn insert<S: NoteStore>(store: &mut S, session: &Session, draft: &NoteDraft) -> Result<Note> {
    let note = store.insert_note(session.username(), draft)?;
    info!(id = note.id, user = session.username(), "note added");
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SecondmindError, ValidationError};
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn assigns_increasing_ids() {
        let mut fx = StoreFixture::new();
        let a = run(&mut fx.store, &fx.session, "one", &["x"], None).unwrap();
        let b = run(&mut fx.store, &fx.session, "two", &["x"], None).unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.owner, "alice");
    }

    #[test]
    fn trims_body_and_normalizes_tags() {
        let mut fx = StoreFixture::new();
        let note = run(&mut fx.store, &fx.session, "  hello  ", &["#Work", "work"], None).unwrap();
        assert_eq!(note.body, "hello");
        assert_eq!(note.tags, vec!["Work"]);
    }

    #[test]
    fn rejects_invalid_input_without_storing() {
        let mut fx = StoreFixture::new();
        let err = run::<_, &str>(&mut fx.store, &fx.session, "", &[], None).unwrap_err();
        assert!(matches!(
            err,
            SecondmindError::Validation(ValidationError::EmptyBody)
        ));

        let err = run::<_, &str>(&mut fx.store, &fx.session, "x", &[], Some("2099-02-30"))
            .unwrap_err();
        assert!(matches!(
            err,
            SecondmindError::Validation(ValidationError::BadDateFormat(_))
        ));

        assert!(fx.store.list_notes("alice").unwrap().is_empty());
    }
}
