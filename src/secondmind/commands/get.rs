use crate::error::{NotFoundError, Result};
use crate::model::{Note, NoteId, Session};
use crate::store::NoteStore;

pub fn run<S: NoteStore>(store: &S, session: &Session, id: NoteId) -> Result<Note> {
    store
        .get_note(session.username(), id)?
        .ok_or_else(|| NotFoundError::NoSuchNote(id).into())
}
