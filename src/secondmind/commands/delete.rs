use crate::error::{NotFoundError, Result};
use crate::model::{NoteId, Session};
use crate::store::NoteStore;
use tracing::info;

pub fn run<S: NoteStore>(store: &mut S, session: &Session, id: NoteId) -> Result<()> {
    if !store.delete_note(session.username(), id)? {
        return Err(NotFoundError::NoSuchNote(id).into());
    }
    info!(id, user = session.username(), "note deleted");
    Ok(())
}
