use crate::error::{NotFoundError, Result};
use crate::model::{Note, NoteId, NotePatch, Session};
use crate::store::NoteStore;
use tracing::info;

use super::get;

/// Applies a partial update. The patch is validated in full before anything
/// is written, so a rejected update leaves the note untouched.
pub fn run<S: NoteStore>(
    store: &mut S,
    session: &Session,
    id: NoteId,
    patch: &NotePatch,
) -> Result<Note> {
    let current = get::run(store, session, id)?;
    let updated = patch.apply(&current)?;

    if updated != current && !store.update_note(&updated)? {
        return Err(NotFoundError::NoSuchNote(id).into());
    }

    info!(id, user = session.username(), "note updated");
    Ok(updated)
}
