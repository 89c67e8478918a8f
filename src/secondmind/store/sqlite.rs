use super::NoteStore;
use crate::error::Result;
use crate::model::{Note, NoteDraft, NoteId};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner TEXT NOT NULL,
        body TEXT NOT NULL,
        due_date TEXT,
        created_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS note_tags (
        note_id INTEGER NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        tag TEXT NOT NULL,
        PRIMARY KEY (note_id, position)
    );
    CREATE INDEX IF NOT EXISTS idx_notes_owner ON notes(owner);
";

const NOTE_COLUMNS: &str = "id, owner, body, due_date, created_at";

/// SQLite-backed note store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn tags_for(&self, id: NoteId) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM note_tags WHERE note_id = ?1 ORDER BY position")?;
        let tags = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(tags)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        owner: row.get(1)?,
        body: row.get(2)?,
        tags: Vec::new(),
        due_date: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn write_tags(tx: &Transaction<'_>, id: NoteId, tags: &[String]) -> Result<()> {
    tx.execute("DELETE FROM note_tags WHERE note_id = ?1", [id])?;
    let mut stmt =
        tx.prepare("INSERT INTO note_tags (note_id, position, tag) VALUES (?1, ?2, ?3)")?;
    for (position, tag) in tags.iter().enumerate() {
        stmt.execute(params![id, position as i64, tag])?;
    }
    Ok(())
}

impl NoteStore for SqliteStore {
    fn insert_note(&mut self, owner: &str, draft: &NoteDraft) -> Result<Note> {
        let created_at = draft.created_at.unwrap_or_else(Utc::now);
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO notes (owner, body, due_date, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![owner, draft.body, draft.due_date, created_at],
        )?;
        let id = tx.last_insert_rowid();
        write_tags(&tx, id, &draft.tags)?;
        tx.commit()?;

        Ok(Note {
            id,
            owner: owner.to_string(),
            body: draft.body.clone(),
            tags: draft.tags.clone(),
            due_date: draft.due_date,
            created_at,
        })
    }

    fn get_note(&self, owner: &str, id: NoteId) -> Result<Option<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1 AND owner = ?2");
        let note = self
            .conn
            .query_row(&sql, params![id, owner], note_from_row)
            .optional()?;

        match note {
            Some(mut note) => {
                note.tags = self.tags_for(note.id)?;
                Ok(Some(note))
            }
            None => Ok(None),
        }
    }

    fn update_note(&mut self, note: &Note) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE notes SET body = ?1, due_date = ?2 WHERE id = ?3 AND owner = ?4",
            params![note.body, note.due_date, note.id, note.owner],
        )?;
        if changed == 0 {
            return Ok(false);
        }
        write_tags(&tx, note.id, &note.tags)?;
        tx.commit()?;
        Ok(true)
    }

    fn delete_note(&mut self, owner: &str, id: NoteId) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM notes WHERE id = ?1 AND owner = ?2",
            params![id, owner],
        )?;
        tx.commit()?;
        Ok(removed > 0)
    }

    fn list_notes(&self, owner: &str) -> Result<Vec<Note>> {
        let mut tags: HashMap<NoteId, Vec<String>> = HashMap::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT t.note_id, t.tag FROM note_tags t
                 JOIN notes n ON n.id = t.note_id
                 WHERE n.owner = ?1
                 ORDER BY t.note_id, t.position",
            )?;
            let rows = stmt.query_map([owner], |row| {
                Ok((row.get::<_, NoteId>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (id, tag) = row?;
                tags.entry(id).or_default().push(tag);
            }
        }

        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE owner = ?1 ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map([owner], note_from_row)?
            .map(|row| {
                row.map(|mut note| {
                    note.tags = tags.remove(&note.id).unwrap_or_default();
                    note
                })
            })
            .collect::<rusqlite::Result<Vec<Note>>>()?;
        Ok(notes)
    }
}
