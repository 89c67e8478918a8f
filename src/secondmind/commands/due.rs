use crate::error::Result;
use crate::model::{Note, Session};
use crate::store::NoteStore;
use chrono::{Days, NaiveDate};

/// Counts shown right after login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reminders {
    pub overdue: usize,
    pub due_today: usize,
}

impl Reminders {
    pub fn is_clear(&self) -> bool {
        self.overdue == 0 && self.due_today == 0
    }
}

/// Notes due within `[today, today + window_days]`, earliest first.
pub fn due_soon<S: NoteStore>(
    store: &S,
    session: &Session,
    window_days: u32,
    today: NaiveDate,
) -> Result<impl Iterator<Item = Note>> {
    let until = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut notes: Vec<Note> = store
        .list_notes(session.username())?
        .into_iter()
        .filter(|n| n.due_date.is_some_and(|due| today <= due && due <= until))
        .collect();
    notes.sort_by_key(|n| (n.due_date, n.id));
    Ok(notes.into_iter())
}

pub fn reminders<S: NoteStore>(
    store: &S,
    session: &Session,
    today: NaiveDate,
) -> Result<Reminders> {
    let mut reminders = Reminders::default();
    for due in store
        .list_notes(session.username())?
        .into_iter()
        .filter_map(|n| n.due_date)
    {
        if due < today {
            reminders.overdue += 1;
        } else if due == today {
            reminders.due_today += 1;
        }
    }
    Ok(reminders)
}
