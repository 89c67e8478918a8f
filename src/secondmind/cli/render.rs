use chrono::{Local, NaiveDate};
use colored::Colorize;
use secondmind::commands::{CmdMessage, MessageLevel};
use secondmind::model::{Note, DATE_FORMAT};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const BODY_WIDTH: usize = 48;
const TAGS_WIDTH: usize = 24;
const DUE_WIDTH: usize = 10;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// One row per note: id, body, tags, due date. Overdue dates are red.
pub(super) fn print_notes(notes: &[Note], today: NaiveDate) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let id_width = notes
        .iter()
        .map(|n| n.id.to_string().len())
        .max()
        .unwrap_or(1)
        .max(2);

    println!(
        "{}",
        format!(
            "{:>id_width$}  {}  {}  {}",
            "ID",
            pad("Note", BODY_WIDTH),
            pad("Tags", TAGS_WIDTH),
            "Due",
        )
        .bold()
    );

    for note in notes {
        let body = truncate_to_width(&single_line(&note.body), BODY_WIDTH);
        let tags = truncate_to_width(&tag_list(note), TAGS_WIDTH);
        let due = note
            .due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let due = if note.is_overdue(today) {
            pad(&due, DUE_WIDTH).red()
        } else {
            pad(&due, DUE_WIDTH).normal()
        };

        println!(
            "{:>id_width$}  {}  {}  {}",
            note.id.to_string().yellow(),
            pad(&body, BODY_WIDTH),
            pad(&tags, TAGS_WIDTH).cyan(),
            due,
        );
    }
}

pub(super) fn print_full_note(note: &Note, today: NaiveDate) {
    println!("{} {}", note.id.to_string().yellow(), "--------------------------------".dimmed());
    println!("{}", note.body);
    println!();
    if !note.tags.is_empty() {
        println!("{} {}", "Tags:".dimmed(), tag_list(note).cyan());
    }
    if let Some(due) = note.due_date {
        let due = due.format(DATE_FORMAT).to_string();
        if note.is_overdue(today) {
            println!("{} {} {}", "Due:".dimmed(), due.red(), "(overdue)".red());
        } else {
            println!("{} {}", "Due:".dimmed(), due);
        }
    }
    println!(
        "{} {}",
        "Created:".dimmed(),
        note.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
}

fn tag_list(note: &Note) -> String {
    note.tags
        .iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn single_line(s: &str) -> String {
    s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect()
}

/// Right-pads to a display width; `{:<n}` counts chars, not columns.
fn pad(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
