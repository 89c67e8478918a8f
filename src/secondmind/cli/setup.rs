use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use secondmind::commands::NoteFormat;
use secondmind::model::parse_due_date;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "secondmind", bin_name = "secondmind", version)]
#[command(about = "Password-protected command-line notepad", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (database, credentials, config)
    #[arg(long, global = true, env = "SECONDMIND_HOME", help_heading = "Options")]
    pub home: Option<PathBuf>,

    /// Username (prompted for when omitted)
    #[arg(short, long, global = true, env = "SECONDMIND_USER", help_heading = "Options")]
    pub user: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(
        long,
        global = true,
        env = "SECONDMIND_PASSWORD",
        hide_env_values = true,
        help_heading = "Options"
    )]
    pub password: Option<String>,

    /// Evaluate due dates as of this day instead of today
    #[arg(long, global = true, env = "SECONDMIND_TODAY", value_parser = parse_date, hide = true)]
    pub as_of: Option<NaiveDate>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account
    Register,

    /// Check credentials and show reminders
    Login,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. reminder-window-days)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Log in once, then read commands from stdin
    Shell,

    #[command(flatten)]
    Note(NoteCommand),
}

/// Commands that run inside an authenticated session. The interactive shell
/// accepts exactly these.
#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    /// Write a note
    #[command(alias = "n")]
    Add {
        /// Note text
        #[arg(required = true, num_args = 1..)]
        body: Vec<String>,

        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List notes, optionally filtered
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single note
    #[command(alias = "v")]
    View { id: i64 },

    /// Change a note's text, tags or due date
    #[command(alias = "e")]
    Update {
        id: i64,

        /// New note text
        #[arg(long)]
        body: Option<String>,

        /// Replacement tags (repeatable)
        #[arg(short, long = "tag", conflicts_with = "clear_tags")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,

        /// New due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a note permanently
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Notes due today, overdue, or due this week
    Due(DueArgs),

    /// Export all notes
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Output file, `-` for stdout [default: <user>_notes_export.<ext>]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import notes from a JSON export or a legacy text file
    Import {
        path: PathBuf,

        /// Input format [default: by file extension]
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only notes whose text contains this
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Only notes with this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Only notes due before this date
    #[arg(long, value_parser = parse_date)]
    pub due_before: Option<NaiveDate>,

    /// Only notes due after this date
    #[arg(long, value_parser = parse_date)]
    pub due_after: Option<NaiveDate>,

    /// Only overdue notes
    #[arg(long)]
    pub overdue: bool,
}

#[derive(Args, Debug, Clone)]
#[group(multiple = false)]
pub struct DueArgs {
    /// Due today
    #[arg(long)]
    pub today: bool,

    /// Past their due date
    #[arg(long)]
    pub overdue: bool,

    /// Due within the reminder window (default)
    #[arg(long)]
    pub week: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for NoteFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => NoteFormat::Json,
            FormatArg::Text => NoteFormat::Text,
        }
    }
}

/// One line of the interactive shell.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: NoteCommand,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_due_date(s).map_err(|e| e.to_string())
}

/// Splits a shell line into words, honouring single and double quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
