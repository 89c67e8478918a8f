//! # CLI Layer
//!
//! The terminal client. It is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, prompts on stdin)
//! - Decides exit codes
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory and builds the API over the real stores
//! - `dispatch()`: Runs one note command for an authenticated session. One-shot
//!   subcommands and every line of the interactive shell go through it.
//! - `handle_*()`: Per-command handlers that call the API and format output

use super::render::{print_full_note, print_messages, print_notes};
use super::setup::{split_words, Cli, Commands, DueArgs, ListArgs, NoteCommand, ShellLine};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use secondmind::api::{DueView, SecondmindApi};
use secondmind::commands::{NoteFilter, NoteFormat};
use secondmind::config::{SecondmindConfig, CONFIG_KEYS};
use secondmind::error::{Result, SecondmindError};
use secondmind::model::{NoteId, NotePatch, Session};
use secondmind::store::credentials::CredentialFile;
use secondmind::store::sqlite::SqliteStore;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: SecondmindApi<SqliteStore, CredentialFile>,
}

/// Username and password as given on the command line, prompted for when missing.
struct Login {
    user: Option<String>,
    password: Option<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let home = resolve_home(cli.home)?;
    debug!(home = %home.display(), "data directory");

    let login = Login {
        user: cli.user,
        password: cli.password,
    };
    let stdin = io::stdin();
    let mut input = stdin.lock();

    match cli.command {
        Commands::Config { key, value } => handle_config(&home, key, value),
        Commands::Register => {
            let mut ctx = init_context(&home, cli.as_of)?;
            handle_register(&mut ctx, login, &mut input)
        }
        Commands::Login => {
            let ctx = init_context(&home, cli.as_of)?;
            let session = authenticate(&ctx, login, &mut input)?;
            show_reminders(&ctx, &session)
        }
        Commands::Shell => {
            let mut ctx = init_context(&home, cli.as_of)?;
            let session = authenticate(&ctx, login, &mut input)?;
            show_reminders(&ctx, &session)?;
            run_shell(&mut ctx, &session, &mut input)
        }
        Commands::Note(command) => {
            let mut ctx = init_context(&home, cli.as_of)?;
            let session = authenticate(&ctx, login, &mut input)?;
            dispatch(&mut ctx, &session, command)
        }
    }
}

fn init_logging(verbose: bool) {
    // Respects RUST_LOG; otherwise warnings only, or everything with --verbose
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_home(home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = home {
        return Ok(home);
    }
    ProjectDirs::from("com", "secondmind", "secondmind")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SecondmindError::Config("Could not determine a data directory".into()))
}

fn init_context(home: &Path, as_of: Option<chrono::NaiveDate>) -> Result<AppContext> {
    let config = SecondmindConfig::load(home)?;
    let notes = SqliteStore::open(&config.database_path(home))?;
    let credentials = CredentialFile::new(config.credentials_path(home));

    let mut api = SecondmindApi::new(notes, credentials, config);
    if let Some(today) = as_of {
        api = api.with_today(today);
    }
    Ok(AppContext { api })
}

fn prompt(label: &str, input: &mut impl BufRead) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input on stdin").into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_login(login: Login, input: &mut impl BufRead) -> Result<(String, String)> {
    let user = match login.user {
        Some(user) => user,
        None => prompt("Username: ", input)?,
    };
    let password = match login.password {
        Some(password) => password,
        None => prompt("Password: ", input)?,
    };
    Ok((user, password))
}

fn authenticate(ctx: &AppContext, login: Login, input: &mut impl BufRead) -> Result<Session> {
    let (user, password) = read_login(login, input)?;
    ctx.api.login(&user, &password)
}

fn handle_register(ctx: &mut AppContext, login: Login, input: &mut impl BufRead) -> Result<()> {
    let (user, password) = read_login(login, input)?;
    let session = ctx.api.register(&user, &password)?;
    println!("{}", format!("Registered {}.", session.username()).green());
    Ok(())
}

fn show_reminders(ctx: &AppContext, session: &Session) -> Result<()> {
    println!("Welcome, {}.", session.username().bold());
    let result = ctx.api.reminders(session)?;
    print_messages(&result.messages);
    Ok(())
}

fn run_shell(ctx: &mut AppContext, session: &Session, input: &mut impl BufRead) -> Result<()> {
    println!("{}", "Type `help` for commands, `exit` to leave.".dimmed());

    loop {
        print!("{}> ", session.username());
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let words = match split_words(&line) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("exit") | Some("quit") => break,
            Some(_) => {}
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(line) => line.command,
            Err(e) => {
                // Also covers `help` and `<cmd> --help`
                e.print()?;
                continue;
            }
        };

        if let Err(e) = dispatch(ctx, session, command) {
            if e.is_fatal() {
                return Err(e);
            }
            eprintln!("{} {}", "Error:".red(), e);
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn dispatch(ctx: &mut AppContext, session: &Session, command: NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add { body, tags, due } => handle_add(ctx, session, body, tags, due),
        NoteCommand::List(args) => handle_list(ctx, session, args),
        NoteCommand::View { id } => handle_view(ctx, session, id),
        NoteCommand::Update {
            id,
            body,
            tags,
            clear_tags,
            due,
            clear_due,
        } => {
            let mut patch = NotePatch::new();
            if let Some(body) = body {
                patch = patch.body(body);
            }
            if clear_tags {
                patch = patch.tags(Vec::<String>::new());
            } else if !tags.is_empty() {
                patch = patch.tags(tags);
            }
            if clear_due {
                patch = patch.clear_due_date();
            } else if let Some(due) = due {
                patch = patch.due_date(due);
            }
            handle_update(ctx, session, id, patch)
        }
        NoteCommand::Delete { id } => handle_delete(ctx, session, id),
        NoteCommand::Due(args) => handle_due(ctx, session, args),
        NoteCommand::Export { format, output } => {
            handle_export(ctx, session, format.into(), output)
        }
        NoteCommand::Import { path, format } => {
            let format = format
                .map(NoteFormat::from)
                .unwrap_or_else(|| NoteFormat::from_path(&path));
            handle_import(ctx, session, &path, format)
        }
    }
}

fn handle_add(
    ctx: &mut AppContext,
    session: &Session,
    body: Vec<String>,
    tags: Vec<String>,
    due: Option<String>,
) -> Result<()> {
    let result = ctx
        .api
        .add_note(session, &body.join(" "), &tags, due.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, session: &Session, args: ListArgs) -> Result<()> {
    let mut filter = NoteFilter::new();
    if let Some(keyword) = args.keyword {
        filter = filter.keyword(keyword);
    }
    if let Some(tag) = args.tag {
        filter = filter.tag(tag);
    }
    if let Some(date) = args.due_before {
        filter = filter.due_before(date);
    }
    if let Some(date) = args.due_after {
        filter = filter.due_after(date);
    }
    if args.overdue {
        filter = filter.overdue();
    }

    let result = ctx.api.list_notes(session, filter)?;
    print_notes(&result.listed_notes, ctx.api.today());
    Ok(())
}

fn handle_view(ctx: &mut AppContext, session: &Session, id: NoteId) -> Result<()> {
    let result = ctx.api.get_note(session, id)?;
    for note in &result.listed_notes {
        print_full_note(note, ctx.api.today());
    }
    Ok(())
}

fn handle_update(
    ctx: &mut AppContext,
    session: &Session,
    id: NoteId,
    patch: NotePatch,
) -> Result<()> {
    let result = ctx.api.update_note(session, id, &patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, session: &Session, id: NoteId) -> Result<()> {
    let result = ctx.api.delete_note(session, id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_due(ctx: &mut AppContext, session: &Session, args: DueArgs) -> Result<()> {
    let view = if args.today {
        DueView::Today
    } else if args.overdue {
        DueView::Overdue
    } else {
        DueView::Week
    };
    let result = ctx.api.due_notes(session, view)?;
    print_notes(&result.listed_notes, ctx.api.today());
    Ok(())
}

fn handle_export(
    ctx: &mut AppContext,
    session: &Session,
    format: NoteFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let result = ctx.api.export_notes(session, format)?;
    let document = result.document.unwrap_or_default();

    match output {
        Some(path) if path.as_os_str() == "-" => {
            print!("{}", document);
        }
        output => {
            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "{}_notes_export.{}",
                    session.username(),
                    format.extension()
                ))
            });
            fs::write(&path, document)?;
            print_messages(&result.messages);
            println!("{}", format!("Written to {}", path.display()).dimmed());
        }
    }
    Ok(())
}

fn handle_import(
    ctx: &mut AppContext,
    session: &Session,
    path: &Path,
    format: NoteFormat,
) -> Result<()> {
    let content = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
    let result = ctx.api.import_notes(session, &content, format)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(home: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let mut config = SecondmindConfig::load(home)?;

    match (key, value) {
        (None, _) => {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
        (Some(key), None) => println!("{}", config.get(&key)?),
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save(home)?;
            println!("{}", format!("{} = {}", key, config.get(&key)?).green());
        }
    }
    Ok(())
}
