//! # Secondmind Architecture
//!
//! Secondmind is a password-protected notepad. The interesting part is a small
//! **library core** (credentials, note persistence, filtering, import/export); the
//! terminal client is one thin consumer of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, formats output                │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Facade over commands, holds the stores and the clock     │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Authentication, note CRUD, filters, import/export        │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - `NoteStore` trait: SqliteStore, InMemoryStore            │
//! │  - `CredentialStore` trait: CredentialFile, InMemory        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sessions
//!
//! Every note operation takes a [`model::Session`]. The only way to obtain one is
//! through [`commands::auth::register`] or [`commands::auth::authenticate`], so a note
//! can never be written for an owner that was not registered.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward the code never writes to stdout/stderr and never exits the
//! process. Only the API facade looks at the system clock; commands receive
//! "today" as an argument, and `SecondmindApi::with_today` pins it.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Storage traits and implementations
//! - [`model`]: Core data types (`Note`, `Session`, `NoteDraft`, `NotePatch`)
//! - [`digest`]: Password digests
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod digest;
pub mod error;
pub mod model;
pub mod store;
