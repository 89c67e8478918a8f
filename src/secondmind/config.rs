use crate::error::{Result, SecondmindError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATABASE_FILE: &str = "secondmind.db";
const DEFAULT_CREDENTIALS_FILE: &str = "users.txt";
const DEFAULT_REMINDER_WINDOW_DAYS: u32 = 7;

/// Configuration for secondmind, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecondmindConfig {
    /// Note database, relative to the data directory unless absolute
    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,

    /// Credential file, relative to the data directory unless absolute
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,

    /// Days ahead covered by "due this week" and the due-soon view
    #[serde(default = "default_reminder_window_days")]
    pub reminder_window_days: u32,

    /// Salt new password digests
    #[serde(default = "default_true")]
    pub salt_passwords: bool,

    /// Skip imported records identical to an existing note
    #[serde(default = "default_true")]
    pub skip_duplicate_imports: bool,
}

fn default_database_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_FILE)
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from(DEFAULT_CREDENTIALS_FILE)
}

fn default_reminder_window_days() -> u32 {
    DEFAULT_REMINDER_WINDOW_DAYS
}

fn default_true() -> bool {
    true
}

impl Default for SecondmindConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            credentials_file: default_credentials_file(),
            reminder_window_days: DEFAULT_REMINDER_WINDOW_DAYS,
            salt_passwords: true,
            skip_duplicate_imports: true,
        }
    }
}

/// Keys accepted by [`SecondmindConfig::get`] and [`SecondmindConfig::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "database-file",
    "credentials-file",
    "reminder-window-days",
    "salt-passwords",
    "skip-duplicate-imports",
];

impl SecondmindConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn database_path(&self, home: &Path) -> PathBuf {
        home.join(&self.database_file)
    }

    pub fn credentials_path(&self, home: &Path) -> PathBuf {
        home.join(&self.credentials_file)
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "database-file" => self.database_file.display().to_string(),
            "credentials-file" => self.credentials_file.display().to_string(),
            "reminder-window-days" => self.reminder_window_days.to_string(),
            "salt-passwords" => self.salt_passwords.to_string(),
            "skip-duplicate-imports" => self.skip_duplicate_imports.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "database-file" => self.database_file = PathBuf::from(value),
            "credentials-file" => self.credentials_file = PathBuf::from(value),
            "reminder-window-days" => self.reminder_window_days = parse_value(key, value)?,
            "salt-passwords" => self.salt_passwords = parse_value(key, value)?,
            "skip-duplicate-imports" => self.skip_duplicate_imports = parse_value(key, value)?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> SecondmindError {
    SecondmindError::Config(format!(
        "Unknown config key: {} (known: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SecondmindError::Config(format!("Invalid value for {}: {}", key, value)))
}
