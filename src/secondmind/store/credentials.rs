use crate::digest::PasswordDigest;
use crate::error::{AuthError, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub digest: PasswordDigest,
}

impl Credential {
    fn to_line(&self) -> String {
        format!("{}:{}", self.username, self.digest)
    }
}

/// Raw access to the credential records.
///
/// Implementations only move text around; parsing and corruption checks live
/// in [`CredentialStore::load`] so every backend reports them the same way.
pub trait CredentialStore {
    /// The whole credential file, empty if it does not exist yet.
    fn read_all(&self) -> Result<String>;

    /// Append one record line (without the newline).
    fn append_line(&mut self, line: &str) -> Result<()>;

    fn load(&self) -> Result<Vec<Credential>> {
        Ok(parse_credentials(&self.read_all()?)?)
    }

    fn append(&mut self, credential: &Credential) -> Result<()> {
        self.append_line(&credential.to_line())
    }
}

/// Parses `username:digest` lines. Blank lines are skipped; anything else
/// that does not parse, or a repeated username, is corruption.
pub fn parse_credentials(text: &str) -> std::result::Result<Vec<Credential>, AuthError> {
    let mut seen = HashSet::new();
    let mut credentials = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let corrupt = |reason: String| AuthError::CorruptCredentialFile {
            line: idx + 1,
            reason,
        };

        let (username, digest) = line
            .split_once(':')
            .ok_or_else(|| corrupt("missing ':' separator".to_string()))?;
        if username.is_empty() {
            return Err(corrupt("empty username".to_string()));
        }
        let digest: PasswordDigest = digest.parse().map_err(corrupt)?;
        if !seen.insert(username.to_string()) {
            return Err(corrupt(format!("duplicate user {:?}", username)));
        }

        credentials.push(Credential {
            username: username.to_string(),
            digest,
        });
    }

    Ok(credentials)
}

/// The `users.txt` credential file.
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for CredentialFile {
    fn read_all(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn append_line(&mut self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // A hand-edited file may lack its final newline.
        let existing = self.read_all()?;
        let needs_newline = !existing.is_empty() && !existing.ends_with('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_newline {
            writeln!(file)?;
        }
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// Credential records held in a string, for tests.
#[derive(Debug, Default)]
pub struct InMemoryCredentials {
    text: String,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl CredentialStore for InMemoryCredentials {
    fn read_all(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn append_line(&mut self, line: &str) -> Result<()> {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(line);
        self.text.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DIGEST: &str = "5b11618c2e44027877d0cd0921ed166b9f176f50587fc91e7534dd2946db77d6";

    #[test]
    fn tolerates_blank_lines() {
        let text = format!("alice:{DIGEST}\n\nbob:{DIGEST}\n\n\n");
        let creds = parse_credentials(&text).unwrap();
        assert_eq!(creds.len(), 2);
        assert_eq!(creds[1].username, "bob");
    }

    #[test]
    fn duplicate_user_is_corruption() {
        let text = format!("alice:{DIGEST}\nalice:{DIGEST}\n");
        let err = parse_credentials(&text).unwrap_err();
        assert!(matches!(
            err,
            AuthError::CorruptCredentialFile { line: 2, .. }
        ));
    }

    #[test]
    fn malformed_lines_are_corruption() {
        for text in ["no-separator\n", ":abc\n", "alice:not-a-digest\n"] {
            let err = parse_credentials(text).unwrap_err();
            assert!(
                matches!(err, AuthError::CorruptCredentialFile { line: 1, .. }),
                "{text:?}"
            );
        }
    }

    #[test]
    fn file_store_appends_and_reads_back() {
        let dir = tempdir().unwrap();
        let mut store = CredentialFile::new(dir.path().join("users.txt"));
        assert!(store.load().unwrap().is_empty());

        store
            .append(&Credential {
                username: "alice".into(),
                digest: PasswordDigest::plain("secret1"),
            })
            .unwrap();
        store
            .append(&Credential {
                username: "bob".into(),
                digest: PasswordDigest::salted("hunter2"),
            })
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with(&format!("alice:{DIGEST}\n")));

        let creds = store.load().unwrap();
        assert_eq!(creds.len(), 2);
        assert!(creds[1].digest.verify("hunter2"));
    }

    #[test]
    fn append_repairs_missing_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.txt");
        fs::write(&path, format!("alice:{DIGEST}")).unwrap();

        let mut store = CredentialFile::new(&path);
        store
            .append(&Credential {
                username: "bob".into(),
                digest: PasswordDigest::plain("x"),
            })
            .unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }
}
