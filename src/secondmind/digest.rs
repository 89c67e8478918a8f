//! Password digests as stored in the credential file.
//!
//! Two encodings are accepted:
//! - `<64 hex>`: unsalted SHA-256 of the password (legacy records)
//! - `<32 hex>$<64 hex>`: a 16-byte salt and SHA-256(salt ‖ password)

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const SALT_LEN: usize = 16;
const DIGEST_HEX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordDigest {
    Plain(String),
    Salted { salt: String, digest: String },
}

impl PasswordDigest {
    pub fn plain(password: &str) -> Self {
        PasswordDigest::Plain(sha256_hex(&[], password))
    }

    pub fn salted(password: &str) -> Self {
        let salt: [u8; SALT_LEN] = rand::random();
        let digest = sha256_hex(&salt, password);
        PasswordDigest::Salted {
            salt: hex::encode(salt),
            digest,
        }
    }

    pub fn verify(&self, password: &str) -> bool {
        match self {
            PasswordDigest::Plain(digest) => *digest == sha256_hex(&[], password),
            PasswordDigest::Salted { salt, digest } => match hex::decode(salt) {
                Ok(salt) => *digest == sha256_hex(&salt, password),
                Err(_) => false,
            },
        }
    }
}

fn sha256_hex(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn is_hex_of_len(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordDigest::Plain(digest) => write!(f, "{}", digest),
            PasswordDigest::Salted { salt, digest } => write!(f, "{}${}", salt, digest),
        }
    }
}

impl FromStr for PasswordDigest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('$') {
            None if is_hex_of_len(s, DIGEST_HEX_LEN) => Ok(PasswordDigest::Plain(s.to_lowercase())),
            Some((salt, digest))
                if is_hex_of_len(salt, SALT_LEN * 2) && is_hex_of_len(digest, DIGEST_HEX_LEN) =>
            {
                Ok(PasswordDigest::Salted {
                    salt: salt.to_lowercase(),
                    digest: digest.to_lowercase(),
                })
            }
            _ => Err(format!("malformed password digest {:?}", s)),
        }
    }
}
