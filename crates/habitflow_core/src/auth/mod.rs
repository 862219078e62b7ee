//! Account management and session identity.
//!
//! # Responsibility
//! - Validate signup/login input and mint explicit session values.
//! - Keep the legacy password-hash format stable for existing profiles.
//!
//! # Invariants
//! - There is no process-wide "current user": identity travels as a
//!   [`Session`] value handed to whoever needs it.
//! - Usernames are lowercased and trimmed before any lookup, so the same
//!   account cannot exist twice under different casings.

use crate::repo::{ProfileRepository, RepoError};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hard cap on stored accounts, carried over from the original deployment.
pub const MAX_ACCOUNTS: u32 = 10;

const MIN_USERNAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 4;

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // The pattern is a literal constant; compilation cannot fail at runtime.
    Regex::new("^[a-z0-9_]+$").unwrap_or_else(|err| panic!("invalid username pattern: {err}"))
});

pub type AuthResult<T> = Result<T, AuthError>;

/// Failures from account and credential operations.
#[derive(Debug)]
pub enum AuthError {
    UsernameTooShort,
    InvalidUsername,
    PasswordTooShort,
    UsernameTaken,
    AccountLimitReached,
    UserNotFound,
    WrongPassword,
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameTooShort => {
                write!(f, "username must have at least {MIN_USERNAME_CHARS} characters")
            }
            Self::InvalidUsername => {
                write!(f, "username may only contain lowercase letters, digits and `_`")
            }
            Self::PasswordTooShort => {
                write!(f, "password must have at least {MIN_PASSWORD_CHARS} characters")
            }
            Self::UsernameTaken => write!(f, "username already exists"),
            Self::AccountLimitReached => write!(f, "account limit reached"),
            Self::UserNotFound => write!(f, "user not found"),
            Self::WrongPassword => write!(f, "wrong password"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Proof of a completed login, threaded explicitly into the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Creates an account after validating username and password rules.
pub fn sign_up(repo: &dyn ProfileRepository, username: &str, password: &str) -> AuthResult<()> {
    let username = normalize_username(username);
    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(AuthError::UsernameTooShort);
    }
    if !USERNAME_PATTERN.is_match(&username) {
        return Err(AuthError::InvalidUsername);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::PasswordTooShort);
    }
    if repo.account_count()? >= MAX_ACCOUNTS {
        return Err(AuthError::AccountLimitReached);
    }
    if repo.account_exists(&username)? {
        return Err(AuthError::UsernameTaken);
    }

    repo.create_account(&username, &legacy_hash(password))?;
    info!("event=account_created module=auth status=ok username={username}");
    Ok(())
}

/// Verifies credentials and mints a session value.
pub fn log_in(repo: &dyn ProfileRepository, username: &str, password: &str) -> AuthResult<Session> {
    let username = normalize_username(username);
    let stored = repo
        .password_hash(&username)?
        .ok_or(AuthError::UserNotFound)?;
    if stored != legacy_hash(password) {
        return Err(AuthError::WrongPassword);
    }

    info!("event=login module=auth status=ok username={username}");
    Ok(Session { username })
}

/// Replaces the stored password hash for the session's account.
pub fn change_password(
    repo: &dyn ProfileRepository,
    session: &Session,
    new_password: &str,
) -> AuthResult<()> {
    if new_password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::PasswordTooShort);
    }
    repo.set_password_hash(session.username(), &legacy_hash(new_password))?;
    Ok(())
}

/// Deletes the session's account and everything stored under it.
///
/// Consumes the session; the identity is gone afterwards.
pub fn delete_account(repo: &dyn ProfileRepository, session: Session) -> AuthResult<()> {
    repo.delete_account(session.username())?;
    info!(
        "event=account_deleted module=auth status=ok username={}",
        session.username()
    );
    Ok(())
}

fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Legacy 32-bit rolling hash in the exact rendering the original profiles
/// were stored with.
///
/// Weak by modern standards; kept only so existing stored credentials keep
/// verifying. Operates over UTF-16 code units and renders negative values
/// with a leading `-`, matching the source format bit for bit.
pub fn legacy_hash(input: &str) -> String {
    let mut h: i32 = 0;
    for unit in input.encode_utf16() {
        h = h
            .wrapping_shl(5)
            .wrapping_sub(h)
            .wrapping_add(i32::from(unit));
    }
    if h < 0 {
        format!("-{:x}", i64::from(h).unsigned_abs())
    } else {
        format!("{:x}", h)
    }
}

#[cfg(test)]
mod tests {
    use super::{legacy_hash, normalize_username};

    #[test]
    fn legacy_hash_matches_known_vectors() {
        // Vectors taken from previously stored profiles.
        assert_eq!(legacy_hash(""), "0");
        assert_eq!(legacy_hash("a"), "61");
        assert_eq!(legacy_hash("abc"), "17862");
        assert_eq!(legacy_hash("hello"), "5e918d2");
        assert_eq!(legacy_hash("password"), "4889ba9b");
    }

    #[test]
    fn legacy_hash_renders_negative_values_with_sign() {
        // Long inputs overflow into negative 32-bit territory.
        let hashed = legacy_hash("this is a fairly long pass phrase");
        assert!(hashed.starts_with('-'));
        assert!(hashed.len() > 1);
    }

    #[test]
    fn usernames_are_trimmed_and_lowercased() {
        assert_eq!(normalize_username("  Alice_01  "), "alice_01");
    }
}
