//! Account credentials and where they come from.
//!
//! The factory doesn't care how credentials are stored. It asks a
//! [`CredentialProvider`] for them once per ticket attempt and tells the
//! provider to [`discard`](CredentialProvider::discard) them afterwards,
//! whatever the outcome.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

/// When this environment variable is set (to anything), the credentials
/// file is left on disk after a ticket attempt.
pub const KEEP_CREDENTIALS_ENV: &str = "DARKEST_BOT_KEEP_CREDS_FILE_ON_SUCCESS";

/// Default name of the credentials file, relative to the working directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = "Credentials.txt";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// An account name and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account: String,
    pub password: String,
}

impl Credentials {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Supplies credentials for the ticket request.
pub trait CredentialProvider: Send + Sync {
    /// Returns the credentials, or `None` if none are available. A `None`
    /// tells the caller to abort startup; it is not an error.
    fn credentials(&self) -> impl Future<Output = Option<Credentials>> + Send;

    /// Called once after every ticket attempt (fetched, cached, or failed).
    fn discard(&self) -> impl Future<Output = ()> + Send;
}

// ---------------------------------------------------------------------------
// FileCredentials
// ---------------------------------------------------------------------------

/// Reads credentials from a two-line text file: account, then password.
///
/// The file is deleted on [`discard`](CredentialProvider::discard) unless
/// `keep_file` is set, so a plaintext password doesn't linger on disk.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
    keep_file: bool,
}

impl FileCredentials {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            keep_file: false,
        }
    }

    /// Like [`new`](Self::new), keeping the file if
    /// [`KEEP_CREDENTIALS_ENV`] is set.
    pub fn from_env(path: impl AsRef<Path>) -> Self {
        Self::new(path).keep_file(std::env::var_os(KEEP_CREDENTIALS_ENV).is_some())
    }

    pub fn keep_file(mut self, keep: bool) -> Self {
        self.keep_file = keep;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for FileCredentials {
    async fn credentials(&self) -> Option<Credentials> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "unable to read credentials file");
                return None;
            }
        };

        parse_credentials(&text)
    }

    async fn discard(&self) {
        if self.keep_file {
            return;
        }
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "credentials file deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "could not delete credentials file");
            }
        }
    }
}

/// Exactly two lines, neither blank.
fn parse_credentials(text: &str) -> Option<Credentials> {
    let lines: Vec<&str> = text.lines().collect();
    let [account, password] = lines.as_slice() else {
        tracing::error!(
            expected = 2,
            count = lines.len(),
            "credentials file must have exactly two lines"
        );
        return None;
    };

    if account.trim().is_empty() {
        tracing::error!("credentials file has an empty account");
        return None;
    }
    if password.trim().is_empty() {
        tracing::error!("credentials file has an empty password");
        return None;
    }
    Some(Credentials::new(*account, *password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credentials_two_lines() {
        let creds = parse_credentials("acct\nhunter2\n").unwrap();
        assert_eq!(creds, Credentials::new("acct", "hunter2"));
    }

    #[test]
    fn test_parse_credentials_crlf_line_endings() {
        let creds = parse_credentials("acct\r\nhunter2\r\n").unwrap();
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_parse_credentials_wrong_line_count_returns_none() {
        assert!(parse_credentials("").is_none());
        assert!(parse_credentials("acct\n").is_none());
        assert!(parse_credentials("acct\npass\nextra\n").is_none());
    }

    #[test]
    fn test_parse_credentials_blank_line_returns_none() {
        assert!(parse_credentials("  \npass").is_none());
        assert!(parse_credentials("acct\n\t").is_none());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let text = format!("{:?}", Credentials::new("acct", "hunter2"));
        assert!(text.contains("acct"));
        assert!(!text.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_file_credentials_reads_then_discard_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Credentials.txt");
        std::fs::write(&path, "acct\npass\n").unwrap();
        let provider = FileCredentials::new(&path);

        let creds = provider.credentials().await.unwrap();
        assert_eq!(creds.account, "acct");

        provider.discard().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_file_credentials_keep_file_survives_discard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Credentials.txt");
        std::fs::write(&path, "acct\npass\n").unwrap();
        let provider = FileCredentials::new(&path).keep_file(true);

        provider.discard().await;
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_file_credentials_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileCredentials::new(dir.path().join("nope.txt"));

        assert!(provider.credentials().await.is_none());
        // Discarding a file that isn't there is a no-op.
        provider.discard().await;
    }
}
