//! Filesystem session provider.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crmkit_core::auth::{Credentials, Identity, SessionCallback, SessionHub, Subscription};
use crmkit_core::error::AuthError;
use crmkit_core::schema::is_valid_email;
use crmkit_core::traits::SessionProvider;
use crmkit_core::Result;

/// Shortest password accepted by [`FileAuth::sign_up`].
pub const MIN_PASSWORD_LEN: usize = 6;

fn storage(err: impl std::fmt::Display) -> AuthError {
    AuthError::Storage {
        message: err.to_string(),
    }
}

/// Account metadata stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    uid: String,
    email: String,
    created_at: DateTime<Utc>,
    /// Password hash (bcrypt).
    password_hash: String,
}

/// The persisted sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    #[serde(flatten)]
    identity: Identity,
    signed_in_at: DateTime<Utc>,
}

/// A [`SessionProvider`] backed by a local directory.
///
/// ```text
/// <root>/accounts/<uid>.json   # email + bcrypt hash
/// <root>/session.json          # current sign-in, absent when signed out
/// ```
///
/// The session survives process restarts: [`FileAuth::open`] restores it.
#[derive(Clone)]
pub struct FileAuth {
    root: PathBuf,
    hub: SessionHub,
    hash_cost: u32,
}

impl std::fmt::Debug for FileAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAuth")
            .field("root", &self.root)
            .field("current", &self.hub.current())
            .finish()
    }
}

impl FileAuth {
    /// Open the provider rooted at `root`, restoring any persisted session.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let current = Self::load_session(&root.join("session.json"))?;

        Ok(Self {
            root,
            hub: SessionHub::new(current),
            hash_cost: DEFAULT_COST,
        })
    }

    /// Override the bcrypt cost used for new accounts.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    fn account_path(&self, uid: &str) -> PathBuf {
        self.accounts_dir().join(format!("{}.json", uid))
    }

    fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    fn load_session(path: &Path) -> Result<Option<Identity>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage(err).into()),
        };

        let session: StoredSession = serde_json::from_str(&content)
            .map_err(|e| storage(format!("{}: {}", path.display(), e)))?;
        Ok(Some(session.identity))
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(storage)?;
        }

        let content = serde_json::to_string_pretty(value).map_err(storage)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(storage)?;
        fs::rename(&temp_path, path).map_err(storage)?;
        Ok(())
    }

    fn find_account(&self, email: &str) -> Result<Option<StoredAccount>> {
        let entries = match fs::read_dir(self.accounts_dir()) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage(err).into()),
        };

        for entry in entries {
            let path = entry.map_err(storage)?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let content = fs::read_to_string(&path).map_err(storage)?;
            let account: StoredAccount = serde_json::from_str(&content)
                .map_err(|e| storage(format!("{}: {}", path.display(), e)))?;
            if account.email == email {
                return Ok(Some(account));
            }
        }

        Ok(None)
    }

    fn start_session(&self, identity: Identity) -> Result<Identity> {
        let session = StoredSession {
            identity,
            signed_in_at: Utc::now(),
        };
        Self::write_json(&self.session_path(), &session)?;

        self.hub.set(Some(session.identity.clone()));
        Ok(session.identity)
    }
}

/// Emails compare case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl SessionProvider for FileAuth {
    fn current(&self) -> Option<Identity> {
        self.hub.current()
    }

    fn subscribe(&self, callback: SessionCallback) -> Subscription {
        self.hub.subscribe(callback)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn sign_up(&self, credentials: Credentials) -> Result<Identity> {
        let email = normalize_email(credentials.email());
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail.into());
        }
        if credentials.password().chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min_len: MIN_PASSWORD_LEN,
            }
            .into());
        }
        if self.find_account(&email)?.is_some() {
            return Err(AuthError::EmailInUse.into());
        }

        let password_hash = hash(credentials.password(), self.hash_cost).map_err(storage)?;
        let account = StoredAccount {
            uid: Uuid::new_v4().simple().to_string(),
            email,
            created_at: Utc::now(),
            password_hash,
        };
        Self::write_json(&self.account_path(&account.uid), &account)?;

        debug!(uid = %account.uid, "Created account");
        self.start_session(Identity::new(account.uid, account.email))
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn sign_in(&self, credentials: Credentials) -> Result<Identity> {
        let email = normalize_email(credentials.email());
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail.into());
        }

        let account = self
            .find_account(&email)?
            .ok_or(AuthError::InvalidCredentials)?;

        let ok = verify(credentials.password(), &account.password_hash).map_err(storage)?;
        if !ok {
            return Err(AuthError::InvalidCredentials.into());
        }

        debug!(uid = %account.uid, "Signed in");
        self.start_session(Identity::new(account.uid, account.email))
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<()> {
        match fs::remove_file(self.session_path()) {
            Ok(()) => debug!("Signed out"),
            Err(err) if err.kind() == ErrorKind::NotFound => debug!("Already signed out"),
            Err(err) => return Err(storage(err).into()),
        }

        self.hub.set(None);
        Ok(())
    }
}
