//! Session resolution and persistence
//!
//! Every page derives its role and token from one persisted session store:
//! an explicit `(userId, companyId)` pair selects a secondary
//! (impersonation) session, otherwise the Primary session is used.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{DashboardError, DashboardResult},
    types::UserRole,
};

/// Schema version of the persisted session blob.
const SESSION_SCHEMA_VERSION: u32 = 1;

/// File name of the persisted session blob.
const SESSION_FILE: &str = "sessions.json";

/// Session kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    /// The logged-in user's own session.
    Primary,
    /// An impersonation session opened via explicit userId/companyId.
    Secondary,
}

/// A persisted user session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// User ID.
    pub user_id:    String,
    /// Company (tenant) ID.
    pub company_id: String,
    /// Display name.
    pub name:       String,
    /// Email address.
    pub email:      String,
    /// Role driving the capability table.
    pub role:       UserRole,
    /// Bearer token sent in the custom token header.
    pub token:      String,
}

impl SessionUser {
    /// Whether this record matches a `(userId, companyId)` pair.
    #[must_use]
    pub fn matches(&self, user_id: &str, company_id: &str) -> bool {
        self.user_id == user_id && self.company_id == company_id
    }
}

/// Persisted session blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    /// Schema version tag.
    version:   u32,
    /// Primary session, if logged in.
    primary:   Option<SessionUser>,
    /// Secondary sessions, keyed by `(user_id, company_id)`.
    secondary: Vec<SessionUser>,
}

/// Session store with versioned JSON persistence.
///
/// Single-writer, last-write-wins; there is no cross-process consistency
/// guarantee.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    file: SessionFile,
}

impl SessionStore {
    /// Opens the store under `dir`, rehydrating any persisted sessions.
    ///
    /// A missing file yields an empty store. Legacy blobs without a
    /// version tag are migrated in place on the next write.
    pub fn open(dir: &Path) -> DashboardResult<Self> {
        let path = dir.join(SESSION_FILE);
        let file = match fs::read_to_string(&path) {
            Ok(raw) => migrate(serde_json::from_str(&raw)?)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => SessionFile::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, file })
    }

    /// Resolves the session for a page.
    ///
    /// An explicit `(userId, companyId)` pair selects the matching
    /// secondary (or primary) session; without one the Primary session is
    /// the fallback.
    pub fn resolve(&self, query: Option<(&str, &str)>) -> DashboardResult<&SessionUser> {
        if let Some((user_id, company_id)) = query {
            if let Some(user) =
                self.file.secondary.iter().find(|u| u.matches(user_id, company_id))
            {
                return Ok(user);
            }
            if let Some(user) = self.file.primary.as_ref() {
                if user.matches(user_id, company_id) {
                    return Ok(user);
                }
            }
            return Err(DashboardError::SessionNotFound);
        }
        self.file.primary.as_ref().ok_or(DashboardError::SessionNotFound)
    }

    /// Stores the Primary session (login).
    pub fn set_primary(&mut self, user: SessionUser) -> DashboardResult<()> {
        self.file.primary = Some(user);
        self.save()
    }

    /// Stores a Secondary session, replacing any record for the same
    /// `(userId, companyId)` pair.
    pub fn add_secondary(&mut self, user: SessionUser) -> DashboardResult<()> {
        self.file.secondary.retain(|u| !u.matches(&user.user_id, &user.company_id));
        self.file.secondary.push(user);
        self.save()
    }

    /// Removes a session by `(userId, companyId)`.
    pub fn remove(&mut self, user_id: &str, company_id: &str) -> DashboardResult<()> {
        if let Some(primary) = self.file.primary.as_ref() {
            if primary.matches(user_id, company_id) {
                self.file.primary = None;
            }
        }
        self.file.secondary.retain(|u| !u.matches(user_id, company_id));
        self.save()
    }

    /// Drops every session (logout).
    pub fn clear(&mut self) -> DashboardResult<()> {
        self.file = SessionFile::default();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Session kind of a stored record.
    #[must_use]
    pub fn session_type(&self, user: &SessionUser) -> SessionType {
        match self.file.primary.as_ref() {
            Some(primary) if primary == user => SessionType::Primary,
            _ => SessionType::Secondary,
        }
    }

    fn save(&self) -> DashboardResult<()> {
        let raw = serde_json::to_string_pretty(&self.file)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Migrates a persisted blob to the current schema.
///
/// Version 0 is the legacy shape: a bare session record with no version
/// tag, treated as the Primary session.
fn migrate(value: serde_json::Value) -> DashboardResult<SessionFile> {
    let version = value.get("version").and_then(serde_json::Value::as_u64).unwrap_or(0) as u32;
    match version {
        0 => {
            let primary: SessionUser = serde_json::from_value(value)?;
            Ok(SessionFile {
                version:   SESSION_SCHEMA_VERSION,
                primary:   Some(primary),
                secondary: Vec::new(),
            })
        },
        SESSION_SCHEMA_VERSION => Ok(serde_json::from_value(value)?),
        newer => Err(DashboardError::UnsupportedSchemaVersion(newer)),
    }
}
