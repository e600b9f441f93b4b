//! Data-access layer.
//!
//! Handlers talk to `dyn Store`; `PgStore` backs production, `MemoryStore` backs local runs
//! without a database and the test suite. Uniqueness and ownership rules live here so both
//! backends enforce them identically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{NewResume, Resume, ResumeChanges, ResumeSummary};
use crate::models::user::{
    Account, NewAccount, NewSession, NewUser, Session, User, Verification,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    // ── Users & accounts ────────────────────────────────────────────────────

    /// Creates a user and its first linked account in one atomic step.
    /// Fails with `Conflict` if the email (case-insensitive) is taken.
    async fn create_user_with_account(
        &self,
        user: NewUser,
        account: NewAccount,
    ) -> Result<(User, Account), StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn mark_email_verified(&self, user_id: Uuid) -> Result<(), StoreError>;

    async fn update_password_hash(&self, user_id: Uuid, hash: &str) -> Result<(), StoreError>;

    /// Links an additional provider account to an existing user.
    async fn link_account(&self, user_id: Uuid, account: NewAccount)
        -> Result<Account, StoreError>;

    async fn find_account(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn list_accounts(&self, user_id: Uuid) -> Result<Vec<Account>, StoreError>;

    // ── Sessions ────────────────────────────────────────────────────────────

    async fn create_session(&self, session: NewSession) -> Result<Session, StoreError>;

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError>;

    async fn delete_session(&self, token: &str) -> Result<(), StoreError>;

    // ── Verifications ───────────────────────────────────────────────────────

    async fn create_verification(
        &self,
        identifier: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Verification, StoreError>;

    /// Removes and returns the record for `identifier`, if any. Expiry is the caller's check.
    async fn take_verification(&self, identifier: &str)
        -> Result<Option<Verification>, StoreError>;

    // ── Resumes ─────────────────────────────────────────────────────────────

    /// Owner's resumes, most recently updated first. `search` matches titles case-insensitively.
    async fn list_resumes(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<ResumeSummary>, StoreError>;

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, StoreError>;

    /// `None` when the resume does not exist or belongs to someone else.
    async fn get_resume(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, StoreError>;

    /// Fetches without an owner check; used for public previews.
    async fn get_resume_unscoped(&self, id: Uuid) -> Result<Option<Resume>, StoreError>;

    async fn update_resume(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Resume, StoreError>;

    /// Returns `false` when nothing was deleted.
    async fn delete_resume(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

/// Emails are compared and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
