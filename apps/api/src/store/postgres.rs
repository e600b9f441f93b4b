use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{normalize_email, Store, StoreError};
use crate::models::resume::{NewResume, Resume, ResumeChanges, ResumeRow, ResumeSummary};
use crate::models::user::{
    Account, NewAccount, NewSession, NewUser, Session, User, Verification,
};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps unique-constraint violations to `Conflict`, everything else passes through.
fn map_unique(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(what.to_string())
        }
        _ => StoreError::Database(err),
    }
}

fn to_resume(row: ResumeRow) -> Result<Resume, StoreError> {
    Resume::try_from(row).map_err(|e| StoreError::Serialization(e.to_string()))
}

const RESUME_COLUMNS: &str =
    "id, user_id, title, template, accent_color, public, sections, created_at, updated_at";

#[async_trait]
impl Store for PgStore {
    async fn create_user_with_account(
        &self,
        user: NewUser,
        account: NewAccount,
    ) -> Result<(User, Account), StoreError> {
        let email = normalize_email(&user.email);
        let mut tx = self.pool.begin().await?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, email_verified, password_hash, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&email)
        .bind(user.email_verified)
        .bind(&user.password_hash)
        .bind(&user.image)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique(e, &format!("email {email} is already registered")))?;

        let account: Account = sqlx::query_as(
            r#"
            INSERT INTO accounts
                (id, user_id, provider_id, account_id, scope)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&account.provider_id)
        .bind(account.account_id.unwrap_or_else(|| user.id.to_string()))
        .bind(&account.scope)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique(e, "account is already linked"))?;

        tx.commit().await?;
        Ok((user, account))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn mark_email_verified(&self, user_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET email_verified = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_password_hash(&self, user_id: Uuid, hash: &str) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(hash)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn link_account(
        &self,
        user_id: Uuid,
        account: NewAccount,
    ) -> Result<Account, StoreError> {
        let account = sqlx::query_as(
            r#"
            INSERT INTO accounts
                (id, user_id, provider_id, account_id, scope)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&account.provider_id)
        .bind(account.account_id.unwrap_or_else(|| user_id.to_string()))
        .bind(&account.scope)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound,
            _ => map_unique(e, "account is already linked"),
        })?;
        Ok(account)
    }

    async fn find_account(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account =
            sqlx::query_as("SELECT * FROM accounts WHERE provider_id = $1 AND account_id = $2")
                .bind(provider_id)
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    async fn list_accounts(&self, user_id: Uuid) -> Result<Vec<Account>, StoreError> {
        let accounts =
            sqlx::query_as("SELECT * FROM accounts WHERE user_id = $1 ORDER BY created_at")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(accounts)
    }

    async fn create_session(&self, session: NewSession) -> Result<Session, StoreError> {
        let session = sqlx::query_as(
            r#"
            INSERT INTO sessions (id, token, user_id, expires_at, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, "session token collision"))?;
        Ok(session)
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as("SELECT * FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_verification(
        &self,
        identifier: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Verification, StoreError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO verifications (id, identifier, value, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(identifier)
        .bind(value)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, &format!("verification '{identifier}' already exists")))?;
        Ok(record)
    }

    async fn take_verification(
        &self,
        identifier: &str,
    ) -> Result<Option<Verification>, StoreError> {
        let record = sqlx::query_as("DELETE FROM verifications WHERE identifier = $1 RETURNING *")
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list_resumes(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<ResumeSummary>, StoreError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let rows: Vec<ResumeRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RESUME_COLUMNS} FROM resumes
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR title ILIKE $2)
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| to_resume(row).map(|r| ResumeSummary::from(&r)))
            .collect()
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, StoreError> {
        let row: ResumeRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO resumes (id, user_id, title, template, accent_color, sections)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RESUME_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(resume.template.as_str())
        .bind(&resume.accent_color)
        .bind(Json(&resume.sections))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound,
            _ => StoreError::Database(e),
        })?;
        to_resume(row)
    }

    async fn get_resume(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, StoreError> {
        let row: Option<ResumeRow> = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(to_resume).transpose()
    }

    async fn get_resume_unscoped(&self, id: Uuid) -> Result<Option<Resume>, StoreError> {
        let row: Option<ResumeRow> =
            sqlx::query_as(&format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(to_resume).transpose()
    }

    async fn update_resume(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Resume, StoreError> {
        let row: Option<ResumeRow> = sqlx::query_as(&format!(
            r#"
            UPDATE resumes SET
                title = COALESCE($3, title),
                template = COALESCE($4, template),
                accent_color = COALESCE($5, accent_color),
                public = COALESCE($6, public),
                sections = COALESCE($7, sections),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {RESUME_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(changes.title)
        .bind(changes.template.map(|t| t.as_str()))
        .bind(changes.accent_color)
        .bind(changes.public)
        .bind(changes.sections.map(Json))
        .fetch_optional(&self.pool)
        .await?;

        to_resume(row.ok_or(StoreError::NotFound)?)
    }

    async fn delete_resume(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escapes `%`, `_` and `\` so user search text matches literally in ILIKE.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
