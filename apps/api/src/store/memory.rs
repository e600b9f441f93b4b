//! In-process store. Used when `DATABASE_URL` is not set and by tests.
//! Contents are lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{normalize_email, Store, StoreError};
use crate::models::resume::{NewResume, Resume, ResumeChanges, ResumeSummary};
use crate::models::user::{
    Account, NewAccount, NewSession, NewUser, Session, User, Verification,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    accounts: Vec<Account>,
    sessions: HashMap<String, Session>,
    verifications: HashMap<String, Verification>,
    resumes: HashMap<Uuid, Resume>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_account(user_id: Uuid, account: NewAccount, now: DateTime<Utc>) -> Account {
    Account {
        id: Uuid::new_v4(),
        user_id,
        provider_id: account.provider_id,
        account_id: account.account_id.unwrap_or_else(|| user_id.to_string()),
        scope: account.scope,
        created_at: now,
        updated_at: now,
    }
}

impl Tables {
    fn account_exists(&self, provider_id: &str, account_id: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.provider_id == provider_id && a.account_id == account_id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user_with_account(
        &self,
        user: NewUser,
        account: NewAccount,
    ) -> Result<(User, Account), StoreError> {
        let mut tables = self.tables.write().await;
        let email = normalize_email(&user.email);
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict(format!("email {email} is already registered")));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email,
            email_verified: user.email_verified,
            password_hash: user.password_hash,
            image: user.image,
            created_at: now,
            updated_at: now,
        };
        let account = build_account(user.id, account, now);
        if tables.account_exists(&account.provider_id, &account.account_id) {
            return Err(StoreError::Conflict("account is already linked".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        tables.accounts.push(account.clone());
        Ok((user, account))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn mark_email_verified(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.email_verified = true;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_password_hash(&self, user_id: Uuid, hash: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.password_hash = Some(hash.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn link_account(
        &self,
        user_id: Uuid,
        account: NewAccount,
    ) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }
        let account = build_account(user_id, account, Utc::now());
        if tables.account_exists(&account.provider_id, &account.account_id) {
            return Err(StoreError::Conflict("account is already linked".to_string()));
        }
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_account(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.provider_id == provider_id && a.account_id == account_id)
            .cloned())
    }

    async fn list_accounts(&self, user_id: Uuid) -> Result<Vec<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_session(&self, session: NewSession) -> Result<Session, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.sessions.contains_key(&session.token) {
            return Err(StoreError::Conflict("session token collision".to_string()));
        }
        let session = Session {
            id: Uuid::new_v4(),
            token: session.token,
            user_id: session.user_id,
            expires_at: session.expires_at,
            ip_address: session.ip_address,
            user_agent: session.user_agent,
            created_at: Utc::now(),
        };
        tables
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.tables.read().await.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.tables.write().await.sessions.remove(token);
        Ok(())
    }

    async fn create_verification(
        &self,
        identifier: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Verification, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.verifications.contains_key(identifier) {
            return Err(StoreError::Conflict(format!(
                "verification '{identifier}' already exists"
            )));
        }
        let record = Verification {
            id: Uuid::new_v4(),
            identifier: identifier.to_string(),
            value: value.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        tables
            .verifications
            .insert(identifier.to_string(), record.clone());
        Ok(record)
    }

    async fn take_verification(
        &self,
        identifier: &str,
    ) -> Result<Option<Verification>, StoreError> {
        Ok(self.tables.write().await.verifications.remove(identifier))
    }

    async fn list_resumes(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<ResumeSummary>, StoreError> {
        let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        let tables = self.tables.read().await;
        let mut out: Vec<ResumeSummary> = tables
            .resumes
            .values()
            .filter(|r| r.user_id == user_id)
            .filter(|r| match &needle {
                Some(n) => r.title.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .map(ResumeSummary::from)
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&resume.user_id) {
            return Err(StoreError::NotFound);
        }
        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            title: resume.title,
            template: resume.template,
            accent_color: resume.accent_color,
            public: false,
            sections: resume.sections,
            created_at: now,
            updated_at: now,
        };
        tables.resumes.insert(resume.id, resume.clone());
        Ok(resume)
    }

    async fn get_resume(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .resumes
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn get_resume_unscoped(&self, id: Uuid) -> Result<Option<Resume>, StoreError> {
        Ok(self.tables.read().await.resumes.get(&id).cloned())
    }

    async fn update_resume(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Resume, StoreError> {
        let mut tables = self.tables.write().await;
        let resume = tables
            .resumes
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
            .ok_or(StoreError::NotFound)?;
        changes.apply(resume);
        resume.updated_at = Utc::now();
        Ok(resume.clone())
    }

    async fn delete_resume(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.resumes.get(&id) {
            Some(r) if r.user_id == user_id => {
                tables.resumes.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ResumeSections, TemplateId, DEFAULT_ACCENT_COLOR};
    use crate::models::user::CREDENTIAL_PROVIDER;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            email_verified: false,
            password_hash: Some("hash".to_string()),
            image: None,
        }
    }

    fn credential() -> NewAccount {
        NewAccount {
            provider_id: CREDENTIAL_PROVIDER.to_string(),
            account_id: None,
            scope: None,
        }
    }

    fn new_resume(user_id: Uuid, title: &str) -> NewResume {
        NewResume {
            user_id,
            title: title.to_string(),
            template: TemplateId::Classic,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            sections: ResumeSections::default(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict_case_insensitive() {
        let store = MemoryStore::new();
        store
            .create_user_with_account(new_user("ada@example.com"), credential())
            .await
            .unwrap();
        let err = store
            .create_user_with_account(new_user("ADA@example.com"), credential())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.tables.read().await.users.len(), 1);
    }

    #[tokio::test]
    async fn test_credential_account_id_is_user_id() {
        let store = MemoryStore::new();
        let (user, account) = store
            .create_user_with_account(new_user("ada@example.com"), credential())
            .await
            .unwrap();
        assert_eq!(account.account_id, user.id.to_string());
        assert_eq!(store.list_accounts(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_linked_provider_account_keeps_scope_only() {
        let store = MemoryStore::new();
        let (user, _) = store
            .create_user_with_account(new_user("ada@example.com"), credential())
            .await
            .unwrap();
        let linked = store
            .link_account(
                user.id,
                NewAccount {
                    provider_id: "github".to_string(),
                    account_id: Some("42".to_string()),
                    scope: Some("read:user user:email".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(linked.scope.as_deref(), Some("read:user user:email"));

        let found = store.find_account("github", "42").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        let json = serde_json::to_value(&found).unwrap();
        assert!(json.get("access_token").is_none());
        assert!(json.get("refresh_token").is_none());
    }

    #[tokio::test]
    async fn test_verification_is_single_use() {
        let store = MemoryStore::new();
        let expires = Utc::now() + chrono::Duration::minutes(5);
        store.create_verification("k", "v", expires).await.unwrap();
        assert!(store.take_verification("k").await.unwrap().is_some());
        assert!(store.take_verification("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resumes_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let (owner, _) = store
            .create_user_with_account(new_user("a@example.com"), credential())
            .await
            .unwrap();
        let (other, _) = store
            .create_user_with_account(new_user("b@example.com"), credential())
            .await
            .unwrap();
        let resume = store.create_resume(new_resume(owner.id, "Mine")).await.unwrap();

        assert!(store.get_resume(other.id, resume.id).await.unwrap().is_none());
        assert!(!store.delete_resume(other.id, resume.id).await.unwrap());
        let err = store
            .update_resume(other.id, resume.id, ResumeChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.delete_resume(owner.id, resume.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_resumes_search_and_order() {
        let store = MemoryStore::new();
        let (owner, _) = store
            .create_user_with_account(new_user("a@example.com"), credential())
            .await
            .unwrap();
        let first = store
            .create_resume(new_resume(owner.id, "Backend Engineer"))
            .await
            .unwrap();
        store
            .create_resume(new_resume(owner.id, "Designer"))
            .await
            .unwrap();
        store
            .update_resume(owner.id, first.id, ResumeChanges::default())
            .await
            .unwrap();

        let all = store.list_resumes(owner.id, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);

        let found = store.list_resumes(owner.id, Some("backend")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Backend Engineer");
    }
}
