// Account service for registration and authentication lookups
// Decision: Credentials are Argon2id-hashed on save and compared with the encoder
// Decision: Duplicate emails are rejected, never overwritten

use async_trait::async_trait;
use eventdesk_core::{
    Account, AccountDetails, AccountLookup, AccountRecord, AccountRole, AccountStore,
    DomainError, NewAccount, PasswordEncoder, Result,
};
use std::sync::{Arc, OnceLock};

/// Generic message for failed authentication, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    encoder: Arc<dyn PasswordEncoder>,
    // Compared against on unknown usernames so both failure paths hash once
    dummy_hash: OnceLock<String>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            store,
            encoder,
            dummy_hash: OnceLock::new(),
        }
    }

    fn burn_password_check(&self, password: &str) {
        let hash = self.dummy_hash.get_or_init(|| {
            self.encoder
                .encode("eventdesk-unknown-account")
                .unwrap_or_default()
        });
        let _ = self.encoder.matches(password, hash);
    }

    /// Encode the password and persist the account keyed by email
    pub async fn save_account(&self, input: NewAccount) -> Result<Account> {
        let password_hash = self.encoder.encode(&input.password)?;
        let record = AccountRecord {
            email: input.email,
            password_hash,
            roles: input.roles,
        };
        let account = self.store.save_account(record).await?;
        tracing::info!(email = %account.email, roles = ?account.roles, "Account saved");
        Ok(account)
    }

    /// Resolve the account and compare the offered password with the stored hash.
    /// Unknown accounts and wrong passwords fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AccountDetails> {
        let details = match self.load_by_username(username).await {
            Ok(details) => details,
            Err(DomainError::NotFound(_)) => {
                self.burn_password_check(password);
                tracing::debug!(email = %username, "Authentication failed: unknown account");
                return Err(DomainError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
            }
            Err(e) => return Err(e),
        };

        if !self.encoder.matches(password, &details.password) {
            tracing::debug!(email = %username, "Authentication failed: password mismatch");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        Ok(details)
    }

    /// Create the configured admin account unless it already exists.
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool> {
        if self.store.find_by_email(email).await?.is_some() {
            return Ok(false);
        }
        let input = NewAccount::new(email, password, [AccountRole::Admin, AccountRole::User])?;
        match self.save_account(input).await {
            Ok(_) => Ok(true),
            // Another instance seeded it first
            Err(DomainError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl AccountLookup for AccountService {
    async fn load_by_username(&self, username: &str) -> Result<AccountDetails> {
        self.store
            .find_by_email(username)
            .await?
            .map(AccountDetails::from)
            .ok_or_else(|| DomainError::account_not_found(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Argon2PasswordEncoder, StorageBackend};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(StorageBackend::in_memory()),
            Arc::new(Argon2PasswordEncoder),
        )
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let service = service();
        let user_name = "jinSeok@test.com";
        let password = "jinSeok";

        let account = NewAccount::new(
            user_name,
            password,
            [AccountRole::Admin, AccountRole::User],
        )
        .unwrap();
        service.save_account(account).await.unwrap();

        let details = service.load_by_username(user_name).await.unwrap();

        assert_eq!(details.username, user_name);
        assert_ne!(details.password, password);
        assert!(Argon2PasswordEncoder.matches(password, &details.password));
        assert!(details.has_role(AccountRole::Admin));
        assert!(details.has_role(AccountRole::User));
    }

    #[tokio::test]
    async fn test_find_by_username_fail() {
        let user_name = "jinSeok@test.com";

        let err = service().load_by_username(user_name).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(err.to_string().contains(user_name));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let service = service();
        let first = NewAccount::new("a@test.com", "one", [AccountRole::User]).unwrap();
        let second = NewAccount::new("a@test.com", "two", [AccountRole::Admin]).unwrap();

        service.save_account(first).await.unwrap();
        let err = service.save_account(second).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Original credential still authenticates
        assert!(service.authenticate("a@test.com", "one").await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = service();
        let account = NewAccount::new("a@test.com", "secret", [AccountRole::User]).unwrap();
        service.save_account(account).await.unwrap();

        let details = service.authenticate("a@test.com", "secret").await.unwrap();
        assert_eq!(details.authorities(), vec!["ROLE_USER".to_string()]);

        let wrong = service.authenticate("a@test.com", "nope").await.unwrap_err();
        let unknown = service.authenticate("b@test.com", "secret").await.unwrap_err();
        assert!(matches!(wrong, DomainError::Unauthorized(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    /// Encoder that counts hash comparisons
    #[derive(Default)]
    struct CountingEncoder {
        matches_calls: AtomicUsize,
    }

    impl PasswordEncoder for CountingEncoder {
        fn encode(&self, plain: &str) -> Result<String> {
            Ok(format!("counted:{}", plain))
        }

        fn matches(&self, plain: &str, encoded: &str) -> bool {
            self.matches_calls.fetch_add(1, Ordering::SeqCst);
            encoded == format!("counted:{}", plain)
        }
    }

    #[tokio::test]
    async fn test_unknown_account_still_compares_password() {
        let encoder = Arc::new(CountingEncoder::default());
        let service = AccountService::new(Arc::new(StorageBackend::in_memory()), encoder.clone());
        let account = NewAccount::new("a@test.com", "secret", [AccountRole::User]).unwrap();
        service.save_account(account).await.unwrap();

        let unknown = service.authenticate("b@test.com", "secret").await.unwrap_err();
        assert!(matches!(unknown, DomainError::Unauthorized(_)));
        assert_eq!(encoder.matches_calls.load(Ordering::SeqCst), 1);

        // The placeholder hash never authenticates anyone
        let unknown = service
            .authenticate("c@test.com", "eventdesk-unknown-account")
            .await
            .unwrap_err();
        assert!(matches!(unknown, DomainError::Unauthorized(_)));
        assert_eq!(encoder.matches_calls.load(Ordering::SeqCst), 2);

        service.authenticate("a@test.com", "secret").await.unwrap();
        assert_eq!(encoder.matches_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let service = service();
        assert!(service.ensure_admin("admin@test.com", "pw").await.unwrap());
        assert!(!service.ensure_admin("admin@test.com", "other").await.unwrap());

        let details = service.authenticate("admin@test.com", "pw").await.unwrap();
        assert!(details.has_role(AccountRole::Admin));
    }
}
