// Account domain types
//
// These types represent a credentialed identity and its roles.
// Used by the account service, the storage backends and the authenticator.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::validation::ValidationErrors;

/// Authorization role held by an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    Admin,
    User,
}

impl AccountRole {
    /// Authority string handed to authorization checks
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Admin => write!(f, "ADMIN"),
            AccountRole::User => write!(f, "USER"),
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(AccountRole::Admin),
            "USER" => Ok(AccountRole::User),
            other => Err(format!("unknown account role: {}", other)),
        }
    }
}

/// Stored account. `password` is the encoded credential, never cleartext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub roles: BTreeSet<AccountRole>,
    pub created_at: DateTime<Utc>,
}

/// Account as written to storage, after the password has been encoded
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<AccountRole>,
}

/// Input for registering an account.
///
/// Build it with [`NewAccount::new`], which rejects malformed input before
/// anything reaches the password encoder or storage.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub roles: BTreeSet<AccountRole>,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is a valid regex")
    })
}

impl NewAccount {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        roles: impl IntoIterator<Item = AccountRole>,
    ) -> Result<Self, ValidationErrors> {
        let account = Self {
            email: email.into().trim().to_string(),
            password: password.into(),
            roles: roles.into_iter().collect(),
        };

        let mut errors = ValidationErrors::new();
        if account.email.is_empty() {
            errors.add("email", "required", "email is required");
        } else if !email_regex().is_match(&account.email) {
            errors.add("email", "invalid_format", "email must look like user@host");
        }
        if account.password.is_empty() {
            errors.add("password", "required", "password is required");
        }
        if account.roles.is_empty() {
            errors.add("roles", "required", "at least one role is required");
        }

        errors.into_result(account)
    }
}

/// Read-only view of an account handed to authenticators
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccountDetails {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: BTreeSet<AccountRole>,
}

impl AccountDetails {
    /// Authority strings, e.g. `ROLE_ADMIN`
    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(AccountRole::authority).collect()
    }

    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }
}

impl From<Account> for AccountDetails {
    fn from(account: Account) -> Self {
        Self {
            username: account.email,
            password: account.password,
            roles: account.roles,
        }
    }
}
