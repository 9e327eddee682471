//! Public models for the user resource.
//!
//! Field names here are the declarative attribute names. The JSON keys the
//! proxy uses on the wire are mapped in the adapter crate and may differ.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UserResourceError;

/// Identifier of a user on the proxy.
///
/// Users created through this resource get a random UUIDv4. Imported users
/// keep whatever non-empty identifier the proxy already uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserResourceError::InvalidUserId`] for an empty or
    /// whitespace-only value.
    pub fn new(value: impl Into<String>) -> Result<Self, UserResourceError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserResourceError::InvalidUserId);
        }
        Ok(Self(value))
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Role assigned to a proxy user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    ProxyAdmin,
    ProxyAdminViewer,
    InternalUser,
    InternalUserViewer,
    Team,
    Customer,
}

impl UserRole {
    pub const ALL: [UserRole; 6] = [
        UserRole::ProxyAdmin,
        UserRole::ProxyAdminViewer,
        UserRole::InternalUser,
        UserRole::InternalUserViewer,
        UserRole::Team,
        UserRole::Customer,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::ProxyAdmin => "proxy_admin",
            UserRole::ProxyAdminViewer => "proxy_admin_viewer",
            UserRole::InternalUser => "internal_user",
            UserRole::InternalUserViewer => "internal_user_viewer",
            UserRole::Team => "team",
            UserRole::Customer => "customer",
        }
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserResourceError;

    /// Case-sensitive match against the accepted role names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UserResourceError::InvalidRole {
                value: s.to_owned(),
                expected: Self::expected(),
            })
    }
}

/// Desired attributes of a user, as declared by the caller.
///
/// Every optional field left as `None` is omitted from write payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    pub user_role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_user_invite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,
}

impl UserAttributes {
    /// Attributes with only the required role set.
    #[must_use]
    pub fn new(user_role: UserRole) -> Self {
        Self {
            user_email: None,
            user_alias: None,
            key_alias: None,
            user_role,
            max_budget: None,
            models: None,
            tpm_limit: None,
            rpm_limit: None,
            auto_create_key: None,
            send_user_invite: None,
            teams: None,
        }
    }

    /// Overwrite every field the proxy reports with the proxy's value.
    ///
    /// Fields the proxy does not echo back (`key_alias`) keep their current
    /// value. The role is only replaced when the proxy reports one.
    pub fn merge_record(&mut self, record: &UserRecord) {
        self.user_email.clone_from(&record.user_email);
        self.user_alias.clone_from(&record.user_alias);
        if let Some(role) = record.user_role {
            self.user_role = role;
        }
        self.max_budget = record.max_budget;
        self.models.clone_from(&record.models);
        self.tpm_limit = record.tpm_limit;
        self.rpm_limit = record.rpm_limit;
        self.auto_create_key = record.auto_create_key;
        self.send_user_invite = record.send_user_invite;
        self.teams.clone_from(&record.teams);
    }
}

/// A user as reported by the proxy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_alias: Option<String>,
    pub user_role: Option<UserRole>,
    pub max_budget: Option<f64>,
    pub models: Option<Vec<String>>,
    pub tpm_limit: Option<i64>,
    pub rpm_limit: Option<i64>,
    pub auto_create_key: Option<bool>,
    pub send_user_invite: Option<bool>,
    pub teams: Option<Vec<String>>,
}

/// Caller-owned tracked state of one user resource.
///
/// `id == None` means the resource is not tracked: never created, deleted,
/// or found missing on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub id: Option<UserId>,
    pub attributes: UserAttributes,
}

impl UserState {
    #[must_use]
    pub fn new(id: UserId, attributes: UserAttributes) -> Self {
        Self {
            id: Some(id),
            attributes,
        }
    }

    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.id.is_some()
    }

    /// Forget the identifier; the resource becomes untracked.
    pub fn clear_id(&mut self) {
        self.id = None;
    }
}
