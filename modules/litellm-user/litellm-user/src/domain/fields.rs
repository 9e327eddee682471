//! Mapping between user attribute names and the proxy's JSON keys.
//!
//! Every place that reads or writes a user field on the wire goes through
//! [`UserField`]; no other module spells out wire names.

use litellm_user_sdk::{UserAttributes, UserRecord, UserRole};
use serde_json::Value;

/// JSON key of the user identifier in requests and responses.
pub const USER_ID: &str = "user_id";

/// JSON key of the identifier list in delete requests.
pub const USER_IDS: &str = "user_ids";

/// JSON key of the nested user object in info responses.
pub const USER_INFO: &str = "user_info";

/// JSON key of a team's identifier inside a team object.
pub const TEAM_ID: &str = "team_id";

/// Which way a field travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ReadWrite,
    /// Sent on create/update, never echoed back.
    WriteOnly,
    /// Reported by the proxy, never sent.
    ReadOnly,
}

impl Direction {
    #[must_use]
    pub fn is_written(self) -> bool {
        matches!(self, Direction::ReadWrite | Direction::WriteOnly)
    }

    #[must_use]
    pub fn is_read(self) -> bool {
        matches!(self, Direction::ReadWrite | Direction::ReadOnly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    UserEmail,
    UserAlias,
    KeyAlias,
    UserRole,
    MaxBudget,
    Models,
    TpmLimit,
    RpmLimit,
    AutoCreateKey,
    SendUserInvite,
    Teams,
}

impl UserField {
    pub const ALL: [UserField; 11] = [
        UserField::UserEmail,
        UserField::UserAlias,
        UserField::KeyAlias,
        UserField::UserRole,
        UserField::MaxBudget,
        UserField::Models,
        UserField::TpmLimit,
        UserField::RpmLimit,
        UserField::AutoCreateKey,
        UserField::SendUserInvite,
        UserField::Teams,
    ];

    /// Declarative attribute name.
    #[must_use]
    pub fn attribute(self) -> &'static str {
        match self {
            UserField::UserEmail => "user_email",
            UserField::UserAlias => "user_alias",
            UserField::KeyAlias => "key_alias",
            UserField::UserRole => "user_role",
            UserField::MaxBudget => "max_budget",
            UserField::Models => "models",
            UserField::TpmLimit => "tpm_limit",
            UserField::RpmLimit => "rpm_limit",
            UserField::AutoCreateKey => "auto_create_key",
            UserField::SendUserInvite => "send_user_invite",
            UserField::Teams => "teams",
        }
    }

    /// JSON key used by the proxy.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            UserField::AutoCreateKey => "auto_create_keys",
            UserField::SendUserInvite => "send_email_invite",
            other => other.attribute(),
        }
    }

    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            UserField::KeyAlias => Direction::WriteOnly,
            UserField::Teams => Direction::ReadOnly,
            _ => Direction::ReadWrite,
        }
    }

    /// Fields included in create/update payloads.
    pub fn written() -> impl Iterator<Item = UserField> {
        Self::ALL.into_iter().filter(|f| f.direction().is_written())
    }

    /// Fields decoded from info responses.
    pub fn read() -> impl Iterator<Item = UserField> {
        Self::ALL.into_iter().filter(|f| f.direction().is_read())
    }

    /// JSON value of this field in `attrs`, `None` when unset.
    #[must_use]
    pub fn value_of(self, attrs: &UserAttributes) -> Option<Value> {
        match self {
            UserField::UserEmail => attrs.user_email.clone().map(Value::from),
            UserField::UserAlias => attrs.user_alias.clone().map(Value::from),
            UserField::KeyAlias => attrs.key_alias.clone().map(Value::from),
            UserField::UserRole => Some(Value::from(attrs.user_role.as_str())),
            UserField::MaxBudget => attrs.max_budget.map(Value::from),
            UserField::Models => attrs.models.clone().map(Value::from),
            UserField::TpmLimit => attrs.tpm_limit.map(Value::from),
            UserField::RpmLimit => attrs.rpm_limit.map(Value::from),
            UserField::AutoCreateKey => attrs.auto_create_key.map(Value::from),
            UserField::SendUserInvite => attrs.send_user_invite.map(Value::from),
            UserField::Teams => attrs.teams.clone().map(Value::from),
        }
    }

    /// Store a decoded JSON value into `record`.
    ///
    /// `null` leaves the field unset.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch when `value` has the wrong
    /// JSON type for this field, or names an unknown role.
    pub fn assign(self, record: &mut UserRecord, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            UserField::UserEmail => record.user_email = Some(self.expect_str(value)?),
            UserField::UserAlias => record.user_alias = Some(self.expect_str(value)?),
            // never reported by the proxy; ignore if it ever shows up
            UserField::KeyAlias => {}
            UserField::UserRole => {
                let raw = self.expect_str(value)?;
                let role = raw.parse::<UserRole>().map_err(|e| e.to_string())?;
                record.user_role = Some(role);
            }
            UserField::MaxBudget => {
                record.max_budget = Some(value.as_f64().ok_or_else(|| self.mismatch("number"))?);
            }
            UserField::Models => record.models = Some(self.expect_str_list(value)?),
            UserField::TpmLimit => record.tpm_limit = Some(self.expect_int(value)?),
            UserField::RpmLimit => record.rpm_limit = Some(self.expect_int(value)?),
            UserField::AutoCreateKey => record.auto_create_key = Some(self.expect_bool(value)?),
            UserField::SendUserInvite => {
                record.send_user_invite = Some(self.expect_bool(value)?);
            }
            UserField::Teams => record.teams = Some(self.expect_str_list(value)?),
        }
        Ok(())
    }

    fn mismatch(self, expected: &str) -> String {
        format!("field `{}`: expected {expected}", self.wire_name())
    }

    fn expect_str(self, value: &Value) -> Result<String, String> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.mismatch("string"))
    }

    fn expect_bool(self, value: &Value) -> Result<bool, String> {
        value.as_bool().ok_or_else(|| self.mismatch("boolean"))
    }

    fn expect_int(self, value: &Value) -> Result<i64, String> {
        value.as_i64().ok_or_else(|| self.mismatch("integer"))
    }

    fn expect_str_list(self, value: &Value) -> Result<Vec<String>, String> {
        let items = value
            .as_array()
            .ok_or_else(|| self.mismatch("array of strings"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| self.mismatch("array of strings"))
            })
            .collect()
    }
}
