//! Request bodies for the user endpoints.

use litellm_user_sdk::{UserAttributes, UserId};
use serde_json::{Map, Value};

use super::fields::{USER_ID, USER_IDS, UserField};

/// Body for `/user/new` and `/user/update`.
///
/// Always carries `user_id` and `user_role`; every other writable field is
/// included only when set. `false` and `0` count as set.
#[must_use]
pub fn user_payload(id: &UserId, attrs: &UserAttributes) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(USER_ID.to_owned(), Value::from(id.as_str()));
    for field in UserField::written() {
        if let Some(value) = field.value_of(attrs) {
            body.insert(field.wire_name().to_owned(), value);
        }
    }
    body
}

/// Body for `/user/delete`.
#[must_use]
pub fn delete_payload(id: &UserId) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(USER_IDS.to_owned(), Value::from(vec![id.as_str()]));
    body
}
