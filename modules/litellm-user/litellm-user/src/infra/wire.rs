//! Decoding `/user/info` responses.
//!
//! The proxy answers with an envelope:
//!
//! ```json
//! {"user_id": "...", "user_info": {...} | null, "keys": [...], "teams": [...]}
//! ```
//!
//! `user_info: null` means the user does not exist. An empty `user_info`
//! object is what the proxy returns for a user it has not finished creating,
//! so it is treated the same way. Team membership is read
//! from `user_info.teams` when present, otherwise from the envelope's
//! `teams` list (team objects or bare identifiers).

use litellm_user_sdk::UserRecord;
use serde_json::{Map, Value};

use crate::domain::fields::{TEAM_ID, USER_ID, USER_INFO, UserField};

/// Result of decoding an info response.
#[derive(Debug, Clone, PartialEq)]
pub enum UserInfo {
    Found(UserRecord),
    Missing,
}

/// Decode the envelope.
///
/// # Errors
///
/// Returns a description of the first malformed field.
pub fn decode_user_info(body: &Value) -> Result<UserInfo, String> {
    let envelope = body
        .as_object()
        .ok_or_else(|| "expected a JSON object".to_owned())?;

    let info = match envelope.get(USER_INFO) {
        None | Some(Value::Null) => return Ok(UserInfo::Missing),
        Some(Value::Object(info)) if info.is_empty() => return Ok(UserInfo::Missing),
        Some(Value::Object(info)) => info,
        Some(_) => return Err(format!("field `{USER_INFO}`: expected object")),
    };

    let mut record = UserRecord {
        user_id: string_field(info, USER_ID).or_else(|| string_field(envelope, USER_ID)),
        ..UserRecord::default()
    };

    for field in UserField::read() {
        // older proxies echo some flags under the attribute name
        let raw = info
            .get(field.wire_name())
            .or_else(|| info.get(field.attribute()));
        if let Some(value) = raw {
            field.assign(&mut record, value)?;
        }
    }

    if record.teams.is_none() {
        record.teams = envelope_teams(envelope)?;
    }

    Ok(UserInfo::Found(record))
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn envelope_teams(envelope: &Map<String, Value>) -> Result<Option<Vec<String>>, String> {
    let key = UserField::Teams.wire_name();
    let Some(value) = envelope.get(key) else {
        return Ok(None);
    };
    let Some(items) = value.as_array() else {
        return if value.is_null() {
            Ok(None)
        } else {
            Err(format!("field `{key}`: expected array"))
        };
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(id) => Ok(id.clone()),
            Value::Object(team) => string_field(team, TEAM_ID)
                .ok_or_else(|| format!("field `{key}`: team without `{TEAM_ID}`")),
            _ => Err(format!("field `{key}`: expected team objects or ids")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use litellm_user_sdk::UserRole;
    use serde_json::json;

    fn found(body: &Value) -> UserRecord {
        match decode_user_info(body).unwrap() {
            UserInfo::Found(record) => record,
            UserInfo::Missing => panic!("expected a user"),
        }
    }

    #[test]
    fn decodes_full_user() {
        let record = found(&json!({
            "user_id": "u-1",
            "user_info": {
                "user_id": "u-1",
                "user_email": "a@example.com",
                "user_alias": "alice",
                "user_role": "internal_user",
                "max_budget": 10.5,
                "models": ["gpt-4o"],
                "tpm_limit": 100,
                "rpm_limit": 5,
                "auto_create_keys": true,
                "send_email_invite": false,
                "spend": 0.0,
                "teams": ["t-1"]
            },
            "keys": []
        }));

        assert_eq!(record.user_id.as_deref(), Some("u-1"));
        assert_eq!(record.user_email.as_deref(), Some("a@example.com"));
        assert_eq!(record.user_role, Some(UserRole::InternalUser));
        assert_eq!(record.max_budget, Some(10.5));
        assert_eq!(record.tpm_limit, Some(100));
        assert_eq!(record.auto_create_key, Some(true));
        assert_eq!(record.send_user_invite, Some(false));
        assert_eq!(record.teams, Some(vec!["t-1".to_owned()]));
    }

    #[test]
    fn accepts_attribute_names_for_flags() {
        let record = found(&json!({
            "user_info": {"auto_create_key": false, "send_user_invite": true}
        }));
        assert_eq!(record.auto_create_key, Some(false));
        assert_eq!(record.send_user_invite, Some(true));
    }

    #[test]
    fn null_user_info_is_missing() {
        assert_eq!(
            decode_user_info(&json!({"user_id": "u-1", "user_info": null})).unwrap(),
            UserInfo::Missing
        );
        assert_eq!(decode_user_info(&json!({})).unwrap(), UserInfo::Missing);
    }

    #[test]
    fn empty_user_info_is_missing_despite_envelope() {
        let body = json!({"user_id": "u-1", "user_info": {}, "keys": [], "teams": []});
        assert_eq!(decode_user_info(&body).unwrap(), UserInfo::Missing);
    }

    #[test]
    fn teams_fall_back_to_envelope() {
        let record = found(&json!({
            "user_id": "u-1",
            "user_info": {"user_role": "team"},
            "teams": [{"team_id": "t-1", "team_alias": "one"}, "t-2"]
        }));
        assert_eq!(record.user_id.as_deref(), Some("u-1"));
        assert_eq!(record.teams, Some(vec!["t-1".to_owned(), "t-2".to_owned()]));
    }

    #[test]
    fn nested_teams_win_over_envelope() {
        let record = found(&json!({
            "user_info": {"teams": []},
            "teams": [{"team_id": "t-1"}]
        }));
        assert_eq!(record.teams, Some(vec![]));
    }

    #[test]
    fn null_fields_stay_unset() {
        let record = found(&json!({
            "user_info": {"user_role": "team", "user_email": null, "max_budget": null}
        }));
        assert_eq!(record.user_email, None);
        assert_eq!(record.max_budget, None);
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert!(decode_user_info(&json!([])).is_err());
        assert!(decode_user_info(&json!({"user_info": "nope"})).is_err());
        assert!(decode_user_info(&json!({"user_info": {"tpm_limit": "x"}})).is_err());
        assert!(decode_user_info(&json!({"user_info": {"user_role": "team"}, "teams": [{"id": 1}]})).is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = decode_user_info(&json!({"user_info": {"user_role": "root"}})).unwrap_err();
        assert!(err.contains("root"));
    }
}
