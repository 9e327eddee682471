//! [`UserResourceClient`] backed by a LiteLLM proxy.

use async_trait::async_trait;
use litellm_user_sdk::{
    UserAttributes, UserId, UserRecord, UserResourceClient, UserResourceError, UserState,
};
use serde_json::Value;

use super::consistency::{ConsistencyPolicy, read_after_create};
use super::payload::{delete_payload, user_payload};
use crate::config::{ConfigError, ProviderConfig};
use crate::infra::client::{CREATE_PATH, DELETE_PATH, LiteLlmClient, UPDATE_PATH};
use crate::infra::wire::{UserInfo, decode_user_info};

const CREATING: &str = "creating user";
const READING: &str = "reading user";
const UPDATING: &str = "updating user";
const DELETING: &str = "deleting user";

/// Stateless adapter; the caller owns every [`UserState`].
///
/// Clones share one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct LiteLlmUserClient {
    client: LiteLlmClient,
    consistency: ConsistencyPolicy,
}

impl LiteLlmUserClient {
    #[must_use]
    pub fn new(client: LiteLlmClient, consistency: ConsistencyPolicy) -> Self {
        Self {
            client,
            consistency,
        }
    }

    /// Build an adapter from provider settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid settings.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let consistency = config.consistency.policy()?;
        let client = LiteLlmClient::from_config(config)?;
        Ok(Self::new(client, consistency))
    }

    #[must_use]
    pub fn consistency(&self) -> ConsistencyPolicy {
        self.consistency
    }
}

#[async_trait]
impl UserResourceClient for LiteLlmUserClient {
    async fn create(&self, desired: &UserAttributes) -> Result<UserState, UserResourceError> {
        let id = UserId::generate();
        let body = user_payload(&id, desired);
        let payload = Value::Object(body.clone());
        tracing::debug!(user_id = %id, payload = %payload, "create user request");

        self.client
            .post_json(CREATE_PATH, &body, CREATING, None)
            .await?;
        tracing::info!(user_id = %id, "user created");

        let record = read_after_create(self.consistency, &id, || self.read(&id)).await?;

        let mut attributes = desired.clone();
        attributes.merge_record(&record);
        Ok(UserState::new(id, attributes))
    }

    async fn read(&self, id: &UserId) -> Result<UserRecord, UserResourceError> {
        tracing::debug!(user_id = %id, "reading user");
        let body = self.client.user_info(id, READING).await?;
        match decode_user_info(&body) {
            Ok(UserInfo::Found(record)) => Ok(record),
            Ok(UserInfo::Missing) => Err(UserResourceError::NotFound {
                user_id: id.to_string(),
            }),
            Err(message) => Err(UserResourceError::Decode {
                operation: READING,
                message,
            }),
        }
    }

    async fn update(
        &self,
        id: &UserId,
        desired: &UserAttributes,
    ) -> Result<UserState, UserResourceError> {
        let body = user_payload(id, desired);
        let payload = Value::Object(body.clone());
        tracing::debug!(user_id = %id, payload = %payload, "update user request");

        self.client
            .post_json(UPDATE_PATH, &body, UPDATING, None)
            .await?;
        tracing::info!(user_id = %id, "user updated");

        let record = self.read(id).await?;
        let mut attributes = desired.clone();
        attributes.merge_record(&record);
        Ok(UserState::new(id.clone(), attributes))
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserResourceError> {
        self.client
            .post_json(DELETE_PATH, &delete_payload(id), DELETING, Some(id))
            .await?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn import(&self, id: &UserId) -> Result<UserState, UserResourceError> {
        let record = self.read(id).await?;
        let Some(role) = record.user_role else {
            return Err(UserResourceError::Decode {
                operation: READING,
                message: "proxy did not report user_role".to_owned(),
            });
        };

        let mut attributes = UserAttributes::new(role);
        attributes.merge_record(&record);
        tracing::info!(user_id = %id, "user imported");
        Ok(UserState::new(id.clone(), attributes))
    }
}
