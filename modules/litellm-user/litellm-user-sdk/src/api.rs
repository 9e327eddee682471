//! Public API trait for the user resource.

use async_trait::async_trait;

use crate::error::UserResourceError;
use crate::models::{UserAttributes, UserId, UserRecord, UserState};

/// Lifecycle operations for a LiteLLM proxy user.
///
/// Implementations hold no per-resource state: the caller owns the
/// [`UserState`] and persists it between calls.
#[async_trait]
pub trait UserResourceClient: Send + Sync {
    /// Create a user with a freshly generated identifier.
    ///
    /// Returns the tracked state with attributes merged from the proxy's
    /// view of the new user.
    ///
    /// # Errors
    ///
    /// - `Transport`, `Api` if the create call fails (nothing was created)
    /// - `PostCreateRead`, `PostCreateReadTimeout` if the user was created
    ///   but could not be read back
    async fn create(&self, desired: &UserAttributes) -> Result<UserState, UserResourceError>;

    /// Fetch the proxy's view of a user.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the proxy does not know the user
    /// - `Transport`, `Api`, `Decode` otherwise
    async fn read(&self, id: &UserId) -> Result<UserRecord, UserResourceError>;

    /// Send the full desired state for an existing user and read it back.
    ///
    /// # Errors
    ///
    /// - `Transport`, `Api` if the update call fails
    /// - `NotFound` if the user is gone when read back
    async fn update(
        &self,
        id: &UserId,
        desired: &UserAttributes,
    ) -> Result<UserState, UserResourceError>;

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the proxy answers 404
    /// - `Transport`, `Api` otherwise; the user must be considered live
    async fn delete(&self, id: &UserId) -> Result<(), UserResourceError>;

    /// Adopt a user that already exists on the proxy.
    ///
    /// # Errors
    ///
    /// - `NotFound` if there is nothing to adopt
    /// - `Decode` if the proxy does not report a role for the user
    async fn import(&self, id: &UserId) -> Result<UserState, UserResourceError>;

    /// Re-read a tracked user into `state`.
    ///
    /// A user missing on the proxy is not an error: the state's identifier
    /// is cleared so the caller drops it. Untracked state is left as is.
    ///
    /// # Errors
    ///
    /// `Transport`, `Api`, `Decode` from [`read`](Self::read).
    async fn refresh(&self, state: &mut UserState) -> Result<(), UserResourceError> {
        let Some(id) = state.id.clone() else {
            return Ok(());
        };
        match self.read(&id).await {
            Ok(record) => {
                state.attributes.merge_record(&record);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(user_id = %id, "user not found, removing from state");
                state.clear_id();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
