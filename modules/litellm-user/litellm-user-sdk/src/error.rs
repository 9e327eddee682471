//! Error types for the LiteLLM user resource.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`UserResourceClient`](crate::UserResourceClient).
///
/// `operation` is a lowercase label such as `"creating user"`; it is part
/// of every message so failures read as `error creating user: ...`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UserResourceError {
    /// The request could not be sent or the response could not be read.
    #[error("error {operation}: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// The proxy answered with a non-success status.
    #[error("error {operation}: HTTP {status}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("error decoding {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// The user does not exist on the proxy.
    #[error("user not found: {user_id}")]
    NotFound { user_id: String },

    /// `user_role` is not one of the roles the proxy accepts.
    #[error("invalid user_role {value:?}: expected one of {expected}")]
    InvalidRole { value: String, expected: String },

    /// A user identifier was empty.
    #[error("user id must not be empty")]
    InvalidUserId,

    /// The user was created but reading it back failed.
    ///
    /// The user exists remotely; `user_id` identifies it.
    #[error("user {user_id} was created but could not be read back: {message}")]
    PostCreateRead { user_id: String, message: String },

    /// The user was created but never became readable within the wait budget.
    #[error("user {user_id} was created but was not readable after {waited:?}")]
    PostCreateReadTimeout { user_id: String, waited: Duration },
}

impl UserResourceError {
    /// `true` when the target user does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Identifier of a user that exists remotely even though the operation
    /// failed (a create whose follow-up read did not succeed).
    #[must_use]
    pub fn orphaned_user_id(&self) -> Option<&str> {
        match self {
            Self::PostCreateRead { user_id, .. } | Self::PostCreateReadTimeout { user_id, .. } => {
                Some(user_id)
            }
            _ => None,
        }
    }
}
