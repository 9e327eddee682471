//! LiteLLM user resource SDK
//!
//! Public surface of the `user` resource:
//!
//! - [`UserResourceClient`] - lifecycle operations (create, read, update,
//!   delete, import) against a LiteLLM proxy
//! - [`UserAttributes`], [`UserRecord`], [`UserState`] - desired state, the
//!   server's view, and the caller-owned tracked state
//! - [`UserResourceError`] - error taxonomy, with not-found kept distinct
//!
//! ## Usage
//!
//! ```ignore
//! use litellm_user_sdk::{UserAttributes, UserResourceClient, UserRole};
//!
//! let mut desired = UserAttributes::new(UserRole::InternalUser);
//! desired.max_budget = Some(100.0);
//! desired.models = Some(vec!["gpt-4".to_owned()]);
//!
//! let mut state = client.create(&desired).await?;
//! client.refresh(&mut state).await?;
//! if !state.is_tracked() {
//!     // deleted out of band
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::UserResourceClient;
pub use error::UserResourceError;
pub use models::{UserAttributes, UserId, UserRecord, UserRole, UserState};
