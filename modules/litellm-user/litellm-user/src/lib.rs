#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! LiteLLM user resource.
//!
//! Maps declarative [`UserAttributes`](litellm_user_sdk::UserAttributes)
//! onto the proxy's `/user/new`, `/user/info`, `/user/update` and
//! `/user/delete` endpoints. The adapter is stateless: callers persist the
//! returned [`UserState`](litellm_user_sdk::UserState) themselves.
//!
//! ```ignore
//! let config = ProviderConfig::new("https://litellm.example.com".parse()?)
//!     .with_api_key("sk-1234");
//! let users = LiteLlmUserClient::from_config(&config)?;
//! let state = users.create(&UserAttributes::new(UserRole::InternalUser)).await?;
//! ```

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{ConfigError, ConsistencyConfig, ConsistencyMode, ProviderConfig, SecretString};
pub use domain::consistency::ConsistencyPolicy;
pub use domain::fields::{Direction, UserField};
pub use domain::local_client::LiteLlmUserClient;
pub use infra::client::LiteLlmClient;
