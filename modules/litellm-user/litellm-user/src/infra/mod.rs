pub mod client;
pub mod http_error;
pub mod wire;
