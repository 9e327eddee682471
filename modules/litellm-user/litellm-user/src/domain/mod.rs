pub mod consistency;
pub mod fields;
pub mod local_client;
pub mod payload;
