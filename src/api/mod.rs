/// Public API for talking to a Lacus instance.
pub mod client;
pub mod errors;
pub mod instance;
pub mod monitoring;

pub use client::LacusClient;
pub use errors::{LacusError, Result};
pub use instance::{DEFAULT_TIMEOUT, InstanceConfig, default_user_agent};
