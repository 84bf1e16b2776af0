//! vault-login - one-shot credential relay for HashiCorp Vault
//!
//! Logs in to Vault with a configured auth method, hands the issued client
//! token to a configured output, and revokes it again if delivery fails.

pub mod app;
pub mod auth;
pub mod error;
pub mod settings;
pub mod sink;
pub mod source;
pub mod token;

pub use app::{App, run};
pub use error::{ConfigError, RelayError};
pub use settings::Settings;
pub use token::Token;
