//! vault-core - configurable client for HashiCorp Vault
//!
//! Polymorphic over three independently configured adapters:
//! 1. Transport: how HTTP requests are performed
//! 2. Auth: which login backend produces the bearer token
//! 3. Secret engine: how read/write/list/delete map onto a mount
//!
//! Adapters are always set explicitly, never probed from the environment.

pub mod auth;
pub mod codec;
pub mod engine;
pub mod transport;

mod client;
mod error;
mod request;

pub use client::Client;
pub use error::VaultError;
pub use request::RequestOptions;
pub use transport::Method;
