//! Middleware modules.

pub mod error;
pub mod secret_token;
