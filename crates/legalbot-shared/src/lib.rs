//! # Legalbot Shared
//!
//! Wire types shared by the webhook server and its tests.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
