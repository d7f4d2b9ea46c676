//! # Legalbot Core
//!
//! The domain layer of the legalbot backend.
//! This crate contains the command orchestration logic and the ports it
//! drives, with zero infrastructure dependencies.

pub mod commands;
pub mod domain;
pub mod error;
pub mod ports;

pub use commands::{CommandOrchestrator, CommandOutcome};
pub use error::{CommandError, DomainError};
