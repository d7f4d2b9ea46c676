//! SeaORM entities.

pub mod bot_result;
