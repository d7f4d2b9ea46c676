//! Telegram Bot API sender.

mod client;

pub use client::{TelegramConfig, TelegramSender};
