//! Domain entities - the core business objects.

mod chat;
mod command;
mod language;
mod result;

pub use chat::ChatId;
pub use command::{Command, HELP_MESSAGE};
pub use language::Language;
pub use result::{ResultId, StoredResult};
