use crate::domain::{ChatId, Language};

/// Per-chat language preferences.
pub trait PreferenceStore: Send + Sync {
    /// The chat's language, or the default when none was set.
    fn language(&self, chat: ChatId) -> Language;

    fn set_language(&self, chat: ChatId, language: Language);
}
