//! In-memory language preferences.

use std::collections::HashMap;
use std::sync::RwLock;

use legalbot_core::domain::{ChatId, Language};
use legalbot_core::ports::PreferenceStore;

/// Language preferences kept in a read-mostly map.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    languages: RwLock<HashMap<ChatId, Language>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn language(&self, chat: ChatId) -> Language {
        let languages = self.languages.read().unwrap_or_else(|e| e.into_inner());
        languages.get(&chat).cloned().unwrap_or_default()
    }

    fn set_language(&self, chat: ChatId, language: Language) {
        let mut languages = self.languages.write().unwrap_or_else(|e| e.into_inner());
        languages.insert(chat, language);
    }
}
