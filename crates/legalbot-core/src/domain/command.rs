use super::Language;

/// Text sent in reply to `/start`, `/help` and anything unrecognised.
pub const HELP_MESSAGE: &str = "Available commands:
/start - start the bot
/help - show this message
/claim - submit a claim
/status - check status
/delete - delete your history
/lang <code> - set your language

Data policy: https://github.com/owner/legalbot/blob/main/DATA_POLICY.md";

/// A user command parsed from an inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the help message.
    Help,
    /// Submit a prompt for completion.
    Claim(String),
    /// Fetch links to the most recent results.
    Recent,
    /// Delete all stored results for the chat.
    DeleteHistory,
    /// Change the chat's language preference.
    SetLanguage(Language),
}

impl Command {
    /// Parse message text into a command.
    ///
    /// Plain text without a leading `/` is treated as a claim. Returns `None`
    /// for empty messages.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let Some(stripped) = text.strip_prefix('/') else {
            return Some(Self::Claim(text.to_string()));
        };

        let (head, rest) = match stripped.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (stripped, ""),
        };
        // Commands in group chats arrive as `/claim@SomeBot`
        let name = head.split('@').next().unwrap_or(head);

        let command = match name {
            "start" | "help" => Self::Help,
            "claim" if !rest.is_empty() => Self::Claim(rest.to_string()),
            "status" => Self::Recent,
            "delete" => Self::DeleteHistory,
            "lang" => match Language::parse(rest) {
                Ok(language) => Self::SetLanguage(language),
                Err(_) => Self::Help,
            },
            _ => Self::Help,
        };

        Some(command)
    }

    /// Name used in logs and spans.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Claim(_) => "claim",
            Self::Recent => "status",
            Self::DeleteHistory => "delete",
            Self::SetLanguage(_) => "lang",
        }
    }
}
