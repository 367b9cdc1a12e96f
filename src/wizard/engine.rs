//! `RegistrationWizard` — owns the per-chat session map.

use std::collections::HashMap;

use crate::store::model::RegistrationEntry;
use crate::wizard::state::{Session, StepResult};

/// What the dispatcher should do after a wizard reply.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardReply {
    /// Send this prompt (next question or validation error) with the
    /// cancel keyboard.
    Prompt(String),
    /// The registration is complete; persist the entry. The session stays
    /// alive until `finish` is called, so a failed write can be retried.
    Completed(RegistrationEntry),
}

/// Session store for the registration wizard, keyed by chat id.
///
/// Each chat's session is fully independent; nothing here reads or writes
/// cross-session state.
#[derive(Debug, Default)]
pub struct RegistrationWizard {
    sessions: HashMap<i64, Session>,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `chat_id`, silently discarding any prior one.
    /// Returns the first prompt to send.
    pub fn begin(&mut self, chat_id: i64) -> &'static str {
        if self.sessions.insert(chat_id, Session::new()).is_some() {
            tracing::debug!(chat_id, "registration restarted; partial session discarded");
        }
        Session::first_prompt()
    }

    pub fn is_active(&self, chat_id: i64) -> bool {
        self.sessions.contains_key(&chat_id)
    }

    /// User-initiated cancel. Returns `true` when a session existed.
    pub fn cancel(&mut self, chat_id: i64) -> bool {
        let existed = self.sessions.remove(&chat_id).is_some();
        if existed {
            tracing::info!(chat_id, "registration cancelled");
        }
        existed
    }

    /// Silently discard a session (command interrupt).
    pub fn discard(&mut self, chat_id: i64) {
        if self.sessions.remove(&chat_id).is_some() {
            tracing::debug!(chat_id, "partial session discarded by command");
        }
    }

    /// Feed one reply to the chat's session. `None` when no session is
    /// active for this chat.
    pub fn handle_reply(&mut self, chat_id: i64, text: &str) -> Option<WizardReply> {
        let session = self.sessions.get_mut(&chat_id)?;
        let reply = match session.apply(text) {
            StepResult::Next { prompt } | StepResult::Invalid { prompt } => {
                WizardReply::Prompt(prompt)
            }
            StepResult::Complete(entry) => WizardReply::Completed(entry),
        };
        tracing::debug!(chat_id, step = %session.step(), "wizard reply handled");
        Some(reply)
    }

    /// Drop the session once its entry has been durably stored.
    pub fn finish(&mut self, chat_id: i64) {
        self.sessions.remove(&chat_id);
    }

    /// Number of in-flight sessions (abandoned ones included; there is no
    /// idle timeout).
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::prompts;

    const CHAT: i64 = 100;

    fn complete_one_child(wizard: &mut RegistrationWizard, chat_id: i64) -> WizardReply {
        wizard.begin(chat_id);
        wizard.handle_reply(chat_id, "Гаврилюк Оля");
        wizard.handle_reply(chat_id, "0681234567");
        wizard.handle_reply(chat_id, "1");
        wizard.handle_reply(chat_id, "Іваненко Петро");
        wizard.handle_reply(chat_id, "10");
        wizard.handle_reply(chat_id, "Ні").unwrap()
    }

    #[test]
    fn begin_returns_first_prompt_and_activates() {
        let mut wizard = RegistrationWizard::new();
        assert!(!wizard.is_active(CHAT));
        assert_eq!(wizard.begin(CHAT), prompts::PARENT_NAME);
        assert!(wizard.is_active(CHAT));
    }

    #[test]
    fn begin_overwrites_partial_session() {
        let mut wizard = RegistrationWizard::new();
        wizard.begin(CHAT);
        wizard.handle_reply(CHAT, "Гаврилюк Оля");

        // Restart: back to the first question, prior progress gone.
        wizard.begin(CHAT);
        let reply = wizard.handle_reply(CHAT, "оля").unwrap();
        assert_eq!(
            reply,
            WizardReply::Prompt(prompts::PARENT_NAME_INVALID.into())
        );
        assert_eq!(wizard.active_sessions(), 1);
    }

    #[test]
    fn cancel_discards_and_reports_existence() {
        let mut wizard = RegistrationWizard::new();
        assert!(!wizard.cancel(CHAT));
        wizard.begin(CHAT);
        assert!(wizard.cancel(CHAT));
        assert!(!wizard.is_active(CHAT));
        assert!(wizard.handle_reply(CHAT, "Гаврилюк Оля").is_none());
    }

    #[test]
    fn reply_without_session_is_none() {
        let mut wizard = RegistrationWizard::new();
        assert!(wizard.handle_reply(CHAT, "привіт").is_none());
    }

    #[test]
    fn completed_session_survives_until_finish() {
        let mut wizard = RegistrationWizard::new();
        let WizardReply::Completed(entry) = complete_one_child(&mut wizard, CHAT) else {
            panic!("expected completion");
        };
        assert_eq!(entry.child_count, 1);

        // Still active: a storage failure can be retried.
        assert!(wizard.is_active(CHAT));
        let WizardReply::Completed(_) = wizard.handle_reply(CHAT, "ще раз").unwrap() else {
            panic!("expected re-emitted completion");
        };

        wizard.finish(CHAT);
        assert!(!wizard.is_active(CHAT));
    }

    #[test]
    fn sessions_are_independent_per_chat() {
        let mut wizard = RegistrationWizard::new();
        wizard.begin(1);
        wizard.begin(2);
        wizard.handle_reply(1, "Гаврилюк Оля");

        // Chat 2 is still on the first question.
        let reply = wizard.handle_reply(2, "0681234567").unwrap();
        assert_eq!(
            reply,
            WizardReply::Prompt(prompts::PARENT_NAME_INVALID.into())
        );
        assert_eq!(wizard.active_sessions(), 2);
    }
}
