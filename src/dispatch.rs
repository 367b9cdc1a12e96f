//! Inbound-event router: commands, FAQ replies, donations, and the
//! registration wizard.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;

use crate::channels::{BotCommand, ChatChannel, InboundEvent, InlineButton, Keyboard};
use crate::error::ChannelError;
use crate::store::model::RegistrationEntry;
use crate::store::registrations::RegistrationStore;
use crate::texts;
use crate::wizard::{RegistrationWizard, WizardReply, prompts};

/// Routes inbound events to the static responders and the wizard.
///
/// One dispatcher consumes the whole event stream; events are processed one
/// at a time to completion.
pub struct Dispatcher {
    channel: Arc<dyn ChatChannel>,
    store: Arc<dyn RegistrationStore>,
    wizard: RegistrationWizard,
    /// Chats whose next message is a free question for the operator.
    pending_questions: HashSet<i64>,
    admin_chat_id: Option<i64>,
}

impl Dispatcher {
    pub fn new(
        channel: Arc<dyn ChatChannel>,
        store: Arc<dyn RegistrationStore>,
        admin_chat_id: Option<i64>,
    ) -> Self {
        Self {
            channel,
            store,
            wizard: RegistrationWizard::new(),
            pending_questions: HashSet::new(),
            admin_chat_id,
        }
    }

    /// Register the command menu, then consume the event stream until it
    /// ends. Per-event errors are logged, not fatal.
    pub async fn run(&mut self) -> Result<(), ChannelError> {
        let commands: Vec<BotCommand> = texts::COMMANDS
            .iter()
            .map(|(command, description)| BotCommand {
                command: (*command).to_string(),
                description: (*description).to_string(),
            })
            .collect();
        self.channel.set_commands(&commands).await?;

        let mut events = self.channel.start().await?;
        while let Some(event) = events.next().await {
            if let Err(e) = self.handle_event(event).await {
                tracing::warn!(error = %e, "failed to handle event");
            }
        }
        Ok(())
    }

    /// Process one inbound event.
    pub async fn handle_event(&mut self, event: InboundEvent) -> Result<(), ChannelError> {
        match event {
            InboundEvent::Text {
                chat_id,
                message_id,
                text,
            } => self.handle_text(chat_id, message_id, &text).await,
            InboundEvent::ButtonTap {
                chat_id,
                message_id,
                data,
            } => self.handle_button_tap(chat_id, message_id, &data).await,
        }
    }

    async fn handle_text(
        &mut self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), ChannelError> {
        // Cancel takes precedence over everything, from any state.
        if text == texts::CANCEL_BUTTON {
            return self.handle_cancel(chat_id).await;
        }

        if let Some(command) = parse_command(text) {
            return self.handle_command(chat_id, command).await;
        }

        // One-shot free question for the operator.
        if self.pending_questions.remove(&chat_id) {
            return self.forward_question(chat_id, message_id).await;
        }

        // An active wizard session consumes all remaining free text.
        if let Some(reply) = self.wizard.handle_reply(chat_id, text) {
            return match reply {
                WizardReply::Prompt(prompt) => {
                    self.channel.send(chat_id, &prompt, Keyboard::cancel()).await
                }
                WizardReply::Completed(entry) => self.finalize(chat_id, entry).await,
            };
        }

        match text {
            "Розклад" => self.channel.send(chat_id, texts::FAQ_SCHEDULE, Keyboard::Remove).await,
            "Вартість" => self.channel.send(chat_id, texts::FAQ_PRICE, Keyboard::Remove).await,
            "Що брати" => self.channel.send(chat_id, texts::FAQ_PACKING, Keyboard::Remove).await,
            "Номер телефону" => {
                self.channel.send(chat_id, texts::FAQ_PHONE, Keyboard::Remove).await
            }
            "Інше питання" => {
                self.pending_questions.insert(chat_id);
                self.channel.send(chat_id, texts::ASK_QUESTION, Keyboard::Remove).await
            }
            _ => {
                tracing::debug!(chat_id, "ignoring unmatched text");
                Ok(())
            }
        }
    }

    async fn handle_button_tap(
        &mut self,
        chat_id: i64,
        message_id: i64,
        data: &str,
    ) -> Result<(), ChannelError> {
        match data {
            texts::PRIVAT_CALLBACK => {
                self.channel.clear_buttons(chat_id, message_id).await?;
                self.channel
                    .send(chat_id, &texts::privat_details(), Keyboard::None)
                    .await
            }
            _ => {
                tracing::debug!(chat_id, data, "ignoring unknown callback");
                Ok(())
            }
        }
    }

    async fn handle_cancel(&mut self, chat_id: i64) -> Result<(), ChannelError> {
        let had_question = self.pending_questions.remove(&chat_id);
        if self.wizard.cancel(chat_id) || had_question {
            self.channel
                .send(chat_id, prompts::CANCELLED, Keyboard::Remove)
                .await
        } else {
            self.channel
                .send(chat_id, prompts::NO_ACTIVE_SESSION, Keyboard::Remove)
                .await
        }
    }

    /// Every command silently discards any in-progress wizard session and
    /// pending question for the chat.
    async fn handle_command(&mut self, chat_id: i64, command: &str) -> Result<(), ChannelError> {
        self.wizard.discard(chat_id);
        self.pending_questions.remove(&chat_id);

        match command {
            "start" => {
                self.channel
                    .send(chat_id, texts::GREETING, Keyboard::Remove)
                    .await
            }
            "questions" => {
                self.channel
                    .send(
                        chat_id,
                        texts::QUESTIONS_HEADER,
                        Keyboard::choices(texts::FAQ_CHOICES),
                    )
                    .await
            }
            "number" => {
                self.channel
                    .send(chat_id, texts::CONTACT_NUMBER, Keyboard::Remove)
                    .await
            }
            "donate" => {
                self.channel
                    .send(chat_id, texts::DONATE_THANKS, Keyboard::Remove)
                    .await?;
                self.channel
                    .send(
                        chat_id,
                        texts::DONATE_CHOOSE,
                        Keyboard::Inline(vec![
                            InlineButton::url(texts::MONO_BUTTON, texts::MONO_LINK),
                            InlineButton::callback(texts::PRIVAT_BUTTON, texts::PRIVAT_CALLBACK),
                        ]),
                    )
                    .await
            }
            "register" => {
                let first_prompt = self.wizard.begin(chat_id);
                self.channel
                    .send(chat_id, first_prompt, Keyboard::cancel())
                    .await
            }
            _ => {
                tracing::debug!(chat_id, command, "ignoring unknown command");
                Ok(())
            }
        }
    }

    async fn forward_question(
        &mut self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<(), ChannelError> {
        self.channel
            .send(chat_id, texts::QUESTION_FORWARDED, Keyboard::None)
            .await?;
        if let Some(admin) = self.admin_chat_id {
            self.channel.forward(admin, chat_id, message_id).await?;
        }
        Ok(())
    }

    /// Persist a completed registration and send the closing messages.
    ///
    /// On a storage failure the session is kept in its terminal step and the
    /// user is told; the next message from the chat retries. A failed CSV
    /// export after a successful append is reported in the log only — the
    /// record list is the source of truth and the projection is regenerated
    /// on the next append.
    async fn finalize(
        &mut self,
        chat_id: i64,
        entry: RegistrationEntry,
    ) -> Result<(), ChannelError> {
        if let Err(e) = self.store.append(entry.clone()).await {
            tracing::error!(chat_id, error = %e, "failed to persist registration");
            return self
                .channel
                .send(chat_id, prompts::STORAGE_FAILED, Keyboard::cancel())
                .await;
        }
        self.wizard.finish(chat_id);

        if let Err(e) = self.store.export_table().await {
            tracing::warn!(error = %e, "tabular export failed; record list is saved");
        }

        self.channel
            .send(chat_id, prompts::COMPLETED, Keyboard::Remove)
            .await?;
        self.channel
            .send(chat_id, prompts::GROUP_INVITE, Keyboard::None)
            .await?;

        if let Some(admin) = self.admin_chat_id {
            if let Err(e) = self
                .channel
                .send(admin, &operator_summary(&entry), Keyboard::None)
                .await
            {
                tracing::warn!(error = %e, "failed to notify operator");
            }
        }
        Ok(())
    }
}

/// Extract the command name from a `/command` message, dropping a trailing
/// `@botname` mention and any arguments.
fn parse_command(text: &str) -> Option<&str> {
    let first = text.trim().split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    (!name.is_empty()).then_some(name)
}

/// Operator notification: parent line plus one numbered line per child.
fn operator_summary(entry: &RegistrationEntry) -> String {
    let mut summary = format!(
        "Нова реєстрація від {} ({})",
        entry.parent_name, entry.parent_phone
    );
    for (i, child) in entry.children.iter().enumerate() {
        summary.push_str(&format!(
            "\n{}. {}, вік {}, {}",
            i + 1,
            child.name,
            child.age,
            child.needs
        ));
    }
    summary
}
