//! Configuration loaded from the environment.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// Chat id that receives operator notifications; `None` disables them.
    pub admin_chat_id: Option<i64>,
    /// Directory holding the registration list and its CSV export.
    pub data_dir: PathBuf,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// `TELEGRAM_BOT_TOKEN` is required. `ADMIN_CHAT_ID` is optional; a
    /// non-numeric value disables operator notifications with a warning
    /// rather than failing startup. `CAMP_BOT_DATA_DIR` defaults to `./data`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".into()))?;
        if bot_token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "TELEGRAM_BOT_TOKEN".into(),
                message: "token is empty".into(),
            });
        }

        let admin_chat_id = match std::env::var("ADMIN_CHAT_ID") {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        "ADMIN_CHAT_ID is not a number; operator notifications disabled"
                    );
                    None
                }
            },
            _ => None,
        };

        let data_dir = std::env::var("CAMP_BOT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        Ok(Self {
            bot_token,
            admin_chat_id,
            data_dir,
        })
    }
}
