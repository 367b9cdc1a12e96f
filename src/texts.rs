//! Fixed user-facing texts: greetings, FAQ answers, donation details.
//!
//! Everything the bot says outside the registration wizard lives here;
//! wizard prompts are in `wizard::prompts`.

/// Reserved reply-button label that aborts an active registration.
pub const CANCEL_BUTTON: &str = "Відмінити реєстрацію";

/// `/start` greeting.
pub const GREETING: &str = "👋 Вітаю! Я — бот дитячого табору 2025.\n\
/questions — готові питання\n\
/register — зареєструвати дитину на табір\n\
/donate — підтримати нас платежем";

/// `/questions` keyboard header.
pub const QUESTIONS_HEADER: &str = "Оберіть питання:";

/// The five FAQ choices shown on the `/questions` keyboard.
pub const FAQ_CHOICES: [&str; 5] = [
    "Розклад",
    "Вартість",
    "Що брати",
    "Номер телефону",
    "Інше питання",
];

pub const FAQ_SCHEDULE: &str = "🗓 Наш табір працює з 5 по 7 серпня, 9:00–18:00.";
pub const FAQ_PRICE: &str = "💵 Благодійний табір; підтримати можна через /donate.";
pub const FAQ_PACKING: &str = "🎒 Зручний одяг, кепка та гарний настрій.";
pub const FAQ_PHONE: &str = "📞 0689376905 (Андрій)";

/// `/number` reply.
pub const CONTACT_NUMBER: &str = "📞 Контактний номер: 0689376905 (Андрій)";

/// Prompt sent after the "other question" FAQ choice.
pub const ASK_QUESTION: &str = "Напишіть ваше питання:";

/// Acknowledgment after forwarding a free question to the operator.
pub const QUESTION_FORWARDED: &str = "✅ Дякую! Ми відповімо.";

// ── Donations ───────────────────────────────────────────────────────

pub const DONATE_THANKS: &str = "💚 Дякуємо за вашу підтримку!";
pub const DONATE_CHOOSE: &str = "Оберіть спосіб переказу:";

pub const MONO_LINK: &str = "https://send.monobank.ua/jar/24F7gJ3cw5";
pub const MONO_BUTTON: &str = "Monobank";

pub const PRIVAT_BUTTON: &str = "ПриватБанк ▶️";
/// Callback payload for the PrivatBank details button.
pub const PRIVAT_CALLBACK: &str = "show_privat";

pub const PRIVAT_CARD: &str = "5168 7520 2133 7889";
pub const PRIVAT_IBAN: &str = "UA52 305299 0262 0364 0092 5651653";
pub const RECEIVER: &str = "Семенюк Андрій Олександрович";

/// PrivatBank transfer details, Markdown-formatted.
pub fn privat_details() -> String {
    format!(
        "💳 *ПриватБанк*\n\n\
         Картка: `{PRIVAT_CARD}`\n\
         IBAN: `{PRIVAT_IBAN}`\n\
         Отримувач: _{RECEIVER}_\n\n\
         🔄 Скопіюйте ці дані в свій Privat24 чи інший банк для переказу."
    )
}

// ── Command menu ────────────────────────────────────────────────────

/// Commands registered with Telegram at startup: `(command, description)`.
pub const COMMANDS: [(&str, &str); 5] = [
    ("start", "Привітання та інструкції"),
    ("questions", "Готові питання"),
    ("number", "Контактний номер"),
    ("donate", "Пожертвування"),
    ("register", "Реєстрація дитини"),
];
