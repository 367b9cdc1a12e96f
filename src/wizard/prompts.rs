//! Prompt and error texts for the registration wizard.

pub const PARENT_NAME: &str = "👪 Ім'я та Прізвище батька/матері:";
pub const PARENT_NAME_INVALID: &str =
    "❌ Введіть коректне ім’я та прізвище (наприклад, 'Гаврилюк Оля').";

pub const PARENT_PHONE: &str = "Телефон батьків:";
pub const PARENT_PHONE_INVALID: &str =
    "❌ Введіть телефон у форматі 0XXXXXXXXX або +380XXXXXXXXX.";

pub const CHILD_COUNT: &str = "Скільки дітей? Введіть число:";
pub const CHILD_COUNT_INVALID: &str = "Введіть коректне число дітей:";

pub const CHILD_NAME_INVALID: &str =
    "❌ Введіть коректне ім’я дитини (наприклад, 'Іваненко Петро').";

pub const CHILD_AGE: &str = "Вік дитини:";
pub const CHILD_AGE_INVALID: &str = "❌ Введіть вік дитини від 5 до 16.";

pub const CHILD_NEEDS: &str = "Особливості/алергії? Якщо ні — 'Ні':";
pub const CHILD_NEEDS_INVALID: &str = "❌ Будь ласка, скоротіть опис до 100 символів.";

pub const CANCELLED: &str = "❌ Реєстрацію скасовано.";
pub const NO_ACTIVE_SESSION: &str = "Нема активної сесії.";

pub const COMPLETED: &str = "✅ Реєстрація завершена!";
pub const GROUP_INVITE: &str =
    "📣 Долучайтесь до батьківської групи табору 2025: [t.me/tabir_parents](https://t.me/tabir_parents)";

/// Sent when persisting a completed registration fails; the session is kept
/// so the next message retries.
pub const STORAGE_FAILED: &str =
    "⚠️ Не вдалося зберегти реєстрацію. Надішліть будь-яке повідомлення, щоб спробувати ще раз.";

/// Prompt for the name of child number `index` (1-based).
pub fn child_name(index: u32) -> String {
    format!("Ім'я та Прізвище дитини №{index}:")
}
