// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt texts and the reply-to-prompt recovery map.
//!
//! Form prompts double as the step-recovery signal: when session state is
//! lost, the text the user replied to is matched back to the step that
//! produced it. Changing a prompt therefore requires keeping its marker
//! phrase recognizable by [`step_for_prompt`].

use leadbot_core::{Day, FormStep, Product, TimeSlot};

pub const WELCOME: &str = "Здравствуйте! Мы проводим бизнес-игры для команд: Cashflow и «Бункер». \
Чтобы подобрать формат под вашу задачу, задам пару коротких вопросов.";

pub const ASK_NAME: &str = "Как вас зовут?";

pub const ASK_CONTACT: &str = "Оставьте, пожалуйста, телефон или email для связи.";

pub const ASK_COMPANY: &str = "Какую компанию вы представляете?";

pub const ASK_TIME: &str =
    "Когда вам удобно созвониться? Например: завтра в 12:00 или сегодня в 16:00.";

pub const BROADCAST_PROMPT: &str = "Введите текст рассылки ответом на это сообщение.";

pub const BROADCAST_QUEUED: &str = "Рассылка поставлена в очередь.";

pub const DETAILS_CASHFLOW: &str = "Cashflow — настольная бизнес-игра про управление личными и \
корпоративными финансами: 2-3 часа, команды до 6 человек за столом, разбор решений после игры.";

pub const DETAILS_GENERIC: &str = "Мы проводим выездные бизнес-игры для команд: формат на 2-3 часа, \
подходит для команд от 5 до 50 человек, помогает увидеть, как люди принимают решения.";

pub const APOLOGY: &str =
    "Извините, сейчас не получилось ответить. Напишите, пожалуйста, ещё раз чуть позже.";

pub const CHECKLIST_CAPTION: &str = "В знак благодарности отправляем вам наш гайд \
«Как игры помогают выявить лидеров в команде».";

/// Steering instruction for the first seller call after form completion.
pub const NO_REPEAT_INSTRUCTION: &str = "Не повторяй приветствие и не запрашивай контакты заново: \
имя, контакт и компания уже собраны.";

/// Confirmation text for a recognized slot.
pub fn confirm_slot(slot: &TimeSlot) -> String {
    match slot.day {
        Some(day) => format!("Отлично, записал: {day} в {}. До связи!", slot.time),
        None => format!("Отлично, записал: в {}. До связи!", slot.time),
    }
}

/// Operator line for a confirmed slot.
pub fn operator_slot_line(user_id: &str, slot: &TimeSlot, product: Option<Product>) -> String {
    let day = slot
        .day
        .map(|d| d.to_string())
        .unwrap_or_else(|| "день не указан".to_string());
    match product {
        Some(p) => format!("📅 Созвон: {day} в {} — {p} (пользователь {user_id})", slot.time),
        None => format!("📅 Созвон: {day} в {} (пользователь {user_id})", slot.time),
    }
}

/// Map a replied-to message text back to the form step that produced it.
///
/// Matching is deliberately on marker substrings, not equality, so minor
/// copy edits do not break recovery.
pub fn step_for_prompt(reply_text: &str) -> Option<FormStep> {
    if reply_text.contains("зовут") {
        Some(FormStep::Name)
    } else if reply_text.contains("телефон") || reply_text.contains("email") {
        Some(FormStep::Contact)
    } else if reply_text.contains("компани") {
        Some(FormStep::Company)
    } else {
        None
    }
}

/// True if the replied-to text is the admin broadcast prompt.
pub fn is_broadcast_prompt(reply_text: &str) -> bool {
    reply_text.contains("текст рассылки")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_recover_their_own_steps() {
        assert_eq!(step_for_prompt(ASK_NAME), Some(FormStep::Name));
        assert_eq!(step_for_prompt(ASK_CONTACT), Some(FormStep::Contact));
        assert_eq!(step_for_prompt(ASK_COMPANY), Some(FormStep::Company));
        assert_eq!(step_for_prompt(ASK_TIME), None);
        assert_eq!(step_for_prompt("произвольный текст"), None);
    }

    #[test]
    fn broadcast_prompt_is_recognized() {
        assert!(is_broadcast_prompt(BROADCAST_PROMPT));
        assert!(!is_broadcast_prompt(ASK_NAME));
    }

    #[test]
    fn slot_confirmation_mentions_day_and_time() {
        let slot = TimeSlot {
            day: Some(Day::Tomorrow),
            time: "12:00".into(),
        };
        let text = confirm_slot(&slot);
        assert!(text.contains("завтра"));
        assert!(text.contains("12:00"));
    }

    #[test]
    fn operator_line_carries_product() {
        let slot = TimeSlot {
            day: Some(Day::Today),
            time: "16:00".into(),
        };
        let line = operator_slot_line("42", &slot, Some(Product::Cashflow));
        assert!(line.contains("Cashflow"));
        assert!(line.contains("16:00"));
        assert!(line.contains("42"));
    }
}
