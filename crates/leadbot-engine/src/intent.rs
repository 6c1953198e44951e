// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-based intent classification for free-form sales dialogue.

use leadbot_core::Intent;

use crate::slots;

/// Keywords naming the flagship product.
const CASHFLOW_KEYWORDS: &[&str] = &[
    "cashflow",
    "кэшфло",
    "кешфло",
    "денежный поток",
];

/// Keywords requesting elaboration.
const DETAILS_KEYWORDS: &[&str] = &[
    "подробнее",
    "расскажите",
    "расскажи",
    "как это работает",
    "как проходит",
    "сколько стоит",
    "стоимость",
    "цена",
    "что входит",
];

/// Keywords signalling readiness to proceed.
const SCHEDULE_KEYWORDS: &[&str] = &[
    "давайте",
    "давай",
    "созвон",
    "звонок",
    "позвоните",
    "наберите",
    "договорились",
    "согласен",
    "согласна",
    "подходит",
    "готов обсудить",
];

/// Classify a message with strict precedence.
///
/// A successful slot parse always wins: a user stating a concrete time is
/// unambiguous regardless of accompanying words. Then product, elaboration,
/// and readiness keyword sets in that order; `None` routes the message to
/// the seller responder.
pub fn classify(text: &str) -> Option<Intent> {
    if slots::parse(text).is_some() {
        return Some(Intent::Time);
    }

    let lower = text.to_lowercase();

    if CASHFLOW_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some(Intent::Cashflow);
    }
    if DETAILS_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some(Intent::Details);
    }
    if SCHEDULE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some(Intent::Schedule);
    }

    None
}
